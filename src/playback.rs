pub(crate) mod driver;
pub(crate) mod scheduler;
pub(crate) mod sink;
pub(crate) mod timer;
