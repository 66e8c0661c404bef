pub(crate) mod builtin;
pub(crate) mod random;
pub(crate) mod registry;
