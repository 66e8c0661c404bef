use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an id from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Opaque actor identity.
    ActorId
);
string_id!(
    /// Identity of one block inside a flow.
    BlockId
);
string_id!(
    /// Identity of a flow.
    FlowId
);

/// Visual state of one actor.
///
/// Positions are stage pixels relative to the actor's origin, rotation is in
/// degrees and unbounded, size is a percentage (100 = natural size).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorState {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub size: f64,
    #[serde(default)]
    pub message: Option<String>,
    /// How long the message should stay up, in milliseconds.
    #[serde(default)]
    pub message_duration: Option<u64>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            size: 100.0,
            message: None,
            message_duration: None,
            visible: true,
        }
    }
}

impl ActorState {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Shallow merge: only the fields present in `patch` change.
    pub fn merge(&mut self, patch: &ActorStatePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(message) = &patch.message {
            self.message = message.clone();
        }
        if let Some(duration) = patch.message_duration {
            self.message_duration = duration;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
    }

    /// Milliseconds the current message asks playback to hold, if a message is showing.
    pub fn message_hold_ms(&self) -> u64 {
        match self.message {
            Some(_) => self.message_duration.unwrap_or(0),
            None => 0,
        }
    }
}

/// Partial [`ActorState`] used for shallow-merge writes into a state sink.
///
/// `message: Some(None)` clears the message; `message: None` leaves it alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActorStatePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rotation: Option<f64>,
    pub size: Option<f64>,
    pub message: Option<Option<String>>,
    pub message_duration: Option<Option<u64>>,
    pub visible: Option<bool>,
}

impl ActorStatePatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<ActorState> for ActorStatePatch {
    fn from(s: ActorState) -> Self {
        Self {
            x: Some(s.x),
            y: Some(s.y),
            rotation: Some(s.rotation),
            size: Some(s.size),
            message: Some(s.message),
            message_duration: Some(s.message_duration),
            visible: Some(s.visible),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
