//! Type-safe ID wrappers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Check if this ID is empty.
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Get the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_owned())
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                $name(s.clone())
            }
        }

        impl From<&$name> for $name {
            fn from(id: &$name) -> Self {
                id.clone()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(UserId, "A user identifier issued by the auth provider.");
define_id!(ListingId, "A skill listing document identifier.");
define_id!(RatingId, "A rating document identifier.");
define_id!(ConversationId, "A conversation identifier.");

impl ConversationId {
    /// Canonical conversation id for two participants.
    ///
    /// The ids are sorted before joining, so `between(a, b) == between(b, a)`.
    pub fn between(a: &UserId, b: &UserId) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        ConversationId(format!("{}_{}", first, second))
    }
}
