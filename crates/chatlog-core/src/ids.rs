//! Branded ID newtypes for type safety.
//!
//! Record and thread identifiers are both strings in storage. Wrapping them
//! in distinct newtypes keeps a thread reference from being passed where a
//! record identifier is expected.
//!
//! Fresh identifiers are UUID v7 (time-ordered) generated via
//! [`uuid::Uuid::now_v7`].

use std::fmt;
use uuid::Uuid;

fn new_v7() -> String {
    Uuid::now_v7().to_string()
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID (UUID v7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(new_v7())
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

branded_id! {
    /// Stable, globally unique identifier of a persisted record.
    RecordId
}

branded_id! {
    /// Identifier of the conversation thread a record belongs to.
    ThreadId
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_new_is_uuid_v7() {
        let id = RecordId::new();
        let parsed = Uuid::parse_str(id.as_str()).expect("should be valid UUID");
        assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn record_ids_are_unique() {
        let a = RecordId::new();
        let b = RecordId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn record_ids_sort_by_creation() {
        let a = RecordId::new();
        let b = RecordId::new();
        assert!(a < b);
    }

    #[test]
    fn from_str_ref() {
        let id = ThreadId::from("thread-123");
        assert_eq!(id.as_str(), "thread-123");
    }

    #[test]
    fn deref_to_str() {
        let id = RecordId::from("hello");
        let s: &str = &id;
        assert_eq!(s, "hello");
    }

    #[test]
    fn from_owned_string() {
        let id = RecordId::from(format!("legacy-{}", 7));
        assert_eq!(id.as_str(), "legacy-7");
    }

    #[test]
    fn display() {
        let id = ThreadId::from("display-me");
        assert_eq!(format!("{id}"), "display-me");
    }
}
