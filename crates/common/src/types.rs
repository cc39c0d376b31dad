use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a serde-transparent UUID v4 identifier with parsing, display and
/// conversions to and from [`Uuid`].
macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            /// Parses any textual UUID form accepted by [`Uuid::parse_str`].
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_identifier! {
    /// Identity of an entity or aggregate root.
    ///
    /// Kept distinct from [`EventId`] so the two cannot be swapped.
    EntityId
}

uuid_identifier! {
    /// Identity of a single domain event occurrence.
    EventId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(EntityId::new(), EntityId::new());
        assert_ne!(EventId::default(), EventId::default());
    }

    #[test]
    fn from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = EntityId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
        assert_eq!(Uuid::from(id), uuid);
        assert_eq!(Uuid::from(EventId::from(uuid)), uuid);
    }

    #[test]
    fn serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&EntityId::from(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));

        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_uuid(), uuid);
    }

    #[test]
    fn display_and_parse_agree() {
        let id = EntityId::new();
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let padded: EventId = format!("  {}\n", id).parse().unwrap();
        assert_eq!(padded.as_uuid(), id.as_uuid());
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!("order-42".parse::<EntityId>().is_err());
        assert!("".parse::<EventId>().is_err());
    }
}
