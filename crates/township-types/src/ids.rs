//! Type-safe identifier wrappers.
//!
//! Agents are identified by the stable slug handed out by the external
//! roster (for example `"ada"`), so [`AgentId`] wraps a `String`. Every
//! other entity is created inside the simulation and gets a UUID v7
//! (time-ordered) identifier.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Stable identity of an agent, as provided by the roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentId(pub String);

impl AgentId {
    /// Create an agent id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a location in the city.
    LocationId
}

define_id! {
    /// Unique identifier for a narrative event.
    EventId
}

define_id! {
    /// Unique identifier for a mining machine.
    MachineId
}

define_id! {
    /// Unique identifier for a property.
    PropertyId
}

define_id! {
    /// Unique identifier for a ledger transaction.
    TransactionId
}

define_id! {
    /// Unique identifier for a community group.
    GroupId
}

define_id! {
    /// Unique identifier for a community project.
    ProjectId
}

define_id! {
    /// Unique identifier for a union grievance.
    GrievanceId
}

define_id! {
    /// Unique identifier for a civic record (crime, education, health,
    /// entertainment, vehicle).
    RecordId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_serializes_as_plain_string() {
        let id = AgentId::from("ada");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"ada\""));
    }

    #[test]
    fn uuid_ids_are_unique() {
        assert_ne!(MachineId::new(), MachineId::new());
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = EventId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
