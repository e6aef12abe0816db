//! Shared type definitions for the Township world simulation.
//!
//! This crate is the single source of truth for every type persisted in the
//! world snapshot. Snapshot types flow downstream to `TypeScript` via
//! `ts-rs` for read-only consumers.
//!
//! # Modules
//!
//! - [`ids`] -- Agent slugs and UUID wrappers for simulation entities
//! - [`enums`] -- Enumeration types (ambient state, labor, lifecycles)
//! - [`structs`] -- Core entity structs (records, assets, ledger, logs)
//! - [`snapshot`] -- The root [`WorldSnapshot`] aggregate
//! - [`bounded`] -- Append-then-trim log helpers and retention counts
//! - [`random`] -- Injectable randomness and named probabilistic gates

pub mod bounded;
pub mod enums;
pub mod ids;
pub mod random;
pub mod snapshot;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use bounded::{Retention, trim_to_recent};
pub use enums::{
    EventKind, GrievanceStatus, LaborState, LocationKind, MachineStatus, Mood, ProjectStatus,
    RelationshipStatus, TimeOfDay, TransactionKind, Weather,
};
pub use ids::{
    AgentId, EventId, GrievanceId, GroupId, LocationId, MachineId, ProjectId, PropertyId,
    RecordId, TransactionId,
};
pub use random::{Dice, Gate, ScriptedDice, SeededDice, choose};
pub use snapshot::WorldSnapshot;
pub use structs::{
    Activity, AmbientState, CommunityGroup, CommunityProject, CrimeRecord, Department,
    EconomyLedger, EducationRecord, Entanglement, EntertainmentEvent, Event, Grievance,
    HealthRecord, Job, Location, MiningMachine, MiningPool, PricePoint, Property, Relationship,
    Resident, SCALAR_MAX, SCALAR_MIN, SeasonalEvent, Transaction, Vehicle, WellbeingRecord,
    WorkRecord, clamp_scalar,
};
