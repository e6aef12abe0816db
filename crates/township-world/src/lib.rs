//! Ambient conditions, static tables, and world-level passes for the
//! Township simulation.
//!
//! # Modules
//!
//! - [`ambient`] -- Weighted rolls for mood, weather, and time of day.
//! - [`catalog`] -- Purchasable mining machines and properties.
//! - [`error`] -- Error types for world-level passes.
//! - [`ladder`] -- The ordered job tier ladder.
//! - [`mining`] -- The shared mining pool, weather faults, and block rewards.
//! - [`seasonal`] -- City-wide seasonal events.
//! - [`starting_world`] -- The default world synthesized on first start.

pub mod ambient;
pub mod catalog;
pub mod error;
pub mod ladder;
pub mod mining;
pub mod seasonal;
pub mod starting_world;

// Re-export primary types at crate root.
pub use ambient::{WeightedTable, roll_ambient};
pub use catalog::{
    CatalogItem, MACHINES, MachineSpec, PROPERTIES, PropertySpec, find_machine, find_property,
    most_expensive_affordable,
};
pub use error::WorldError;
pub use ladder::{DEPARTMENT_LEAD_TIER, JOB_LADDER, JobTier, LOWEST_TIER, TOP_TIER, job_at};
pub use mining::{BlockFound, MiningConfig, MiningReport, Payout, run_mining_pass};
pub use seasonal::{SeasonalChange, SeasonalConfig, advance_seasonal};
pub use starting_world::{
    DEFAULT_DEPARTMENT, DEPARTMENT_BASELINE, STARTING_BALANCE, create_starting_world,
};
