//! Agent-side passes for the Township simulation.
//!
//! This crate holds the per-tick logic that operates on a
//! [`WorldSnapshot`](township_types::WorldSnapshot) without touching I/O. It
//! sits between `township-world` (static tables and world-level passes) and
//! `township-core` (persistence and orchestration).
//!
//! # Modules
//!
//! - [`acquisition`] -- Buying machines and properties from the catalog
//! - [`config`] -- Tunables for every pass ([`LaborConfig`], [`SocialConfig`], ...)
//! - [`economy`] -- Payroll, rent, flavor transfers, auto-investment, pricing
//! - [`error`] -- Error types for agent operations ([`AgentError`])
//! - [`labor`] -- The work/break/clone state machine
//! - [`organization`] -- Departments, the union, promotions and demotions
//! - [`social`] -- Relationships, groups, projects, therapy
//! - [`wellbeing`] -- Per-tick psychological scalars and life satisfaction

pub mod acquisition;
pub mod config;
pub mod economy;
pub mod error;
pub mod labor;
pub mod organization;
pub mod social;
pub mod wellbeing;

// Re-export primary types at crate root for convenience.
pub use acquisition::{acquire_machine, acquire_property};
pub use config::{EconomyConfig, LaborConfig, OrganizationConfig, SocialConfig, WellbeingConfig};
pub use economy::{EconomyReport, per_tick_wage, run_economy_pass};
pub use error::AgentError;
pub use labor::{ensure_job, run_labor_pass};
pub use organization::{CareerMove, OrganizationReport, review_career, run_organization_pass};
pub use social::{SocialReport, repair_partner_links, run_social_pass};
pub use wellbeing::{life_satisfaction, run_wellbeing_pass};
