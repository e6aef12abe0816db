//! Persistence, tick orchestration, and engine lifecycle for the Township
//! simulation.
//!
//! This crate owns the one persisted [`WorldSnapshot`] and the fixed-order
//! tick that advances it. The passes themselves live in `township-world`
//! and `township-agents`; this crate sequences them, audits the ledger, and
//! writes the result back.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `township-config.yaml` into
//!   strongly-typed structs.
//! - [`engine`] -- [`Engine`]: scheduler, single-writer lock, purchases,
//!   and the read surface.
//! - [`events`] -- Narrative synthesis and the bounded event log.
//! - [`query`] -- Per-agent economic summaries.
//! - [`roster`] -- [`RosterSource`] trait and resident registration.
//! - [`store`] -- [`WorldStore`]: atomic JSON persistence with
//!   synthesize-on-missing.
//! - [`tick`] -- The tick cycle itself.
//!
//! [`WorldSnapshot`]: township_types::WorldSnapshot
//! [`Engine`]: engine::Engine
//! [`RosterSource`]: roster::RosterSource
//! [`WorldStore`]: store::WorldStore

pub mod config;
pub mod engine;
pub mod events;
pub mod query;
pub mod roster;
pub mod store;
pub mod tick;
