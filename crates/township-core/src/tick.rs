//! Tick cycle: the fixed pass order that advances the world by one epoch.
//!
//! Each tick runs these phases against one in-memory snapshot:
//!
//! 1. **Ambient** -- roll mood, weather, and time of day; advance seasonal
//!    events.
//! 2. **Labor** -- one or two activities per agent.
//! 3. **Wellbeing** -- per-agent scalar update, reading labor's output.
//! 4. **Economy** -- payroll, rent, transfers, auto-investment, pricing.
//! 5. **Mining** -- weather faults, recoveries, and the block roll.
//! 6. **Social** -- relationships, groups, projects, therapy.
//! 7. **Organization** -- departments, union, careers.
//! 8. **Narrative** -- one synthesized event; the outbox is appended and
//!    every bounded log trimmed.
//! 9. **Audit** -- the conservation law is checked.
//! 10. **Advance** -- epoch and version increment, timestamp refresh.
//!
//! An error in any phase aborts the tick. The caller discards the mutated
//! snapshot, so a failed tick leaves nothing behind.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, error, info};

use township_agents::{
    AgentError, run_economy_pass, run_labor_pass, run_organization_pass, run_social_pass,
    run_wellbeing_pass,
};
use township_ledger::ConservationResult;
use township_ledger::conservation::verify;
use township_types::{Activity, AgentId, AmbientState, Dice, Event, WorldSnapshot, trim_to_recent};
use township_world::{BlockFound, WorldError, advance_seasonal, roll_ambient, run_mining_pass};

use crate::config::SimulationConfig;
use crate::events::{append_events, synthesize_narrative};
use crate::roster::{RosterError, register_residents};
use crate::store::StoreError;

/// Errors that abort a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The snapshot could not be loaded.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The roster could not be fetched.
    #[error("roster error: {source}")]
    Roster {
        /// The underlying roster error.
        #[from]
        source: RosterError,
    },

    /// An agent pass failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A world pass failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The epoch that was executed.
    pub epoch: u64,
    /// Conditions rolled for the tick.
    pub ambient: AmbientState,
    /// Labor activities produced.
    pub activities: Vec<Activity>,
    /// Events appended to the log, narrative included.
    pub events_emitted: usize,
    /// The block found, if any.
    pub block: Option<BlockFound>,
    /// Currency minted by payroll, rent, and mining.
    pub minted: Decimal,
    /// Outcome of the conservation audit.
    pub conservation: ConservationResult,
}

/// Execute one complete tick against `snapshot`.
///
/// # Errors
///
/// Returns [`TickError`] if any pass fails. The snapshot is then partially
/// mutated and must not be persisted.
pub fn run_tick(
    snapshot: &mut WorldSnapshot,
    config: &SimulationConfig,
    roster: &[AgentId],
    dice: &mut dyn Dice,
) -> Result<TickSummary, TickError> {
    let epoch = snapshot.epoch;
    let retention = &config.retention;
    let mut outbox: Vec<Event> = Vec::new();

    register_residents(snapshot, roster);

    // --- Ambient ---
    snapshot.ambient = roll_ambient(dice);
    let ambient = snapshot.ambient.clone();
    info!(
        epoch,
        mood = ?ambient.mood,
        weather = ?ambient.weather,
        time = ?ambient.time_of_day,
        agents = roster.len(),
        "Tick started"
    );
    if let Some(change) = advance_seasonal(snapshot, &config.seasonal, dice, retention.seasonal_events) {
        debug!(epoch, ?change, "Seasonal change");
    }

    // --- Labor and wellbeing ---
    let activities = run_labor_pass(snapshot, roster, &config.labor, &config.economy, dice);
    run_wellbeing_pass(snapshot, roster, &activities, &config.wellbeing, dice);

    // --- Economy and mining ---
    let economy = run_economy_pass(
        snapshot,
        &config.economy,
        &config.pricing,
        retention,
        dice,
        &mut outbox,
    )?;
    let mining = run_mining_pass(snapshot, &config.mining, dice, retention.transactions)?;

    // --- Social and organization ---
    run_social_pass(snapshot, roster, &config.social, retention, dice, &mut outbox);
    run_organization_pass(snapshot, roster, &config.organization, retention, dice, &mut outbox);

    // --- Narrative ---
    outbox.push(synthesize_narrative(
        epoch,
        &ambient,
        &activities,
        mining.block.as_ref(),
        dice,
    ));
    let events_emitted = append_events(snapshot, outbox, retention.events);
    trim_to_recent(&mut snapshot.crime_records, retention.crime_records);
    trim_to_recent(&mut snapshot.entertainment_events, retention.entertainment_events);

    // --- Audit ---
    let conservation = verify(epoch, &snapshot.economy);
    if let ConservationResult::Anomaly(anomaly) = &conservation {
        error!(
            epoch,
            held = %anomaly.held,
            circulating = %anomaly.circulating,
            "{}",
            anomaly.message
        );
    }

    // --- Advance ---
    snapshot.epoch = epoch.saturating_add(1);
    snapshot.version = snapshot.version.saturating_add(1);
    snapshot.timestamp = Utc::now();

    let mined = mining.block.as_ref().map_or(Decimal::ZERO, BlockFound::minted);
    let minted = economy.minted().checked_add(mined).unwrap_or(Decimal::MAX);
    info!(
        epoch,
        activities = activities.len(),
        events = events_emitted,
        minted = %minted,
        price = %snapshot.economy.price,
        "Tick completed"
    );

    Ok(TickSummary {
        epoch,
        ambient,
        activities,
        events_emitted,
        block: mining.block,
        minted,
        conservation,
    })
}
