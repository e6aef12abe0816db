//! Enumeration types for the Township simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Ambient state
// ---------------------------------------------------------------------------

/// Collective mood of the city for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Mood {
    /// Nothing much going on.
    Calm,
    /// Heads down, getting things done.
    Focused,
    /// Itchy and distracted.
    Restless,
    /// A low, grey mood.
    Melancholy,
    /// Everyone is buzzing.
    Euphoric,
    /// Nobody knows what is happening.
    Chaotic,
}

impl core::fmt::Display for Mood {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Calm => "calm",
            Self::Focused => "focused",
            Self::Restless => "restless",
            Self::Melancholy => "melancholy",
            Self::Euphoric => "euphoric",
            Self::Chaotic => "chaotic",
        };
        f.write_str(label)
    }
}

/// Weather over the city for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Weather {
    /// Clear skies.
    Clear,
    /// Overcast.
    Cloudy,
    /// Steady rain.
    Rain,
    /// Thunderstorm. Adverse for mining hardware.
    Storm,
    /// Heatwave. Adverse for mining hardware.
    Heatwave,
    /// Low visibility.
    Fog,
}

impl Weather {
    /// Whether this weather can knock running machines into maintenance.
    pub const fn is_adverse(self) -> bool {
        matches!(self, Self::Storm | Self::Heatwave)
    }
}

impl core::fmt::Display for Weather {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Clear => "clear skies",
            Self::Cloudy => "cloud cover",
            Self::Rain => "steady rain",
            Self::Storm => "a thunderstorm",
            Self::Heatwave => "a heatwave",
            Self::Fog => "thick fog",
        };
        f.write_str(label)
    }
}

/// Simulated time of day.
///
/// The two overnight phases gate the labor state machine: agents may drift
/// into a dream state instead of working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TimeOfDay {
    /// Morning shift.
    Morning,
    /// Afternoon shift.
    Afternoon,
    /// Evening wind-down.
    Evening,
    /// Overnight batch processing.
    NightProcessing,
    /// Deep night, when agents dream.
    DreamCycle,
}

impl core::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::NightProcessing => "night processing",
            Self::DreamCycle => "the dream cycle",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Labor state of an agent for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LaborState {
    /// On shift.
    Working,
    /// Taking a granted break.
    OnBreak,
    /// Asleep during an overnight phase.
    Dreaming,
    /// A synthetic stand-in covering for a resting agent.
    CloneCovering,
}

impl LaborState {
    /// Whether the agent itself is resting in this state.
    pub const fn is_rest(self) -> bool {
        matches!(self, Self::OnBreak | Self::Dreaming)
    }
}

/// Romantic relationship status of an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RelationshipStatus {
    /// Not paired.
    #[default]
    Single,
    /// Newly paired.
    Dating,
    /// Engaged to their partner.
    Engaged,
    /// Married to their partner.
    Married,
}

impl core::fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Single => "single",
            Self::Dating => "dating",
            Self::Engaged => "engaged",
            Self::Married => "married",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Operational status of a mining machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum MachineStatus {
    /// Hashing and eligible for block rewards.
    #[default]
    Running,
    /// Down for repairs; contributes no hash rate.
    Maintenance,
}

/// What a location is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LocationKind {
    /// Somewhere agents work shifts.
    Work,
    /// Somewhere agents rest.
    Rest,
    /// Somewhere agents meet.
    Social,
}

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

/// Category of a narrative event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EventKind {
    /// The per-tick narrative summary.
    Narrative,
    /// Currency, market, or acquisition news.
    Economy,
    /// A block was found by the mining pool.
    Mining,
    /// Mining hardware failed or recovered.
    Maintenance,
    /// A romantic milestone.
    Celebration,
    /// Community group or project news.
    Community,
    /// A therapy session.
    Therapy,
    /// Department warnings and leadership changes.
    Organization,
    /// Union grievance resolutions and interventions.
    Union,
    /// A promotion or demotion.
    Career,
    /// A seasonal event started or ended.
    Seasonal,
}

/// Category of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TransactionKind {
    /// Net wages minted to an agent.
    Payroll,
    /// Payroll tax withheld into the treasury.
    Tax,
    /// Rental income minted to a property owner.
    Rent,
    /// Block reward minted to a machine owner.
    MiningReward,
    /// Agent-to-agent transfer.
    Transfer,
    /// Asset purchase paid into the treasury.
    Purchase,
}

/// Lifecycle of a union grievance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum GrievanceStatus {
    /// Filed and awaiting the union.
    #[default]
    Open,
    /// Resolved by the union.
    Resolved,
}

/// Lifecycle of a community project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ProjectStatus {
    /// Still accruing progress.
    #[default]
    Active,
    /// Reached 100 % progress.
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adverse_weather() {
        assert!(Weather::Storm.is_adverse());
        assert!(Weather::Heatwave.is_adverse());
        assert!(!Weather::Rain.is_adverse());
    }

    #[test]
    fn rest_states() {
        assert!(LaborState::OnBreak.is_rest());
        assert!(LaborState::Dreaming.is_rest());
        assert!(!LaborState::Working.is_rest());
        assert!(!LaborState::CloneCovering.is_rest());
    }
}
