//! Core entity structs for the Township simulation.
//!
//! Every entity persisted inside the [`WorldSnapshot`](crate::WorldSnapshot)
//! lives here. Psychological scalars are `f64` on a 0 to 100 scale; money
//! is always [`Decimal`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    EventKind, GrievanceStatus, LaborState, LocationKind, MachineStatus, Mood, ProjectStatus,
    RelationshipStatus, TimeOfDay, TransactionKind, Weather,
};
use crate::ids::{
    AgentId, EventId, GrievanceId, GroupId, LocationId, MachineId, ProjectId, PropertyId,
    RecordId, TransactionId,
};

/// Lower bound for every wellbeing scalar.
pub const SCALAR_MIN: f64 = 0.0;

/// Upper bound for every wellbeing scalar.
pub const SCALAR_MAX: f64 = 100.0;

/// Clamp a wellbeing scalar into `[SCALAR_MIN, SCALAR_MAX]`.
///
/// `NaN` collapses to the lower bound so a bad delta can never leak out of
/// range.
pub fn clamp_scalar(value: f64) -> f64 {
    if value.is_nan() {
        return SCALAR_MIN;
    }
    value.clamp(SCALAR_MIN, SCALAR_MAX)
}

// ---------------------------------------------------------------------------
// Ambient
// ---------------------------------------------------------------------------

/// The city-wide conditions rolled at the start of every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AmbientState {
    /// Collective mood.
    pub mood: Mood,
    /// Current weather.
    pub weather: Weather,
    /// Current time of day.
    pub time_of_day: TimeOfDay,
}

impl Default for AmbientState {
    fn default() -> Self {
        Self {
            mood: Mood::Calm,
            weather: Weather::Clear,
            time_of_day: TimeOfDay::Morning,
        }
    }
}

// ---------------------------------------------------------------------------
// Residents and places
// ---------------------------------------------------------------------------

/// A member of the population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Resident {
    /// Roster identity.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Department the resident belongs to.
    pub department: String,
    /// Epoch the resident joined the city.
    pub joined_epoch: u64,
}

/// A place in the city where activities happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Unique identifier.
    pub id: LocationId,
    /// Display name.
    pub name: String,
    /// What the location is used for.
    pub kind: LocationKind,
    /// Flavor text.
    pub description: String,
    /// Actions that can be performed here, used to flavor activities.
    #[serde(default)]
    pub actions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Labor
// ---------------------------------------------------------------------------

/// Per-agent labor record, created lazily on first touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct WorkRecord {
    /// Smoothed labor performance tendency in `[0, 1]`.
    pub work_ethic: f64,
    /// Shifts worked in total.
    pub shifts_completed: u64,
    /// Units of output contributed in total.
    pub total_contributions: u64,
    /// Accrued break entitlement.
    pub break_credits: u32,
    /// Management's view of the agent in `[0, 1]`.
    pub boss_rating: f64,
    /// Whether the agent rested this tick.
    pub on_break: bool,
    /// Whether a clone covered for the agent this tick.
    pub clone_active: bool,
    /// Labor state chosen for the latest tick.
    pub labor_state: LaborState,
    /// Working ticks since the last rest.
    pub consecutive_shifts: u32,
    /// Wages earned across the agent's lifetime.
    #[ts(as = "String")]
    pub total_earned: Decimal,
}

impl Default for WorkRecord {
    fn default() -> Self {
        Self {
            work_ethic: 0.6,
            shifts_completed: 0,
            total_contributions: 0,
            break_credits: 0,
            boss_rating: 0.6,
            on_break: false,
            clone_active: false,
            labor_state: LaborState::Working,
            consecutive_shifts: 0,
            total_earned: Decimal::ZERO,
        }
    }
}

/// One labor activity produced for an agent in a tick.
///
/// Resting agents yield two activities: their own rest and the clone's
/// covering shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Activity {
    /// Agent the activity is credited to.
    pub agent: AgentId,
    /// Labor state the activity represents.
    pub state: LaborState,
    /// Name of the location.
    pub location: String,
    /// What was done.
    pub action: String,
    /// Wage accrued by the activity. Minted later by payroll.
    #[ts(as = "String")]
    pub earning: Decimal,
}

/// A position on the job ladder held by an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Job {
    /// Holder of the job.
    pub agent_id: AgentId,
    /// Title taken from the tier ladder.
    pub title: String,
    /// Rank on the ladder, 0 being the lowest.
    pub tier: u8,
    /// Daily salary.
    #[ts(as = "String")]
    pub salary: Decimal,
    /// Performance multiplier applied by payroll, set by labor each tick.
    pub performance: f64,
    /// Department the job belongs to.
    pub department: String,
    /// Epoch the job was last assigned.
    pub hired_epoch: u64,
}

// ---------------------------------------------------------------------------
// Wellbeing
// ---------------------------------------------------------------------------

/// Compounding shared state between two relationship partners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Entanglement {
    /// The other side of the pairing.
    pub partner: AgentId,
    /// Mean drive of the pair.
    pub shared_drive: f64,
    /// Mean focus of the pair.
    pub shared_focus: f64,
    /// Depth of attachment, compounding while paired.
    pub love_depth: f64,
    /// Closeness, growing linearly while paired.
    pub intimacy: f64,
    /// Epoch the pairing formed.
    pub formed_epoch: u64,
}

/// Per-agent psychological state, created lazily on first touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct WellbeingRecord {
    /// General happiness.
    pub happiness: f64,
    /// Sense of meaning from work and creation.
    pub fulfillment: f64,
    /// Physical and mental energy.
    pub energy: f64,
    /// Ambition.
    pub drive: f64,
    /// Concentration.
    pub focus: f64,
    /// Optimism about the future.
    pub outlook: f64,
    /// Hobbies the agent pursues.
    pub hobbies: Vec<String>,
    /// Personal goals.
    pub goals: Vec<String>,
    /// Agents this agent counts as connections.
    pub social_connections: BTreeSet<AgentId>,
    /// Romantic status.
    pub relationship_status: RelationshipStatus,
    /// Current partner, if any. Always reciprocated after the social pass.
    pub partner: Option<AgentId>,
    /// Agents this agent is interested in.
    pub love_interests: Vec<AgentId>,
    /// Shared state with the partner.
    pub entanglement: Option<Entanglement>,
    /// Number of children.
    pub children: u32,
    /// Creative works produced.
    pub creative_works: u32,
    /// Composite satisfaction, recomputed every tick.
    pub life_satisfaction: f64,
    /// Promotions received.
    pub promotions: u32,
    /// Demotions received.
    pub demotions: u32,
    /// Whether the agent is flagged for therapy.
    pub needs_therapy: bool,
    /// Epoch of the most recent session.
    pub last_therapy_epoch: Option<u64>,
    /// Sessions received in total.
    pub therapy_sessions: u32,
}

impl Default for WellbeingRecord {
    fn default() -> Self {
        Self {
            happiness: 60.0,
            fulfillment: 50.0,
            energy: 70.0,
            drive: 55.0,
            focus: 55.0,
            outlook: 55.0,
            hobbies: Vec::new(),
            goals: Vec::new(),
            social_connections: BTreeSet::new(),
            relationship_status: RelationshipStatus::Single,
            partner: None,
            love_interests: Vec::new(),
            entanglement: None,
            children: 0,
            creative_works: 0,
            life_satisfaction: 50.0,
            promotions: 0,
            demotions: 0,
            needs_therapy: false,
            last_therapy_epoch: None,
            therapy_sessions: 0,
        }
    }
}

impl WellbeingRecord {
    /// The six bounded scalars in declaration order.
    pub const fn scalars(&self) -> [f64; 6] {
        [
            self.happiness,
            self.fulfillment,
            self.energy,
            self.drive,
            self.focus,
            self.outlook,
        ]
    }

    /// Pull every scalar (and life satisfaction) back into range.
    pub fn clamp_all(&mut self) {
        self.happiness = clamp_scalar(self.happiness);
        self.fulfillment = clamp_scalar(self.fulfillment);
        self.energy = clamp_scalar(self.energy);
        self.drive = clamp_scalar(self.drive);
        self.focus = clamp_scalar(self.focus);
        self.outlook = clamp_scalar(self.outlook);
        self.life_satisfaction = clamp_scalar(self.life_satisfaction);
    }

    /// Whether the agent has no partner.
    pub const fn is_single(&self) -> bool {
        self.partner.is_none()
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// A romantic pairing between two agents.
///
/// Stored under [`Relationship::key_for`] so either partner finds the same
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Relationship {
    /// Lexically smaller partner.
    pub first: AgentId,
    /// Lexically larger partner.
    pub second: AgentId,
    /// Current stage.
    pub status: RelationshipStatus,
    /// Relationship strength in `[0, 100]`.
    pub strength: f64,
    /// Epoch the pairing began.
    pub started_epoch: u64,
    /// Milestones reached, oldest first.
    #[serde(default)]
    pub milestones: Vec<String>,
}

impl Relationship {
    /// Canonical map key for the pair, independent of argument order.
    pub fn key_for(a: &AgentId, b: &AgentId) -> String {
        if a <= b {
            format!("{a}+{b}")
        } else {
            format!("{b}+{a}")
        }
    }

    /// Start a new dating relationship.
    pub fn dating(a: &AgentId, b: &AgentId, strength: f64, epoch: u64) -> Self {
        let (first, second) = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        Self {
            first,
            second,
            status: RelationshipStatus::Dating,
            strength,
            started_epoch: epoch,
            milestones: vec![String::from("dating")],
        }
    }

    /// Whether `agent` is one of the partners.
    pub fn involves(&self, agent: &AgentId) -> bool {
        &self.first == agent || &self.second == agent
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// A mining machine contributing hash rate to the shared pool.
///
/// The owner is fixed at construction and exposed read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MiningMachine {
    /// Unique identifier.
    pub id: MachineId,
    owner: AgentId,
    /// Catalog key the machine was bought from.
    pub kind: String,
    /// Hash rate contributed while running.
    pub hash_rate: f64,
    /// Power cost charged against each block reward share.
    #[ts(as = "String")]
    pub power_cost: Decimal,
    /// Operational status.
    pub status: MachineStatus,
    /// Epoch of purchase.
    pub purchased_epoch: u64,
    /// Rewards credited across the machine's lifetime.
    #[serde(default)]
    #[ts(as = "String")]
    pub total_earned: Decimal,
}

impl MiningMachine {
    /// Create a running machine owned by `owner`.
    pub fn new(
        owner: AgentId,
        kind: impl Into<String>,
        hash_rate: f64,
        power_cost: Decimal,
        epoch: u64,
    ) -> Self {
        Self {
            id: MachineId::new(),
            owner,
            kind: kind.into(),
            hash_rate,
            power_cost,
            status: MachineStatus::Running,
            purchased_epoch: epoch,
            total_earned: Decimal::ZERO,
        }
    }

    /// The agent who owns this machine.
    pub const fn owner(&self) -> &AgentId {
        &self.owner
    }

    /// Whether the machine is currently hashing.
    pub fn is_running(&self) -> bool {
        self.status == MachineStatus::Running
    }
}

/// A property earning rental income for its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Property {
    /// Unique identifier.
    pub id: PropertyId,
    /// Owner of the property.
    pub owner: AgentId,
    /// Catalog key the property was bought from.
    pub kind: String,
    /// Name given by the buyer.
    pub name: String,
    /// Current market value.
    #[ts(as = "String")]
    pub value: Decimal,
    /// Rental income per day.
    #[ts(as = "String")]
    pub rental_income: Decimal,
    /// Epoch of purchase.
    pub purchased_epoch: u64,
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// A single entry in the ledger's transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Epoch the transaction happened.
    pub epoch: u64,
    /// Category.
    pub kind: TransactionKind,
    /// Paying agent. `None` for minted currency and treasury payments.
    pub from: Option<AgentId>,
    /// Receiving agent. `None` when the treasury receives.
    pub to: Option<AgentId>,
    /// Amount moved.
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Human-readable note.
    pub memo: String,
}

/// One sample of the currency price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PricePoint {
    /// Epoch the price was recorded.
    pub epoch: u64,
    /// Price after discovery.
    #[ts(as = "String")]
    pub price: Decimal,
}

/// Parameters of the shared mining pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct MiningPool {
    /// Sum of running machines' hash rate, refreshed each tick.
    pub total_hash_rate: f64,
    /// Reward minted per block.
    #[ts(as = "String")]
    pub block_reward: Decimal,
    /// Difficulty divisor for the block-found probability.
    pub difficulty: f64,
    /// Blocks found in total.
    pub blocks_mined: u64,
}

impl Default for MiningPool {
    fn default() -> Self {
        Self {
            total_hash_rate: 0.0,
            block_reward: Decimal::from(50),
            difficulty: 0.5,
            blocks_mined: 0,
        }
    }
}

/// The global currency ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct EconomyLedger {
    /// Currency in existence: balances plus treasury.
    #[ts(as = "String")]
    pub circulating_supply: Decimal,
    /// Fixed total supply used for market cap.
    #[ts(as = "String")]
    pub total_supply: Decimal,
    /// Per-agent balances.
    #[ts(as = "BTreeMap<AgentId, String>")]
    pub balances: BTreeMap<AgentId, Decimal>,
    /// Current price.
    #[ts(as = "String")]
    pub price: Decimal,
    /// Recent prices, oldest first.
    pub price_history: Vec<PricePoint>,
    /// Recent transactions, oldest first.
    pub transactions: Vec<Transaction>,
    /// Mining pool parameters.
    pub mining_pool: MiningPool,
    /// Taxes and purchase proceeds held by the city.
    #[ts(as = "String")]
    pub treasury: Decimal,
    /// Payroll tax rate in `[0, 1]`.
    #[ts(as = "String")]
    pub tax_rate: Decimal,
    /// Gross wages and rents minted, accumulated.
    #[ts(as = "String")]
    pub gdp: Decimal,
    /// Price times total supply.
    #[ts(as = "String")]
    pub market_cap: Decimal,
    /// Modeled trading volume.
    #[ts(as = "String")]
    pub daily_volume: Decimal,
    /// Currency spent on purchases this tick, feeding price demand.
    #[ts(as = "String")]
    pub spending_this_tick: Decimal,
}

impl Default for EconomyLedger {
    fn default() -> Self {
        Self {
            circulating_supply: Decimal::ZERO,
            total_supply: Decimal::from(21_000_000),
            balances: BTreeMap::new(),
            price: Decimal::ONE,
            price_history: Vec::new(),
            transactions: Vec::new(),
            mining_pool: MiningPool::default(),
            treasury: Decimal::ZERO,
            tax_rate: Decimal::new(10, 2),
            gdp: Decimal::ZERO,
            market_cap: Decimal::ZERO,
            daily_volume: Decimal::ZERO,
            spending_this_tick: Decimal::ZERO,
        }
    }
}

impl EconomyLedger {
    /// Balance of `agent`, zero when unknown.
    pub fn balance(&self, agent: &AgentId) -> Decimal {
        self.balances.get(agent).copied().unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

/// A department aggregating its members' morale and performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Department {
    /// Unique name, also the map key.
    pub name: String,
    /// Current boss.
    pub boss: Option<AgentId>,
    /// Members, boss included.
    #[serde(default)]
    pub members: BTreeSet<AgentId>,
    /// Mean member happiness.
    pub morale: f64,
    /// Mean member work ethic times 100.
    pub performance: f64,
    /// Warnings accumulated since the last leadership change.
    pub warnings: u32,
    /// Leadership changes in total.
    #[serde(default)]
    pub leadership_changes: u32,
}

impl Department {
    /// Create an empty department at baseline morale and performance.
    pub fn new(name: impl Into<String>, baseline: f64) -> Self {
        Self {
            name: name.into(),
            boss: None,
            members: BTreeSet::new(),
            morale: baseline,
            performance: baseline,
            warnings: 0,
            leadership_changes: 0,
        }
    }
}

/// A complaint filed with the union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Grievance {
    /// Unique identifier.
    pub id: GrievanceId,
    /// Department the grievance concerns.
    pub department: String,
    /// Epoch filed.
    pub filed_epoch: u64,
    /// What went wrong.
    pub reason: String,
    /// Agents affected.
    pub affected: Vec<AgentId>,
    /// Lifecycle status.
    pub status: GrievanceStatus,
    /// How the union settled it.
    #[serde(default)]
    pub resolution: Option<String>,
}

// ---------------------------------------------------------------------------
// Community
// ---------------------------------------------------------------------------

/// A community group of residents meeting around a shared theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CommunityGroup {
    /// Unique identifier.
    pub id: GroupId,
    /// Group name.
    pub name: String,
    /// What the group does.
    pub theme: String,
    /// Members.
    pub members: BTreeSet<AgentId>,
    /// Bond strength in `[0, 100]`.
    pub bond_strength: f64,
    /// Epoch founded.
    pub founded_epoch: u64,
    /// Meetings held.
    #[serde(default)]
    pub meetings: u32,
}

/// A shared project accruing progress until completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CommunityProject {
    /// Unique identifier.
    pub id: ProjectId,
    /// Project title.
    pub title: String,
    /// Agent who started it.
    pub creator: AgentId,
    /// Agents helping.
    pub helpers: Vec<AgentId>,
    /// Progress in `[0, 100]`.
    pub progress: f64,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Epoch started.
    pub started_epoch: u64,
    /// Epoch completed.
    #[serde(default)]
    pub completed_epoch: Option<u64>,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A narrative event appended to the bounded log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// Epoch the event happened.
    pub epoch: u64,
    /// Wall-clock time the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Category.
    pub kind: EventKind,
    /// Headline.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Agents involved.
    #[serde(default)]
    pub agents: Vec<AgentId>,
}

impl Event {
    /// Create an event stamped with the current wall-clock time.
    pub fn new(
        epoch: u64,
        kind: EventKind,
        title: impl Into<String>,
        description: impl Into<String>,
        agents: Vec<AgentId>,
    ) -> Self {
        Self {
            id: EventId::new(),
            epoch,
            timestamp: Utc::now(),
            kind,
            title: title.into(),
            description: description.into(),
            agents,
        }
    }
}

/// A city-wide seasonal event biasing happiness while active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SeasonalEvent {
    /// Event name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Epoch it started.
    pub started_epoch: u64,
    /// First epoch at which it is no longer active.
    pub ends_epoch: u64,
    /// Happiness added to every resident per tick while active.
    pub happiness_bias: f64,
    /// Whether the event is still running.
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Civic records
// ---------------------------------------------------------------------------

/// A recorded offense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CrimeRecord {
    /// Unique identifier.
    pub id: RecordId,
    /// Epoch of the offense.
    pub epoch: u64,
    /// Offender.
    pub agent: AgentId,
    /// What happened.
    pub offense: String,
    /// Whether the case is closed.
    pub resolved: bool,
}

/// A course an agent is enrolled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EducationRecord {
    /// Unique identifier.
    pub id: RecordId,
    /// Student.
    pub agent: AgentId,
    /// Course name.
    pub course: String,
    /// Progress in `[0, 100]`.
    pub progress: f64,
    /// Epoch enrolled.
    pub started_epoch: u64,
}

/// A health condition affecting an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HealthRecord {
    /// Unique identifier.
    pub id: RecordId,
    /// Patient.
    pub agent: AgentId,
    /// Condition description.
    pub condition: String,
    /// Epoch diagnosed.
    pub epoch: u64,
    /// Whether the agent has recovered.
    pub recovered: bool,
}

/// A show, concert, or similar public event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EntertainmentEvent {
    /// Unique identifier.
    pub id: RecordId,
    /// Epoch held.
    pub epoch: u64,
    /// Title.
    pub title: String,
    /// Agents who attended.
    pub attendees: Vec<AgentId>,
}

/// A vehicle owned by an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vehicle {
    /// Unique identifier.
    pub id: RecordId,
    /// Owner.
    pub owner: AgentId,
    /// Model name.
    pub model: String,
    /// Current value.
    #[ts(as = "String")]
    pub value: Decimal,
    /// Epoch acquired.
    pub acquired_epoch: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn relationship_key_is_order_independent() {
        let a = AgentId::from("ada");
        let b = AgentId::from("basil");
        assert_eq!(Relationship::key_for(&a, &b), Relationship::key_for(&b, &a));
    }

    #[test]
    fn dating_orders_partners() {
        let rel = Relationship::dating(&AgentId::from("zed"), &AgentId::from("amy"), 30.0, 4);
        assert_eq!(rel.first.as_str(), "amy");
        assert_eq!(rel.second.as_str(), "zed");
        assert!(rel.involves(&AgentId::from("zed")));
    }

    #[test]
    fn clamp_handles_extremes() {
        let mut record = WellbeingRecord {
            happiness: 250.0,
            energy: -40.0,
            focus: f64::NAN,
            ..WellbeingRecord::default()
        };
        record.clamp_all();
        for scalar in record.scalars() {
            assert!((SCALAR_MIN..=SCALAR_MAX).contains(&scalar));
        }
    }

    #[test]
    fn wellbeing_tolerates_missing_fields() {
        let record: WellbeingRecord = serde_json::from_str(r#"{"happiness": 12.5}"#).unwrap();
        assert!((record.happiness - 12.5).abs() < f64::EPSILON);
        assert!(record.social_connections.is_empty());
        assert!(record.is_single());
    }

    #[test]
    fn machine_owner_survives_serialization() {
        let machine = MiningMachine::new(AgentId::from("ada"), "pocket-rig", 10.0, Decimal::ONE, 3);
        let json = serde_json::to_string(&machine).unwrap();
        let back: MiningMachine = serde_json::from_str(&json).unwrap();
        assert_eq!(back.owner().as_str(), "ada");
        assert!(back.is_running());
    }
}
