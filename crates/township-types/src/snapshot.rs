//! The root aggregate persisted between ticks.
//!
//! Every collection defaults to empty on deserialization so older documents
//! keep loading as the schema grows. Per-agent records are never
//! pre-allocated; they are created through the `*_mut` accessors on first
//! touch.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::AgentId;
use crate::structs::{
    AmbientState, CommunityGroup, CommunityProject, CrimeRecord, Department, EconomyLedger,
    EducationRecord, EntertainmentEvent, Event, Grievance, HealthRecord, Job, Location,
    MiningMachine, Property, Relationship, Resident, SeasonalEvent, Vehicle, WellbeingRecord,
    WorkRecord,
};

/// The complete world state at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(default)]
pub struct WorldSnapshot {
    /// Incremented once per completed tick.
    pub version: u64,
    /// Current simulation epoch.
    pub epoch: u64,
    /// Wall-clock time of the last completed tick.
    pub timestamp: DateTime<Utc>,
    /// Conditions rolled for the latest tick.
    pub ambient: AmbientState,
    /// Population, keyed by agent.
    pub residents: BTreeMap<AgentId, Resident>,
    /// Places in the city.
    pub locations: Vec<Location>,
    /// Labor records, keyed by agent.
    pub work_records: BTreeMap<AgentId, WorkRecord>,
    /// Wellbeing records, keyed by agent.
    pub wellbeing: BTreeMap<AgentId, WellbeingRecord>,
    /// Jobs, keyed by holder.
    pub jobs: BTreeMap<AgentId, Job>,
    /// Mining machines.
    pub mining_machines: Vec<MiningMachine>,
    /// Properties.
    pub properties: Vec<Property>,
    /// The currency ledger.
    pub economy: EconomyLedger,
    /// Romantic pairings keyed by [`Relationship::key_for`].
    pub relationships: BTreeMap<String, Relationship>,
    /// Departments keyed by name.
    pub departments: BTreeMap<String, Department>,
    /// Community groups.
    pub community_groups: Vec<CommunityGroup>,
    /// Active projects plus recent completions.
    pub community_projects: Vec<CommunityProject>,
    /// Union grievances, oldest first.
    pub grievances: Vec<Grievance>,
    /// Narrative events, oldest first.
    pub events: Vec<Event>,
    /// Seasonal events, active and past.
    pub seasonal_events: Vec<SeasonalEvent>,
    /// Recorded offenses.
    pub crime_records: Vec<CrimeRecord>,
    /// Course enrollments.
    pub education_records: Vec<EducationRecord>,
    /// Health conditions.
    pub health_records: Vec<HealthRecord>,
    /// Public entertainment events.
    pub entertainment_events: Vec<EntertainmentEvent>,
    /// Vehicles.
    pub vehicles: Vec<Vehicle>,
}

impl WorldSnapshot {
    /// Get or create the labor record for `agent`.
    pub fn work_record_mut(&mut self, agent: &AgentId) -> &mut WorkRecord {
        self.work_records.entry(agent.clone()).or_default()
    }

    /// Get or create the wellbeing record for `agent`.
    pub fn wellbeing_mut(&mut self, agent: &AgentId) -> &mut WellbeingRecord {
        self.wellbeing.entry(agent.clone()).or_default()
    }

    /// Read the wellbeing record for `agent` without creating it.
    pub fn wellbeing_of(&self, agent: &AgentId) -> Option<&WellbeingRecord> {
        self.wellbeing.get(agent)
    }

    /// Machines owned by `agent`.
    pub fn machines_of<'a>(&'a self, agent: &'a AgentId) -> impl Iterator<Item = &'a MiningMachine> {
        self.mining_machines
            .iter()
            .filter(move |machine| machine.owner() == agent)
    }

    /// Properties owned by `agent`.
    pub fn properties_of<'a>(&'a self, agent: &'a AgentId) -> impl Iterator<Item = &'a Property> {
        self.properties
            .iter()
            .filter(move |property| &property.owner == agent)
    }

    /// The currently active seasonal event, if any.
    pub fn active_seasonal_event(&self) -> Option<&SeasonalEvent> {
        self.seasonal_events.iter().find(|event| event.active)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_loads_as_default() {
        let snapshot: WorldSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, WorldSnapshot::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let snapshot: WorldSnapshot =
            serde_json::from_str(r#"{"epoch": 9, "dragons": []}"#).unwrap();
        assert_eq!(snapshot.epoch, 9);
        assert!(snapshot.events.is_empty());
    }

    #[test]
    fn accessors_create_exactly_one_record() {
        let mut snapshot = WorldSnapshot::default();
        let ada = AgentId::from("ada");
        snapshot.work_record_mut(&ada).shifts_completed = 3;
        snapshot.work_record_mut(&ada).break_credits = 1;
        snapshot.wellbeing_mut(&ada).happiness = 10.0;

        assert_eq!(snapshot.work_records.len(), 1);
        assert_eq!(snapshot.wellbeing.len(), 1);
        assert_eq!(snapshot.work_records.get(&ada).unwrap().shifts_completed, 3);
    }
}
