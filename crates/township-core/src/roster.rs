//! Where the list of active agents comes from.
//!
//! The roster is owned outside the simulation. Each tick asks a
//! [`RosterSource`] for the current agent ids; agents the world has not seen
//! yet are registered as residents on first touch.

use tracing::info;

use township_types::{AgentId, Resident, WorldSnapshot};
use township_world::DEFAULT_DEPARTMENT;

/// Errors that can occur while fetching the roster.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// The roster could not be fetched.
    #[error("roster unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

/// A source of the current agent roster.
pub trait RosterSource: Send {
    /// Agent ids active this tick, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError`] if the roster cannot be fetched; the tick is
    /// then skipped.
    fn roster(&mut self, snapshot: &WorldSnapshot) -> Result<Vec<AgentId>, RosterError>;
}

/// Uses every resident already recorded in the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotRoster;

impl RosterSource for SnapshotRoster {
    fn roster(&mut self, snapshot: &WorldSnapshot) -> Result<Vec<AgentId>, RosterError> {
        Ok(snapshot.residents.keys().cloned().collect())
    }
}

/// A fixed list of agents.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    agents: Vec<AgentId>,
}

impl StaticRoster {
    /// Roster of exactly `agents`.
    pub const fn new(agents: Vec<AgentId>) -> Self {
        Self { agents }
    }
}

impl RosterSource for StaticRoster {
    fn roster(&mut self, _snapshot: &WorldSnapshot) -> Result<Vec<AgentId>, RosterError> {
        if self.agents.is_empty() {
            return Err(RosterError::Unavailable {
                message: String::from("static roster is empty"),
            });
        }
        Ok(self.agents.clone())
    }
}

/// Register roster agents the snapshot has not seen, in the default
/// department. Returns how many were added.
pub fn register_residents(snapshot: &mut WorldSnapshot, roster: &[AgentId]) -> usize {
    let epoch = snapshot.epoch;
    let mut added = 0_usize;
    for agent in roster {
        if snapshot.residents.contains_key(agent) {
            continue;
        }
        snapshot.residents.insert(
            agent.clone(),
            Resident {
                id: agent.clone(),
                name: agent.to_string(),
                department: DEFAULT_DEPARTMENT.to_owned(),
                joined_epoch: epoch,
            },
        );
        info!(agent = %agent, department = DEFAULT_DEPARTMENT, "Resident registered");
        added = added.saturating_add(1);
    }
    added
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn newcomers_join_operations_once() {
        let mut world = WorldSnapshot::default();
        let roster = vec![AgentId::from("zed"), AgentId::from("yara")];

        assert_eq!(register_residents(&mut world, &roster), 2);
        assert_eq!(register_residents(&mut world, &roster), 0);
        assert_eq!(
            world.residents.get(&AgentId::from("zed")).unwrap().department,
            DEFAULT_DEPARTMENT
        );
    }

    #[test]
    fn snapshot_roster_lists_residents() {
        let mut world = WorldSnapshot::default();
        register_residents(&mut world, &[AgentId::from("ada")]);
        assert_eq!(
            SnapshotRoster.roster(&world).unwrap(),
            vec![AgentId::from("ada")]
        );
    }

    #[test]
    fn empty_static_roster_is_unavailable() {
        let result = StaticRoster::new(Vec::new()).roster(&WorldSnapshot::default());
        assert!(matches!(result, Err(RosterError::Unavailable { .. })));
    }
}
