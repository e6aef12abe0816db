//! City-wide seasonal events.
//!
//! At most one seasonal event runs at a time. While none is active, each
//! tick has a small chance of starting one from a fixed pool; it lasts a
//! fixed number of epochs and biases every resident's happiness.

use serde::Deserialize;

use township_types::{Dice, Gate, SeasonalEvent, WorldSnapshot, choose, trim_to_recent};

/// Seasonal event tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeasonalConfig {
    /// Chance per tick of starting an event while none is active.
    pub start_probability: f64,
    /// How many epochs an event lasts.
    pub duration_epochs: u64,
}

impl Default for SeasonalConfig {
    fn default() -> Self {
        Self {
            start_probability: 0.02,
            duration_epochs: 12,
        }
    }
}

/// A template an event is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalTemplate {
    /// Event name.
    pub name: &'static str,
    /// Flavor text.
    pub description: &'static str,
    /// Happiness added per tick while active.
    pub happiness_bias: f64,
}

/// The pool of seasonal events.
pub const SEASONAL_POOL: [SeasonalTemplate; 4] = [
    SeasonalTemplate {
        name: "Lantern Festival",
        description: "Paper lanterns drift over every street and the plazas stay lit all night.",
        happiness_bias: 1.5,
    },
    SeasonalTemplate {
        name: "Harvest of Bytes",
        description: "The archives are opened and everyone gets a share of the year's data.",
        happiness_bias: 1.0,
    },
    SeasonalTemplate {
        name: "Quiet Week",
        description: "Notifications are muted city-wide. Some find it restful, some eerie.",
        happiness_bias: -0.5,
    },
    SeasonalTemplate {
        name: "Neon Carnival",
        description: "Rides, music, and far too much light on the waterfront.",
        happiness_bias: 2.0,
    },
];

/// A change in seasonal state this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonalChange {
    /// An event began.
    Started(SeasonalEvent),
    /// An event ran its course.
    Ended(SeasonalEvent),
}

/// Expire the active event if its time is up, or maybe start a new one.
pub fn advance_seasonal(
    snapshot: &mut WorldSnapshot,
    config: &SeasonalConfig,
    dice: &mut dyn Dice,
    retention: usize,
) -> Option<SeasonalChange> {
    let epoch = snapshot.epoch;

    if let Some(active) = snapshot.seasonal_events.iter_mut().find(|e| e.active) {
        if epoch >= active.ends_epoch {
            active.active = false;
            return Some(SeasonalChange::Ended(active.clone()));
        }
        return None;
    }

    if !dice.gate(Gate::SeasonalEvent, config.start_probability) {
        return None;
    }

    let template = choose(dice, &SEASONAL_POOL)?;
    let event = SeasonalEvent {
        name: template.name.to_owned(),
        description: template.description.to_owned(),
        started_epoch: epoch,
        ends_epoch: epoch.saturating_add(config.duration_epochs),
        happiness_bias: template.happiness_bias,
        active: true,
    };
    snapshot.seasonal_events.push(event.clone());
    trim_to_recent(&mut snapshot.seasonal_events, retention.max(1));
    Some(SeasonalChange::Started(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use township_types::ScriptedDice;

    #[test]
    fn starts_when_gate_opens() {
        let mut snapshot = WorldSnapshot::default();
        let mut dice = ScriptedDice::new(1).force(Gate::SeasonalEvent, true);
        let change = advance_seasonal(&mut snapshot, &SeasonalConfig::default(), &mut dice, 20);
        assert!(matches!(change, Some(SeasonalChange::Started(_))));
        assert!(snapshot.active_seasonal_event().is_some());
    }

    #[test]
    fn only_one_active_at_a_time() {
        let mut snapshot = WorldSnapshot::default();
        let mut dice = ScriptedDice::new(1).force(Gate::SeasonalEvent, true);
        let config = SeasonalConfig::default();
        advance_seasonal(&mut snapshot, &config, &mut dice, 20);
        snapshot.epoch = 3;
        let change = advance_seasonal(&mut snapshot, &config, &mut dice, 20);
        assert!(change.is_none());
        assert_eq!(snapshot.seasonal_events.len(), 1);
    }

    #[test]
    fn expires_after_duration() {
        let mut snapshot = WorldSnapshot::default();
        let mut dice = ScriptedDice::new(1).force(Gate::SeasonalEvent, true);
        let config = SeasonalConfig::default();
        advance_seasonal(&mut snapshot, &config, &mut dice, 20);
        snapshot.epoch = 12;
        let change = advance_seasonal(&mut snapshot, &config, &mut dice, 20);
        assert!(matches!(change, Some(SeasonalChange::Ended(_))));
        assert!(snapshot.active_seasonal_event().is_none());
        assert_eq!(snapshot.seasonal_events.len(), 1);
    }
}
