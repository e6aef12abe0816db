//! Ambient conditions for the city.
//!
//! Mood, weather, and time of day are rolled independently at the start of
//! every tick from fixed weight tables:
//!
//! | Mood       | Weight | Weather  | Weight | Time of day      | Weight |
//! |------------|--------|----------|--------|------------------|--------|
//! | Calm       | 30     | Clear    | 40     | Morning          | 25     |
//! | Focused    | 25     | Cloudy   | 25     | Afternoon        | 25     |
//! | Restless   | 15     | Rain     | 15     | Evening          | 20     |
//! | Melancholy | 12     | Storm    | 8      | Night processing | 15     |
//! | Euphoric   | 10     | Heatwave | 7      | Dream cycle      | 15     |
//! | Chaotic    | 8      | Fog      | 5      |                  |        |

use township_types::{AmbientState, Dice, Mood, TimeOfDay, Weather};

/// A table of `(value, weight)` entries sampled proportionally to weight.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<(T, u32)>,
}

impl<T: Copy> WeightedTable<T> {
    /// Build a table from weighted entries.
    pub const fn new(entries: Vec<(T, u32)>) -> Self {
        Self { entries }
    }

    /// Select the entry covering `roll` in `[0, total_weight())`.
    ///
    /// Rolls past the end fall back to the first entry.
    pub fn select(&self, roll: u32) -> Option<T> {
        let mut cumulative: u32 = 0;
        for &(value, weight) in &self.entries {
            cumulative = cumulative.saturating_add(weight);
            if roll < cumulative {
                return Some(value);
            }
        }
        self.entries.first().map(|&(value, _)| value)
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |acc, &(_, weight)| acc.saturating_add(weight))
    }

    /// Draw one value.
    pub fn sample(&self, dice: &mut dyn Dice) -> Option<T> {
        let total = self.total_weight();
        if total == 0 {
            return self.entries.first().map(|&(value, _)| value);
        }
        let roll = u32::try_from(dice.below(u64::from(total))).unwrap_or(0);
        self.select(roll)
    }
}

/// Mood weights.
pub fn mood_table() -> WeightedTable<Mood> {
    WeightedTable::new(vec![
        (Mood::Calm, 30),
        (Mood::Focused, 25),
        (Mood::Restless, 15),
        (Mood::Melancholy, 12),
        (Mood::Euphoric, 10),
        (Mood::Chaotic, 8),
    ])
}

/// Weather weights.
pub fn weather_table() -> WeightedTable<Weather> {
    WeightedTable::new(vec![
        (Weather::Clear, 40),
        (Weather::Cloudy, 25),
        (Weather::Rain, 15),
        (Weather::Storm, 8),
        (Weather::Heatwave, 7),
        (Weather::Fog, 5),
    ])
}

/// Time-of-day weights.
pub fn time_of_day_table() -> WeightedTable<TimeOfDay> {
    WeightedTable::new(vec![
        (TimeOfDay::Morning, 25),
        (TimeOfDay::Afternoon, 25),
        (TimeOfDay::Evening, 20),
        (TimeOfDay::NightProcessing, 15),
        (TimeOfDay::DreamCycle, 15),
    ])
}

/// Roll fresh ambient conditions for a tick.
pub fn roll_ambient(dice: &mut dyn Dice) -> AmbientState {
    let fallback = AmbientState::default();
    AmbientState {
        mood: mood_table().sample(dice).unwrap_or(fallback.mood),
        weather: weather_table().sample(dice).unwrap_or(fallback.weather),
        time_of_day: time_of_day_table()
            .sample(dice)
            .unwrap_or(fallback.time_of_day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use township_types::SeededDice;

    #[test]
    fn tables_sum_to_one_hundred() {
        assert_eq!(mood_table().total_weight(), 100);
        assert_eq!(weather_table().total_weight(), 100);
        assert_eq!(time_of_day_table().total_weight(), 100);
    }

    #[test]
    fn select_walks_cumulative_weights() {
        let table = weather_table();
        assert_eq!(table.select(0), Some(Weather::Clear));
        assert_eq!(table.select(39), Some(Weather::Clear));
        assert_eq!(table.select(40), Some(Weather::Cloudy));
        assert_eq!(table.select(99), Some(Weather::Fog));
    }

    #[test]
    fn empty_table_selects_nothing() {
        let table: WeightedTable<Mood> = WeightedTable::new(Vec::new());
        let mut dice = SeededDice::from_seed(1);
        assert_eq!(table.sample(&mut dice), None);
    }

    #[test]
    fn every_time_of_day_eventually_rolls() {
        let mut dice = SeededDice::from_seed(42);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..500 {
            seen.insert(roll_ambient(&mut dice).time_of_day);
        }
        assert_eq!(seen.len(), 5);
    }
}
