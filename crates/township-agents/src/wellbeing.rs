//! Per-tick wellbeing mechanics.
//!
//! Applied to every agent after labor, in this order:
//!
//! 1. Work status: rest restores energy, happiness, and focus; work costs
//!    energy but fulfills high-ethic agents; long unbroken stretches of work
//!    depress happiness and outlook.
//! 2. Earnings bonus, capped.
//! 3. Poverty penalty below a balance threshold.
//! 4. Isolation penalty, or a serendipitous new connection.
//! 5. Seasonal event bias.
//! 6. A small random walk on every scalar.
//! 7. Clamp to `[0, 100]` and recompute life satisfaction.
//!
//! Every scalar stays in range whatever the starting values or dice.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use township_types::{
    Activity, AgentId, Dice, Gate, LaborState, WellbeingRecord, WorldSnapshot, clamp_scalar,
};

use crate::config::WellbeingConfig;

/// Labor-side facts the wellbeing update reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkStatus {
    /// Labor state chosen this tick.
    pub state: LaborState,
    /// Current work ethic.
    pub work_ethic: f64,
    /// Working ticks since the last rest.
    pub consecutive_shifts: u32,
    /// Earnings accrued this tick.
    pub earning: f64,
    /// Current balance.
    pub balance: f64,
}

/// Apply work status, earnings, and poverty deltas.
pub fn apply_work_status(record: &mut WellbeingRecord, status: &WorkStatus, config: &WellbeingConfig) {
    if status.state.is_rest() {
        record.energy += config.rest_energy;
        record.happiness += config.rest_happiness;
        record.focus += config.rest_focus;
    } else {
        record.energy -= config.work_energy_cost;
        if status.work_ethic > config.high_ethic {
            record.fulfillment += config.high_ethic_fulfillment;
            record.drive += config.high_ethic_drive;
        }
        if status.consecutive_shifts > config.overwork_shifts {
            record.happiness -= config.overwork_happiness;
            record.outlook -= config.overwork_outlook;
        }
    }

    if config.earnings_per_point > 0.0 && status.earning > 0.0 {
        record.happiness += (status.earning / config.earnings_per_point).min(config.earnings_bonus_cap);
    }

    if status.balance < config.poverty_threshold {
        record.happiness -= config.poverty_happiness;
    }
}

/// Apply seasonal bias and the random walk, clamp, and recompute life
/// satisfaction.
pub fn settle(
    record: &mut WellbeingRecord,
    seasonal_bias: f64,
    config: &WellbeingConfig,
    dice: &mut dyn Dice,
) {
    record.happiness += seasonal_bias;

    let walk = config.random_walk;
    record.happiness += dice.between(-walk, walk);
    record.fulfillment += dice.between(-walk, walk);
    record.energy += dice.between(-walk, walk);
    record.drive += dice.between(-walk, walk);
    record.focus += dice.between(-walk, walk);
    record.outlook += dice.between(-walk, walk);

    record.clamp_all();
    record.life_satisfaction = life_satisfaction(record);
}

fn count(len: usize) -> f64 {
    f64::from(u32::try_from(len).unwrap_or(u32::MAX))
}

/// Composite life satisfaction in `[0, 100]`.
///
/// `0.3 * happiness + 0.3 * fulfillment + 0.15 * energy`, plus 10 for a
/// partner, 5 per child, hobbies (5 each, at most 15), creative works (2
/// each, at most 10), connections (2 each, at most 10), 3 per promotion,
/// minus 5 per demotion.
pub fn life_satisfaction(record: &WellbeingRecord) -> f64 {
    let mut score = 0.15_f64.mul_add(
        record.energy,
        0.3_f64.mul_add(record.happiness, 0.3 * record.fulfillment),
    );
    if record.partner.is_some() {
        score += 10.0;
    }
    score += 5.0 * f64::from(record.children);
    score += (5.0 * count(record.hobbies.len())).min(15.0);
    score += (2.0 * f64::from(record.creative_works)).min(10.0);
    score += (2.0 * count(record.social_connections.len())).min(10.0);
    score += 3.0 * f64::from(record.promotions);
    score -= 5.0 * f64::from(record.demotions);
    clamp_scalar(score)
}

/// Run the wellbeing pass for every agent in `roster`.
pub fn run_wellbeing_pass(
    snapshot: &mut WorldSnapshot,
    roster: &[AgentId],
    activities: &[Activity],
    config: &WellbeingConfig,
    dice: &mut dyn Dice,
) {
    let seasonal_bias = snapshot
        .active_seasonal_event()
        .map_or(0.0, |event| event.happiness_bias);

    for agent in roster {
        let earning = activities
            .iter()
            .filter(|a| &a.agent == agent)
            .fold(Decimal::ZERO, |acc, a| acc.checked_add(a.earning).unwrap_or(acc));
        let work = snapshot.work_record_mut(agent).clone();
        let status = WorkStatus {
            state: work.labor_state,
            work_ethic: work.work_ethic,
            consecutive_shifts: work.consecutive_shifts,
            earning: earning.to_f64().unwrap_or(0.0),
            balance: snapshot.economy.balance(agent).to_f64().unwrap_or(0.0),
        };

        apply_work_status(snapshot.wellbeing_mut(agent), &status, config);

        let isolated = snapshot.wellbeing_mut(agent).social_connections.is_empty();
        if isolated {
            let others: Vec<&AgentId> = roster.iter().filter(|other| *other != agent).collect();
            let met = if dice.gate(Gate::SocialSerendipity, config.serendipity_probability) {
                dice.index(others.len())
                    .and_then(|i| others.get(i))
                    .map(|other| (*other).clone())
            } else {
                None
            };
            match met {
                Some(other) => {
                    let record = snapshot.wellbeing_mut(agent);
                    record.social_connections.insert(other.clone());
                    record.happiness += config.serendipity_happiness;
                    snapshot
                        .wellbeing_mut(&other)
                        .social_connections
                        .insert(agent.clone());
                    debug!(agent = %agent, other = %other, "Serendipitous connection");
                }
                None => {
                    let record = snapshot.wellbeing_mut(agent);
                    record.happiness -= config.isolation_happiness;
                    record.outlook -= config.isolation_outlook;
                }
            }
        }

        settle(snapshot.wellbeing_mut(agent), seasonal_bias, config, dice);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use township_types::{SCALAR_MAX, SCALAR_MIN, ScriptedDice, SeededDice};

    fn working(consecutive: u32) -> WorkStatus {
        WorkStatus {
            state: LaborState::Working,
            work_ethic: 0.9,
            consecutive_shifts: consecutive,
            earning: 100.0,
            balance: 500.0,
        }
    }

    #[test]
    fn rest_restores_energy() {
        let mut record = WellbeingRecord::default();
        let status = WorkStatus {
            state: LaborState::Dreaming,
            earning: 0.0,
            ..working(0)
        };
        apply_work_status(&mut record, &status, &WellbeingConfig::default());
        assert!((record.energy - 78.0).abs() < 1e-9);
        assert!((record.happiness - 63.0).abs() < 1e-9);
    }

    #[test]
    fn high_ethic_work_fulfills_but_tires() {
        let mut record = WellbeingRecord::default();
        apply_work_status(&mut record, &working(0), &WellbeingConfig::default());
        assert!((record.energy - 66.0).abs() < 1e-9);
        assert!((record.fulfillment - 52.0).abs() < 1e-9);
        // Earnings bonus is capped at 2.
        assert!((record.happiness - 62.0).abs() < 1e-9);
    }

    #[test]
    fn overwork_and_poverty_hurt() {
        let mut record = WellbeingRecord::default();
        let status = WorkStatus {
            earning: 0.0,
            balance: 10.0,
            ..working(13)
        };
        apply_work_status(&mut record, &status, &WellbeingConfig::default());
        assert!((record.happiness - 56.0).abs() < 1e-9);
        assert!((record.outlook - 54.0).abs() < 1e-9);
    }

    #[test]
    fn life_satisfaction_counts_bonuses() {
        let record = WellbeingRecord {
            happiness: 50.0,
            fulfillment: 50.0,
            energy: 40.0,
            partner: Some(AgentId::from("basil")),
            children: 1,
            hobbies: vec![String::from("a"); 5],
            promotions: 1,
            demotions: 1,
            ..WellbeingRecord::default()
        };
        // 15 + 15 + 6 + 10 + 5 + 15 + 3 - 5
        assert!((life_satisfaction(&record) - 64.0).abs() < 1e-9);
    }

    #[test]
    fn scalars_stay_bounded_from_any_start() {
        let config = WellbeingConfig::default();
        let mut dice = SeededDice::from_seed(99);
        for start in [-500.0, 0.0, 50.0, 100.0, 900.0] {
            let mut record = WellbeingRecord {
                happiness: start,
                fulfillment: start,
                energy: start,
                drive: start,
                focus: start,
                outlook: start,
                ..WellbeingRecord::default()
            };
            for _ in 0..20 {
                apply_work_status(&mut record, &working(40), &config);
                settle(&mut record, 50.0, &config, &mut dice);
                for scalar in record.scalars() {
                    assert!((SCALAR_MIN..=SCALAR_MAX).contains(&scalar));
                }
                assert!((SCALAR_MIN..=SCALAR_MAX).contains(&record.life_satisfaction));
            }
        }
    }

    #[test]
    fn isolated_agent_can_meet_someone() {
        let mut world = WorldSnapshot::default();
        let roster = vec![AgentId::from("ada"), AgentId::from("basil")];
        let mut dice = ScriptedDice::new(5).force(Gate::SocialSerendipity, true);
        run_wellbeing_pass(&mut world, &roster, &[], &WellbeingConfig::default(), &mut dice);

        let ada = world.wellbeing_of(&AgentId::from("ada")).unwrap();
        let basil = world.wellbeing_of(&AgentId::from("basil")).unwrap();
        assert!(ada.social_connections.contains(&AgentId::from("basil")));
        assert!(basil.social_connections.contains(&AgentId::from("ada")));
    }
}
