//! Per-agent labor state machine.
//!
//! Each tick every agent lands in exactly one [`LaborState`]:
//!
//! 1. During the dream cycle, 30 % drift into [`LaborState::Dreaming`];
//!    during night processing, 15 %.
//! 2. Otherwise, an agent with at least `3 + floor(5 * work_ethic)` break
//!    credits takes a break 25 % of the time.
//! 3. Otherwise, a long-serving agent (more than 10 shifts, boss rating above
//!    0.8) takes a break 10 % of the time.
//! 4. Otherwise the agent works.
//!
//! Working agents produce one activity. Resting agents produce two: their
//! own rest and a clone covering a shift in their place at reduced pay.
//! Labor only accrues earnings; payroll mints them.

use rust_decimal::Decimal;
use tracing::debug;

use township_types::{
    Activity, AgentId, Dice, Gate, Job, LaborState, LocationKind, TimeOfDay, WorkRecord,
    WorldSnapshot, choose,
};
use township_world::{DEFAULT_DEPARTMENT, LOWEST_TIER, job_at};

use crate::config::{EconomyConfig, LaborConfig};
use crate::economy::per_tick_wage;

/// Break credits an agent must bank before a regular break.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn break_threshold(record: &WorkRecord, config: &LaborConfig) -> u32 {
    // Clamped to a small non-negative range before the cast.
    let ethic_term = (config.break_threshold_ethic_scale * record.work_ethic.clamp(0.0, 1.0))
        .floor()
        .clamp(0.0, 1000.0) as u32;
    config.break_threshold_base.saturating_add(ethic_term)
}

/// Pick this tick's labor state for one agent.
pub fn choose_state(
    time: TimeOfDay,
    record: &WorkRecord,
    config: &LaborConfig,
    dice: &mut dyn Dice,
) -> LaborState {
    let dreaming = match time {
        TimeOfDay::DreamCycle => dice.gate(Gate::Dream, config.dream_probability),
        TimeOfDay::NightProcessing => {
            dice.gate(Gate::NightProcessing, config.night_processing_probability)
        }
        TimeOfDay::Morning | TimeOfDay::Afternoon | TimeOfDay::Evening => false,
    };
    if dreaming {
        return LaborState::Dreaming;
    }

    if record.break_credits >= break_threshold(record, config)
        && dice.gate(Gate::Break, config.break_probability)
    {
        return LaborState::OnBreak;
    }

    if record.shifts_completed > config.long_service_shifts
        && record.boss_rating > config.long_service_boss_rating
        && dice.gate(Gate::LongServiceBreak, config.long_service_probability)
    {
        return LaborState::OnBreak;
    }

    LaborState::Working
}

/// Get or create the job for `agent`, starting at the lowest tier.
pub fn ensure_job<'a>(snapshot: &'a mut WorldSnapshot, agent: &AgentId) -> &'a mut Job {
    let epoch = snapshot.epoch;
    let department = snapshot
        .residents
        .get(agent)
        .map_or(DEFAULT_DEPARTMENT, |r| r.department.as_str())
        .to_owned();
    snapshot
        .jobs
        .entry(agent.clone())
        .or_insert_with(|| job_at(agent, LOWEST_TIER, &department, epoch))
}

struct Spot {
    location: String,
    action: String,
}

fn pick_spot(snapshot: &WorldSnapshot, kind: LocationKind, dice: &mut dyn Dice) -> Spot {
    let candidates: Vec<_> = snapshot
        .locations
        .iter()
        .filter(|l| l.kind == kind)
        .collect();
    let fallback_action = match kind {
        LocationKind::Work => "working",
        LocationKind::Rest => "resting",
        LocationKind::Social => "socializing",
    };
    match choose(dice, &candidates) {
        Some(location) => Spot {
            location: location.name.clone(),
            action: choose(dice, &location.actions)
                .cloned()
                .unwrap_or_else(|| fallback_action.to_owned()),
        },
        None => Spot {
            location: String::from("around the city"),
            action: fallback_action.to_owned(),
        },
    }
}

/// Run the labor pass for every agent in `roster`.
///
/// Returns the activities in roster order, a resting agent's own activity
/// before its clone's.
pub fn run_labor_pass(
    snapshot: &mut WorldSnapshot,
    roster: &[AgentId],
    config: &LaborConfig,
    economy: &EconomyConfig,
    dice: &mut dyn Dice,
) -> Vec<Activity> {
    let time = snapshot.ambient.time_of_day;
    let mut activities = Vec::with_capacity(roster.len().saturating_mul(2));

    for agent in roster {
        let state = choose_state(time, snapshot.work_record_mut(agent), config, dice);
        let salary = ensure_job(snapshot, agent).salary;

        if state == LaborState::Working {
            let spot = pick_spot(snapshot, LocationKind::Work, dice);
            let record = snapshot.work_record_mut(agent);
            let performance = 0.5_f64.mul_add(record.work_ethic, 0.5);
            let earning = per_tick_wage(salary, performance, economy.ticks_per_day);
            let sample = dice.unit();

            record.work_ethic = blend(record.work_ethic, sample, config.ethic_smoothing);
            record.boss_rating = blend(record.boss_rating, sample, config.boss_rating_smoothing);
            record.shifts_completed = record.shifts_completed.saturating_add(1);
            record.total_contributions = record.total_contributions.saturating_add(1);
            record.consecutive_shifts = record.consecutive_shifts.saturating_add(1);
            if sample > config.break_credit_sample {
                record.break_credits = record.break_credits.saturating_add(1);
            }
            record.on_break = false;
            record.clone_active = false;
            record.labor_state = LaborState::Working;
            record.total_earned = record.total_earned.checked_add(earning).unwrap_or(record.total_earned);

            ensure_job(snapshot, agent).performance = performance;
            activities.push(Activity {
                agent: agent.clone(),
                state,
                location: spot.location,
                action: spot.action,
                earning,
            });
        } else {
            let rest = pick_spot(snapshot, LocationKind::Rest, dice);
            let shift = pick_spot(snapshot, LocationKind::Work, dice);
            let earning = per_tick_wage(salary, config.clone_performance, economy.ticks_per_day);

            let record = snapshot.work_record_mut(agent);
            record.break_credits = record.break_credits.saturating_sub(config.break_credit_cost);
            record.consecutive_shifts = 0;
            record.on_break = true;
            record.clone_active = true;
            record.labor_state = state;
            record.total_earned = record.total_earned.checked_add(earning).unwrap_or(record.total_earned);

            ensure_job(snapshot, agent).performance = config.clone_performance;
            activities.push(Activity {
                agent: agent.clone(),
                state,
                location: rest.location,
                action: rest.action,
                earning: Decimal::ZERO,
            });
            activities.push(Activity {
                agent: agent.clone(),
                state: LaborState::CloneCovering,
                location: shift.location,
                action: format!("covering a shift: {}", shift.action),
                earning,
            });
        }
    }

    debug!(
        epoch = snapshot.epoch,
        agents = roster.len(),
        activities = activities.len(),
        "Labor pass complete"
    );
    activities
}

/// Exponential smoothing of `current` toward `sample`.
fn blend(current: f64, sample: f64, weight: f64) -> f64 {
    weight.mul_add(sample - current, current).clamp(0.0, 1.0)
}
