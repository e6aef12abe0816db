//! Departments, the union, and the career ladder.
//!
//! Per tick:
//!
//! 1. Department membership is rebuilt from the roster and morale and
//!    performance are recomputed.
//! 2. Underperforming departments get a warning and a grievance. Enough
//!    warnings replace the boss with the member of highest work ethic.
//! 3. The union may resolve open grievances and may intervene for
//!    overworked or unhappy agents.
//! 4. One random agent is reviewed for promotion or demotion.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use township_ledger::pricing::to_decimal;
use township_types::{
    AgentId, Department, Dice, Event, EventKind, Gate, Grievance, GrievanceId, GrievanceStatus,
    Retention, WorldSnapshot, choose, trim_to_recent,
};
use township_world::ladder::tier;
use township_world::{DEFAULT_DEPARTMENT, DEPARTMENT_LEAD_TIER, LOWEST_TIER, TOP_TIER, job_at};

use crate::config::OrganizationConfig;
use crate::labor::ensure_job;

/// How the union settles grievances.
const RESOLUTIONS: &[&str] = &[
    "Management agreed to a quieter open-plan floor.",
    "A rotating four-day week was trialled.",
    "Snack budget doubled after a tense meeting.",
    "Mandatory meetings were cut in half.",
    "A mentoring scheme was set up for new hires.",
];

/// One promotion or demotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CareerMove {
    /// Moved up one tier.
    Promoted {
        /// Who moved.
        agent: AgentId,
        /// Tier before.
        from: u8,
        /// Tier after.
        to: u8,
        /// New salary, base plus bonus.
        salary: Decimal,
    },
    /// Moved down the ladder.
    Demoted {
        /// Who moved.
        agent: AgentId,
        /// Tier before.
        from: u8,
        /// Tier after.
        to: u8,
        /// New salary.
        salary: Decimal,
    },
}

/// What happened during one organization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationReport {
    /// Departments warned this tick.
    pub warnings: Vec<String>,
    /// Leadership changes as `(department, new boss)`.
    pub leadership_changes: Vec<(String, AgentId)>,
    /// Grievances resolved by the union.
    pub resolved: Vec<GrievanceId>,
    /// Agents the union stepped in for.
    pub interventions: Vec<AgentId>,
    /// The career review outcome, if anyone moved.
    pub career_move: Option<CareerMove>,
}

fn department_of(snapshot: &WorldSnapshot, agent: &AgentId) -> String {
    snapshot
        .residents
        .get(agent)
        .map(|r| r.department.clone())
        .or_else(|| snapshot.jobs.get(agent).map(|j| j.department.clone()))
        .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_owned())
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let count = f64::from(u32::try_from(values.len()).unwrap_or(u32::MAX));
    Some(values.iter().sum::<f64>() / count)
}

/// Morale and performance for a department's members.
///
/// An empty department reports `baseline` for both.
pub fn department_metrics(
    snapshot: &WorldSnapshot,
    department: &Department,
    baseline: f64,
) -> (f64, f64) {
    let happiness: Vec<f64> = department
        .members
        .iter()
        .map(|m| snapshot.wellbeing.get(m).map_or(60.0, |w| w.happiness))
        .collect();
    let ethic: Vec<f64> = department
        .members
        .iter()
        .map(|m| snapshot.work_records.get(m).map_or(0.6, |w| w.work_ethic) * 100.0)
        .collect();
    (
        mean(&happiness).unwrap_or(baseline),
        mean(&ethic).unwrap_or(baseline),
    )
}

/// Rebuild membership from the roster and refresh every department's
/// aggregates.
pub fn sync_departments(snapshot: &mut WorldSnapshot, roster: &[AgentId], baseline: f64) {
    let mut membership: BTreeMap<String, Vec<AgentId>> = BTreeMap::new();
    for agent in roster {
        membership
            .entry(department_of(snapshot, agent))
            .or_default()
            .push(agent.clone());
    }

    for name in membership.keys() {
        snapshot
            .departments
            .entry(name.clone())
            .or_insert_with(|| Department::new(name.clone(), baseline));
    }

    let names: Vec<String> = snapshot.departments.keys().cloned().collect();
    for name in names {
        let members = membership.remove(&name).unwrap_or_default();
        if let Some(department) = snapshot.departments.get_mut(&name) {
            department.members = members.into_iter().collect();
            if department
                .boss
                .as_ref()
                .is_some_and(|boss| !department.members.contains(boss))
            {
                department.boss = None;
            }
        }
        let metrics = snapshot
            .departments
            .get(&name)
            .map(|d| department_metrics(snapshot, d, baseline));
        if let (Some((morale, performance)), Some(department)) =
            (metrics, snapshot.departments.get_mut(&name))
        {
            department.morale = morale;
            department.performance = performance;
        }
    }
}

/// Warn underperforming departments and change leadership where warnings
/// have piled up.
pub fn review_departments(
    snapshot: &mut WorldSnapshot,
    config: &OrganizationConfig,
    retention: &Retention,
    events: &mut Vec<Event>,
    report: &mut OrganizationReport,
) {
    let epoch = snapshot.epoch;
    let names: Vec<String> = snapshot.departments.keys().cloned().collect();

    for name in names {
        let Some(department) = snapshot.departments.get_mut(&name) else {
            continue;
        };
        let low_morale = department.morale < config.morale_floor;
        let low_performance = department.performance < config.performance_floor;
        if !low_morale && !low_performance {
            continue;
        }

        department.warnings = department.warnings.saturating_add(1);
        let reason = if low_morale {
            format!("morale fell to {:.1}", department.morale)
        } else {
            format!("performance fell to {:.1}", department.performance)
        };
        let affected: Vec<AgentId> = department.members.iter().cloned().collect();
        let warnings = department.warnings;
        warn!(department = %name, warnings, reason = %reason, "Department warned");

        snapshot.grievances.push(Grievance {
            id: GrievanceId::new(),
            department: name.clone(),
            filed_epoch: epoch,
            reason: reason.clone(),
            affected: affected.clone(),
            status: GrievanceStatus::Open,
            resolution: None,
        });
        events.push(Event::new(
            epoch,
            EventKind::Organization,
            format!("{name} put on notice"),
            format!("{name} received warning {warnings}: {reason}."),
            affected,
        ));
        report.warnings.push(name.clone());

        if warnings >= config.warnings_before_change {
            change_leadership(snapshot, &name, events, report);
        }
    }

    trim_to_recent(&mut snapshot.grievances, retention.grievances);
}

fn change_leadership(
    snapshot: &mut WorldSnapshot,
    name: &str,
    events: &mut Vec<Event>,
    report: &mut OrganizationReport,
) {
    let epoch = snapshot.epoch;
    let Some(department) = snapshot.departments.get(name) else {
        return;
    };
    let incumbent = department.boss.clone();
    let successor = department
        .members
        .iter()
        .filter(|m| Some(*m) != incumbent.as_ref())
        .max_by(|a, b| {
            let ethic = |agent: &AgentId| snapshot.work_records.get(agent).map_or(0.0, |w| w.work_ethic);
            ethic(a).total_cmp(&ethic(b))
        })
        .cloned();

    let Some(successor) = successor else {
        if let Some(department) = snapshot.departments.get_mut(name) {
            department.warnings = 0;
        }
        return;
    };

    if let Some(old) = &incumbent {
        snapshot.jobs.insert(old.clone(), job_at(old, LOWEST_TIER, name, epoch));
        let record = snapshot.wellbeing_mut(old);
        record.demotions = record.demotions.saturating_add(1);
    }
    // A successor already at or above lead tier keeps their job.
    let senior = snapshot
        .jobs
        .get(&successor)
        .is_some_and(|job| job.tier >= DEPARTMENT_LEAD_TIER);
    if senior {
        if let Some(job) = snapshot.jobs.get_mut(&successor) {
            name.clone_into(&mut job.department);
        }
    } else {
        snapshot.jobs.insert(
            successor.clone(),
            job_at(&successor, DEPARTMENT_LEAD_TIER, name, epoch),
        );
        let record = snapshot.wellbeing_mut(&successor);
        record.promotions = record.promotions.saturating_add(1);
    }

    if let Some(department) = snapshot.departments.get_mut(name) {
        department.boss = Some(successor.clone());
        department.warnings = 0;
        department.leadership_changes = department.leadership_changes.saturating_add(1);
    }

    let description = match &incumbent {
        Some(old) => format!("{successor} replaces {old} at the head of {name}."),
        None => format!("{successor} takes charge of {name}."),
    };
    info!(department = %name, boss = %successor, "Leadership change");
    let mut agents = vec![successor.clone()];
    agents.extend(incumbent);
    events.push(Event::new(
        epoch,
        EventKind::Organization,
        format!("New leadership in {name}"),
        description,
        agents,
    ));
    report
        .leadership_changes
        .push((name.to_owned(), successor));
}

/// Resolve grievances and intervene for struggling agents.
pub fn run_union(
    snapshot: &mut WorldSnapshot,
    roster: &[AgentId],
    config: &OrganizationConfig,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
    report: &mut OrganizationReport,
) {
    let epoch = snapshot.epoch;

    let mut repaired: Vec<AgentId> = Vec::new();
    for grievance in &mut snapshot.grievances {
        if grievance.status != GrievanceStatus::Open
            || !dice.gate(Gate::GrievanceResolution, config.grievance_resolution_probability)
        {
            continue;
        }
        let resolution = choose(dice, RESOLUTIONS)
            .copied()
            .unwrap_or("Both sides agreed to talk again next week.");
        grievance.status = GrievanceStatus::Resolved;
        grievance.resolution = Some(resolution.to_owned());
        repaired.extend(grievance.affected.iter().cloned());
        events.push(Event::new(
            epoch,
            EventKind::Union,
            format!("Grievance settled in {}", grievance.department),
            resolution,
            grievance.affected.clone(),
        ));
        report.resolved.push(grievance.id);
    }
    for agent in &repaired {
        let record = snapshot.wellbeing_mut(agent);
        record.happiness += config.resolution_happiness;
        record.energy += config.resolution_energy;
        record.clamp_all();
    }

    for agent in roster {
        let shifts = snapshot.work_record_mut(agent).consecutive_shifts;
        let record = snapshot.wellbeing_mut(agent);
        let struggling = record.energy < config.intervention_energy
            || record.happiness < config.intervention_happiness
            || shifts > config.intervention_shifts;
        if !struggling || !dice.gate(Gate::UnionIntervention, config.intervention_probability) {
            continue;
        }
        record.happiness += config.intervention_happiness_gain;
        record.energy += config.intervention_energy_gain;
        record.clamp_all();
        let work = snapshot.work_record_mut(agent);
        work.break_credits = work.break_credits.saturating_add(config.intervention_break_credits);

        debug!(agent = %agent, "Union intervention");
        events.push(Event::new(
            epoch,
            EventKind::Union,
            "The union steps in",
            format!("The union insisted {agent} take some time off."),
            vec![agent.clone()],
        ));
        report.interventions.push(agent.clone());
    }
}

/// Review one agent for promotion or demotion.
pub fn review_career(
    snapshot: &mut WorldSnapshot,
    agent: &AgentId,
    config: &OrganizationConfig,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
) -> Option<CareerMove> {
    let epoch = snapshot.epoch;
    let work = snapshot.work_record_mut(agent).clone();
    let job = ensure_job(snapshot, agent).clone();

    let promote = work.work_ethic > config.promotion_ethic
        && work.boss_rating > config.promotion_boss_rating
        && job.tier < TOP_TIER;
    let demote = work.work_ethic < config.demotion_ethic
        && work.boss_rating < config.demotion_boss_rating
        && job.tier > LOWEST_TIER;

    let career_move = if promote && dice.gate(Gate::Promotion, config.promotion_probability) {
        let to = job.tier.saturating_add(1);
        let mut next = job_at(agent, to, &job.department, epoch);
        let fraction = dice.between(0.0, config.promotion_bonus_fraction);
        let bonus = to_decimal(fraction, 4)
            .and_then(|f| next.salary.checked_mul(f))
            .map_or(Decimal::ZERO, |b| b.round_dp(2));
        next.salary = next.salary.checked_add(bonus).unwrap_or(next.salary);
        let salary = next.salary;
        snapshot.jobs.insert(agent.clone(), next);

        let record = snapshot.wellbeing_mut(agent);
        record.promotions = record.promotions.saturating_add(1);
        record.happiness += config.promotion_happiness;
        record.fulfillment += config.promotion_fulfillment;
        record.clamp_all();
        CareerMove::Promoted {
            agent: agent.clone(),
            from: job.tier,
            to,
            salary,
        }
    } else if demote && dice.gate(Gate::Demotion, config.demotion_probability) {
        let to = job.tier.saturating_sub(config.demotion_tiers);
        let next = job_at(agent, to, &job.department, epoch);
        let salary = next.salary;
        snapshot.jobs.insert(agent.clone(), next);

        let record = snapshot.wellbeing_mut(agent);
        record.demotions = record.demotions.saturating_add(1);
        record.happiness -= config.demotion_happiness;
        record.fulfillment -= config.demotion_fulfillment;
        record.clamp_all();
        CareerMove::Demoted {
            agent: agent.clone(),
            from: job.tier,
            to,
            salary,
        }
    } else {
        return None;
    };

    let (title, description) = match &career_move {
        CareerMove::Promoted { to, salary, .. } => (
            "A well-earned promotion",
            format!("{agent} was promoted to {} at {salary} a day.", tier(*to).title),
        ),
        CareerMove::Demoted { to, .. } => (
            "A step back",
            format!("{agent} was moved down to {}.", tier(*to).title),
        ),
    };
    info!(agent = %agent, ?career_move, "Career move");
    events.push(Event::new(
        epoch,
        EventKind::Career,
        title,
        description,
        vec![agent.clone()],
    ));
    Some(career_move)
}

/// Run the whole organization pass.
pub fn run_organization_pass(
    snapshot: &mut WorldSnapshot,
    roster: &[AgentId],
    config: &OrganizationConfig,
    retention: &Retention,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
) -> OrganizationReport {
    let mut report = OrganizationReport::default();

    sync_departments(snapshot, roster, config.empty_department_baseline);
    review_departments(snapshot, config, retention, events, &mut report);
    run_union(snapshot, roster, config, dice, events, &mut report);
    if let Some(agent) = choose(dice, roster) {
        report.career_move = review_career(snapshot, agent, config, dice, events);
    }

    debug!(
        warnings = report.warnings.len(),
        resolved = report.resolved.len(),
        interventions = report.interventions.len(),
        "Organization pass complete"
    );
    report
}
