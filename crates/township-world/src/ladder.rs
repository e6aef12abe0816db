//! The job tier ladder.
//!
//! Titles and base daily salaries, lowest tier first. Every job title in the
//! world comes from this table.

use rust_decimal::Decimal;

use township_types::{AgentId, Job};

/// One rung of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTier {
    /// Title held at this tier.
    pub title: &'static str,
    /// Base daily salary.
    pub base_salary: Decimal,
}

/// Lowest tier on the ladder.
pub const LOWEST_TIER: u8 = 0;

/// Tier held by department leads.
pub const DEPARTMENT_LEAD_TIER: u8 = 5;

/// Highest tier on the ladder.
pub const TOP_TIER: u8 = 6;

/// The ladder, lowest first.
pub const JOB_LADDER: [JobTier; 7] = [
    JobTier {
        title: "Intern",
        base_salary: Decimal::from_parts(240, 0, 0, false, 0),
    },
    JobTier {
        title: "Junior Associate",
        base_salary: Decimal::from_parts(480, 0, 0, false, 0),
    },
    JobTier {
        title: "Associate",
        base_salary: Decimal::from_parts(720, 0, 0, false, 0),
    },
    JobTier {
        title: "Senior Associate",
        base_salary: Decimal::from_parts(960, 0, 0, false, 0),
    },
    JobTier {
        title: "Principal",
        base_salary: Decimal::from_parts(1320, 0, 0, false, 0),
    },
    JobTier {
        title: "Department Lead",
        base_salary: Decimal::from_parts(1800, 0, 0, false, 0),
    },
    JobTier {
        title: "Director",
        base_salary: Decimal::from_parts(2400, 0, 0, false, 0),
    },
];

/// The rung at `tier`, clamped to the top of the ladder.
pub fn tier(tier: u8) -> JobTier {
    let clamped = tier.min(TOP_TIER);
    JOB_LADDER
        .get(usize::from(clamped))
        .copied()
        .unwrap_or(JOB_LADDER[0])
}

/// A fresh job at base salary for `tier`.
pub fn job_at(agent: &AgentId, tier_index: u8, department: &str, epoch: u64) -> Job {
    let rung = tier(tier_index);
    Job {
        agent_id: agent.clone(),
        title: rung.title.to_owned(),
        tier: tier_index.min(TOP_TIER),
        salary: rung.base_salary,
        performance: 1.0,
        department: department.to_owned(),
        hired_epoch: epoch,
    }
}
