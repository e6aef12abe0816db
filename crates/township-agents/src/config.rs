//! Tunable parameters for every agent pass.
//!
//! Each struct maps to one section of `township-config.yaml`. Every field
//! has a default so a partial section still parses; the defaults are the
//! values the simulation was balanced around.

use serde::Deserialize;

/// Labor state machine tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LaborConfig {
    /// Chance of dreaming during the dream cycle.
    pub dream_probability: f64,
    /// Chance of dreaming during night processing.
    pub night_processing_probability: f64,
    /// Break credits needed before a regular break, before the ethic term.
    pub break_threshold_base: u32,
    /// Extra credits needed per unit of work ethic (floored).
    pub break_threshold_ethic_scale: f64,
    /// Chance of a regular break once enough credits are banked.
    pub break_probability: f64,
    /// Shifts after which a well-rated agent may take a long-service break.
    pub long_service_shifts: u64,
    /// Boss rating above which a long-service break is possible.
    pub long_service_boss_rating: f64,
    /// Chance of a long-service break.
    pub long_service_probability: f64,
    /// Weight of a fresh performance sample in work ethic smoothing.
    pub ethic_smoothing: f64,
    /// Weight of a fresh performance sample in boss rating smoothing.
    pub boss_rating_smoothing: f64,
    /// Performance sample above which a break credit is earned.
    pub break_credit_sample: f64,
    /// Credits consumed by one rest tick.
    pub break_credit_cost: u32,
    /// Job performance credited while a clone covers.
    pub clone_performance: f64,
}

impl Default for LaborConfig {
    fn default() -> Self {
        Self {
            dream_probability: 0.3,
            night_processing_probability: 0.15,
            break_threshold_base: 3,
            break_threshold_ethic_scale: 5.0,
            break_probability: 0.25,
            long_service_shifts: 10,
            long_service_boss_rating: 0.8,
            long_service_probability: 0.1,
            ethic_smoothing: 0.05,
            boss_rating_smoothing: 0.02,
            break_credit_sample: 0.7,
            break_credit_cost: 3,
            clone_performance: 0.3,
        }
    }
}

/// Wellbeing update tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WellbeingConfig {
    /// Energy regained while resting.
    pub rest_energy: f64,
    /// Happiness regained while resting.
    pub rest_happiness: f64,
    /// Focus regained while resting.
    pub rest_focus: f64,
    /// Energy spent working.
    pub work_energy_cost: f64,
    /// Work ethic above which work is fulfilling.
    pub high_ethic: f64,
    /// Fulfillment gained by high-ethic workers.
    pub high_ethic_fulfillment: f64,
    /// Drive gained by high-ethic workers.
    pub high_ethic_drive: f64,
    /// Consecutive shifts beyond which overwork sets in.
    pub overwork_shifts: u32,
    /// Happiness lost to overwork.
    pub overwork_happiness: f64,
    /// Outlook lost to overwork.
    pub overwork_outlook: f64,
    /// Earnings per point of happiness bonus.
    pub earnings_per_point: f64,
    /// Cap on the earnings bonus.
    pub earnings_bonus_cap: f64,
    /// Balance below which poverty hurts.
    pub poverty_threshold: f64,
    /// Happiness lost to poverty.
    pub poverty_happiness: f64,
    /// Happiness lost to isolation.
    pub isolation_happiness: f64,
    /// Outlook lost to isolation.
    pub isolation_outlook: f64,
    /// Chance an isolated agent makes a connection instead.
    pub serendipity_probability: f64,
    /// Happiness gained from a serendipitous connection.
    pub serendipity_happiness: f64,
    /// Half-width of the per-scalar random walk.
    pub random_walk: f64,
}

impl Default for WellbeingConfig {
    fn default() -> Self {
        Self {
            rest_energy: 8.0,
            rest_happiness: 3.0,
            rest_focus: 2.0,
            work_energy_cost: 4.0,
            high_ethic: 0.7,
            high_ethic_fulfillment: 2.0,
            high_ethic_drive: 1.0,
            overwork_shifts: 12,
            overwork_happiness: 2.0,
            overwork_outlook: 1.0,
            earnings_per_point: 25.0,
            earnings_bonus_cap: 2.0,
            poverty_threshold: 50.0,
            poverty_happiness: 2.0,
            isolation_happiness: 1.0,
            isolation_outlook: 0.5,
            serendipity_probability: 0.05,
            serendipity_happiness: 2.0,
            random_walk: 1.0,
        }
    }
}

/// Economy pass tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Ticks per salary day. Payroll pays `salary * performance / ticks_per_day`.
    pub ticks_per_day: u32,
    /// Half-width of the per-tick property value drift, as a fraction.
    pub property_drift: f64,
    /// Chance of a flavor transfer each tick.
    pub transfer_probability: f64,
    /// Minimum balance for either side of a flavor transfer.
    pub transfer_min_balance: u64,
    /// Largest flavor transfer.
    pub transfer_max_amount: u64,
    /// Balance at which an agent considers auto-investing.
    pub invest_threshold: u64,
    /// Chance per wealthy agent per tick of auto-investing.
    pub invest_probability: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: 24,
            property_drift: 0.001,
            transfer_probability: 0.3,
            transfer_min_balance: 20,
            transfer_max_amount: 50,
            invest_threshold: 2000,
            invest_probability: 0.05,
        }
    }
}

/// Social pass tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    /// Chance a single agent with love interests proposes.
    pub matchmaking_probability: f64,
    /// Strength of a new relationship.
    pub dating_strength: f64,
    /// Happiness gained by both partners when dating starts.
    pub dating_happiness: f64,
    /// Love depth of a new entanglement.
    pub initial_love_depth: f64,
    /// Intimacy of a new entanglement.
    pub initial_intimacy: f64,
    /// Per-tick love depth multiplier while paired.
    pub love_depth_growth: f64,
    /// Per-tick intimacy gain while paired.
    pub intimacy_growth: f64,
    /// Per-tick relationship strength gain while paired.
    pub strength_growth: f64,
    /// Strength needed before engagement.
    pub engagement_strength: f64,
    /// Chance of engagement once strong enough.
    pub engagement_probability: f64,
    /// Strength needed before marriage.
    pub marriage_strength: f64,
    /// Chance of marriage once strong enough.
    pub marriage_probability: f64,
    /// Chance of a child for a married couple.
    pub child_probability: f64,
    /// Children after which no more arrive.
    pub max_children: u32,
    /// Happiness gained by both partners at each milestone.
    pub milestone_happiness: f64,
    /// Fulfillment gained by both partners at each milestone.
    pub milestone_fulfillment: f64,
    /// Most community groups that can exist at once.
    pub max_groups: usize,
    /// Chance of founding a group.
    pub group_founding_probability: f64,
    /// Fewest founding members.
    pub group_min_members: usize,
    /// Most founding members.
    pub group_max_members: usize,
    /// Chance a group meets.
    pub group_meeting_probability: f64,
    /// Bond strength gained per meeting.
    pub meeting_bond: f64,
    /// Happiness gained by members per meeting.
    pub meeting_happiness: f64,
    /// Chance a group recruits.
    pub group_recruit_probability: f64,
    /// Chance a project starts.
    pub project_start_probability: f64,
    /// Most helpers on a new project.
    pub project_max_helpers: usize,
    /// Lowest progress per tick before the helper multiplier.
    pub project_progress_min: f64,
    /// Highest progress per tick before the helper multiplier.
    pub project_progress_max: f64,
    /// Extra progress multiplier per helper.
    pub project_helper_bonus: f64,
    /// Fulfillment paid to the creator on completion.
    pub creator_fulfillment: f64,
    /// Happiness paid to the creator on completion.
    pub creator_happiness: f64,
    /// Fulfillment paid to each helper on completion.
    pub helper_fulfillment: f64,
    /// Happiness paid to each helper on completion.
    pub helper_happiness: f64,
    /// Happiness below which an agent needs therapy.
    pub therapy_happiness: f64,
    /// Life satisfaction below which an agent needs therapy.
    pub therapy_life_satisfaction: f64,
    /// Epochs between sessions.
    pub therapy_cooldown: u64,
    /// Chance a flagged agent gets a session.
    pub therapy_probability: f64,
    /// Happiness restored per session.
    pub therapy_happiness_gain: f64,
    /// Energy restored per session.
    pub therapy_energy_gain: f64,
    /// Fulfillment restored per session.
    pub therapy_fulfillment_gain: f64,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            matchmaking_probability: 0.15,
            dating_strength: 30.0,
            dating_happiness: 10.0,
            initial_love_depth: 10.0,
            initial_intimacy: 5.0,
            love_depth_growth: 1.02,
            intimacy_growth: 0.5,
            strength_growth: 1.5,
            engagement_strength: 70.0,
            engagement_probability: 0.1,
            marriage_strength: 85.0,
            marriage_probability: 0.08,
            child_probability: 0.02,
            max_children: 3,
            milestone_happiness: 8.0,
            milestone_fulfillment: 5.0,
            max_groups: 8,
            group_founding_probability: 0.1,
            group_min_members: 3,
            group_max_members: 5,
            group_meeting_probability: 0.25,
            meeting_bond: 2.0,
            meeting_happiness: 2.0,
            group_recruit_probability: 0.1,
            project_start_probability: 0.08,
            project_max_helpers: 2,
            project_progress_min: 2.0,
            project_progress_max: 8.0,
            project_helper_bonus: 0.5,
            creator_fulfillment: 10.0,
            creator_happiness: 5.0,
            helper_fulfillment: 5.0,
            helper_happiness: 3.0,
            therapy_happiness: 30.0,
            therapy_life_satisfaction: 35.0,
            therapy_cooldown: 6,
            therapy_probability: 0.4,
            therapy_happiness_gain: 15.0,
            therapy_energy_gain: 10.0,
            therapy_fulfillment_gain: 8.0,
        }
    }
}

/// Organization pass tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrganizationConfig {
    /// Morale and performance reported by a department with no members.
    pub empty_department_baseline: f64,
    /// Morale below which a department is warned.
    pub morale_floor: f64,
    /// Performance below which a department is warned.
    pub performance_floor: f64,
    /// Warnings that trigger a leadership change.
    pub warnings_before_change: u32,
    /// Chance the union resolves an open grievance.
    pub grievance_resolution_probability: f64,
    /// Happiness restored to affected agents on resolution.
    pub resolution_happiness: f64,
    /// Energy restored to affected agents on resolution.
    pub resolution_energy: f64,
    /// Energy below which the union considers intervening.
    pub intervention_energy: f64,
    /// Happiness below which the union considers intervening.
    pub intervention_happiness: f64,
    /// Consecutive shifts beyond which the union considers intervening.
    pub intervention_shifts: u32,
    /// Chance the union intervenes for a struggling agent.
    pub intervention_probability: f64,
    /// Break credits granted by an intervention.
    pub intervention_break_credits: u32,
    /// Happiness granted by an intervention.
    pub intervention_happiness_gain: f64,
    /// Energy granted by an intervention.
    pub intervention_energy_gain: f64,
    /// Work ethic above which promotion is possible.
    pub promotion_ethic: f64,
    /// Boss rating above which promotion is possible.
    pub promotion_boss_rating: f64,
    /// Chance of promotion for a qualifying candidate.
    pub promotion_probability: f64,
    /// Largest promotion bonus as a fraction of the new base salary.
    pub promotion_bonus_fraction: f64,
    /// Work ethic below which demotion is possible.
    pub demotion_ethic: f64,
    /// Boss rating below which demotion is possible.
    pub demotion_boss_rating: f64,
    /// Chance of demotion for a qualifying candidate.
    pub demotion_probability: f64,
    /// Tiers lost in a demotion.
    pub demotion_tiers: u8,
    /// Happiness gained on promotion.
    pub promotion_happiness: f64,
    /// Fulfillment gained on promotion.
    pub promotion_fulfillment: f64,
    /// Happiness lost on demotion.
    pub demotion_happiness: f64,
    /// Fulfillment lost on demotion.
    pub demotion_fulfillment: f64,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            empty_department_baseline: 50.0,
            morale_floor: 40.0,
            performance_floor: 40.0,
            warnings_before_change: 3,
            grievance_resolution_probability: 0.2,
            resolution_happiness: 5.0,
            resolution_energy: 3.0,
            intervention_energy: 15.0,
            intervention_happiness: 20.0,
            intervention_shifts: 16,
            intervention_probability: 0.5,
            intervention_break_credits: 5,
            intervention_happiness_gain: 5.0,
            intervention_energy_gain: 10.0,
            promotion_ethic: 0.85,
            promotion_boss_rating: 0.8,
            promotion_probability: 0.4,
            promotion_bonus_fraction: 0.1,
            demotion_ethic: 0.3,
            demotion_boss_rating: 0.4,
            demotion_probability: 0.3,
            demotion_tiers: 2,
            promotion_happiness: 10.0,
            promotion_fulfillment: 8.0,
            demotion_happiness: 12.0,
            demotion_fulfillment: 8.0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_section_keeps_defaults() {
        let config: SocialConfig =
            serde_json::from_str(r#"{"matchmaking_probability": 0.5}"#).unwrap();
        assert!((config.matchmaking_probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.max_groups, 8);
        assert_eq!(config.therapy_cooldown, 6);
    }

    #[test]
    fn payroll_divides_by_a_day() {
        assert_eq!(EconomyConfig::default().ticks_per_day, 24);
    }
}
