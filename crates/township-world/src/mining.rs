//! The shared mining pool.
//!
//! Every running machine contributes its hash rate to one pool. Each tick the
//! pool finds a block with probability
//!
//! ```text
//! min(max_block_probability, total_hash_rate / (difficulty * difficulty_scale))
//! ```
//!
//! and splits the block reward pro rata by hash rate. Each machine's share is
//! reduced by its power cost and floored at zero, so a machine never pays to
//! mine. Every `retarget_interval` blocks the difficulty rises and the reward
//! falls.
//!
//! Adverse weather can knock running machines into maintenance; machines in
//! maintenance recover probabilistically.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use township_ledger::Ledger;
use township_ledger::pricing::to_decimal;
use township_types::{
    AgentId, Dice, Gate, MachineId, MachineStatus, MiningMachine, MiningPool, TransactionKind,
    Weather, WorldSnapshot,
};

use crate::error::WorldError;

/// Mining pool tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Cap on the per-tick block probability.
    pub max_block_probability: f64,
    /// Hash rate per unit of difficulty that yields certainty.
    pub difficulty_scale: f64,
    /// Blocks between difficulty retargets.
    pub retarget_interval: u64,
    /// Difficulty multiplier applied at each retarget.
    pub difficulty_growth: f64,
    /// Reward multiplier applied at each retarget.
    pub reward_decay: f64,
    /// Chance a running machine faults under adverse weather.
    pub weather_fault_probability: f64,
    /// Chance a machine in maintenance recovers.
    pub recovery_probability: f64,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            max_block_probability: 0.8,
            difficulty_scale: 1000.0,
            retarget_interval: 100,
            difficulty_growth: 1.1,
            reward_decay: 0.95,
            weather_fault_probability: 0.1,
            recovery_probability: 0.3,
        }
    }
}

/// One machine's cut of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    /// The machine.
    pub machine: MachineId,
    /// Its owner.
    pub owner: AgentId,
    /// Amount credited, never negative.
    pub amount: Decimal,
}

/// A block found this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFound {
    /// Height of the new block.
    pub height: u64,
    /// Reward that was split.
    pub reward: Decimal,
    /// Per-machine payouts.
    pub payouts: Vec<Payout>,
    /// Whether this block triggered a retarget.
    pub retargeted: bool,
}

impl BlockFound {
    /// Sum of every payout.
    pub fn minted(&self) -> Decimal {
        self.payouts
            .iter()
            .fold(Decimal::ZERO, |acc, p| acc.checked_add(p.amount).unwrap_or(acc))
    }
}

/// What happened in the mining pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiningReport {
    /// Machines knocked into maintenance by weather.
    pub faults: Vec<MachineId>,
    /// Machines back online.
    pub recoveries: Vec<MachineId>,
    /// The block, if one was found.
    pub block: Option<BlockFound>,
}

/// Recompute the pool's total hash rate from running machines.
pub fn refresh_hash_rate(pool: &mut MiningPool, machines: &[MiningMachine]) {
    pool.total_hash_rate = machines
        .iter()
        .filter(|m| m.is_running())
        .map(|m| m.hash_rate)
        .sum();
}

/// Probability of finding a block this tick.
pub fn block_probability(pool: &MiningPool, config: &MiningConfig) -> f64 {
    let denominator = pool.difficulty * config.difficulty_scale;
    if denominator <= 0.0 {
        return config.max_block_probability;
    }
    (pool.total_hash_rate / denominator).clamp(0.0, config.max_block_probability)
}

/// Split `reward` across running machines by hash rate share, net of power.
pub fn split_reward(reward: Decimal, machines: &[MiningMachine]) -> Vec<Payout> {
    let total: f64 = machines
        .iter()
        .filter(|m| m.is_running())
        .map(|m| m.hash_rate)
        .sum();
    if total <= 0.0 {
        return Vec::new();
    }

    machines
        .iter()
        .filter(|m| m.is_running())
        .map(|machine| {
            let share = to_decimal(machine.hash_rate / total, 8).unwrap_or(Decimal::ZERO);
            let gross = reward.checked_mul(share).unwrap_or(Decimal::ZERO);
            let net = gross
                .checked_sub(machine.power_cost)
                .unwrap_or(Decimal::ZERO)
                .max(Decimal::ZERO)
                .round_dp(4);
            Payout {
                machine: machine.id,
                owner: machine.owner().clone(),
                amount: net,
            }
        })
        .collect()
}

/// Apply weather faults and recoveries.
///
/// Machines that recover this tick are not eligible to fault again until
/// the next one.
pub fn apply_weather(
    machines: &mut [MiningMachine],
    weather: Weather,
    config: &MiningConfig,
    dice: &mut dyn Dice,
) -> (Vec<MachineId>, Vec<MachineId>) {
    let mut faults = Vec::new();
    let mut recoveries = Vec::new();

    for machine in machines.iter_mut() {
        match machine.status {
            MachineStatus::Maintenance => {
                if dice.gate(Gate::MachineRecovery, config.recovery_probability) {
                    machine.status = MachineStatus::Running;
                    recoveries.push(machine.id);
                }
            }
            MachineStatus::Running => {
                if weather.is_adverse()
                    && dice.gate(Gate::WeatherFault, config.weather_fault_probability)
                {
                    machine.status = MachineStatus::Maintenance;
                    faults.push(machine.id);
                }
            }
        }
    }

    (faults, recoveries)
}

/// Run the mining pass against the snapshot.
///
/// Rewards are minted through the ledger, so supply and balances move
/// together.
///
/// # Errors
///
/// Returns [`WorldError::Ledger`] if minting a payout fails.
pub fn run_mining_pass(
    snapshot: &mut WorldSnapshot,
    config: &MiningConfig,
    dice: &mut dyn Dice,
    transaction_cap: usize,
) -> Result<MiningReport, WorldError> {
    let epoch = snapshot.epoch;
    let (faults, recoveries) = apply_weather(
        &mut snapshot.mining_machines,
        snapshot.ambient.weather,
        config,
        dice,
    );

    let pool = &mut snapshot.economy.mining_pool;
    refresh_hash_rate(pool, &snapshot.mining_machines);
    let probability = block_probability(pool, config);
    debug!(
        epoch,
        hash_rate = pool.total_hash_rate,
        probability,
        "Mining pool refreshed"
    );

    if !dice.gate(Gate::BlockFound, probability) {
        return Ok(MiningReport {
            faults,
            recoveries,
            block: None,
        });
    }

    let reward = pool.block_reward;
    let payouts = split_reward(reward, &snapshot.mining_machines);
    pool.blocks_mined = pool.blocks_mined.saturating_add(1);
    let height = pool.blocks_mined;
    let retargeted = config.retarget_interval > 0
        && height.checked_rem(config.retarget_interval) == Some(0);
    if retargeted {
        pool.difficulty *= config.difficulty_growth;
        let decay = to_decimal(config.reward_decay, 4).unwrap_or(Decimal::ONE);
        pool.block_reward = pool
            .block_reward
            .checked_mul(decay)
            .unwrap_or(pool.block_reward)
            .round_dp(4);
        info!(
            height,
            difficulty = pool.difficulty,
            reward = %pool.block_reward,
            "Mining difficulty retargeted"
        );
    }

    let mut ledger = Ledger::new(&mut snapshot.economy, transaction_cap);
    for payout in &payouts {
        if payout.amount <= Decimal::ZERO {
            continue;
        }
        ledger.mint(
            epoch,
            TransactionKind::MiningReward,
            &payout.owner,
            payout.amount,
            format!("block {height}"),
        )?;
        if let Some(machine) = snapshot
            .mining_machines
            .iter_mut()
            .find(|m| m.id == payout.machine)
        {
            machine.total_earned = machine
                .total_earned
                .checked_add(payout.amount)
                .unwrap_or(machine.total_earned);
        }
    }

    Ok(MiningReport {
        faults,
        recoveries,
        block: Some(BlockFound {
            height,
            reward,
            payouts,
            retargeted,
        }),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use township_ledger::conservation::verify;
    use township_types::ScriptedDice;

    fn machine(owner: &str, hash_rate: f64, power: Decimal) -> MiningMachine {
        MiningMachine::new(AgentId::from(owner), "test-rig", hash_rate, power, 0)
    }

    #[test]
    fn split_is_pro_rata_net_of_power() {
        let machines = vec![machine("ada", 30.0, dec!(1)), machine("basil", 10.0, dec!(1))];
        let payouts = split_reward(dec!(40), &machines);
        assert_eq!(payouts.len(), 2);
        assert_eq!(payouts.first().unwrap().amount, dec!(29));
        assert_eq!(payouts.get(1).unwrap().amount, dec!(9));
    }

    #[test]
    fn power_hungry_machine_earns_zero_not_negative() {
        let machines = vec![machine("ada", 99.0, dec!(0)), machine("basil", 1.0, dec!(50))];
        let payouts = split_reward(dec!(50), &machines);
        let basil = payouts.iter().find(|p| p.owner.as_str() == "basil").unwrap();
        assert_eq!(basil.amount, Decimal::ZERO);
    }

    #[test]
    fn maintenance_machines_are_excluded() {
        let mut down = machine("basil", 50.0, dec!(0));
        down.status = MachineStatus::Maintenance;
        let machines = vec![machine("ada", 10.0, dec!(0)), down];
        let payouts = split_reward(dec!(10), &machines);
        assert_eq!(payouts.len(), 1);
        assert_eq!(payouts.first().unwrap().amount, dec!(10));
    }

    #[test]
    fn probability_is_capped() {
        let pool = MiningPool {
            total_hash_rate: 1_000_000.0,
            ..MiningPool::default()
        };
        let p = block_probability(&pool, &MiningConfig::default());
        assert!((p - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn calm_weather_never_faults() {
        let mut machines = vec![machine("ada", 10.0, dec!(0))];
        let mut dice = ScriptedDice::new(1).force(Gate::WeatherFault, true);
        let (faults, _) =
            apply_weather(&mut machines, Weather::Clear, &MiningConfig::default(), &mut dice);
        assert!(faults.is_empty());
        assert!(machines.first().unwrap().is_running());
    }

    #[test]
    fn storm_faults_and_maintenance_recovers() {
        let mut machines = vec![machine("ada", 10.0, dec!(0))];
        let config = MiningConfig::default();
        let mut dice = ScriptedDice::new(1)
            .force(Gate::WeatherFault, true)
            .force(Gate::MachineRecovery, true);
        let (faults, _) = apply_weather(&mut machines, Weather::Storm, &config, &mut dice);
        assert_eq!(faults.len(), 1);
        let (_, recoveries) = apply_weather(&mut machines, Weather::Clear, &config, &mut dice);
        assert_eq!(recoveries.len(), 1);
        assert!(machines.first().unwrap().is_running());
    }

    #[test]
    fn found_block_mints_and_conserves() {
        let mut snapshot = WorldSnapshot::default();
        snapshot.mining_machines = vec![machine("ada", 30.0, dec!(1)), machine("basil", 10.0, dec!(1))];
        let mut dice = ScriptedDice::new(3).force(Gate::BlockFound, true);

        let report =
            run_mining_pass(&mut snapshot, &MiningConfig::default(), &mut dice, 100).unwrap();
        let block = report.block.unwrap();

        assert_eq!(block.height, 1);
        assert_eq!(snapshot.economy.circulating_supply, block.minted());
        assert_eq!(snapshot.economy.balance(&AgentId::from("ada")), dec!(36.5));
        assert!(verify(snapshot.epoch, &snapshot.economy).is_balanced());
    }

    #[test]
    fn retarget_every_interval() {
        let mut snapshot = WorldSnapshot::default();
        snapshot.mining_machines = vec![machine("ada", 10.0, dec!(0))];
        snapshot.economy.mining_pool.blocks_mined = 99;
        let mut dice = ScriptedDice::new(3).force(Gate::BlockFound, true);

        let report =
            run_mining_pass(&mut snapshot, &MiningConfig::default(), &mut dice, 100).unwrap();

        assert!(report.block.unwrap().retargeted);
        let pool = &snapshot.economy.mining_pool;
        assert!((pool.difficulty - 0.55).abs() < 1e-9);
        assert_eq!(pool.block_reward, dec!(47.5));
    }
}
