//! Economy passes: payroll, rent, flavor transfers, auto-investment.
//!
//! Payroll and rent are the only agent-side minting flows; both go through
//! the [`Ledger`] so supply and balances move together. Price discovery
//! runs last so it sees this tick's purchases.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, info};

use township_ledger::pricing::{PricingConfig, discover_price, to_decimal};
use township_ledger::{Ledger, PriceMove};
use township_types::{
    AgentId, Dice, Event, EventKind, Gate, Retention, TransactionKind, WorldSnapshot,
};
use township_world::{CatalogItem, most_expensive_affordable};

use crate::acquisition::{acquire_machine, acquire_property};
use crate::config::EconomyConfig;
use crate::error::AgentError;

/// Wage for one tick: `floor(salary * performance / ticks_per_day)`.
///
/// Shared by labor (which reports it) and payroll (which mints it).
pub fn per_tick_wage(salary: Decimal, performance: f64, ticks_per_day: u32) -> Decimal {
    let performance = to_decimal(performance.max(0.0), 6).unwrap_or(Decimal::ZERO);
    salary
        .checked_mul(performance)
        .and_then(|gross| gross.checked_div(Decimal::from(ticks_per_day.max(1))))
        .map_or(Decimal::ZERO, |wage| wage.floor())
}

/// Totals from one economy pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EconomyReport {
    /// Gross wages minted.
    pub wages: Decimal,
    /// Tax withheld into the treasury.
    pub tax: Decimal,
    /// Rent minted.
    pub rent: Decimal,
    /// Flavor transfer, if one happened.
    pub transfer: Option<(AgentId, AgentId, Decimal)>,
    /// Assets bought by auto-investing agents, as `(agent, catalog key)`.
    pub investments: Vec<(AgentId, String)>,
    /// The price move, once discovery has run.
    pub price: Option<PriceMove>,
}

impl EconomyReport {
    /// Total currency minted by this pass.
    pub fn minted(&self) -> Decimal {
        self.wages.checked_add(self.rent).unwrap_or(self.wages)
    }
}

/// Mint every job's wage for the tick.
///
/// # Errors
///
/// Returns [`AgentError::Ledger`] if minting fails.
pub fn run_payroll(
    snapshot: &mut WorldSnapshot,
    config: &EconomyConfig,
    report: &mut EconomyReport,
    transaction_cap: usize,
) -> Result<(), AgentError> {
    let epoch = snapshot.epoch;
    let wages: Vec<(AgentId, Decimal)> = snapshot
        .jobs
        .values()
        .map(|job| {
            (
                job.agent_id.clone(),
                per_tick_wage(job.salary, job.performance, config.ticks_per_day),
            )
        })
        .filter(|(_, gross)| *gross > Decimal::ZERO)
        .collect();

    let mut ledger = Ledger::new(&mut snapshot.economy, transaction_cap);
    for (agent, gross) in wages {
        let split = ledger.pay_wages(epoch, &agent, gross)?;
        report.wages = add(report.wages, split.gross, "payroll total")?;
        report.tax = add(report.tax, split.tax, "tax total")?;
    }
    Ok(())
}

/// Mint rent to property owners and drift property values.
///
/// # Errors
///
/// Returns [`AgentError::Ledger`] if minting fails.
pub fn run_rent(
    snapshot: &mut WorldSnapshot,
    config: &EconomyConfig,
    dice: &mut dyn Dice,
    report: &mut EconomyReport,
    transaction_cap: usize,
) -> Result<(), AgentError> {
    let epoch = snapshot.epoch;
    let divisor = Decimal::from(config.ticks_per_day.max(1));
    let mut ledger = Ledger::new(&mut snapshot.economy, transaction_cap);

    for property in &mut snapshot.properties {
        let income = property
            .rental_income
            .checked_div(divisor)
            .unwrap_or(Decimal::ZERO)
            .round_dp(4);
        if income > Decimal::ZERO {
            ledger.mint(
                epoch,
                TransactionKind::Rent,
                &property.owner,
                income,
                format!("rent from {}", property.name),
            )?;
            report.rent = add(report.rent, income, "rent total")?;
        }

        let drift = dice.between(-config.property_drift, config.property_drift);
        let factor = to_decimal(1.0 + drift, 6).unwrap_or(Decimal::ONE);
        property.value = property
            .value
            .checked_mul(factor)
            .unwrap_or(property.value)
            .round_dp(2);
    }
    Ok(())
}

/// Maybe move a small random amount between two solvent agents.
///
/// # Errors
///
/// Returns [`AgentError::Ledger`] if the transfer fails.
pub fn run_flavor_transfer(
    snapshot: &mut WorldSnapshot,
    config: &EconomyConfig,
    dice: &mut dyn Dice,
    report: &mut EconomyReport,
    transaction_cap: usize,
) -> Result<(), AgentError> {
    if !dice.gate(Gate::FlavorTransfer, config.transfer_probability) {
        return Ok(());
    }

    let floor = Decimal::from(config.transfer_min_balance);
    let solvent: Vec<AgentId> = snapshot
        .economy
        .balances
        .iter()
        .filter(|(_, balance)| **balance >= floor)
        .map(|(agent, _)| agent.clone())
        .collect();
    if solvent.len() < 2 {
        return Ok(());
    }

    let Some(from_index) = dice.index(solvent.len()) else {
        return Ok(());
    };
    // Pick the payee among the others by skipping the payer's slot.
    let Some(offset) = dice.index(solvent.len().saturating_sub(1)) else {
        return Ok(());
    };
    let to_index = if offset >= from_index {
        offset.saturating_add(1)
    } else {
        offset
    };
    let (Some(from), Some(to)) = (solvent.get(from_index), solvent.get(to_index)) else {
        return Ok(());
    };

    let balance = snapshot.economy.balance(from);
    let tenth = balance
        .checked_div(Decimal::TEN)
        .unwrap_or(Decimal::ZERO)
        .floor();
    let cap = tenth.min(Decimal::from(config.transfer_max_amount));
    let cap_units = cap.to_u64().unwrap_or(1).max(1);
    let amount = Decimal::from(dice.below(cap_units).saturating_add(1));

    Ledger::new(&mut snapshot.economy, transaction_cap).transfer(
        snapshot.epoch,
        from,
        to,
        amount,
        "friendly transfer",
    )?;
    debug!(from = %from, to = %to, amount = %amount, "Flavor transfer");
    report.transfer = Some((from.clone(), to.clone(), amount));
    Ok(())
}

/// Let wealthy agents buy the priciest asset they can afford.
///
/// # Errors
///
/// Returns [`AgentError`] if an acquisition fails after validation.
pub fn run_auto_invest(
    snapshot: &mut WorldSnapshot,
    config: &EconomyConfig,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
    report: &mut EconomyReport,
    transaction_cap: usize,
) -> Result<(), AgentError> {
    let threshold = Decimal::from(config.invest_threshold);
    let wealthy: Vec<(AgentId, Decimal)> = snapshot
        .economy
        .balances
        .iter()
        .filter(|(_, balance)| **balance >= threshold)
        .map(|(agent, balance)| (agent.clone(), *balance))
        .collect();

    for (agent, balance) in wealthy {
        if !dice.gate(Gate::AutoInvest, config.invest_probability) {
            continue;
        }
        let Some(item) = most_expensive_affordable(balance) else {
            continue;
        };
        let description = match item {
            CatalogItem::Machine(spec) => {
                acquire_machine(snapshot, &agent, spec.key, transaction_cap)?;
                format!("{agent} bought a {} for {}.", spec.name, spec.cost)
            }
            CatalogItem::Property(spec) => {
                let name = format!("{agent}'s {}", spec.name);
                acquire_property(snapshot, &agent, spec.key, &name, transaction_cap)?;
                format!("{agent} bought {name} for {}.", spec.cost)
            }
        };
        info!(agent = %agent, item = item.key(), "Auto-investment");
        events.push(Event::new(
            snapshot.epoch,
            EventKind::Economy,
            "A savvy investment",
            description,
            vec![agent.clone()],
        ));
        report.investments.push((agent, item.key().to_owned()));
    }
    Ok(())
}

/// Run the whole economy pass in order: payroll, rent, transfer,
/// auto-investment, price discovery.
///
/// # Errors
///
/// Returns [`AgentError`] if any ledger operation fails.
pub fn run_economy_pass(
    snapshot: &mut WorldSnapshot,
    config: &EconomyConfig,
    pricing: &PricingConfig,
    retention: &Retention,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
) -> Result<EconomyReport, AgentError> {
    let mut report = EconomyReport::default();
    let cap = retention.transactions;

    run_payroll(snapshot, config, &mut report, cap)?;
    run_rent(snapshot, config, dice, &mut report, cap)?;
    run_flavor_transfer(snapshot, config, dice, &mut report, cap)?;
    run_auto_invest(snapshot, config, dice, events, &mut report, cap)?;

    let mood = snapshot.ambient.mood;
    let epoch = snapshot.epoch;
    report.price = Some(discover_price(
        epoch,
        &mut snapshot.economy,
        mood,
        pricing,
        dice,
        retention.price_history,
    ));

    debug!(
        epoch,
        wages = %report.wages,
        rent = %report.rent,
        tax = %report.tax,
        "Economy pass complete"
    );
    Ok(report)
}

fn add(a: Decimal, b: Decimal, context: &str) -> Result<Decimal, AgentError> {
    a.checked_add(b).ok_or_else(|| AgentError::ArithmeticOverflow {
        context: context.to_owned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use township_ledger::conservation::verify;
    use township_types::{Property, PropertyId, ScriptedDice, SeededDice};
    use township_world::create_starting_world;

    #[test]
    fn wage_floors_fractional_units() {
        assert_eq!(per_tick_wage(dec!(240), 0.8, 24), dec!(8));
        assert_eq!(per_tick_wage(dec!(1800), 0.3, 24), dec!(22));
        assert_eq!(per_tick_wage(dec!(1800), -1.0, 24), Decimal::ZERO);
    }

    #[test]
    fn payroll_mints_and_taxes() {
        let mut world = create_starting_world().unwrap();
        let supply_before = world.economy.circulating_supply;
        let mut report = EconomyReport::default();
        run_payroll(&mut world, &EconomyConfig::default(), &mut report, 500).unwrap();

        assert!(report.wages > Decimal::ZERO);
        assert_eq!(
            world.economy.circulating_supply,
            supply_before.checked_add(report.wages).unwrap()
        );
        assert_eq!(world.economy.treasury, report.tax);
        assert!(verify(world.epoch, &world.economy).is_balanced());
    }

    #[test]
    fn rent_mints_a_twenty_fourth_of_daily_income() {
        let mut world = create_starting_world().unwrap();
        world.properties.push(Property {
            id: PropertyId::new(),
            owner: AgentId::from("ada"),
            kind: String::from("studio"),
            name: String::from("Ada's Studio"),
            value: dec!(800),
            rental_income: dec!(48),
            purchased_epoch: 0,
        });
        let mut report = EconomyReport::default();
        let mut dice = SeededDice::from_seed(1);
        run_rent(&mut world, &EconomyConfig::default(), &mut dice, &mut report, 500).unwrap();

        assert_eq!(report.rent, dec!(2));
        let value = world.properties.first().unwrap().value;
        assert!(value >= dec!(799.2) && value <= dec!(800.8));
        assert!(verify(world.epoch, &world.economy).is_balanced());
    }

    #[test]
    fn flavor_transfer_is_bounded() {
        let mut world = create_starting_world().unwrap();
        let mut dice = ScriptedDice::new(9).force(Gate::FlavorTransfer, true);
        let mut report = EconomyReport::default();
        run_flavor_transfer(&mut world, &EconomyConfig::default(), &mut dice, &mut report, 500)
            .unwrap();

        let (from, to, amount) = report.transfer.unwrap();
        assert_ne!(from, to);
        assert!(amount >= dec!(1) && amount <= dec!(50));
        assert!(verify(world.epoch, &world.economy).is_balanced());
    }

    #[test]
    fn auto_invest_buys_priciest_affordable() {
        let mut world = create_starting_world().unwrap();
        let ada = AgentId::from("ada");
        Ledger::new(&mut world.economy, 500)
            .mint(0, TransactionKind::Rent, &ada, dec!(2500), "windfall")
            .unwrap();
        let mut dice = ScriptedDice::new(2).force(Gate::AutoInvest, true);
        let mut events = Vec::new();
        let mut report = EconomyReport::default();

        run_auto_invest(
            &mut world,
            &EconomyConfig::default(),
            &mut dice,
            &mut events,
            &mut report,
            500,
        )
        .unwrap();

        // 3000 on hand: the quantum rig.
        assert_eq!(report.investments, vec![(ada.clone(), String::from("quantum-rig"))]);
        assert_eq!(world.economy.balance(&ada), Decimal::ZERO);
        assert_eq!(events.len(), 1);
        assert!(verify(world.epoch, &world.economy).is_balanced());
    }

    #[test]
    fn full_pass_conserves_currency() {
        let mut world = create_starting_world().unwrap();
        let mut dice = SeededDice::from_seed(77);
        let mut events = Vec::new();
        for epoch in 0..30 {
            world.epoch = epoch;
            run_economy_pass(
                &mut world,
                &EconomyConfig::default(),
                &PricingConfig::default(),
                &Retention::default(),
                &mut dice,
                &mut events,
            )
            .unwrap();
            assert!(verify(epoch, &world.economy).is_balanced());
        }
        assert_eq!(world.economy.price_history.len(), 30);
    }
}
