//! The currency ledger view used by every economic pass.
//!
//! [`Ledger`] borrows the snapshot's [`EconomyLedger`] for the duration of
//! a pass. It is the only code that touches balances, supply, or the
//! treasury, and it appends a validated [`Transaction`] for every movement.
//!
//! # Design
//!
//! - **Minting**: payroll, rent, and mining rewards raise supply and a
//!   balance by the same amount.
//! - **Moving**: transfers and purchases never change supply.
//! - **Bounded log**: the transaction log is trimmed after every append.
//! - **Precision**: all amounts use [`Decimal`] with checked arithmetic.

use rust_decimal::Decimal;
use tracing::debug;

use township_types::{AgentId, EconomyLedger, Transaction, TransactionKind, trim_to_recent};

use crate::{LedgerError, TransactionBuilder};

/// How a gross wage was split between the worker and the treasury.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WageSplit {
    /// Minted amount.
    pub gross: Decimal,
    /// Withheld into the treasury.
    pub tax: Decimal,
    /// Credited to the worker.
    pub net: Decimal,
}

/// Mutable view over the economy for one pass.
#[derive(Debug)]
pub struct Ledger<'a> {
    economy: &'a mut EconomyLedger,
    transaction_cap: usize,
}

impl<'a> Ledger<'a> {
    /// Wrap `economy`, keeping at most `transaction_cap` log entries.
    pub const fn new(economy: &'a mut EconomyLedger, transaction_cap: usize) -> Self {
        Self {
            economy,
            transaction_cap,
        }
    }

    /// Read access to the wrapped economy.
    pub const fn economy(&self) -> &EconomyLedger {
        self.economy
    }

    /// Balance of `agent`, zero when unknown.
    pub fn balance(&self, agent: &AgentId) -> Decimal {
        self.economy.balance(agent)
    }

    /// Seed a starting balance for a freshly synthesized world.
    ///
    /// Supply rises with the balance; no transaction is logged.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ArithmeticOverflow`] on overflow.
    pub fn endow(&mut self, agent: &AgentId, amount: Decimal) -> Result<(), LedgerError> {
        self.economy.circulating_supply =
            checked_add(self.economy.circulating_supply, amount, "circulating supply")?;
        self.credit(agent, amount)
    }

    /// Mint `amount` to `to` for a rent or mining reward.
    ///
    /// Rent counts toward GDP; mining rewards do not.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on a non-positive amount, a non-minting kind,
    /// or overflow.
    pub fn mint(
        &mut self,
        epoch: u64,
        kind: TransactionKind,
        to: &AgentId,
        amount: Decimal,
        memo: impl Into<String>,
    ) -> Result<Transaction, LedgerError> {
        let tx = TransactionBuilder::new(epoch, kind)
            .to(to.clone())
            .amount(amount)
            .memo(memo)
            .build()?;

        self.economy.circulating_supply = checked_add(
            self.economy.circulating_supply,
            amount,
            "circulating supply",
        )?;
        self.credit(to, amount)?;
        if kind == TransactionKind::Rent {
            self.economy.gdp = checked_add(self.economy.gdp, amount, "gdp")?;
        }
        Ok(self.record(tx))
    }

    /// Mint a gross wage, withholding tax into the treasury.
    ///
    /// Supply and GDP rise by the gross amount; the worker receives the net.
    /// The tax rate is read clamped to `[0, 1]`. A leg that comes to zero
    /// (all tax, or no tax) is not logged.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] on a non-positive wage or overflow.
    pub fn pay_wages(
        &mut self,
        epoch: u64,
        agent: &AgentId,
        gross: Decimal,
    ) -> Result<WageSplit, LedgerError> {
        if gross.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if gross.is_sign_negative() {
            return Err(LedgerError::NegativeAmount { amount: gross });
        }

        let rate = self.economy.tax_rate.clamp(Decimal::ZERO, Decimal::ONE);
        let tax = gross
            .checked_mul(rate)
            .ok_or(LedgerError::ArithmeticOverflow("payroll tax"))?
            .round_dp(4)
            .min(gross);
        let net = gross
            .checked_sub(tax)
            .ok_or(LedgerError::ArithmeticOverflow("net wage"))?;

        let payroll = if net > Decimal::ZERO {
            Some(
                TransactionBuilder::new(epoch, TransactionKind::Payroll)
                    .to(agent.clone())
                    .amount(net)
                    .memo("wages")
                    .build()?,
            )
        } else {
            None
        };

        self.economy.circulating_supply =
            checked_add(self.economy.circulating_supply, gross, "circulating supply")?;
        self.economy.gdp = checked_add(self.economy.gdp, gross, "gdp")?;
        self.credit(agent, net)?;
        if let Some(payroll) = payroll {
            self.record(payroll);
        }

        if tax > Decimal::ZERO {
            let withheld = TransactionBuilder::new(epoch, TransactionKind::Tax)
                .from(agent.clone())
                .amount(tax)
                .memo("payroll tax")
                .build()?;
            self.economy.treasury = checked_add(self.economy.treasury, tax, "treasury")?;
            self.record(withheld);
        }

        Ok(WageSplit { gross, tax, net })
    }

    /// Move `amount` from one agent to another.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] when `from` cannot cover
    /// the amount, or another [`LedgerError`] on invalid input.
    pub fn transfer(
        &mut self,
        epoch: u64,
        from: &AgentId,
        to: &AgentId,
        amount: Decimal,
        memo: impl Into<String>,
    ) -> Result<Transaction, LedgerError> {
        let tx = TransactionBuilder::new(epoch, TransactionKind::Transfer)
            .from(from.clone())
            .to(to.clone())
            .amount(amount)
            .memo(memo)
            .build()?;

        self.debit(from, amount)?;
        self.credit(to, amount)?;
        Ok(self.record(tx))
    }

    /// Pay `amount` from `agent` into the treasury for a purchase.
    ///
    /// The spend also feeds this tick's price demand.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] when the agent cannot
    /// cover the amount, or another [`LedgerError`] on invalid input.
    pub fn purchase(
        &mut self,
        epoch: u64,
        agent: &AgentId,
        amount: Decimal,
        memo: impl Into<String>,
    ) -> Result<Transaction, LedgerError> {
        let tx = TransactionBuilder::new(epoch, TransactionKind::Purchase)
            .from(agent.clone())
            .amount(amount)
            .memo(memo)
            .build()?;

        self.debit(agent, amount)?;
        self.economy.treasury = checked_add(self.economy.treasury, amount, "treasury")?;
        self.economy.spending_this_tick =
            checked_add(self.economy.spending_this_tick, amount, "spending")?;
        Ok(self.record(tx))
    }

    fn credit(&mut self, agent: &AgentId, amount: Decimal) -> Result<(), LedgerError> {
        let balance = self
            .economy
            .balances
            .entry(agent.clone())
            .or_insert(Decimal::ZERO);
        *balance = checked_add(*balance, amount, "balance")?;
        Ok(())
    }

    fn debit(&mut self, agent: &AgentId, amount: Decimal) -> Result<(), LedgerError> {
        let balance = self.economy.balance(agent);
        if balance < amount {
            return Err(LedgerError::InsufficientFunds {
                agent: agent.clone(),
                balance,
                required: amount,
            });
        }
        let remaining = balance
            .checked_sub(amount)
            .ok_or(LedgerError::ArithmeticOverflow("balance"))?;
        self.economy.balances.insert(agent.clone(), remaining);
        Ok(())
    }

    fn record(&mut self, tx: Transaction) -> Transaction {
        debug!(
            epoch = tx.epoch,
            kind = ?tx.kind,
            amount = %tx.amount,
            "Recorded transaction"
        );
        self.economy.transactions.push(tx.clone());
        trim_to_recent(&mut self.economy.transactions, self.transaction_cap);
        tx
    }
}

fn checked_add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, LedgerError> {
    a.checked_add(b).ok_or(LedgerError::ArithmeticOverflow(what))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ConservationResult;
    use crate::conservation::verify;

    fn agent(name: &str) -> AgentId {
        AgentId::from(name)
    }

    #[test]
    fn wages_split_tax_into_treasury() {
        let mut economy = EconomyLedger::default();
        let split = Ledger::new(&mut economy, 10)
            .pay_wages(1, &agent("ada"), Decimal::new(200, 0))
            .unwrap();

        assert_eq!(split.tax, Decimal::new(20, 0));
        assert_eq!(split.net, Decimal::new(180, 0));
        assert_eq!(economy.treasury, Decimal::new(20, 0));
        assert_eq!(economy.circulating_supply, Decimal::new(200, 0));
        assert_eq!(economy.gdp, Decimal::new(200, 0));
        assert_eq!(economy.transactions.len(), 2);
        assert_eq!(verify(1, &economy), ConservationResult::Balanced);
    }

    #[test]
    fn full_tax_withholds_everything() {
        let mut economy = EconomyLedger {
            tax_rate: Decimal::ONE,
            ..EconomyLedger::default()
        };
        let split = Ledger::new(&mut economy, 10)
            .pay_wages(1, &agent("ada"), Decimal::new(30, 0))
            .unwrap();

        assert_eq!(split.net, Decimal::ZERO);
        assert_eq!(split.tax, Decimal::new(30, 0));
        assert_eq!(economy.treasury, Decimal::new(30, 0));
        assert_eq!(economy.balance(&agent("ada")), Decimal::ZERO);
        assert_eq!(economy.transactions.len(), 1);
        assert_eq!(
            economy.transactions.first().unwrap().kind,
            TransactionKind::Tax
        );
        assert_eq!(verify(1, &economy), ConservationResult::Balanced);
    }

    #[test]
    fn out_of_range_tax_rate_is_clamped() {
        let mut economy = EconomyLedger {
            tax_rate: Decimal::new(15, 1),
            ..EconomyLedger::default()
        };
        let split = Ledger::new(&mut economy, 10)
            .pay_wages(1, &agent("ada"), Decimal::new(10, 0))
            .unwrap();
        assert_eq!(split.tax, Decimal::new(10, 0));
        assert_eq!(split.net, Decimal::ZERO);
        assert_eq!(verify(1, &economy), ConservationResult::Balanced);

        economy.tax_rate = Decimal::new(-5, 1);
        let split = Ledger::new(&mut economy, 10)
            .pay_wages(2, &agent("ada"), Decimal::new(10, 0))
            .unwrap();
        assert_eq!(split.tax, Decimal::ZERO);
        assert_eq!(split.net, Decimal::new(10, 0));
    }

    #[test]
    fn zero_wage_is_rejected() {
        let mut economy = EconomyLedger::default();
        let result = Ledger::new(&mut economy, 10).pay_wages(1, &agent("ada"), Decimal::ZERO);
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
        assert_eq!(economy.circulating_supply, Decimal::ZERO);
    }

    #[test]
    fn transfer_preserves_supply() {
        let mut economy = EconomyLedger::default();
        let mut ledger = Ledger::new(&mut economy, 10);
        ledger
            .mint(1, TransactionKind::Rent, &agent("ada"), Decimal::new(100, 0), "rent")
            .unwrap();
        ledger
            .transfer(1, &agent("ada"), &agent("basil"), Decimal::new(40, 0), "gift")
            .unwrap();

        assert_eq!(economy.balance(&agent("ada")), Decimal::new(60, 0));
        assert_eq!(economy.balance(&agent("basil")), Decimal::new(40, 0));
        assert_eq!(economy.circulating_supply, Decimal::new(100, 0));
        assert_eq!(verify(1, &economy), ConservationResult::Balanced);
    }

    #[test]
    fn overdraft_is_rejected_without_mutation() {
        let mut economy = EconomyLedger::default();
        let result = Ledger::new(&mut economy, 10).transfer(
            1,
            &agent("ada"),
            &agent("basil"),
            Decimal::ONE,
            "gift",
        );
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert!(economy.balances.is_empty());
        assert!(economy.transactions.is_empty());
    }

    #[test]
    fn purchase_pays_treasury_and_feeds_demand() {
        let mut economy = EconomyLedger::default();
        let mut ledger = Ledger::new(&mut economy, 10);
        ledger
            .mint(1, TransactionKind::MiningReward, &agent("ada"), Decimal::new(300, 0), "block")
            .unwrap();
        ledger
            .purchase(1, &agent("ada"), Decimal::new(250, 0), "pocket-rig")
            .unwrap();

        assert_eq!(economy.balance(&agent("ada")), Decimal::new(50, 0));
        assert_eq!(economy.treasury, Decimal::new(250, 0));
        assert_eq!(economy.spending_this_tick, Decimal::new(250, 0));
        assert_eq!(economy.gdp, Decimal::ZERO);
        assert_eq!(verify(1, &economy), ConservationResult::Balanced);
    }

    #[test]
    fn transaction_log_is_bounded() {
        let mut economy = EconomyLedger::default();
        let mut ledger = Ledger::new(&mut economy, 3);
        for epoch in 0..10 {
            ledger
                .mint(epoch, TransactionKind::Rent, &agent("ada"), Decimal::ONE, "rent")
                .unwrap();
        }
        assert_eq!(economy.transactions.len(), 3);
        assert_eq!(economy.transactions.first().unwrap().epoch, 7);
    }
}
