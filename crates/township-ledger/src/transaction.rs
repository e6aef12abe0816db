//! Transaction builders and validation for the currency ledger.
//!
//! Provides a [`TransactionBuilder`] that checks every log entry names the
//! right endpoints for its [`TransactionKind`]: minted currency has no
//! payer, treasury receipts have no payee, and transfers need both.

use rust_decimal::Decimal;

use township_types::{AgentId, Transaction, TransactionId, TransactionKind};

use crate::LedgerError;

/// Builder for constructing validated [`Transaction`] values.
///
/// # Examples
///
/// ```
/// use township_ledger::TransactionBuilder;
/// use township_types::{AgentId, TransactionKind};
/// use rust_decimal::Decimal;
///
/// let tx = TransactionBuilder::new(1, TransactionKind::Transfer)
///     .from(AgentId::from("ada"))
///     .to(AgentId::from("basil"))
///     .amount(Decimal::new(5, 0))
///     .memo("lunch")
///     .build();
///
/// assert!(tx.is_ok());
/// ```
#[derive(Debug)]
pub struct TransactionBuilder {
    epoch: u64,
    kind: TransactionKind,
    from: Option<AgentId>,
    to: Option<AgentId>,
    amount: Option<Decimal>,
    memo: Option<String>,
}

impl TransactionBuilder {
    /// Start building a transaction for the given epoch and kind.
    pub const fn new(epoch: u64, kind: TransactionKind) -> Self {
        Self {
            epoch,
            kind,
            from: None,
            to: None,
            amount: None,
            memo: None,
        }
    }

    /// Set the paying agent.
    #[must_use]
    pub fn from(mut self, agent: AgentId) -> Self {
        self.from = Some(agent);
        self
    }

    /// Set the receiving agent.
    #[must_use]
    pub fn to(mut self, agent: AgentId) -> Self {
        self.to = Some(agent);
        self
    }

    /// Set the amount.
    #[must_use]
    pub const fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the memo.
    #[must_use]
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Validate and produce the [`Transaction`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the amount is missing, zero, or negative,
    /// or if the endpoints do not fit the kind.
    pub fn build(self) -> Result<Transaction, LedgerError> {
        let amount = self.amount.ok_or(LedgerError::MissingField("amount"))?;
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if amount.is_sign_negative() {
            return Err(LedgerError::NegativeAmount { amount });
        }

        validate_endpoints(self.kind, self.from.as_ref(), self.to.as_ref())?;

        Ok(Transaction {
            id: TransactionId::new(),
            epoch: self.epoch,
            kind: self.kind,
            from: self.from,
            to: self.to,
            amount,
            memo: self.memo.unwrap_or_default(),
        })
    }
}

fn validate_endpoints(
    kind: TransactionKind,
    from: Option<&AgentId>,
    to: Option<&AgentId>,
) -> Result<(), LedgerError> {
    let reason = match kind {
        TransactionKind::Payroll | TransactionKind::Rent | TransactionKind::MiningReward => {
            match (from, to) {
                (None, Some(_)) => return Ok(()),
                _ => "minted currency needs a payee and no payer",
            }
        }
        TransactionKind::Tax | TransactionKind::Purchase => match (from, to) {
            (Some(_), None) => return Ok(()),
            _ => "treasury receipts need a payer and no payee",
        },
        TransactionKind::Transfer => match (from, to) {
            (Some(a), Some(b)) if a == b => return Err(LedgerError::SelfTransfer(a.clone())),
            (Some(_), Some(_)) => return Ok(()),
            _ => "transfers need both a payer and a payee",
        },
    };
    Err(LedgerError::InvalidEndpoints { kind, reason })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn payroll_has_payee_only() {
        let tx = TransactionBuilder::new(3, TransactionKind::Payroll)
            .to(AgentId::from("ada"))
            .amount(Decimal::new(12, 0))
            .build()
            .unwrap();
        assert!(tx.from.is_none());
        assert_eq!(tx.epoch, 3);
    }

    #[test]
    fn zero_amount_rejected() {
        let result = TransactionBuilder::new(1, TransactionKind::Rent)
            .to(AgentId::from("ada"))
            .amount(Decimal::ZERO)
            .build();
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
    }

    #[test]
    fn negative_amount_rejected() {
        let result = TransactionBuilder::new(1, TransactionKind::Rent)
            .to(AgentId::from("ada"))
            .amount(Decimal::new(-1, 0))
            .build();
        assert!(matches!(result, Err(LedgerError::NegativeAmount { .. })));
    }

    #[test]
    fn missing_amount_rejected() {
        let result = TransactionBuilder::new(1, TransactionKind::Rent)
            .to(AgentId::from("ada"))
            .build();
        assert!(matches!(result, Err(LedgerError::MissingField("amount"))));
    }

    #[test]
    fn minted_payer_rejected() {
        let result = TransactionBuilder::new(1, TransactionKind::MiningReward)
            .from(AgentId::from("ada"))
            .to(AgentId::from("basil"))
            .amount(Decimal::ONE)
            .build();
        assert!(matches!(result, Err(LedgerError::InvalidEndpoints { .. })));
    }

    #[test]
    fn self_transfer_rejected() {
        let result = TransactionBuilder::new(1, TransactionKind::Transfer)
            .from(AgentId::from("ada"))
            .to(AgentId::from("ada"))
            .amount(Decimal::ONE)
            .build();
        assert!(matches!(result, Err(LedgerError::SelfTransfer(_))));
    }

    #[test]
    fn purchase_goes_to_treasury() {
        let tx = TransactionBuilder::new(1, TransactionKind::Purchase)
            .from(AgentId::from("ada"))
            .amount(Decimal::new(250, 0))
            .memo("pocket-rig")
            .build()
            .unwrap();
        assert!(tx.to.is_none());
        assert_eq!(tx.memo, "pocket-rig");
    }
}
