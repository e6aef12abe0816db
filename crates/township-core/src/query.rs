//! Read-only views over a snapshot for reporting layers.

use rust_decimal::Decimal;
use serde::Serialize;

use township_types::{AgentId, Job, MiningMachine, Property, Transaction, WorldSnapshot};

/// Transactions included in an [`AgentEconomicSummary`] by default.
pub const RECENT_TRANSACTIONS: usize = 20;

/// One agent's financial position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentEconomicSummary {
    /// The agent.
    pub agent: AgentId,
    /// Current balance.
    pub balance: Decimal,
    /// Machines the agent owns.
    pub machines: Vec<MiningMachine>,
    /// Properties the agent owns.
    pub properties: Vec<Property>,
    /// Current job, if any.
    pub job: Option<Job>,
    /// Most recent transactions touching the agent, newest last.
    pub recent_transactions: Vec<Transaction>,
}

/// Build the economic summary for `agent`, keeping up to `recent`
/// transactions.
pub fn economic_summary(
    snapshot: &WorldSnapshot,
    agent: &AgentId,
    recent: usize,
) -> AgentEconomicSummary {
    let touching: Vec<&Transaction> = snapshot
        .economy
        .transactions
        .iter()
        .filter(|tx| tx.from.as_ref() == Some(agent) || tx.to.as_ref() == Some(agent))
        .collect();
    let skip = touching.len().saturating_sub(recent);

    AgentEconomicSummary {
        agent: agent.clone(),
        balance: snapshot.economy.balance(agent),
        machines: snapshot.machines_of(agent).cloned().collect(),
        properties: snapshot.properties_of(agent).cloned().collect(),
        job: snapshot.jobs.get(agent).cloned(),
        recent_transactions: touching.into_iter().skip(skip).cloned().collect(),
    }
}
