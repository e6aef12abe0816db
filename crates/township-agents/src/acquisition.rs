//! Buying assets from the static catalog.
//!
//! Both purchase paths validate everything up front (catalog key, balance)
//! and only then pay the treasury and append the asset, so a failed
//! purchase leaves the world untouched.

use township_ledger::Ledger;
use township_types::{AgentId, MiningMachine, Property, PropertyId, WorldSnapshot};
use township_world::{find_machine, find_property};

use crate::error::AgentError;

fn ensure_affordable(
    snapshot: &WorldSnapshot,
    agent: &AgentId,
    cost: rust_decimal::Decimal,
) -> Result<(), AgentError> {
    let balance = snapshot.economy.balance(agent);
    if balance < cost {
        return Err(AgentError::InsufficientFunds {
            agent: agent.clone(),
            balance,
            required: cost,
        });
    }
    Ok(())
}

/// Buy the mining machine `key` for `agent`.
///
/// # Errors
///
/// Returns [`AgentError::UnknownCatalogEntry`] or
/// [`AgentError::InsufficientFunds`] without mutating the world, or
/// [`AgentError::Ledger`] if payment fails.
pub fn acquire_machine(
    snapshot: &mut WorldSnapshot,
    agent: &AgentId,
    key: &str,
    transaction_cap: usize,
) -> Result<MiningMachine, AgentError> {
    let spec = find_machine(key).ok_or_else(|| AgentError::UnknownCatalogEntry {
        category: "mining machine",
        key: key.to_owned(),
    })?;
    ensure_affordable(snapshot, agent, spec.cost)?;

    let epoch = snapshot.epoch;
    Ledger::new(&mut snapshot.economy, transaction_cap).purchase(
        epoch,
        agent,
        spec.cost,
        format!("bought a {}", spec.name),
    )?;
    let machine = MiningMachine::new(agent.clone(), spec.key, spec.hash_rate, spec.power_cost, epoch);
    snapshot.mining_machines.push(machine.clone());
    Ok(machine)
}

/// Buy the property `key` for `agent`, naming it `name`.
///
/// # Errors
///
/// Returns [`AgentError::UnknownCatalogEntry`] or
/// [`AgentError::InsufficientFunds`] without mutating the world, or
/// [`AgentError::Ledger`] if payment fails.
pub fn acquire_property(
    snapshot: &mut WorldSnapshot,
    agent: &AgentId,
    key: &str,
    name: &str,
    transaction_cap: usize,
) -> Result<Property, AgentError> {
    let spec = find_property(key).ok_or_else(|| AgentError::UnknownCatalogEntry {
        category: "property",
        key: key.to_owned(),
    })?;
    ensure_affordable(snapshot, agent, spec.cost)?;

    let epoch = snapshot.epoch;
    Ledger::new(&mut snapshot.economy, transaction_cap).purchase(
        epoch,
        agent,
        spec.cost,
        format!("bought {name}"),
    )?;
    let property = Property {
        id: PropertyId::new(),
        owner: agent.clone(),
        kind: spec.key.to_owned(),
        name: name.to_owned(),
        value: spec.cost,
        rental_income: spec.rental_income,
        purchased_epoch: epoch,
    };
    snapshot.properties.push(property.clone());
    Ok(property)
}
