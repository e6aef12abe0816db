//! The engine: one object owning the store, the randomness source, the
//! roster, and the scheduler handle.
//!
//! Every mutation of the persisted world goes through a single async write
//! lock. A tick holds it for its whole load, mutate, save cycle, and so does
//! each administrative purchase, so the two can never interleave and a
//! purchase is never lost to a concurrent tick.
//!
//! The scheduler fires one tick immediately on [`Engine::start`], then one
//! per configured interval. A failed tick is logged and the next one still
//! runs. [`Engine::stop`] lets an in-flight tick finish before returning.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use township_agents::{AgentError, acquire_machine, acquire_property};
use township_types::{AgentId, Dice, Event, MiningMachine, Property, SeededDice, WorldSnapshot};

use crate::config::SimulationConfig;
use crate::events::recent_events;
use crate::query::{AgentEconomicSummary, RECENT_TRANSACTIONS, economic_summary};
use crate::roster::{RosterSource, SnapshotRoster};
use crate::store::{StoreError, WorldStore};
use crate::tick::{TickError, TickSummary, run_tick};

/// Errors from the administrative write surface.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    /// The request was rejected before anything changed.
    #[error("{source}")]
    Validation {
        /// Why the purchase was refused.
        #[from]
        source: AgentError,
    },

    /// The world could not be loaded or the result could not be saved.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// A purchase outcome shaped for callers that report success and a
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseReceipt<T> {
    /// Whether the purchase went through.
    pub success: bool,
    /// What happened.
    pub message: String,
    /// The new asset on success.
    pub asset: Option<T>,
}

impl<T> From<Result<T, PurchaseError>> for PurchaseReceipt<T> {
    fn from(result: Result<T, PurchaseError>) -> Self {
        match result {
            Ok(asset) => Self {
                success: true,
                message: String::from("Purchase complete"),
                asset: Some(asset),
            },
            Err(e) => Self {
                success: false,
                message: e.to_string(),
                asset: None,
            },
        }
    }
}

/// State guarded by the write lock.
struct Writer {
    dice: Box<dyn Dice + Send>,
    roster: Box<dyn RosterSource>,
}

struct Inner {
    config: SimulationConfig,
    store: WorldStore,
    writer: Mutex<Writer>,
}

struct Scheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// The simulation engine.
pub struct Engine {
    inner: Arc<Inner>,
    scheduler: Mutex<Option<Scheduler>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("snapshot_path", &self.inner.store.path())
            .field("tick_interval_ms", &self.inner.config.world.tick_interval_ms)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine with explicit roster and randomness sources.
    pub fn new(
        config: SimulationConfig,
        roster: Box<dyn RosterSource>,
        dice: Box<dyn Dice + Send>,
    ) -> Self {
        let store = WorldStore::new(config.world.snapshot_path.clone());
        Self {
            inner: Arc::new(Inner {
                config,
                store,
                writer: Mutex::new(Writer { dice, roster }),
            }),
            scheduler: Mutex::new(None),
        }
    }

    /// Create an engine that ticks every resident, seeded from
    /// `world.seed` or from entropy.
    pub fn from_config(config: SimulationConfig) -> Self {
        let dice: Box<dyn Dice + Send> = match config.world.seed {
            Some(seed) => Box::new(SeededDice::from_seed(seed)),
            None => Box::new(SeededDice::from_entropy()),
        };
        Self::new(config, Box::new(SnapshotRoster), dice)
    }

    /// The configuration the engine runs with.
    pub fn config(&self) -> &SimulationConfig {
        &self.inner.config
    }

    /// Start the scheduler. The first tick fires immediately.
    ///
    /// Calling `start` on a running engine does nothing.
    pub async fn start(&self) {
        let mut scheduler = self.scheduler.lock().await;
        if scheduler.is_some() {
            return;
        }

        let (shutdown, mut stopped) = watch::channel(false);
        let inner = Arc::clone(&self.inner);
        let interval_ms = inner.config.world.tick_interval_ms.max(1);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = inner.tick().await {
                            warn!(error = %e, "Tick aborted");
                        }
                    }
                    _ = stopped.changed() => break,
                }
            }
        });

        info!(interval_ms, path = %self.inner.store.path().display(), "Scheduler started");
        *scheduler = Some(Scheduler { shutdown, handle });
    }

    /// Stop the scheduler, waiting for any in-flight tick to finish.
    pub async fn stop(&self) {
        let Some(scheduler) = self.scheduler.lock().await.take() else {
            return;
        };
        let _ = scheduler.shutdown.send(true);
        if let Err(e) = scheduler.handle.await {
            warn!(error = %e, "Scheduler task ended abnormally");
        }
        info!("Scheduler stopped");
    }

    /// Whether the scheduler is running.
    pub async fn is_running(&self) -> bool {
        self.scheduler.lock().await.is_some()
    }

    /// Run exactly one tick now, outside the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the tick aborts.
    pub async fn run_tick_once(&self) -> Result<TickSummary, TickError> {
        self.inner.tick().await
    }

    /// Buy a mining machine from the catalog for `agent` and persist it.
    ///
    /// # Errors
    ///
    /// Returns [`PurchaseError::Validation`] for an unknown machine type or
    /// insufficient funds, with nothing changed, or
    /// [`PurchaseError::Store`] if the world cannot be loaded or saved.
    pub async fn buy_mining_machine(
        &self,
        agent: &AgentId,
        machine_type: &str,
    ) -> Result<MiningMachine, PurchaseError> {
        let _writer = self.inner.writer.lock().await;
        let mut snapshot = self.inner.store.load().await?;
        let machine = acquire_machine(
            &mut snapshot,
            agent,
            machine_type,
            self.inner.config.retention.transactions,
        )?;
        self.inner.store.save(&snapshot).await?;
        info!(agent = %agent, kind = machine_type, "Machine purchased");
        Ok(machine)
    }

    /// Buy a property from the catalog for `agent` and persist it.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::buy_mining_machine`].
    pub async fn buy_property(
        &self,
        agent: &AgentId,
        property_type: &str,
        name: &str,
    ) -> Result<Property, PurchaseError> {
        let _writer = self.inner.writer.lock().await;
        let mut snapshot = self.inner.store.load().await?;
        let property = acquire_property(
            &mut snapshot,
            agent,
            property_type,
            name,
            self.inner.config.retention.transactions,
        )?;
        self.inner.store.save(&snapshot).await?;
        info!(agent = %agent, kind = property_type, name, "Property purchased");
        Ok(property)
    }

    /// The full current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if no world can be loaded or synthesized.
    pub async fn snapshot(&self) -> Result<WorldSnapshot, StoreError> {
        let _writer = self.inner.writer.lock().await;
        self.inner.store.load().await
    }

    /// The `count` most recent events, newest last.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if no world can be loaded or synthesized.
    pub async fn recent_events(&self, count: usize) -> Result<Vec<Event>, StoreError> {
        Ok(recent_events(&self.snapshot().await?, count))
    }

    /// The economic summary for `agent`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if no world can be loaded or synthesized.
    pub async fn agent_summary(&self, agent: &AgentId) -> Result<AgentEconomicSummary, StoreError> {
        Ok(economic_summary(&self.snapshot().await?, agent, RECENT_TRANSACTIONS))
    }
}

impl Inner {
    /// One load, tick, save cycle under the write lock.
    ///
    /// A failed save is logged and swallowed; the next tick retries a full
    /// overwrite.
    async fn tick(&self) -> Result<TickSummary, TickError> {
        let mut writer = self.writer.lock().await;
        let mut snapshot = self.store.load().await?;
        let roster = writer.roster.roster(&snapshot)?;
        let summary = run_tick(&mut snapshot, &self.config, &roster, writer.dice.as_mut())?;
        if let Err(e) = self.store.save(&snapshot).await {
            warn!(epoch = summary.epoch, error = %e, "Failed to persist snapshot");
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use rust_decimal::Decimal;
    use township_world::STARTING_BALANCE;

    use super::*;

    fn engine(name: &str) -> (Engine, PathBuf) {
        let path = std::env::temp_dir()
            .join(format!("township-engine-{name}-{}", std::process::id()))
            .join("world.json");
        let _ = std::fs::remove_file(&path);
        let mut config = SimulationConfig::default();
        config.world.snapshot_path = path.clone();
        config.world.seed = Some(11);
        config.world.tick_interval_ms = 3_600_000;
        (Engine::from_config(config), path)
    }

    #[tokio::test]
    async fn manual_ticks_advance_and_persist() {
        let (engine, path) = engine("manual");

        let first = engine.run_tick_once().await.unwrap();
        let second = engine.run_tick_once().await.unwrap();

        assert_eq!(first.epoch, 0);
        assert_eq!(second.epoch, 1);
        assert!(path.exists());
        let snapshot = engine.snapshot().await.unwrap();
        assert_eq!(snapshot.epoch, 2);
        assert_eq!(snapshot.version, 2);
    }

    #[tokio::test]
    async fn purchase_is_persisted() {
        let (engine, _path) = engine("purchase");
        let ada = AgentId::from("ada");

        let machine = engine.buy_mining_machine(&ada, "pocket-rig").await.unwrap();

        assert_eq!(machine.owner(), &ada);
        let summary = engine.agent_summary(&ada).await.unwrap();
        assert_eq!(summary.balance, STARTING_BALANCE - Decimal::new(250, 0));
        assert_eq!(summary.machines.len(), 2);
    }

    #[tokio::test]
    async fn unaffordable_purchase_changes_nothing() {
        let (engine, _path) = engine("broke");
        let ada = AgentId::from("ada");
        let before = engine.snapshot().await.unwrap();

        let result = engine.buy_property(&ada, "tower-loft", "Skyline").await;

        assert!(matches!(result, Err(PurchaseError::Validation { .. })));
        assert_eq!(engine.snapshot().await.unwrap(), before);
    }

    #[tokio::test]
    async fn unknown_machine_is_a_failed_receipt() {
        let (engine, _path) = engine("unknown");
        let ada = AgentId::from("ada");

        let receipt: PurchaseReceipt<MiningMachine> =
            engine.buy_mining_machine(&ada, "warp-core").await.into();

        assert!(!receipt.success);
        assert!(receipt.asset.is_none());
        assert!(receipt.message.contains("warp-core"));
    }

    #[tokio::test]
    async fn scheduler_ticks_immediately_and_stops() {
        let (engine, _path) = engine("scheduler");

        engine.start().await;
        assert!(engine.is_running().await);

        let mut ticked = false;
        for _ in 0..100 {
            if engine.snapshot().await.unwrap().epoch >= 1 {
                ticked = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        engine.stop().await;

        assert!(ticked);
        assert!(!engine.is_running().await);
    }

    #[tokio::test]
    async fn recent_events_include_the_narrative() {
        let (engine, _path) = engine("events");
        engine.run_tick_once().await.unwrap();

        let events = engine.recent_events(5).await.unwrap();

        assert!(!events.is_empty());
        assert!(events.iter().any(|event| event.title == "Epoch 0"));
    }
}
