//! Injectable randomness for every probabilistic branch in the simulation.
//!
//! Passes never touch a global RNG. They draw from a [`Dice`] handed in by
//! the tick orchestrator, and every yes/no branch is a named [`Gate`] so a
//! test can pin individual outcomes with [`ScriptedDice`] while the rest of
//! the tick stays random.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Every named probabilistic branch in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gate {
    /// Agent drifts into dreaming during the dream cycle.
    Dream,
    /// Agent drifts into dreaming during night processing.
    NightProcessing,
    /// Agent with enough break credits is granted a break.
    Break,
    /// Long-serving, well-rated agent is granted a break.
    LongServiceBreak,
    /// Serendipitous social connection for an isolated agent.
    SocialSerendipity,
    /// Flavor transfer between two agents.
    FlavorTransfer,
    /// Wealthy agent auto-invests.
    AutoInvest,
    /// The pool finds a block.
    BlockFound,
    /// Adverse weather faults a running machine.
    WeatherFault,
    /// A machine in maintenance comes back online.
    MachineRecovery,
    /// A single agent proposes to a love interest.
    Matchmaking,
    /// A dating couple gets engaged.
    Engagement,
    /// An engaged couple marries.
    Marriage,
    /// A married couple has a child.
    Child,
    /// A new community group is founded.
    GroupFounding,
    /// A community group meets.
    GroupMeeting,
    /// A community group recruits.
    GroupRecruit,
    /// A community project is started.
    ProjectStart,
    /// A flagged agent receives therapy.
    Therapy,
    /// The union resolves an open grievance.
    GrievanceResolution,
    /// The union intervenes for a struggling agent.
    UnionIntervention,
    /// A candidate is promoted.
    Promotion,
    /// A candidate is demoted.
    Demotion,
    /// A seasonal event begins.
    SeasonalEvent,
}

/// Source of randomness for simulation passes.
///
/// Implementors provide [`Dice::unit`]; everything else is derived from it
/// unless overridden.
pub trait Dice {
    /// Uniform sample in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Pass `gate` with the given probability.
    fn gate(&mut self, gate: Gate, probability: f64) -> bool {
        let _ = gate;
        self.unit() < probability
    }

    /// Uniform sample in `[low, high)`.
    fn between(&mut self, low: f64, high: f64) -> f64 {
        (high - low).mul_add(self.unit(), low)
    }

    /// Uniform index into a collection of `len` elements.
    fn index(&mut self, len: usize) -> Option<usize>;

    /// Uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u64) -> u64;
}

/// Pick a random element of `items`.
pub fn choose<'a, T>(dice: &mut dyn Dice, items: &'a [T]) -> Option<&'a T> {
    dice.index(items.len()).and_then(|i| items.get(i))
}

/// [`Dice`] backed by a seedable standard RNG.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    /// Deterministic dice for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Dice seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Dice for SeededDice {
    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.random_range(0..len))
        }
    }

    fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            0
        } else {
            self.rng.random_range(0..bound)
        }
    }
}

/// [`Dice`] with selected gates pinned open or shut.
///
/// Unpinned gates and every non-gate draw fall through to seeded dice.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    inner: SeededDice,
    forced: BTreeMap<Gate, bool>,
}

impl ScriptedDice {
    /// Scripted dice falling back to [`SeededDice::from_seed`].
    pub fn new(seed: u64) -> Self {
        Self {
            inner: SeededDice::from_seed(seed),
            forced: BTreeMap::new(),
        }
    }

    /// Pin `gate` to always return `outcome`.
    #[must_use]
    pub fn force(mut self, gate: Gate, outcome: bool) -> Self {
        self.forced.insert(gate, outcome);
        self
    }

    /// Pin every gate in `gates` shut.
    #[must_use]
    pub fn close_all(mut self, gates: &[Gate]) -> Self {
        for gate in gates {
            self.forced.insert(*gate, false);
        }
        self
    }
}

impl Dice for ScriptedDice {
    fn unit(&mut self) -> f64 {
        self.inner.unit()
    }

    fn gate(&mut self, gate: Gate, probability: f64) -> bool {
        match self.forced.get(&gate) {
            Some(outcome) => *outcome,
            None => self.inner.gate(gate, probability),
        }
    }

    fn index(&mut self, len: usize) -> Option<usize> {
        self.inner.index(len)
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.inner.below(bound)
    }
}
