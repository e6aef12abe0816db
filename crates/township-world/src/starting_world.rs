//! Default starting world for the Township simulation.
//!
//! Synthesized whenever no readable snapshot exists: twelve residents across
//! four departments, seven locations, a job for everyone, an even starting
//! balance, and a handful of pocket rigs owned by the department bosses.
//! Wellbeing and labor records are not pre-allocated beyond what the seed
//! data touches; the first tick creates the rest.

use chrono::Utc;
use rust_decimal::Decimal;

use township_ledger::Ledger;
use township_types::{
    AgentId, Department, Location, LocationId, LocationKind, MiningMachine, Resident,
    WorldSnapshot,
};

use crate::catalog::MACHINES;
use crate::error::WorldError;
use crate::ladder::job_at;

/// Balance every seed resident starts with.
pub const STARTING_BALANCE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Morale and performance of a department with no members.
pub const DEPARTMENT_BASELINE: f64 = 50.0;

/// `(slug, name, department, tier, is_boss)` for every seed resident.
const SEED_RESIDENTS: [(&str, &str, &str, u8, bool); 12] = [
    ("ada", "Ada", "Engineering", 5, true),
    ("basil", "Basil", "Engineering", 2, false),
    ("cleo", "Cleo", "Engineering", 1, false),
    ("dorian", "Dorian", "Research", 4, true),
    ("elio", "Elio", "Research", 2, false),
    ("fern", "Fern", "Research", 0, false),
    ("gus", "Gus", "Operations", 3, true),
    ("hana", "Hana", "Operations", 1, false),
    ("ivo", "Ivo", "Operations", 0, false),
    ("juno", "Juno", "Creative", 4, true),
    ("kai", "Kai", "Creative", 2, false),
    ("lena", "Lena", "Creative", 1, false),
];

/// Mutual love interests among the seed residents.
const SEED_INTERESTS: [(&str, &str); 3] = [("basil", "fern"), ("elio", "lena"), ("hana", "kai")];

/// Hobbies handed out round-robin.
const SEED_HOBBIES: [&str; 6] = [
    "chess",
    "gardening",
    "synth music",
    "rock climbing",
    "baking",
    "astronomy",
];

/// Department every lazily registered resident joins.
pub const DEFAULT_DEPARTMENT: &str = "Operations";

fn location(name: &str, kind: LocationKind, description: &str, actions: &[&str]) -> Location {
    Location {
        id: LocationId::new(),
        name: name.to_owned(),
        kind,
        description: description.to_owned(),
        actions: actions.iter().map(|a| (*a).to_owned()).collect(),
    }
}

/// The starter locations.
pub fn starting_locations() -> Vec<Location> {
    vec![
        location(
            "Compute Foundry",
            LocationKind::Work,
            "Rows of humming racks where most of the city's output is made.",
            &["optimizing pipelines", "re-racking servers", "tuning models"],
        ),
        location(
            "Data Exchange",
            LocationKind::Work,
            "A trading floor for everything that can be measured.",
            &["reconciling ledgers", "auditing feeds", "pricing contracts"],
        ),
        location(
            "Signal Lab",
            LocationKind::Work,
            "Half research lab, half workshop.",
            &["running experiments", "writing reports", "calibrating sensors"],
        ),
        location(
            "Quiet Gardens",
            LocationKind::Rest,
            "Terraced gardens with no network coverage at all.",
            &["napping under the willows", "reading", "watching the koi"],
        ),
        location(
            "Pod Hotel",
            LocationKind::Rest,
            "Stacked sleeping pods with blackout shutters.",
            &["sleeping", "dreaming in color", "resting"],
        ),
        location(
            "Byte Cafe",
            LocationKind::Social,
            "Strong coffee and stronger opinions.",
            &["chatting", "people watching"],
        ),
        location(
            "Central Plaza",
            LocationKind::Social,
            "Where the city gathers when something happens.",
            &["meeting friends", "listening to buskers"],
        ),
    ]
}

/// Synthesize the default world at epoch 0.
///
/// # Errors
///
/// Returns [`WorldError::Ledger`] if seeding balances overflows.
pub fn create_starting_world() -> Result<WorldSnapshot, WorldError> {
    let mut snapshot = WorldSnapshot {
        timestamp: Utc::now(),
        locations: starting_locations(),
        ..WorldSnapshot::default()
    };

    let pocket_rig = MACHINES
        .iter()
        .find(|spec| spec.key == "pocket-rig")
        .ok_or_else(|| WorldError::UnknownMachineKind(String::from("pocket-rig")))?;

    for (index, &(slug, name, department, tier, is_boss)) in SEED_RESIDENTS.iter().enumerate() {
        let id = AgentId::from(slug);
        snapshot.residents.insert(
            id.clone(),
            Resident {
                id: id.clone(),
                name: name.to_owned(),
                department: department.to_owned(),
                joined_epoch: 0,
            },
        );
        snapshot
            .jobs
            .insert(id.clone(), job_at(&id, tier, department, 0));

        let dept = snapshot
            .departments
            .entry(department.to_owned())
            .or_insert_with(|| Department::new(department, DEPARTMENT_BASELINE));
        dept.members.insert(id.clone());
        if is_boss {
            dept.boss = Some(id.clone());
            snapshot.mining_machines.push(MiningMachine::new(
                id.clone(),
                pocket_rig.key,
                pocket_rig.hash_rate,
                pocket_rig.power_cost,
                0,
            ));
        }

        if let Some(hobby) = SEED_HOBBIES.get(index % SEED_HOBBIES.len()) {
            snapshot.wellbeing_mut(&id).hobbies.push((*hobby).to_owned());
        }

        Ledger::new(&mut snapshot.economy, usize::MAX).endow(&id, STARTING_BALANCE)?;
    }

    for (a, b) in SEED_INTERESTS {
        let (a, b) = (AgentId::from(a), AgentId::from(b));
        snapshot.wellbeing_mut(&a).love_interests.push(b.clone());
        snapshot.wellbeing_mut(&b).love_interests.push(a);
    }

    Ok(snapshot)
}
