//! Whole-tick scenarios against the synthesized starting world.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use rust_decimal::Decimal;

use township_core::config::SimulationConfig;
use township_core::store::WorldStore;
use township_core::tick::run_tick;
use township_types::{
    AgentId, CommunityGroup, CommunityProject, CrimeRecord, Department, EducationRecord,
    Entanglement, EntertainmentEvent, EventKind, Gate, Grievance, GrievanceId, GrievanceStatus,
    GroupId, HealthRecord, MiningMachine, ProjectId, ProjectStatus, Property, PropertyId, RecordId,
    Relationship, RelationshipStatus, ScriptedDice, SeasonalEvent, SeededDice, Vehicle,
    WorldSnapshot,
};
use township_world::mining::split_reward;
use township_world::{DEPARTMENT_BASELINE, create_starting_world};

fn roster(snapshot: &WorldSnapshot) -> Vec<AgentId> {
    snapshot.residents.keys().cloned().collect()
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("township-sim-{name}-{}", std::process::id()))
        .join("world.json")
}

fn in_range(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

// ---------------------------------------------------------------------------
// Whole-world behavior
// ---------------------------------------------------------------------------

#[test]
fn empty_department_reports_the_baseline() {
    let config = SimulationConfig::default();
    let mut world = create_starting_world().unwrap();
    let mut archive = Department::new("Archive", DEPARTMENT_BASELINE);
    archive.morale = 3.0;
    archive.performance = 97.0;
    world.departments.insert(String::from("Archive"), archive);
    let agents = roster(&world);

    run_tick(&mut world, &config, &agents, &mut SeededDice::from_seed(1)).unwrap();

    let archive = world.departments.get("Archive").unwrap();
    assert!(archive.members.is_empty());
    assert!((archive.morale - DEPARTMENT_BASELINE).abs() < f64::EPSILON);
    assert!((archive.performance - DEPARTMENT_BASELINE).abs() < f64::EPSILON);
}

#[test]
fn forced_matchmaking_pairs_mutual_interests() {
    let config = SimulationConfig::default();
    let mut world = create_starting_world().unwrap();
    let agents = roster(&world);
    let mut dice = ScriptedDice::new(5)
        .force(Gate::Matchmaking, true)
        .force(Gate::Engagement, false);

    run_tick(&mut world, &config, &agents, &mut dice).unwrap();

    let basil = AgentId::from("basil");
    let fern = AgentId::from("fern");
    let basil_record = world.wellbeing_of(&basil).unwrap();
    let fern_record = world.wellbeing_of(&fern).unwrap();
    assert_eq!(basil_record.partner.as_ref(), Some(&fern));
    assert_eq!(fern_record.partner.as_ref(), Some(&basil));
    assert_eq!(basil_record.relationship_status, RelationshipStatus::Dating);
    assert!(basil_record.entanglement.is_some());
    assert!(fern_record.entanglement.is_some());
    assert!(world.events.iter().any(|event| {
        event.kind == EventKind::Celebration
            && event.agents.contains(&basil)
            && event.agents.contains(&fern)
    }));
}

#[test]
fn therapy_waits_out_the_cooldown() {
    let config = SimulationConfig::default();
    let cooldown = config.social.therapy_cooldown;
    let mut world = create_starting_world().unwrap();
    let ada = AgentId::from("ada");
    {
        let record = world.wellbeing_mut(&ada);
        record.happiness = 5.0;
        record.needs_therapy = true;
        record.last_therapy_epoch = Some(0);
    }
    let agents = roster(&world);
    let mut dice = ScriptedDice::new(9)
        .force(Gate::Therapy, true)
        .force(Gate::Demotion, false);

    let mut session_epoch = None;
    for _ in 0..20 {
        let summary = run_tick(&mut world, &config, &agents, &mut dice).unwrap();
        if world.wellbeing_of(&ada).unwrap().therapy_sessions > 0 {
            session_epoch = Some(summary.epoch);
            break;
        }
    }

    let record = world.wellbeing_of(&ada).unwrap();
    assert_eq!(session_epoch, Some(cooldown));
    assert_eq!(record.last_therapy_epoch, Some(cooldown));
    assert!(!record.needs_therapy);
    assert!(world.events.iter().any(|event| {
        event.kind == EventKind::Therapy && event.agents.contains(&ada)
    }));
}

#[test]
fn power_hungry_machine_earns_nothing() {
    let machine = MiningMachine::new(
        AgentId::from("ada"),
        "pocket-rig",
        10.0,
        Decimal::new(5, 1),
        0,
    );

    let payouts = split_reward(Decimal::new(25, 2), &[machine]);

    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts.first().unwrap().amount, Decimal::ZERO);
}

#[test]
fn full_payroll_tax_keeps_ticking() {
    let config = SimulationConfig::default();
    let mut world = create_starting_world().unwrap();
    world.economy.tax_rate = Decimal::ONE;
    let agents = roster(&world);
    let balances = world.economy.balances.clone();
    let mut dice = ScriptedDice::new(21).close_all(&[
        Gate::FlavorTransfer,
        Gate::AutoInvest,
        Gate::BlockFound,
    ]);

    for _ in 0..3 {
        let summary = run_tick(&mut world, &config, &agents, &mut dice).unwrap();
        assert!(summary.conservation.is_balanced());
    }

    assert_eq!(world.epoch, 3);
    assert!(world.economy.treasury > Decimal::ZERO);
    assert_eq!(world.economy.balances, balances);
}

// ---------------------------------------------------------------------------
// Properties over many ticks
// ---------------------------------------------------------------------------

#[test]
fn ledger_balances_every_tick() {
    let config = SimulationConfig::default();
    let mut world = create_starting_world().unwrap();
    let agents = roster(&world);
    let mut dice = SeededDice::from_seed(42);

    for _ in 0..50 {
        let summary = run_tick(&mut world, &config, &agents, &mut dice).unwrap();
        assert!(summary.conservation.is_balanced(), "epoch {}", summary.epoch);
    }
    assert_eq!(world.epoch, 50);
}

#[test]
fn scalars_stay_bounded_across_seeds() {
    let config = SimulationConfig::default();
    for seed in [1, 7, 99] {
        let mut world = create_starting_world().unwrap();
        let agents = roster(&world);
        let mut dice = SeededDice::from_seed(seed);
        for _ in 0..40 {
            run_tick(&mut world, &config, &agents, &mut dice).unwrap();
        }
        for (agent, record) in &world.wellbeing {
            for value in [
                record.happiness,
                record.fulfillment,
                record.energy,
                record.drive,
                record.focus,
                record.outlook,
                record.life_satisfaction,
            ] {
                assert!(in_range(value), "{agent} out of range with seed {seed}");
            }
        }
    }
}

#[test]
fn partner_links_stay_mutual() {
    let config = SimulationConfig::default();
    let mut world = create_starting_world().unwrap();
    let agents = roster(&world);
    let mut dice = ScriptedDice::new(3).force(Gate::Matchmaking, true);

    for _ in 0..30 {
        run_tick(&mut world, &config, &agents, &mut dice).unwrap();
        for (agent, record) in &world.wellbeing {
            if let Some(partner) = &record.partner {
                let back = world.wellbeing_of(partner).and_then(|r| r.partner.as_ref());
                assert_eq!(back, Some(agent));
            }
        }
    }
}

#[test]
fn bounded_logs_respect_retention() {
    let mut config = SimulationConfig::default();
    config.retention.events = 15;
    config.retention.transactions = 40;
    let mut world = create_starting_world().unwrap();
    let agents = roster(&world);
    let mut dice = SeededDice::from_seed(8);

    for _ in 0..30 {
        run_tick(&mut world, &config, &agents, &mut dice).unwrap();
    }

    assert!(world.events.len() <= 15);
    assert!(world.economy.transactions.len() <= 40);
    assert!(world.grievances.len() <= config.retention.grievances);
    assert!(world.seasonal_events.len() <= config.retention.seasonal_events);
}

#[test]
fn same_seed_same_economy() {
    let config = SimulationConfig::default();
    let start = create_starting_world().unwrap();
    let agents = roster(&start);

    let run = |seed: u64| {
        let mut world = start.clone();
        let mut dice = SeededDice::from_seed(seed);
        for _ in 0..20 {
            run_tick(&mut world, &config, &agents, &mut dice).unwrap();
        }
        world
    };
    let first = run(77);
    let second = run(77);

    assert_eq!(first.economy.balances, second.economy.balances);
    assert_eq!(first.economy.circulating_supply, second.economy.circulating_supply);
    assert_eq!(
        first.relationships.keys().collect::<Vec<_>>(),
        second.relationships.keys().collect::<Vec<_>>()
    );
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_load_save_is_stable() {
    let path = scratch("stable");
    let store = WorldStore::new(&path);
    let config = SimulationConfig::default();
    let mut world = create_starting_world().unwrap();
    let agents = roster(&world);
    let mut dice = SeededDice::from_seed(30);
    for _ in 0..30 {
        run_tick(&mut world, &config, &agents, &mut dice).unwrap();
    }

    store.save(&world).await.unwrap();
    let first = tokio::fs::read(&path).await.unwrap();
    let loaded = store.read().await.unwrap();
    store.save(&loaded).await.unwrap();
    let second = tokio::fs::read(&path).await.unwrap();

    assert_eq!(loaded, world);
    assert_eq!(first, second);
}

#[tokio::test]
async fn every_collection_survives_save_and_read() {
    let path = scratch("collections");
    let store = WorldStore::new(&path);
    let config = SimulationConfig::default();
    let mut world = create_starting_world().unwrap();
    let agents = roster(&world);
    let mut dice = SeededDice::from_seed(12);
    for _ in 0..3 {
        run_tick(&mut world, &config, &agents, &mut dice).unwrap();
    }

    let ada = AgentId::from("ada");
    let basil = AgentId::from("basil");
    let fern = AgentId::from("fern");
    let epoch = world.epoch;

    world.properties.push(Property {
        id: PropertyId::new(),
        owner: ada.clone(),
        kind: String::from("studio"),
        name: String::from("Canal View"),
        value: Decimal::new(80_012_345, 4),
        rental_income: Decimal::new(4_825, 2),
        purchased_epoch: epoch,
    });
    for (me, them) in [(&basil, &fern), (&fern, &basil)] {
        let record = world.wellbeing_mut(me);
        record.partner = Some(them.clone());
        record.relationship_status = RelationshipStatus::Engaged;
        record.entanglement = Some(Entanglement {
            partner: them.clone(),
            shared_drive: 47.125,
            shared_focus: 52.3,
            love_depth: 33.333_333,
            intimacy: 12.5,
            formed_epoch: 1,
        });
        record.goals.push(String::from("learn the cello"));
        record.happiness = 61.718_281_8;
    }
    let mut relationship = Relationship::dating(&basil, &fern, 74.25, 1);
    relationship.status = RelationshipStatus::Engaged;
    relationship.milestones.push(String::from("engaged"));
    world
        .relationships
        .insert(Relationship::key_for(&basil, &fern), relationship);
    world.community_groups.push(CommunityGroup {
        id: GroupId::new(),
        name: String::from("Chess Circle"),
        theme: String::from("long games"),
        members: [ada.clone(), basil.clone()].into_iter().collect(),
        bond_strength: 23.75,
        founded_epoch: 2,
        meetings: 3,
    });
    world.community_projects.push(CommunityProject {
        id: ProjectId::new(),
        title: String::from("Mural on the depot wall"),
        creator: fern.clone(),
        helpers: vec![ada.clone()],
        progress: 100.0,
        status: ProjectStatus::Completed,
        started_epoch: 0,
        completed_epoch: Some(epoch),
    });
    world.grievances.push(Grievance {
        id: GrievanceId::new(),
        department: String::from("Research"),
        filed_epoch: 2,
        reason: String::from("morale 38.6 below threshold"),
        affected: vec![fern.clone()],
        status: GrievanceStatus::Resolved,
        resolution: Some(String::from("Flexible hours agreed.")),
    });
    world.seasonal_events.push(SeasonalEvent {
        name: String::from("Lantern Festival"),
        description: String::from("Paper lanterns over the canal."),
        started_epoch: 1,
        ends_epoch: 13,
        happiness_bias: 0.75,
        active: false,
    });
    world.crime_records.push(CrimeRecord {
        id: RecordId::new(),
        epoch,
        agent: basil.clone(),
        offense: String::from("jaywalking"),
        resolved: true,
    });
    world.education_records.push(EducationRecord {
        id: RecordId::new(),
        agent: fern.clone(),
        course: String::from("Applied Cryptography"),
        progress: 0.425,
        started_epoch: 1,
    });
    world.health_records.push(HealthRecord {
        id: RecordId::new(),
        agent: ada.clone(),
        condition: String::from("sprained wrist"),
        epoch,
        recovered: false,
    });
    world.entertainment_events.push(EntertainmentEvent {
        id: RecordId::new(),
        epoch,
        title: String::from("Open-air cinema"),
        attendees: vec![ada.clone(), basil.clone(), fern.clone()],
    });
    world.vehicles.push(Vehicle {
        id: RecordId::new(),
        owner: ada,
        model: String::from("Cargo bike"),
        value: Decimal::new(129_999, 2),
        acquired_epoch: epoch,
    });

    store.save(&world).await.unwrap();
    let loaded = store.read().await.unwrap();

    assert_eq!(loaded, world);
    assert_eq!(loaded.vehicles.len(), 1);
    assert_eq!(loaded.properties.first().unwrap().value, Decimal::new(80_012_345, 4));
    assert!(!loaded.economy.price_history.is_empty());
    assert!(!loaded.economy.transactions.is_empty());
}
