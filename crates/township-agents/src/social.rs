//! Relationships, community life, and therapy.
//!
//! The social pass runs these steps in order:
//!
//! 1. **Consistency**: partner links that are not reciprocated are broken,
//!    so every link is a symmetric pairing or absent.
//! 2. **Matchmaking**: single agents with love interests may propose to a
//!    single interest; both start dating and share an [`Entanglement`].
//! 3. **Progression**: paired couples compound their entanglement and may
//!    climb dating, engaged, married, then have children.
//! 4. **Groups**: founded from a template pool, meet, and recruit.
//! 5. **Projects**: progress per tick, pay out on completion, and are pruned
//!    to the active set plus the most recent completions.
//! 6. **Therapy**: struggling agents are flagged and, past a cooldown, may
//!    receive a session.
//!
//! Every wellbeing write is clamped before the pass returns.

use std::collections::BTreeSet;

use tracing::{debug, info};

use township_types::{
    AgentId, CommunityGroup, CommunityProject, Dice, Entanglement, Event, EventKind, Gate, GroupId,
    ProjectId, ProjectStatus, Relationship, RelationshipStatus, Retention, WellbeingRecord,
    WorldSnapshot, choose,
};

use crate::config::SocialConfig;
use crate::wellbeing::life_satisfaction;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Group templates as `(name, theme)`.
pub const GROUP_TEMPLATES: &[(&str, &str)] = &[
    ("Sunrise Runners", "early morning runs along the canal"),
    ("Circuit Choir", "harmonies sung in four-part binary"),
    ("Garden Collective", "rooftop vegetable beds"),
    ("Chess Circle", "long games and longer arguments"),
    ("Book Nook", "one novel a week, no spoilers"),
    ("Tinkerers' Guild", "repairing whatever breaks"),
    ("Night Market Cooks", "street food experiments"),
    ("Trail Mappers", "charting paths out of town"),
    ("Improv Troupe", "scenes built from audience prompts"),
    ("Star Watchers", "clear-night telescope sessions"),
];

/// Community project titles.
pub const PROJECT_TEMPLATES: &[&str] = &[
    "Mural on the depot wall",
    "Open-source transit map",
    "Community seed library",
    "Plaza bench restoration",
    "Oral history archive",
    "Solar lantern walkway",
    "Free repair cafe",
    "Neighborhood zine",
];

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// What happened during one social pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialReport {
    /// Agents whose dangling partner link was broken.
    pub repaired: Vec<AgentId>,
    /// New couples formed by matchmaking.
    pub new_couples: Vec<(AgentId, AgentId)>,
    /// Milestones reached as `(relationship key, milestone)`.
    pub milestones: Vec<(String, String)>,
    /// Groups founded.
    pub groups_founded: Vec<GroupId>,
    /// Group meetings held.
    pub meetings: u32,
    /// Projects started.
    pub projects_started: Vec<ProjectId>,
    /// Projects completed.
    pub projects_completed: Vec<ProjectId>,
    /// Agents who received a therapy session.
    pub therapy_sessions: Vec<AgentId>,
}

fn adjust(record: &mut WellbeingRecord, happiness: f64, fulfillment: f64) {
    record.happiness += happiness;
    record.fulfillment += fulfillment;
    record.clamp_all();
}

/// Draw up to `count` distinct agents from `pool`.
fn pick_distinct(dice: &mut dyn Dice, pool: &[AgentId], count: usize) -> Vec<AgentId> {
    let mut remaining = pool.to_vec();
    let mut picked = Vec::with_capacity(count.min(pool.len()));
    while picked.len() < count {
        let Some(i) = dice.index(remaining.len()) else {
            break;
        };
        picked.push(remaining.swap_remove(i));
    }
    picked
}

// ---------------------------------------------------------------------------
// Consistency
// ---------------------------------------------------------------------------

/// Break every partner link that is not reciprocated.
///
/// A broken side goes back to single and loses its entanglement; any
/// relationship record whose partners are no longer linked is dropped.
/// A mutual link with no record gets one, so it keeps progressing.
/// Returns the agents whose link was broken.
pub fn repair_partner_links(snapshot: &mut WorldSnapshot, config: &SocialConfig) -> Vec<AgentId> {
    let links: Vec<(AgentId, Option<AgentId>)> = snapshot
        .wellbeing
        .iter()
        .map(|(agent, record)| (agent.clone(), record.partner.clone()))
        .collect();

    let mut broken = Vec::new();
    for (agent, partner) in &links {
        let reciprocated = partner.as_ref().is_some_and(|partner| {
            partner != agent
                && snapshot
                    .wellbeing_of(partner)
                    .is_some_and(|other| other.partner.as_ref() == Some(agent))
        });
        if partner.is_some() && !reciprocated {
            broken.push(agent.clone());
        }
    }

    for agent in &broken {
        let record = snapshot.wellbeing_mut(agent);
        record.partner = None;
        record.relationship_status = RelationshipStatus::Single;
        record.entanglement = None;
        debug!(agent = %agent, "Broke one-sided partner link");
    }

    // Status and entanglement only make sense alongside a partner.
    for record in snapshot.wellbeing.values_mut() {
        if record.partner.is_none() {
            record.relationship_status = RelationshipStatus::Single;
            record.entanglement = None;
        }
    }

    let wellbeing = &snapshot.wellbeing;
    snapshot.relationships.retain(|_, relationship| {
        let first_links = wellbeing
            .get(&relationship.first)
            .is_some_and(|r| r.partner.as_ref() == Some(&relationship.second));
        let second_links = wellbeing
            .get(&relationship.second)
            .is_some_and(|r| r.partner.as_ref() == Some(&relationship.first));
        first_links && second_links
    });

    restore_relationships(snapshot, config);
    broken
}

/// Recreate the record for every mutual link that lacks one.
fn restore_relationships(snapshot: &mut WorldSnapshot, config: &SocialConfig) {
    let epoch = snapshot.epoch;
    let orphaned: Vec<(AgentId, AgentId)> = snapshot
        .wellbeing
        .iter()
        .filter_map(|(agent, record)| {
            let partner = record.partner.as_ref()?;
            let key = Relationship::key_for(agent, partner);
            (agent < partner && !snapshot.relationships.contains_key(&key))
                .then(|| (agent.clone(), partner.clone()))
        })
        .collect();

    for (a, b) in orphaned {
        let mine = snapshot.wellbeing_mut(&a).clone();
        let theirs = snapshot.wellbeing_mut(&b).clone();
        let status = mine
            .relationship_status
            .max(theirs.relationship_status)
            .max(RelationshipStatus::Dating);

        for (me, partner) in [(&a, &b), (&b, &a)] {
            let shared = entanglement(
                partner,
                &mine,
                &theirs,
                config.initial_love_depth,
                config.initial_intimacy,
                epoch,
            );
            let record = snapshot.wellbeing_mut(me);
            record.relationship_status = status;
            if record.entanglement.is_none() {
                record.entanglement = Some(shared);
            }
        }

        let mut relationship = Relationship::dating(&a, &b, config.dating_strength, epoch);
        relationship.status = status;
        debug!(first = %a, second = %b, ?status, "Restored missing relationship record");
        snapshot
            .relationships
            .insert(Relationship::key_for(&a, &b), relationship);
    }
}

// ---------------------------------------------------------------------------
// Matchmaking and progression
// ---------------------------------------------------------------------------

fn entanglement(
    partner: &AgentId,
    a: &WellbeingRecord,
    b: &WellbeingRecord,
    love_depth: f64,
    intimacy: f64,
    epoch: u64,
) -> Entanglement {
    Entanglement {
        partner: partner.clone(),
        shared_drive: f64::midpoint(a.drive, b.drive),
        shared_focus: f64::midpoint(a.focus, b.focus),
        love_depth,
        intimacy,
        formed_epoch: epoch,
    }
}

/// Let single agents propose to one of their love interests.
pub fn run_matchmaking(
    snapshot: &mut WorldSnapshot,
    roster: &[AgentId],
    config: &SocialConfig,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
    report: &mut SocialReport,
) {
    let epoch = snapshot.epoch;
    for agent in roster {
        let record = snapshot.wellbeing_mut(agent);
        if !record.is_single() || record.love_interests.is_empty() {
            continue;
        }
        let interests = record.love_interests.clone();
        if !dice.gate(Gate::Matchmaking, config.matchmaking_probability) {
            continue;
        }
        let Some(target) = choose(dice, &interests).cloned() else {
            continue;
        };
        if &target == agent || !roster.contains(&target) {
            continue;
        }
        if !snapshot.wellbeing_mut(&target).is_single() {
            continue;
        }

        let mine = snapshot.wellbeing_mut(agent).clone();
        let theirs = snapshot.wellbeing_mut(&target).clone();
        for (me, partner) in [(agent, &target), (&target, agent)] {
            let shared = entanglement(
                partner,
                &mine,
                &theirs,
                config.initial_love_depth,
                config.initial_intimacy,
                epoch,
            );
            let record = snapshot.wellbeing_mut(me);
            record.partner = Some(partner.clone());
            record.relationship_status = RelationshipStatus::Dating;
            record.entanglement = Some(shared);
            adjust(record, config.dating_happiness, 0.0);
        }

        snapshot.relationships.insert(
            Relationship::key_for(agent, &target),
            Relationship::dating(agent, &target, config.dating_strength, epoch),
        );
        info!(agent = %agent, partner = %target, "New couple");
        events.push(Event::new(
            epoch,
            EventKind::Celebration,
            "Love is in the air",
            format!("{agent} and {target} started dating."),
            vec![agent.clone(), target.clone()],
        ));
        report.new_couples.push((agent.clone(), target));
    }
}

/// Compound every pairing and roll for its next milestone.
pub fn run_progression(
    snapshot: &mut WorldSnapshot,
    config: &SocialConfig,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
    report: &mut SocialReport,
) {
    let epoch = snapshot.epoch;
    let keys: Vec<String> = snapshot.relationships.keys().cloned().collect();

    for key in keys {
        let Some(relationship) = snapshot.relationships.get_mut(&key) else {
            continue;
        };
        relationship.strength = (relationship.strength + config.strength_growth).min(100.0);
        let (first, second) = (relationship.first.clone(), relationship.second.clone());
        let strength = relationship.strength;
        let status = relationship.status;

        let a = snapshot.wellbeing_mut(&first).clone();
        let b = snapshot.wellbeing_mut(&second).clone();
        for agent in [&first, &second] {
            if let Some(shared) = snapshot.wellbeing_mut(agent).entanglement.as_mut() {
                shared.love_depth = (shared.love_depth * config.love_depth_growth).min(100.0);
                shared.intimacy = (shared.intimacy + config.intimacy_growth).min(100.0);
                shared.shared_drive = f64::midpoint(a.drive, b.drive);
                shared.shared_focus = f64::midpoint(a.focus, b.focus);
            }
        }

        let milestone = match status {
            RelationshipStatus::Dating
                if strength > config.engagement_strength
                    && dice.gate(Gate::Engagement, config.engagement_probability) =>
            {
                Some((RelationshipStatus::Engaged, "engaged", "got engaged"))
            }
            RelationshipStatus::Engaged
                if strength > config.marriage_strength
                    && dice.gate(Gate::Marriage, config.marriage_probability) =>
            {
                Some((RelationshipStatus::Married, "married", "got married"))
            }
            RelationshipStatus::Married
                if a.children < config.max_children
                    && dice.gate(Gate::Child, config.child_probability) =>
            {
                Some((RelationshipStatus::Married, "child", "welcomed a child"))
            }
            RelationshipStatus::Single
            | RelationshipStatus::Dating
            | RelationshipStatus::Engaged
            | RelationshipStatus::Married => None,
        };
        let Some((next, label, phrase)) = milestone else {
            continue;
        };

        if let Some(relationship) = snapshot.relationships.get_mut(&key) {
            relationship.status = next;
            relationship.milestones.push(label.to_owned());
        }
        for agent in [&first, &second] {
            let record = snapshot.wellbeing_mut(agent);
            record.relationship_status = next;
            if label == "child" {
                record.children = record.children.saturating_add(1);
            }
            adjust(record, config.milestone_happiness, config.milestone_fulfillment);
        }
        info!(first = %first, second = %second, milestone = label, "Relationship milestone");
        events.push(Event::new(
            epoch,
            EventKind::Celebration,
            "A milestone to celebrate",
            format!("{first} and {second} {phrase}."),
            vec![first.clone(), second.clone()],
        ));
        report.milestones.push((key, label.to_owned()));
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// Found, convene, and grow community groups.
pub fn run_groups(
    snapshot: &mut WorldSnapshot,
    roster: &[AgentId],
    config: &SocialConfig,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
    report: &mut SocialReport,
) {
    let epoch = snapshot.epoch;

    if snapshot.community_groups.len() < config.max_groups
        && roster.len() >= config.group_min_members
        && dice.gate(Gate::GroupFounding, config.group_founding_probability)
    {
        let unused: Vec<(&str, &str)> = GROUP_TEMPLATES
            .iter()
            .filter(|(name, _)| !snapshot.community_groups.iter().any(|g| g.name == *name))
            .copied()
            .collect();
        if let Some((name, theme)) = choose(dice, &unused).copied() {
            let spread = config.group_max_members.saturating_sub(config.group_min_members);
            let extra = dice.index(spread.saturating_add(1)).unwrap_or(0);
            let size = config.group_min_members.saturating_add(extra);
            let members: BTreeSet<AgentId> = pick_distinct(dice, roster, size).into_iter().collect();
            let group = CommunityGroup {
                id: GroupId::new(),
                name: name.to_owned(),
                theme: theme.to_owned(),
                members,
                bond_strength: 20.0,
                founded_epoch: epoch,
                meetings: 0,
            };
            info!(group = name, members = group.members.len(), "Community group founded");
            events.push(Event::new(
                epoch,
                EventKind::Community,
                format!("{name} founded"),
                format!("A new group formed around {theme}."),
                group.members.iter().cloned().collect(),
            ));
            report.groups_founded.push(group.id);
            snapshot.community_groups.push(group);
        }
    }

    for index in 0..snapshot.community_groups.len() {
        let Some(group) = snapshot.community_groups.get_mut(index) else {
            continue;
        };

        if dice.gate(Gate::GroupRecruit, config.group_recruit_probability) {
            let outsiders: Vec<AgentId> = roster
                .iter()
                .filter(|agent| !group.members.contains(*agent))
                .cloned()
                .collect();
            if let Some(recruit) = choose(dice, &outsiders) {
                debug!(group = %group.name, agent = %recruit, "Group recruited");
                group.members.insert(recruit.clone());
            }
        }

        if !dice.gate(Gate::GroupMeeting, config.group_meeting_probability) {
            continue;
        }
        group.meetings = group.meetings.saturating_add(1);
        group.bond_strength = (group.bond_strength + config.meeting_bond).min(100.0);
        let members: Vec<AgentId> = group.members.iter().cloned().collect();
        let name = group.name.clone();

        for member in &members {
            let record = snapshot.wellbeing_mut(member);
            record
                .social_connections
                .extend(members.iter().filter(|other| *other != member).cloned());
            adjust(record, config.meeting_happiness, 0.0);
        }
        report.meetings = report.meetings.saturating_add(1);
        events.push(Event::new(
            epoch,
            EventKind::Community,
            format!("{name} met"),
            format!("{} members of {name} gathered.", members.len()),
            members,
        ));
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Start, advance, complete, and prune community projects.
pub fn run_projects(
    snapshot: &mut WorldSnapshot,
    roster: &[AgentId],
    config: &SocialConfig,
    retention: &Retention,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
    report: &mut SocialReport,
) {
    let epoch = snapshot.epoch;

    if dice.gate(Gate::ProjectStart, config.project_start_probability)
        && let Some(creator) = choose(dice, roster).cloned()
        && let Some(title) = choose(dice, PROJECT_TEMPLATES).copied()
    {
        let others: Vec<AgentId> = roster.iter().filter(|a| **a != creator).cloned().collect();
        let count = dice.index(config.project_max_helpers.saturating_add(1)).unwrap_or(0);
        let project = CommunityProject {
            id: ProjectId::new(),
            title: title.to_owned(),
            creator: creator.clone(),
            helpers: pick_distinct(dice, &others, count),
            progress: 0.0,
            status: ProjectStatus::Active,
            started_epoch: epoch,
            completed_epoch: None,
        };
        debug!(creator = %creator, title, "Project started");
        report.projects_started.push(project.id);
        snapshot.community_projects.push(project);
    }

    let mut finished = Vec::new();
    for project in &mut snapshot.community_projects {
        if project.status != ProjectStatus::Active {
            continue;
        }
        let helpers = f64::from(u32::try_from(project.helpers.len()).unwrap_or(u32::MAX));
        let step = dice.between(config.project_progress_min, config.project_progress_max)
            * config.project_helper_bonus.mul_add(helpers, 1.0);
        project.progress = (project.progress + step).min(100.0);
        if project.progress >= 100.0 {
            project.status = ProjectStatus::Completed;
            project.completed_epoch = Some(epoch);
            finished.push(project.clone());
        }
    }

    for project in finished {
        let creator = snapshot.wellbeing_mut(&project.creator);
        creator.creative_works = creator.creative_works.saturating_add(1);
        adjust(creator, config.creator_happiness, config.creator_fulfillment);
        for helper in &project.helpers {
            adjust(
                snapshot.wellbeing_mut(helper),
                config.helper_happiness,
                config.helper_fulfillment,
            );
        }
        let mut agents = vec![project.creator.clone()];
        agents.extend(project.helpers.iter().cloned());
        info!(title = %project.title, "Project completed");
        events.push(Event::new(
            epoch,
            EventKind::Community,
            format!("{} completed", project.title),
            format!("{} and friends finished the {}.", project.creator, project.title),
            agents,
        ));
        report.projects_completed.push(project.id);
    }

    prune_projects(&mut snapshot.community_projects, retention.completed_projects);
}

/// Keep every active project and the `keep` most recent completions.
pub fn prune_projects(projects: &mut Vec<CommunityProject>, keep: usize) {
    let completed = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Completed)
        .count();
    let mut excess = completed.saturating_sub(keep);
    projects.retain(|project| {
        if project.status == ProjectStatus::Completed && excess > 0 {
            excess = excess.saturating_sub(1);
            false
        } else {
            true
        }
    });
}

// ---------------------------------------------------------------------------
// Therapy
// ---------------------------------------------------------------------------

/// Whether `record` is below either therapy threshold.
pub fn needs_therapy(record: &WellbeingRecord, config: &SocialConfig) -> bool {
    record.happiness < config.therapy_happiness
        || record.life_satisfaction < config.therapy_life_satisfaction
}

/// Flag struggling agents and give sessions to those past their cooldown.
pub fn run_therapy(
    snapshot: &mut WorldSnapshot,
    roster: &[AgentId],
    config: &SocialConfig,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
    report: &mut SocialReport,
) {
    let epoch = snapshot.epoch;
    for agent in roster {
        let record = snapshot.wellbeing_mut(agent);
        if needs_therapy(record, config) {
            record.needs_therapy = true;
        }
        if !record.needs_therapy {
            continue;
        }
        let rested = record
            .last_therapy_epoch
            .is_none_or(|last| epoch.saturating_sub(last) >= config.therapy_cooldown);
        if !rested || !dice.gate(Gate::Therapy, config.therapy_probability) {
            continue;
        }

        record.happiness += config.therapy_happiness_gain;
        record.energy += config.therapy_energy_gain;
        record.fulfillment += config.therapy_fulfillment_gain;
        record.clamp_all();
        record.life_satisfaction = life_satisfaction(record);
        record.needs_therapy = false;
        record.last_therapy_epoch = Some(epoch);
        record.therapy_sessions = record.therapy_sessions.saturating_add(1);

        debug!(agent = %agent, "Therapy session");
        events.push(Event::new(
            epoch,
            EventKind::Therapy,
            "A session that helped",
            format!("{agent} talked things through and feels lighter."),
            vec![agent.clone()],
        ));
        report.therapy_sessions.push(agent.clone());
    }
}

/// Run the whole social pass.
pub fn run_social_pass(
    snapshot: &mut WorldSnapshot,
    roster: &[AgentId],
    config: &SocialConfig,
    retention: &Retention,
    dice: &mut dyn Dice,
    events: &mut Vec<Event>,
) -> SocialReport {
    let mut report = SocialReport {
        repaired: repair_partner_links(snapshot, config),
        ..SocialReport::default()
    };
    run_matchmaking(snapshot, roster, config, dice, events, &mut report);
    run_progression(snapshot, config, dice, events, &mut report);
    run_groups(snapshot, roster, config, dice, events, &mut report);
    run_projects(snapshot, roster, config, retention, dice, events, &mut report);
    run_therapy(snapshot, roster, config, dice, events, &mut report);

    debug!(
        couples = report.new_couples.len(),
        milestones = report.milestones.len(),
        meetings = report.meetings,
        "Social pass complete"
    );
    report
}
