//! The bounded narrative event log.
//!
//! Passes collect their events in an outbox during the tick. The
//! orchestrator adds one synthesized narrative line, appends the outbox to
//! the snapshot, and trims the log to its retention count.

use township_types::{
    Activity, AmbientState, Dice, Event, EventKind, LaborState, WorldSnapshot, choose,
    trim_to_recent,
};
use township_world::BlockFound;

fn scene(ambient: &AmbientState) -> String {
    capitalize(&format!(
        "{} under {}, the city felt {}.",
        ambient.time_of_day, ambient.weather, ambient.mood
    ))
}

/// Compose the tick's narrative event from its activities.
pub fn synthesize_narrative(
    epoch: u64,
    ambient: &AmbientState,
    activities: &[Activity],
    block: Option<&BlockFound>,
    dice: &mut dyn Dice,
) -> Event {
    let mut description = match choose(dice, activities) {
        Some(activity) => {
            let line = match activity.state {
                LaborState::Working => format!(
                    "{} was {} at {}.",
                    activity.agent, activity.action, activity.location
                ),
                LaborState::OnBreak | LaborState::Dreaming => format!(
                    "{} slipped away for some {} at {}.",
                    activity.agent, activity.action, activity.location
                ),
                LaborState::CloneCovering => format!(
                    "A clone of {} was {} at {}.",
                    activity.agent, activity.action, activity.location
                ),
            };
            format!("{} {line}", scene(ambient))
        }
        None => format!("{} The streets were quiet.", scene(ambient)),
    };

    let working = activities
        .iter()
        .filter(|a| a.state == LaborState::Working)
        .count();
    let resting = activities
        .iter()
        .filter(|a| matches!(a.state, LaborState::OnBreak | LaborState::Dreaming))
        .count();
    description.push_str(&format!(" {working} at work, {resting} resting."));
    if let Some(block) = block {
        description.push_str(&format!(
            " The pool found block {} worth {}.",
            block.height, block.reward
        ));
    }

    let mut agents: Vec<_> = activities.iter().map(|a| a.agent.clone()).collect();
    agents.dedup();
    Event::new(
        epoch,
        EventKind::Narrative,
        format!("Epoch {epoch}"),
        description,
        agents,
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Append `events` to the snapshot's log and trim it to `cap`.
///
/// Returns the number of events appended.
pub fn append_events(snapshot: &mut WorldSnapshot, events: Vec<Event>, cap: usize) -> usize {
    let count = events.len();
    snapshot.events.extend(events);
    trim_to_recent(&mut snapshot.events, cap);
    count
}

/// The `count` most recent events, newest last.
pub fn recent_events(snapshot: &WorldSnapshot, count: usize) -> Vec<Event> {
    let skip = snapshot.events.len().saturating_sub(count);
    snapshot.events.iter().skip(skip).cloned().collect()
}
