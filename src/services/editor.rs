use serde_yaml::Value;

use crate::errors::StoreError;
use crate::models::{Pick, PickStatus, Week, WeeksDocument};

/// Hand edit: append week `number`, seeding it with the participants of the current week.
pub fn add_week(doc: &mut WeeksDocument, number: u32) -> Result<&Week, StoreError> {
    if doc.week(number).is_some() {
        return Err(StoreError::WeekExists(number));
    }

    let participants: Vec<String> = doc
        .current_week()
        .map(|w| w.picks.keys().cloned().collect())
        .unwrap_or_default();

    tracing::info!(week = number, participants = participants.len(), "Adding week");
    doc.weeks.push(Week::blank(number, participants));
    doc.weeks.last().ok_or(StoreError::WeekNotFound(number))
}

/// Record `name`'s pick for a week, adding the participant if needed.
/// A new pick text resets the status to pending unless one is given.
pub fn set_pick(
    doc: &mut WeeksDocument,
    number: u32,
    name: &str,
    text: &str,
    status: Option<PickStatus>,
    odds: Option<Value>,
) -> Result<Pick, StoreError> {
    let week = doc.week_mut(number).ok_or(StoreError::WeekNotFound(number))?;
    let pick = week.picks.entry(name.to_string()).or_insert_with(Pick::blank);

    if pick.pick != text {
        pick.status = PickStatus::Pending;
    }
    pick.pick = text.to_string();
    if let Some(status) = status {
        pick.status = status;
    }
    if let Some(odds) = odds {
        pick.odds = Some(odds);
    }

    tracing::info!(week = number, name, pick = %pick.pick, status = %pick.status, "Pick set");
    Ok(pick.clone())
}

/// Hand edit: flag or unflag `name`'s pick as the week's worst.
pub fn mark_worst(
    doc: &mut WeeksDocument,
    number: u32,
    name: &str,
    worst: bool,
) -> Result<(), StoreError> {
    let week = doc.week_mut(number).ok_or(StoreError::WeekNotFound(number))?;
    let pick = week
        .picks
        .get_mut(name)
        .ok_or_else(|| StoreError::ParticipantNotFound {
            week: number,
            name: name.to_string(),
        })?;
    pick.worst = Some(Value::Bool(worst));
    tracing::info!(week = number, name, worst, "Worst flag set");
    Ok(())
}

/// One line per pick for the `show` command, in file order.
pub fn week_summary(week: &Week) -> Vec<String> {
    let mut lines = vec![format!("Week {}", week.week)];
    lines.extend(week.picks.iter().map(|(name, pick)| {
        let worst = if pick.is_worst() { " [worst]" } else { "" };
        format!(
            "| {name}: {} {} ({}){worst}",
            pick.pick,
            pick.odds_label(),
            pick.status
        )
    }));
    lines
}
