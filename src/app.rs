use chrono::NaiveDateTime;

use crate::config::GraderConfig;
use crate::errors::StoreError;
use crate::openai::VerdictRequester;
use crate::schedule::{should_run_today, ScheduleDecision};
use crate::services::{grade_week_with, GradeReport, PickOutcome};
use crate::store::{self, WeeksStore};

#[derive(Debug)]
pub enum GradeRun {
    /// Not a grading day; the data file was left untouched.
    Skipped(String),
    Completed { report: GradeReport, version: i64 },
}

/// One grading pass: load, gate on the schedule, grade the current week, save.
///
/// Only store failures are returned as errors. Once grading starts the file is
/// always rewritten so `version` records the run.
pub async fn run_grading<R>(
    weeks: &WeeksStore,
    requester: &R,
    config: &GraderConfig,
    now: NaiveDateTime,
    force: bool,
) -> Result<GradeRun, StoreError>
where
    R: VerdictRequester + ?Sized,
{
    run_grading_with(weeks, requester, config, now, force, |_| {}).await
}

/// [`run_grading`], reporting each pick outcome as it is decided rather than
/// after the file is saved.
pub async fn run_grading_with<R, F>(
    weeks: &WeeksStore,
    requester: &R,
    config: &GraderConfig,
    now: NaiveDateTime,
    force: bool,
    on_outcome: F,
) -> Result<GradeRun, StoreError>
where
    R: VerdictRequester + ?Sized,
    F: FnMut(&PickOutcome),
{
    let mut doc = weeks.load().await?;

    if !force {
        if let ScheduleDecision::Skip(reason) = should_run_today(now) {
            tracing::info!(reason = %reason, "Grading skipped");
            return Ok(GradeRun::Skipped(reason));
        }
    }

    let report = match store::current_week_mut(&mut doc) {
        Ok(week) => {
            let scoreboard_url = config.scoreboard_url(week.week);
            grade_week_with(week, requester, &scoreboard_url, on_outcome).await
        }
        Err(StoreError::NoWeeks) => {
            tracing::warn!(path = %weeks.path().display(), "No weeks in data file, nothing to grade");
            GradeReport::default()
        }
        Err(e) => return Err(e),
    };

    let version = weeks.save(&mut doc).await?;
    Ok(GradeRun::Completed { report, version })
}
