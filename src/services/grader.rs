use std::fmt;

use metrics::counter;

use crate::models::{Pick, PickStatus, VerdictResult, Week};
use crate::openai::{VerdictError, VerdictRequester};

/// What happened to one participant's pick during a grading pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickAction {
    /// Still the `_` placeholder.
    NotMade,
    AlreadyFinal(PickStatus),
    /// Status was changed to the given AI tag.
    Graded(PickStatus),
    /// The model answered but not with a win or loss.
    Unchanged(VerdictResult),
    /// No verdict could be obtained; the pick is left as it was.
    NoVerdict(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOutcome {
    pub name: String,
    pub pick: String,
    pub action: PickAction,
    pub rationale: Option<String>,
}

impl fmt::Display for PickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            PickAction::NotMade => write!(f, "{} has not made a pick yet, skipping", self.name),
            PickAction::AlreadyFinal(status) => {
                write!(f, "{} already marked as {status}, skipping", self.name)
            }
            PickAction::Graded(status) => write!(f, "{}: {} -> {status}", self.name, self.pick),
            PickAction::Unchanged(result) => {
                write!(f, "{}: {} left pending, verdict {result}", self.name, self.pick)
            }
            PickAction::NoVerdict(reason) => {
                write!(f, "{}: {} left unchanged ({reason})", self.name, self.pick)
            }
        }?;
        if let Some(rationale) = &self.rationale {
            write!(f, " - {rationale}")?;
        }
        Ok(())
    }
}

/// Result of grading one week, in pick order.
#[derive(Debug, Clone, Default)]
pub struct GradeReport {
    pub week: u32,
    pub outcomes: Vec<PickOutcome>,
}

impl GradeReport {
    /// Number of picks whose status was changed.
    pub fn graded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.action, PickAction::Graded(_)))
            .count()
    }

    pub fn outcome(&self, name: &str) -> Option<&PickOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

/// Grade every open pick of `week` in place.
///
/// Placeholder and already-final picks are skipped. A failed request never
/// aborts the pass; the pick simply keeps its status.
pub async fn grade_week<R>(week: &mut Week, requester: &R, scoreboard_url: &str) -> GradeReport
where
    R: VerdictRequester + ?Sized,
{
    grade_week_with(week, requester, scoreboard_url, |_| {}).await
}

/// Like [`grade_week`], handing each outcome to `on_outcome` as soon as the
/// pick is done.
pub async fn grade_week_with<R, F>(
    week: &mut Week,
    requester: &R,
    scoreboard_url: &str,
    mut on_outcome: F,
) -> GradeReport
where
    R: VerdictRequester + ?Sized,
    F: FnMut(&PickOutcome),
{
    let number = week.week;
    let mut report = GradeReport {
        week: number,
        outcomes: Vec::with_capacity(week.picks.len()),
    };

    tracing::info!(week = number, picks = week.picks.len(), "Grading week");

    for (name, pick) in week.picks.iter_mut() {
        counter!("picks_considered_total").increment(1);
        let outcome = grade_pick(number, name, pick, requester, scoreboard_url).await;
        on_outcome(&outcome);
        report.outcomes.push(outcome);
    }

    report
}

async fn grade_pick<R>(
    number: u32,
    name: &str,
    pick: &mut Pick,
    requester: &R,
    scoreboard_url: &str,
) -> PickOutcome
where
    R: VerdictRequester + ?Sized,
{
    let mut outcome = PickOutcome {
        name: name.to_string(),
        pick: pick.pick.clone(),
        action: PickAction::NotMade,
        rationale: None,
    };

    if !pick.is_made() {
        tracing::info!(week = number, name = %name, "Pick not yet made, skipping");
        counter!("picks_skipped_total", "reason" => "not_made").increment(1);
        return outcome;
    }

    if pick.status.is_final() {
        tracing::info!(
            week = number,
            name = %name,
            status = %pick.status,
            "Pick already finalized, skipping"
        );
        counter!("picks_skipped_total", "reason" => "final").increment(1);
        outcome.action = PickAction::AlreadyFinal(pick.status);
        return outcome;
    }

    tracing::info!(week = number, name = %name, pick = %pick.pick, status = %pick.status, "Grading pick");

    let verdict = match requester
        .request_verdict(number, &pick.pick, scoreboard_url)
        .await
    {
        Ok(v) => v,
        Err(e) => {
            log_verdict_error(number, name, &e);
            counter!("verdict_errors_total", "kind" => e.kind()).increment(1);
            outcome.action = PickAction::NoVerdict(e.to_string());
            return outcome;
        }
    };

    outcome.rationale = Some(verdict.rationale.clone());
    outcome.action = match verdict.result {
        VerdictResult::Won => {
            pick.status = PickStatus::AiWon;
            PickAction::Graded(PickStatus::AiWon)
        }
        VerdictResult::Lost => {
            pick.status = PickStatus::AiLost;
            PickAction::Graded(PickStatus::AiLost)
        }
        other => PickAction::Unchanged(other),
    };

    match &outcome.action {
        PickAction::Graded(status) => {
            counter!("picks_graded_total", "result" => status.as_str()).increment(1);
            tracing::info!(
                week = number,
                name = %name,
                status = %status,
                rationale = %verdict.rationale,
                "Pick graded"
            );
        }
        PickAction::Unchanged(result) => {
            counter!("picks_skipped_total", "reason" => "no_decision").increment(1);
            tracing::info!(
                week = number,
                name = %name,
                result = %result,
                rationale = %verdict.rationale,
                "Verdict not actionable, leaving pick unchanged"
            );
        }
        _ => {}
    }

    outcome
}

fn log_verdict_error(week: u32, name: &str, error: &VerdictError) {
    match error {
        VerdictError::MissingApiKey => {
            tracing::info!(week, name = %name, "Skipping OpenAI call (no OPENAI_KEY / OPENAI_API_KEY set)")
        }
        VerdictError::Timeout => tracing::warn!(week, name = %name, "OpenAI request timed out"),
        VerdictError::Status { status, snippet } => tracing::warn!(
            week,
            name = %name,
            status = %status,
            body = %snippet,
            "OpenAI request failed"
        ),
        other => tracing::warn!(week, name = %name, error = %other, "Failed to parse OpenAI verdict"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers from a fixed table keyed by pick text and records every call.
    struct ScriptedRequester {
        answers: HashMap<String, Result<Verdict, fn() -> VerdictError>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRequester {
        fn new() -> Self {
            Self {
                answers: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn answer(mut self, pick: &str, result: VerdictResult, rationale: &str) -> Self {
            self.answers.insert(
                pick.into(),
                Ok(Verdict {
                    result,
                    rationale: rationale.into(),
                }),
            );
            self
        }

        fn fail(mut self, pick: &str, error: fn() -> VerdictError) -> Self {
            self.answers.insert(pick.into(), Err(error));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VerdictRequester for ScriptedRequester {
        async fn request_verdict(
            &self,
            _week: u32,
            pick: &str,
            _scoreboard_url: &str,
        ) -> Result<Verdict, VerdictError> {
            self.calls.lock().unwrap().push(pick.to_string());
            match self.answers.get(pick) {
                Some(Ok(v)) => Ok(v.clone()),
                Some(Err(make)) => Err(make()),
                None => Err(VerdictError::Envelope("no scripted answer".into())),
            }
        }
    }

    fn pick(text: &str, status: PickStatus) -> Pick {
        Pick {
            pick: text.into(),
            status,
            ..Pick::blank()
        }
    }

    fn week_three() -> Week {
        let mut week = Week::blank(3, Vec::<String>::new());
        week.picks.insert("andy".into(), pick("Chiefs -3.5", PickStatus::Pending));
        week.picks.insert("sam".into(), pick("_", PickStatus::Pending));
        week.picks.insert("jeff".into(), pick("Bills ML", PickStatus::Won));
        week.picks.insert("brad".into(), pick("Over 44.5", PickStatus::Pending));
        week
    }

    #[tokio::test]
    async fn win_and_loss_set_ai_tags() {
        let mut week = week_three();
        let requester = ScriptedRequester::new()
            .answer("Chiefs -3.5", VerdictResult::Won, "Chiefs won by 7")
            .answer("Over 44.5", VerdictResult::Lost, "Total was 38");

        let report = grade_week(&mut week, &requester, "https://scores").await;

        assert_eq!(week.picks["andy"].status, PickStatus::AiWon);
        assert_eq!(week.picks["brad"].status, PickStatus::AiLost);
        assert_eq!(report.graded(), 2);
        assert_eq!(
            report.outcome("andy").unwrap().rationale.as_deref(),
            Some("Chiefs won by 7")
        );
    }

    #[tokio::test]
    async fn placeholder_and_final_picks_are_never_requested() {
        let mut week = week_three();
        let requester = ScriptedRequester::new()
            .answer("_", VerdictResult::Won, "should not be asked")
            .answer("Bills ML", VerdictResult::Lost, "should not be asked")
            .answer("Chiefs -3.5", VerdictResult::Pending, "game not final")
            .answer("Over 44.5", VerdictResult::Pending, "game not final");

        let report = grade_week(&mut week, &requester, "https://scores").await;

        assert_eq!(requester.calls(), vec!["Chiefs -3.5", "Over 44.5"]);
        assert_eq!(week.picks["sam"].status, PickStatus::Pending);
        assert_eq!(week.picks["sam"].pick, "_");
        assert_eq!(week.picks["jeff"].status, PickStatus::Won);
        assert_eq!(report.outcome("sam").unwrap().action, PickAction::NotMade);
        assert_eq!(
            report.outcome("jeff").unwrap().action,
            PickAction::AlreadyFinal(PickStatus::Won)
        );
    }

    #[tokio::test]
    async fn pending_or_odd_verdict_leaves_status() {
        let mut week = week_three();
        let requester = ScriptedRequester::new()
            .answer("Chiefs -3.5", VerdictResult::Pending, "game not final")
            .answer("Over 44.5", VerdictResult::Undetermined("push".into()), "landed on 44");

        let report = grade_week(&mut week, &requester, "https://scores").await;

        assert_eq!(week.picks["andy"].status, PickStatus::Pending);
        assert_eq!(week.picks["brad"].status, PickStatus::Pending);
        assert_eq!(report.graded(), 0);
        assert_eq!(
            report.outcome("andy").unwrap().action,
            PickAction::Unchanged(VerdictResult::Pending)
        );
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_batch() {
        let mut week = week_three();
        let requester = ScriptedRequester::new()
            .fail("Chiefs -3.5", || VerdictError::Timeout)
            .answer("Over 44.5", VerdictResult::Won, "Total was 51");

        let report = grade_week(&mut week, &requester, "https://scores").await;

        assert_eq!(week.picks["andy"].status, PickStatus::Pending);
        assert_eq!(week.picks["brad"].status, PickStatus::AiWon);
        assert!(matches!(
            report.outcome("andy").unwrap().action,
            PickAction::NoVerdict(_)
        ));
    }

    #[tokio::test]
    async fn second_pass_changes_nothing() {
        let mut week = week_three();
        let requester = ScriptedRequester::new()
            .answer("Chiefs -3.5", VerdictResult::Won, "Chiefs won by 7")
            .answer("Over 44.5", VerdictResult::Pending, "in progress");

        grade_week(&mut week, &requester, "https://scores").await;
        let after_first = week.clone();
        let report = grade_week(&mut week, &requester, "https://scores").await;

        assert_eq!(week, after_first);
        assert_eq!(report.graded(), 0);
        // Only the still-pending pick was asked again.
        assert_eq!(
            requester.calls(),
            vec!["Chiefs -3.5", "Over 44.5", "Over 44.5"]
        );
    }

    #[tokio::test]
    async fn outcomes_are_handed_over_in_pick_order() {
        let mut week = week_three();
        let requester = ScriptedRequester::new()
            .answer("Chiefs -3.5", VerdictResult::Won, "Chiefs won by 7")
            .answer("Over 44.5", VerdictResult::Lost, "Total was 38");

        let mut seen = Vec::new();
        let report = grade_week_with(&mut week, &requester, "https://scores", |outcome| {
            seen.push(outcome.to_string());
        })
        .await;

        let lines: Vec<_> = report.outcomes.iter().map(ToString::to_string).collect();
        assert_eq!(seen, lines);
        assert_eq!(seen.len(), 4);
        assert!(seen[0].starts_with("andy: Chiefs -3.5 -> ai_won"));
    }

    #[test]
    fn outcome_lines_read_like_a_report() {
        let outcome = PickOutcome {
            name: "andy".into(),
            pick: "Chiefs -3.5".into(),
            action: PickAction::Graded(PickStatus::AiWon),
            rationale: Some("Chiefs won by 7".into()),
        };
        assert_eq!(outcome.to_string(), "andy: Chiefs -3.5 -> ai_won - Chiefs won by 7");

        let outcome = PickOutcome {
            name: "sam".into(),
            pick: "_".into(),
            action: PickAction::NotMade,
            rationale: None,
        };
        assert_eq!(outcome.to_string(), "sam has not made a pick yet, skipping");
    }
}
