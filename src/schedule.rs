use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Thursday night kickoff is still in progress before this local hour.
pub const THURSDAY_GRADING_HOUR: u32 = 19;

/// Days on which NFL games finish.
const GRADING_DAYS: [Weekday; 3] = [Weekday::Thu, Weekday::Sun, Weekday::Mon];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDecision {
    Run,
    Skip(String),
}

/// Decide whether grading runs at the given local wall-clock time.
pub fn should_run_today(now: NaiveDateTime) -> ScheduleDecision {
    let weekday = now.weekday();

    if !GRADING_DAYS.contains(&weekday) {
        return ScheduleDecision::Skip(format!(
            "Today is {} - skipping bet evaluation.",
            now.format("%A")
        ));
    }

    if weekday == Weekday::Thu && now.hour() < THURSDAY_GRADING_HOUR {
        return ScheduleDecision::Skip(format!(
            "Thursday before {THURSDAY_GRADING_HOUR}:00 ({}) - games still in progress, skipping bet evaluation.",
            now.format("%H:%M")
        ));
    }

    ScheduleDecision::Run
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn every_weekday_and_hour() {
        // 2025-09-01 is a Monday.
        for day in 0..7 {
            for hour in 0..24 {
                let now = at(2025, 9, 1 + day, hour, 30);
                let weekday = now.weekday();
                let expected = matches!(weekday, Weekday::Thu | Weekday::Sun | Weekday::Mon)
                    && (weekday != Weekday::Thu || hour >= 19);
                assert_eq!(
                    should_run_today(now) == ScheduleDecision::Run,
                    expected,
                    "{weekday} {hour}:30"
                );
            }
        }
    }

    #[test]
    fn thursday_boundary() {
        // 2025-09-04 is a Thursday.
        assert!(matches!(
            should_run_today(at(2025, 9, 4, 18, 59)),
            ScheduleDecision::Skip(_)
        ));
        assert_eq!(should_run_today(at(2025, 9, 4, 19, 0)), ScheduleDecision::Run);
    }

    #[test]
    fn skip_reason_names_the_day() {
        // 2025-09-03 is a Wednesday.
        match should_run_today(at(2025, 9, 3, 12, 0)) {
            ScheduleDecision::Skip(reason) => assert!(reason.contains("Wednesday")),
            ScheduleDecision::Run => panic!("Wednesday should skip"),
        }
    }

    #[test]
    fn sunday_and_monday_run_all_day() {
        assert_eq!(should_run_today(at(2025, 9, 7, 0, 5)), ScheduleDecision::Run);
        assert_eq!(should_run_today(at(2025, 9, 8, 23, 55)), ScheduleDecision::Run);
    }
}
