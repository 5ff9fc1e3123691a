use std::fmt;

use chrono::{DateTime, Utc};

/// Countdown to a scheduled post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    Remaining {
        days: i64,
        hours: u32,
        minutes: u32,
        seconds: u32,
    },
    Passed,
}

impl TimeLeft {
    pub fn is_passed(&self) -> bool {
        matches!(self, TimeLeft::Passed)
    }
}

/// `None` for unscheduled posts. The schedule counts as passed from the
/// exact instant it is due.
pub fn time_left(scheduled_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<TimeLeft> {
    let remaining = (scheduled_at? - now).num_seconds();
    if remaining <= 0 {
        return Some(TimeLeft::Passed);
    }

    Some(TimeLeft::Remaining {
        days: remaining / 86_400,
        hours: (remaining % 86_400 / 3_600) as u32,
        minutes: (remaining % 3_600 / 60) as u32,
        seconds: (remaining % 60) as u32,
    })
}

impl fmt::Display for TimeLeft {
    /// `Nd HH:MM:SS`, the day part only when non-zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLeft::Passed => f.write_str("Schedule Passed"),
            TimeLeft::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => {
                if *days > 0 {
                    write!(f, "{days}d ")?;
                }
                write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_unscheduled_has_no_countdown() {
        assert_eq!(time_left(None, now()), None);
    }

    #[test]
    fn test_future_schedule_counts_down() {
        let at = now() + Duration::days(2) + Duration::hours(3) + Duration::seconds(65);
        let left = time_left(Some(at), now()).unwrap();

        assert_eq!(
            left,
            TimeLeft::Remaining {
                days: 2,
                hours: 3,
                minutes: 1,
                seconds: 5
            }
        );
        assert_eq!(left.to_string(), "2d 03:01:05");
    }

    #[test]
    fn test_under_a_day_omits_days() {
        let at = now() + Duration::minutes(90);
        assert_eq!(time_left(Some(at), now()).unwrap().to_string(), "01:30:00");
    }

    #[test]
    fn test_due_or_past_schedule_has_passed() {
        assert_eq!(time_left(Some(now()), now()), Some(TimeLeft::Passed));

        let left = time_left(Some(now() - Duration::hours(1)), now()).unwrap();
        assert!(left.is_passed());
        assert_eq!(left.to_string(), "Schedule Passed");
    }
}
