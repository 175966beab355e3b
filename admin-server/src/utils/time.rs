//! 时间工具函数 - report windows in the business timezone
//!
//! Calendar days are taken in the timezone carried by `now`; the resulting
//! window is expressed in UTC so it can be compared with order timestamps.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use shared::models::{ReportPeriod, ReportWindow};

/// 23:59:59.999
const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_milli_opt(23, 59, 59, 999) {
    Some(t) => t,
    None => panic!("invalid end-of-day time"),
};

/// Parse an IANA timezone name, falling back to UTC
pub fn parse_timezone(raw: &str) -> Tz {
    raw.parse::<Tz>().unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse timezone '{}': {}, falling back to UTC",
            raw,
            e
        );
        Tz::UTC
    })
}

/// Current instant in the business timezone
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Local wall time → UTC instant
///
/// Ambiguous times (DST fold) resolve to the earliest or latest candidate.
/// DST gap fallback: 如果本地时间不存在，按 UTC 解释。
fn local_to_utc<Z: TimeZone>(tz: &Z, naive: NaiveDateTime, earliest: bool) -> DateTime<Utc> {
    let local = tz.from_local_datetime(&naive);
    let resolved = if earliest {
        local.earliest()
    } else {
        local.latest()
    };
    resolved
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Compute the inclusive report window for `period` relative to `now`
///
/// - daily: today 00:00:00.000 → today 23:59:59.999
/// - weekly: Monday 00:00:00.000 → Sunday 23:59:59.999 of the current week
pub fn report_window<Z: TimeZone>(period: ReportPeriod, now: &DateTime<Z>) -> ReportWindow {
    let tz = now.timezone();
    let today = now.date_naive();

    let (first_day, last_day) = match period {
        ReportPeriod::Daily => (today, today),
        ReportPeriod::Weekly => {
            let monday = week_start(today);
            (monday, monday + Duration::days(6))
        }
    };

    ReportWindow {
        start_date: local_to_utc(&tz, first_day.and_time(NaiveTime::MIN), true),
        end_date: local_to_utc(&tz, last_day.and_time(END_OF_DAY), false),
    }
}
