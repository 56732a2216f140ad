//! Local-day boundaries for an arbitrary IANA time zone
//!
//! "Today" for a station is the 24 hours starting at local midnight in the
//! station's zone, whatever zone the process itself runs in.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Real-world UTC offsets lie within ±14h and are multiples of 15 minutes
const MAX_OFFSET_MINUTES: i64 = 14 * 60;
const OFFSET_STEP_MINUTES: usize = 15;

/// Start and end of a station's local day, plus the instant it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWindow {
    /// Inclusive
    pub start_of_day: DateTime<Utc>,
    /// Exclusive, always `start_of_day + 24h`
    pub end_of_day: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl DayWindow {
    #[must_use]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start_of_day && time < self.end_of_day
    }
}

/// Resolve the local day of `reference` in `time_zone`.
///
/// The window always spans exactly 24 hours from local midnight, so on
/// daylight-saving transition days it ends at 01:00 (spring) or 23:00 (fall)
/// local time rather than at the next midnight. Never fails: if no midnight
/// can be located the process's own zone is used instead.
#[must_use]
pub fn resolve_day_window(time_zone: Tz, reference: DateTime<Utc>) -> DayWindow {
    let local_date = reference.with_timezone(&time_zone).date_naive();

    let start_of_day = local_midnight(time_zone, local_date).unwrap_or_else(|| {
        warn!(
            "No local midnight found for {} in {}, using ambient zone",
            local_date, time_zone
        );
        ambient_midnight(reference)
    });
    let end_of_day = start_of_day + Duration::hours(24);

    debug!(
        "Day window for {}: {} .. {} (now {})",
        time_zone, start_of_day, end_of_day, reference
    );

    DayWindow {
        start_of_day,
        end_of_day,
        now: reference,
    }
}

/// First instant of `date` in `time_zone`.
///
/// Walks candidate instants `date 00:00 UTC - offset` for every quarter-hour
/// offset, earliest first, and takes the first one that reads 00:00 on `date`
/// locally. Zones that jump over midnight get the first candidate on `date`.
fn local_midnight(time_zone: Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let utc_midnight = date.and_time(NaiveTime::MIN).and_utc();
    let candidates: Vec<DateTime<Utc>> = (-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES)
        .step_by(OFFSET_STEP_MINUTES)
        .map(|minutes| utc_midnight + Duration::minutes(minutes))
        .collect();

    let on_date = |candidate: &&DateTime<Utc>| {
        candidate.with_timezone(&time_zone).date_naive() == date
    };

    candidates
        .iter()
        .filter(on_date)
        .find(|candidate| {
            let local = candidate.with_timezone(&time_zone);
            local.hour() == 0 && local.minute() == 0
        })
        .or_else(|| candidates.iter().find(on_date))
        .copied()
}

fn ambient_midnight(reference: DateTime<Utc>) -> DateTime<Utc> {
    let local_date = reference.with_timezone(&Local).date_naive();
    Local
        .from_local_datetime(&local_date.and_time(NaiveTime::MIN))
        .earliest()
        .map_or(reference, |midnight| midnight.with_timezone(&Utc))
}
