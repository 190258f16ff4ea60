//! Midnight reset scheduling.
//!
//! The reset has two effects that are deliberately not kept consistent:
//! in-memory tasks survive with completion cleared, while the persisted
//! slot is overwritten with an empty list for the new day.

use crate::persist::snapshot::{PersistError, SnapshotStore};
use crate::repo::kv_repo::KvStore;
use crate::schedule::timer_queue::{TimerEffect, TimerQueue};
use crate::service::task_store::TaskStore;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::{info, warn};

/// First local midnight strictly after `now`.
pub fn next_midnight(now: NaiveDateTime) -> Option<NaiveDateTime> {
    now.date()
        .succ_opt()
        .map(|tomorrow| tomorrow.and_time(NaiveTime::MIN))
}

/// Delay from `now` until the next local midnight.
pub fn delay_until_midnight(now: NaiveDateTime) -> Option<Duration> {
    next_midnight(now).map(|midnight| midnight - now)
}

/// Arms the reset timer for the next midnight after `now`.
pub fn arm_daily_reset(timers: &mut TimerQueue, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let Some(midnight) = next_midnight(now) else {
        warn!("event=reset_arm module=schedule status=skip reason=calendar_overflow");
        return None;
    };

    timers.arm(midnight, TimerEffect::DailyReset);
    info!(
        "event=reset_arm module=schedule status=ok fire_at={midnight} delay_ms={}",
        (midnight - now).num_milliseconds()
    );
    Some(midnight)
}

/// Runs both reset effects for `today`.
///
/// The in-memory reset always happens; the returned error only reports the
/// persisted wipe.
pub fn reset_day<S: KvStore>(
    store: &mut TaskStore,
    snapshots: &SnapshotStore<S>,
    today: NaiveDate,
) -> Result<usize, PersistError> {
    let cleared = store.reset_all();
    snapshots.clear(today)?;
    info!(
        "event=daily_reset module=schedule status=ok cleared={cleared} kept_in_memory={}",
        store.len()
    );
    Ok(cleared)
}

#[cfg(test)]
mod tests {
    use super::{delay_until_midnight, next_midnight};
    use chrono::{Duration, NaiveDate};

    #[test]
    fn midnight_is_strictly_after_now() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let at_midnight = day.and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(
            next_midnight(at_midnight),
            Some(day.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap())
        );

        let late = day.and_hms_milli_opt(23, 59, 59, 500).unwrap();
        assert_eq!(delay_until_midnight(late), Some(Duration::milliseconds(500)));
    }

    #[test]
    fn month_and_year_boundaries_roll_over() {
        let new_years_eve = NaiveDate::from_ymd_opt(2026, 12, 31)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        assert_eq!(
            next_midnight(new_years_eve),
            NaiveDate::from_ymd_opt(2027, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
        );
    }
}
