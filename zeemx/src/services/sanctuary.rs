//! Sanctuary service
//!
//! Daily prayer times with the user's minute offsets applied, and an
//! in-memory tasbih counter. Offsets live in `AppSettings` and are edited
//! through `SettingsService::adjust_prayer_offset`.

use crate::config::BASE_PRAYER_TIMES;
use crate::error::{AppError, Result};
use crate::services::settings::{AppSettings, Prayer};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// One prayer with its base and adjusted time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTime {
    pub prayer: Prayer,
    pub base: String,
    pub offset: i32,
    pub time: String,
}

#[derive(Clone)]
pub struct SanctuaryService {
    settings: watch::Receiver<AppSettings>,
    tasbih: Arc<AtomicU64>,
}

impl SanctuaryService {
    pub fn new(settings: watch::Receiver<AppSettings>) -> Self {
        Self {
            settings,
            tasbih: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Today's times with the latest offsets
    pub fn adjusted_times(&self) -> Result<Vec<PrayerTime>> {
        let offsets = self.settings.borrow().prayer_offsets;

        Prayer::ALL
            .iter()
            .zip(BASE_PRAYER_TIMES)
            .map(|(&prayer, base)| {
                let offset = offsets.get(prayer);
                Ok(PrayerTime {
                    prayer,
                    base: base.to_string(),
                    offset,
                    time: adjust_time(base, offset)?,
                })
            })
            .collect()
    }

    pub fn increment(&self) -> u64 {
        self.tasbih.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn reset(&self) {
        self.tasbih.store(0, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.tasbih.load(Ordering::Relaxed)
    }
}

/// Shift an `HH:MM` time by `offset` minutes, wrapping around midnight
pub fn adjust_time(time: &str, offset: i32) -> Result<String> {
    let invalid = || AppError::InvalidArgument(format!("not an HH:MM time: {}", time));

    let (hours, minutes) = time.split_once(':').ok_or_else(invalid)?;
    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.parse().map_err(|_| invalid())?;

    let total = (hours * 60 + minutes + i64::from(offset)).rem_euclid(MINUTES_PER_DAY);
    Ok(format!("{:02}:{:02}", total / 60, total % 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::settings::{SettingsService, PrayerOffsets};
    use crate::storage::MemoryStore;

    #[test]
    fn test_adjust_time_wraps_midnight() {
        assert_eq!(adjust_time("05:42", 0).unwrap(), "05:42");
        assert_eq!(adjust_time("05:42", 20).unwrap(), "06:02");
        assert_eq!(adjust_time("19:30", 300).unwrap(), "00:30");
        assert_eq!(adjust_time("05:42", -360).unwrap(), "23:42");
        assert_eq!(adjust_time("00:00", -1).unwrap(), "23:59");
        assert!(adjust_time("noon", 0).is_err());
    }

    #[tokio::test]
    async fn test_times_follow_settings() {
        let settings = SettingsService::load(Arc::new(MemoryStore::new())).unwrap();
        let sanctuary = SanctuaryService::new(settings.subscribe());

        let times = sanctuary.adjusted_times().unwrap();
        assert_eq!(times.len(), 5);
        assert_eq!(times[0].time, "05:42");

        settings
            .adjust_prayer_offset(Prayer::Fajr, 5)
            .await
            .unwrap();
        settings
            .adjust_prayer_offset(Prayer::Isha, -30)
            .await
            .unwrap();

        let times = sanctuary.adjusted_times().unwrap();
        assert_eq!(times[0].time, "05:47");
        assert_eq!(times[4].time, "19:00");
        assert_eq!(
            settings.get().prayer_offsets,
            PrayerOffsets {
                fajr: 5,
                isha: -30,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_tasbih_counter() {
        let (_tx, rx) = watch::channel(AppSettings::default());
        let sanctuary = SanctuaryService::new(rx);

        assert_eq!(sanctuary.increment(), 1);
        assert_eq!(sanctuary.increment(), 2);
        assert_eq!(sanctuary.count(), 2);

        sanctuary.reset();
        assert_eq!(sanctuary.count(), 0);
    }
}
