//! Calendar service
//!
//! Planner events pinned to days. An event is stored at local midnight
//! of its day and matched by local calendar date, never by time range.

use crate::error::{AppError, Result};
use crate::models::{CalendarEvent, EventType};
use crate::storage::{Collection, SharedStore, StorageKey};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Service for planner events
#[derive(Clone)]
pub struct CalendarService {
    events: Arc<Collection<CalendarEvent>>,
}

impl CalendarService {
    pub fn load(store: SharedStore) -> Result<Self> {
        let events = Collection::open(store, StorageKey::Calendar, Vec::new)?;
        Ok(Self {
            events: Arc::new(events),
        })
    }

    pub async fn list(&self) -> Vec<CalendarEvent> {
        self.events.snapshot().await
    }

    /// Add an event on `date`. A blank title adds nothing.
    pub async fn add_event(
        &self,
        date: NaiveDate,
        title: &str,
        event_type: EventType,
    ) -> Result<Option<CalendarEvent>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        let event = CalendarEvent {
            id: Uuid::new_v4().to_string(),
            date: local_midnight(date),
            title: title.to_string(),
            event_type,
        };

        let added = event.clone();
        self.events
            .mutate(move |events| {
                events.push(event);
                Ok(())
            })
            .await?;

        tracing::debug!("Event added on {}: {}", date, added.id);

        Ok(Some(added))
    }

    /// Delete an event. No confirmation is required.
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        self.events
            .mutate(|events| {
                let before = events.len();
                events.retain(|event| event.id != id);
                if events.len() == before {
                    return Err(AppError::NotFound(format!("event {}", id)));
                }
                Ok(())
            })
            .await
    }

    /// Events whose date falls on the given day
    pub async fn events_on(&self, day: NaiveDate) -> Vec<CalendarEvent> {
        self.events
            .snapshot()
            .await
            .into_iter()
            .filter(|event| event.date.with_timezone(&Local).date_naive() == day)
            .collect()
    }

    pub async fn reload(&self) -> Result<()> {
        self.events.reload().await
    }
}

/// Start of `day` in the local timezone. Where a DST jump skips
/// midnight the day starts an hour later.
fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Number of days in a month (1-based month)
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Weekday of the 1st, counted from Sunday = 0
pub fn first_weekday_offset(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| first.weekday().num_days_from_sunday())
}

/// Month grid cells: leading blanks up to the first weekday, then days
pub fn month_grid(year: i32, month: u32) -> Option<Vec<Option<u32>>> {
    let offset = first_weekday_offset(year, month)?;
    let days = days_in_month(year, month)?;

    let mut cells: Vec<Option<u32>> = (0..offset).map(|_| None).collect();
    cells.extend((1..=days).map(Some));
    Some(cells)
}
