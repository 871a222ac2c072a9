//! Calendar and sanctuary commands

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::models::{CalendarEvent, EventType};
use crate::services::calendar;
use crate::services::sanctuary::PrayerTime;
use chrono::NaiveDate;

// ===== Calendar =====

pub async fn list_events(state: &AppState) -> Vec<CalendarEvent> {
    state.calendar.list().await
}

/// Add an event; a blank title adds nothing and returns `None`
pub async fn add_event(
    state: &AppState,
    date: NaiveDate,
    title: String,
    event_type: EventType,
) -> Result<Option<CalendarEvent>> {
    state.calendar.add_event(date, &title, event_type).await
}

pub async fn delete_event(state: &AppState, id: String) -> Result<()> {
    state.calendar.delete_event(&id).await
}

pub async fn events_on(state: &AppState, date: NaiveDate) -> Vec<CalendarEvent> {
    state.calendar.events_on(date).await
}

/// Cells for a month view: leading blanks, then day numbers
pub fn month_grid(year: i32, month: u32) -> Result<Vec<Option<u32>>> {
    calendar::month_grid(year, month)
        .ok_or_else(|| AppError::InvalidArgument(format!("no such month: {}-{}", year, month)))
}

// ===== Sanctuary =====

pub fn prayer_times(state: &AppState) -> Result<Vec<PrayerTime>> {
    state.sanctuary.adjusted_times()
}

pub fn tasbih_increment(state: &AppState) -> u64 {
    state.sanctuary.increment()
}

pub fn tasbih_reset(state: &AppState) -> u64 {
    state.sanctuary.reset();
    state.sanctuary.count()
}

pub fn tasbih_count(state: &AppState) -> u64 {
    state.sanctuary.count()
}
