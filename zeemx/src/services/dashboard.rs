//! Dashboard greeting

use crate::models::User;
use chrono::{Local, Timelike};

/// Greeting for an hour of the day (0-23)
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Dashboard headline: greets a signed-in user by first name, otherwise
/// a prompt to focus
pub fn headline(user: Option<&User>, hour: u32) -> String {
    let Some(user) = user else {
        return "Find your focus.".to_string();
    };

    match user.name.split_whitespace().next() {
        Some(first) => format!("{}, {}.", greeting(hour), first),
        None => format!("{}.", greeting(hour)),
    }
}

/// Headline for the local time right now
pub fn current_headline(user: Option<&User>) -> String {
    headline(user, Local::now().hour())
}
