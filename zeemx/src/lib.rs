//! zeemX library
//!
//! Feature stores, settings, and the command surface of the zeemX
//! workspace, exposed as a library for the binary and for testing.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod sheet;
pub mod storage;
pub mod views;
