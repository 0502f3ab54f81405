//! Core types, services and trait definitions for the Rota shift scheduler.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement [`store::ScheduleStore`]; the services in
//! [`directory`], [`scheduler`], [`calendar`] and [`history`] own the
//! scheduling invariants and only ever reach storage through that trait.

pub mod calendar;
pub mod clock;
pub mod concierge;
pub mod directory;
pub mod error;
pub mod history;
pub mod period;
pub mod scheduler;
pub mod shift;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use error::{Error, ErrorKind, Result};
