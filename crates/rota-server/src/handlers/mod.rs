//! Route handlers, one module per resource.

pub mod concierges;
pub mod history;
pub mod schedule;
pub mod shifts;
