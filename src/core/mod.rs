// Core modules implementing dataset loading, calendar lookup, and queries.
pub mod calendar;
pub mod dataset;
pub mod error;
pub mod query;
