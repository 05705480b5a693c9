//! Input validation shared by the HTTP layer and the repositories
//!
//! - [`date`]: `YYYY-MM-DD` membership date parsing with past-date rejection
//! - [`sort`]: per-entity sort-field allow-lists and sort order parsing

pub mod date;
pub mod sort;
