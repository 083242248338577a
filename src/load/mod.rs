//! Persistence of the hourly and daily tables: files on disk, plus an
//! optional relational table.

pub mod error;
pub mod files;
pub mod sql;
