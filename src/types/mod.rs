pub mod daily;
pub mod hourly;
pub mod raw_row;
