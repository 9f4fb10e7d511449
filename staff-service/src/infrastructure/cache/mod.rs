pub mod client;
pub mod school_year;
