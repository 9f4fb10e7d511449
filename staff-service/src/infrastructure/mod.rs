pub mod cache;
pub mod password;
pub mod school_year;
pub mod user;
