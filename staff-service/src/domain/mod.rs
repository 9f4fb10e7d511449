pub mod password;
pub mod school_year;
pub mod service;
pub mod staff;
pub mod user;
