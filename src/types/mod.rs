pub mod config;
pub mod nadfun;
pub mod token;
