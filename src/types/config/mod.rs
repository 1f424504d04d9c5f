pub mod app;
pub mod chain;
pub mod launchpad;
pub mod server;
