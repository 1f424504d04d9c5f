pub mod agent;
pub mod contracts;
pub mod nadfun;
pub mod rpc;
pub mod server;
pub mod token;
pub mod types;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;
