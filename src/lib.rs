// hybrid-assistant - cloud answers behind local compliance checks
// Library exports

pub mod audit;
pub mod cli;
pub mod cloud;
pub mod compliance;
pub mod config;
pub mod errors;
pub mod local;
pub mod pipeline;
pub mod server;
