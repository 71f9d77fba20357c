// waypath_sim/src/simulation/core/mod.rs

pub mod runner;
pub mod session;
