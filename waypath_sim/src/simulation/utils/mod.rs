// waypath_sim/src/simulation/utils/mod.rs

pub mod scheduling;
