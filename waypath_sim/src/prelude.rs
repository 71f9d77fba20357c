// waypath_sim/src/prelude.rs

// Re-export the entire waypath_core prelude so binaries can reach the pure
// types like `Waypoint`, `PathPlanner` and `SimulationPlayer` in one import.
pub use waypath_core::prelude::*;

// Re-export common simulation-specific types.
pub use crate::simulation::config::structs::*;
pub use crate::simulation::config::{load_scenario, ScenarioCatalog};
pub use crate::simulation::core::runner::{run_playback, Pacing, RunSummary};
pub use crate::simulation::core::session::Session;
pub use crate::simulation::export::{convert_document, export_catalog, read_document, write_document};
