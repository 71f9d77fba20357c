// waypath_sim/src/simulation/export.rs

//! Moving plans between scenario files and exported documents.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use waypath_core::prelude::*;

use crate::simulation::config::{load_scenario, scenario_to_toml, ScenarioCatalog, ScenarioConfig};
use crate::simulation::core::session::Session;

/// Writes a document as pretty JSON, creating parent directories as needed.
pub fn write_document(document: &PathDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    let json = document.to_json()?;
    fs::write(path, json).with_context(|| format!("writing document {}", path.display()))?;
    info!("Wrote document '{}' to {}", document.name, path.display());
    Ok(())
}

pub fn read_document(path: &Path) -> Result<PathDocument> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading document {}", path.display()))?;
    let document = PathDocument::from_json(&text)
        .with_context(|| format!("importing document {}", path.display()))?;
    Ok(document)
}

/// Rebuilds a scenario from a document. Simulation settings fall back to
/// their defaults since documents do not carry them.
pub fn document_to_scenario(document: &PathDocument) -> ScenarioConfig {
    ScenarioConfig {
        name: document.name.clone(),
        planner: document.config,
        waypoints: document.waypoints.clone(),
        ..ScenarioConfig::default()
    }
}

/// Converts an exported document into a scenario TOML file.
pub fn convert_document(document_path: &Path, output: &Path) -> Result<()> {
    let document = read_document(document_path)?;
    let scenario = document_to_scenario(&document);
    let text = scenario_to_toml(&scenario).context("serializing scenario")?;
    fs::write(output, text).with_context(|| format!("writing scenario {}", output.display()))?;
    info!(
        "Converted '{}' ({} waypoints) to {}",
        scenario.name,
        scenario.waypoints.len(),
        output.display()
    );
    Ok(())
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// Plans every scenario under `dir` and writes one document per scenario into
/// `out`, named after the scenario's catalog key. Failures are logged and
/// skipped.
pub fn export_catalog(dir: &Path, out: &Path) -> Result<BatchReport> {
    let catalog = ScenarioCatalog::discover(dir);
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let mut report = BatchReport::default();
    for (key, path) in catalog.iter() {
        match export_one(path, &out.join(format!("{key}.json"))) {
            Ok(written) => report.written.push(written),
            Err(e) => {
                error!("Skipping scenario '{}': {:#}", key, e);
                report.failed.push(key.clone());
            }
        }
    }

    info!(
        "Batch export finished: {} written, {} failed",
        report.written.len(),
        report.failed.len()
    );
    Ok(report)
}

fn export_one(scenario_path: &Path, output: &Path) -> Result<PathBuf> {
    let scenario = load_scenario(scenario_path)?;
    let session = Session::from_scenario(&scenario)?;
    write_document(&session.to_document(), output)?;
    Ok(output.to_path_buf())
}
