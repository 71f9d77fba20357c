// waypath_sim/src/main.rs

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use waypath_sim::cli::{Cli, Command, ReplayArgs};
use waypath_sim::prelude::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    waypath_sim::init_logging(cli.log_level.as_deref());

    match cli.command {
        Command::Plan { scenario, output } => {
            let scenario = load_scenario(&scenario)
                .with_context(|| format!("loading scenario {}", scenario.display()))?;
            let session = Session::from_scenario(&scenario)?;
            if let Some(output) = output {
                write_document(&session.to_document(), &output)?;
            }
        }
        Command::Replay(args) => replay(args)?,
        Command::Batch { dir, out } => {
            let report = export_catalog(&dir, &out)?;
            if report.written.is_empty() && !report.failed.is_empty() {
                bail!("no scenario under {} could be planned", dir.display());
            }
        }
        Command::Convert { document, output } => convert_document(&document, &output)?,
    }
    Ok(())
}

fn replay(args: ReplayArgs) -> Result<()> {
    let (mut session, mut simulation) = match (&args.scenario, &args.document) {
        (Some(path), _) => {
            let scenario = load_scenario(path)
                .with_context(|| format!("loading scenario {}", path.display()))?;
            (Session::from_scenario(&scenario)?, scenario.simulation)
        }
        (None, Some(path)) => {
            let document = read_document(path)?;
            let settings = PlaybackSettings {
                default_stop_duration: document.config.path.default_stop_duration,
                ..PlaybackSettings::default()
            };
            (
                Session::from_document(&document, settings)?,
                SimulationSettings::default(),
            )
        }
        (None, None) => bail!("replay needs --scenario or --document"),
    };

    if let Some(speed) = args.speed {
        simulation.speed_factor = speed;
        session.player.set_speed_factor(speed);
    }

    let pacing = if args.headless_fast {
        Pacing::Fast
    } else {
        Pacing::RealTime
    };
    info!(
        "Replaying '{}' at {}x, {} Hz ({:?})",
        session.name, simulation.speed_factor, simulation.tick_rate_hz, pacing
    );

    run_playback(&mut session.player, &simulation, pacing)?;
    Ok(())
}
