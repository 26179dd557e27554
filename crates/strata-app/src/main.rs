// strata: replay a pointer script against a block document without a renderer.
// Prints the resulting document and everything the engine showed as JSON.

mod replay;
mod scenario;
mod settings;


use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use replay::Replay;

#[derive(Parser)]
#[command(name = "strata", version, about = "Replay pointer scripts against a block document")]
struct Cli {
    /// Scenario file: document, block rectangles, scroll metrics and steps.
    #[arg(required_unless_present = "init_settings")]
    scenario: Option<PathBuf>,

    /// Settings file to use instead of the one in the config directory.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,

    /// Write default settings to the settings path and exit.
    #[arg(long)]
    init_settings: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        eprintln!("strata: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if cli.init_settings {
        let defaults = settings::StrataSettings::default();
        let path = match &cli.settings {
            Some(path) => settings::save_settings_to(path, &defaults).then(|| path.clone()),
            None => settings::save_settings(&defaults),
        };
        let path = path.ok_or("failed to write settings")?;
        println!("{}", path.display());
        return Ok(());
    }

    let settings = match &cli.settings {
        Some(path) => settings::load_settings_from(path),
        None => settings::load_settings(),
    };
    let scenario_path = cli.scenario.as_ref().ok_or("no scenario given")?;
    let scenario = scenario::load_scenario(scenario_path)?;

    let mut replay = Replay::new(&scenario, &settings)?;
    replay.run(&scenario.steps);
    let report = replay.finish();

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}
