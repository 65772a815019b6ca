use std::path::PathBuf;

use bossfight_cli::commands::{self, SettingsArgs, SimulateArgs, SweepArgs};
use bossfight_cli::{CliContext, CliSettings, logging};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Boss encounter simulator and balance tool")]
struct Cli {
    /// Balance directory (overrides the saved setting)
    #[arg(short, long, global = true)]
    balance: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one fight with a scripted player and print its timeline
    Simulate {
        #[arg(long, default_value = "cyberboss")]
        boss: String,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        threat: Option<u32>,
        #[arg(long, default_value_t = 300.0)]
        seconds: f64,
        /// Player damage per second
        #[arg(long, default_value_t = 400.0)]
        dps: f64,
        /// Only print the summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Run many fights in parallel and tabulate outcomes
    Sweep {
        /// Boss ids (all archetypes when omitted)
        #[arg(long = "boss")]
        bosses: Vec<String>,
        #[arg(long, default_value_t = 0)]
        threat_min: u32,
        #[arg(long, default_value_t = 5)]
        threat_max: u32,
        #[arg(long, default_value_t = 8)]
        seeds: u64,
        #[arg(long, default_value_t = 300.0)]
        seconds: f64,
        #[arg(long, default_value_t = 400.0)]
        dps: f64,
    },
    /// Print the merged balance config as TOML
    ExportConfig {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check the balance config for values that disable mechanics
    Validate,
    /// Show or update saved defaults
    Settings {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        threat: Option<u32>,
        #[arg(long)]
        tick_rate: Option<f64>,
        #[arg(long)]
        balance_dir: Option<PathBuf>,
        #[arg(long)]
        clear_balance_dir: bool,
    },
}

fn main() -> Result<(), String> {
    logging::init();
    let cli = Cli::parse();
    let context = || CliContext::load(cli.balance.as_deref());

    match cli.command {
        Commands::Settings {
            seed,
            threat,
            tick_rate,
            balance_dir,
            clear_balance_dir,
        } => commands::settings(
            CliSettings::load(),
            SettingsArgs {
                seed,
                threat,
                tick_rate,
                balance_dir,
                clear_balance_dir,
            },
        ),
        Commands::Simulate {
            boss,
            seed,
            threat,
            seconds,
            dps,
            quiet,
        } => commands::simulate(
            &context()?,
            SimulateArgs {
                boss,
                seed,
                threat,
                seconds,
                dps,
                quiet,
            },
        ),
        Commands::Sweep {
            bosses,
            threat_min,
            threat_max,
            seeds,
            seconds,
            dps,
        } => commands::sweep(
            &context()?,
            SweepArgs {
                bosses,
                threat_min,
                threat_max,
                seeds,
                seconds,
                dps,
            },
        ),
        Commands::ExportConfig { output } => commands::export_config(&context()?, output.as_deref()),
        Commands::Validate => commands::validate(&context()?),
    }
}
