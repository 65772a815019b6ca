use std::path::Path;

use bossfight_core::BossArchetype;
use bossfight_core::config::{export_balance_config, save_balance_config, validate_balance_config};
use rayon::prelude::*;

use crate::context::{CliContext, CliSettings, error_chain};
use crate::sim::{Outcome, SimOptions, SimOutcome, run_simulation};

pub struct SimulateArgs {
    pub boss: String,
    pub seed: Option<u64>,
    pub threat: Option<u32>,
    pub seconds: f64,
    pub dps: f64,
    pub quiet: bool,
}

pub fn simulate(ctx: &CliContext, args: SimulateArgs) -> Result<(), String> {
    let threat_level = args.threat.unwrap_or(ctx.settings.threat_level);
    let mut options = SimOptions::new(args.boss);
    options.seed = args.seed.unwrap_or(ctx.settings.seed);
    options.threat_level = threat_level;
    options.difficulty = ctx.difficulty(threat_level);
    options.time_limit = args.seconds;
    options.tick_rate = ctx.settings.tick_rate;
    options.player_dps = args.dps;
    options.echo_signals = !args.quiet;

    let result = run_simulation(&ctx.balance, &options);
    print_outcome(&result);
    Ok(())
}

pub struct SweepArgs {
    pub bosses: Vec<String>,
    pub threat_min: u32,
    pub threat_max: u32,
    pub seeds: u64,
    pub seconds: f64,
    pub dps: f64,
}

/// Run every boss × threat level × seed combination in parallel.
pub fn sweep(ctx: &CliContext, args: SweepArgs) -> Result<(), String> {
    if args.threat_max < args.threat_min {
        return Err(format!(
            "threat range is empty ({}..={})",
            args.threat_min, args.threat_max
        ));
    }
    let bosses = if args.bosses.is_empty() {
        BossArchetype::ALL.iter().map(|a| a.config_key().to_string()).collect()
    } else {
        args.bosses
    };

    let mut runs = Vec::new();
    for boss in &bosses {
        for threat_level in args.threat_min..=args.threat_max {
            for seed in 0..args.seeds.max(1) {
                let mut options = SimOptions::new(boss.clone());
                options.seed = ctx.settings.seed.wrapping_add(seed);
                options.threat_level = threat_level;
                options.difficulty = ctx.difficulty(threat_level);
                options.time_limit = args.seconds;
                options.tick_rate = ctx.settings.tick_rate;
                options.player_dps = args.dps;
                runs.push(options);
            }
        }
    }
    tracing::info!(runs = runs.len(), "Starting sweep");

    let results: Vec<SimOutcome> = runs
        .par_iter()
        .map(|options| run_simulation(&ctx.balance, options))
        .collect();

    println!(
        "{:<16} {:>6} {:>5} {:>5} {:>5} {:>9} {:>9}",
        "boss", "threat", "wins", "loss", "t/o", "avg time", "avg hp"
    );
    for boss in &bosses {
        for threat_level in args.threat_min..=args.threat_max {
            let group: Vec<&SimOutcome> = results
                .iter()
                .filter(|r| &r.boss_id == boss && r.threat_level == threat_level)
                .collect();
            let count = |o: Outcome| group.iter().filter(|r| r.outcome == o).count();
            let n = group.len().max(1) as f64;
            let avg_time = group.iter().map(|r| r.elapsed).sum::<f64>() / n;
            let avg_hp = group.iter().map(|r| r.player_health).sum::<f64>() / n;
            println!(
                "{:<16} {:>6} {:>5} {:>5} {:>5} {:>8.1}s {:>9.1}",
                boss,
                threat_level,
                count(Outcome::Victory),
                count(Outcome::Defeat),
                count(Outcome::Timeout),
                avg_time,
                avg_hp
            );
        }
    }
    Ok(())
}

pub fn export_config(ctx: &CliContext, output: Option<&Path>) -> Result<(), String> {
    match output {
        Some(path) => {
            save_balance_config(&ctx.balance, path).map_err(|e| error_chain(&e))?;
            println!("wrote {}", path.display());
        }
        None => {
            let toml = export_balance_config(&ctx.balance).map_err(|e| error_chain(&e))?;
            print!("{toml}");
        }
    }
    Ok(())
}

/// Print validation warnings; fails when any are found.
pub fn validate(ctx: &CliContext) -> Result<(), String> {
    let warnings = validate_balance_config(&ctx.balance);
    if warnings.is_empty() {
        println!("balance config OK ({} bosses)", ctx.balance.bosses.len());
        return Ok(());
    }
    for warning in &warnings {
        println!("warning: {warning}");
    }
    Err(format!("{} warning(s)", warnings.len()))
}

pub struct SettingsArgs {
    pub seed: Option<u64>,
    pub threat: Option<u32>,
    pub tick_rate: Option<f64>,
    pub balance_dir: Option<std::path::PathBuf>,
    pub clear_balance_dir: bool,
}

/// Show persisted defaults, updating any that were passed.
pub fn settings(mut settings: CliSettings, args: SettingsArgs) -> Result<(), String> {
    let before = settings.clone();
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(threat) = args.threat {
        settings.threat_level = threat;
    }
    if let Some(rate) = args.tick_rate {
        if !(rate > 0.0) {
            return Err(format!("tick rate must be positive, got {rate}"));
        }
        settings.tick_rate = rate;
    }
    if args.clear_balance_dir {
        settings.balance_dir = None;
    } else if let Some(dir) = args.balance_dir {
        settings.balance_dir = Some(dir);
    }
    if settings != before {
        settings.save()?;
        tracing::info!("Settings saved");
    }

    if let Some(path) = CliSettings::path() {
        println!("settings file: {}", path.display());
    }
    println!("seed:         {}", settings.seed);
    println!("threat level: {}", settings.threat_level);
    println!("tick rate:    {}", settings.tick_rate);
    match &settings.balance_dir {
        Some(dir) => println!("balance dir:  {}", dir.display()),
        None => println!("balance dir:  (built-in defaults)"),
    }
    Ok(())
}

fn print_outcome(result: &SimOutcome) {
    for (elapsed, line) in &result.timeline {
        println!("[{elapsed:>7.2}] {line}");
    }
    println!();
    println!("boss:          {}", result.boss_id);
    println!("seed:          {}", result.seed);
    println!("threat level:  {}", result.threat_level);
    println!("outcome:       {}", result.outcome);
    println!("duration:      {:.1}s", result.elapsed);
    println!("phase reached: {}", result.phase_reached);
    println!("player hp:     {:.1}", result.player_health);
    println!("boss hp:       {:.1}%", result.boss_hp * 100.0);
    if result.pylons_destroyed > 0 {
        println!("pylons:        {}", result.pylons_destroyed);
    }
    if result.dashes > 0 {
        println!("dashes:        {}", result.dashes);
    }
}
