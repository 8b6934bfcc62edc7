use orbsim::{Scenario, ScenarioConfig};
use orbsim::bench_update_modes;

use clap::Parser;
use anyhow::{Context, Result};

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`; the built-in inner planets preset when omitted
    #[arg(short, long)]
    file: Option<String>,

    /// Number of steps; derived from `t_end / h0` when omitted
    #[arg(short, long)]
    steps: Option<usize>,

    /// Log positions every N steps (0 = only at the end)
    #[arg(short, long, default_value_t = 0)]
    report_every: usize,

    /// Time the update modes instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario(file: Option<&str>) -> Result<ScenarioConfig> {
    let Some(file_name) = file else {
        return Ok(ScenarioConfig::inner_planets());
    };

    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let cfg = ScenarioConfig::from_file(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;
    Ok(cfg)
}

fn report(scenario: &Scenario) {
    log::info!("t = {:.0} s after {} steps", scenario.time(), scenario.step_count());
    for (i, body) in scenario.bodies().iter().enumerate() {
        log::info!(
            "body {i}: x = ({:.2}, {:.2}), speed = {:.2} m/s, force = {:.4e} N",
            body.x.x,
            body.x.y,
            scenario.real_speed(i).unwrap_or(0.0),
            scenario.real_force(i).unwrap_or(0.0),
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        bench_update_modes();
        return Ok(());
    }

    let cfg = load_scenario(args.file.as_deref())?;
    let mut scenario = Scenario::build_scenario(cfg)?;
    let steps = args.steps.unwrap_or_else(|| scenario.parameters.steps());

    for n in 1..=steps {
        scenario.tick();
        if args.report_every > 0 && n % args.report_every == 0 {
            report(&scenario);
        }
    }

    if let Some(tree) = scenario.tree() {
        log::info!(
            "last quadtree: {} bodies, {} nodes, depth {}",
            tree.len(),
            tree.node_count(),
            tree.depth()
        );
    }
    report(&scenario);

    Ok(())
}
