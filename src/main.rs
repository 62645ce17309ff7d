use std::path::PathBuf;

use clap::Parser;
use log::info;

use pid_step_response::analysis::{render_step_response, StepMetrics};
use pid_step_response::benchmark::RunTimings;
use pid_step_response::config::{load_config, AppConfig, DEFAULT_CONFIG_PATH};
use pid_step_response::error::Result;
use pid_step_response::export::export_csv;
use pid_step_response::input::{parse_field, parse_gains, GainInput};
use pid_step_response::ipc::ResultStore;
use pid_step_response::threaded_impl::{run_parallel, spawn_timed_simulation};
use pid_step_response::SimulationRequest;

#[derive(Parser)]
#[clap(version, about = "Open-loop vs closed-loop PID step response of G(s) = 4/(s^2 + 2s)")]
struct Opts {
    /// TOML runtime configuration
    #[clap(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Proportional gain
    #[clap(long, allow_hyphen_values = true)]
    kp: Option<String>,
    /// Integral gain
    #[clap(long, allow_hyphen_values = true)]
    ki: Option<String>,
    /// Derivative gain
    #[clap(long, allow_hyphen_values = true)]
    kd: Option<String>,
    /// Damping ratio for pole-placement tuning (requires --omega-n)
    #[clap(long, requires = "omega_n", conflicts_with_all = ["kp", "ki", "kd"])]
    zeta: Option<String>,
    /// Natural frequency in rad/s for pole-placement tuning
    #[clap(long = "omega-n", requires = "zeta")]
    omega_n: Option<String>,
    /// Disable integral clamping
    #[clap(long)]
    no_anti_windup: bool,
    /// Derivative low-pass factor, clamped to [0.01, 0.5]
    #[clap(long)]
    filter_alpha: Option<String>,
    /// Write the four result columns to this CSV file
    #[clap(long)]
    csv: Option<PathBuf>,
    /// Write a PNG chart of both responses to this file
    #[clap(long)]
    chart: Option<PathBuf>,
    /// Repeat the run this many times in parallel and compare results
    #[clap(long, default_value_t = 1)]
    repeat: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Opts::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn build_request(opts: &Opts, cfg: &AppConfig) -> Result<SimulationRequest> {
    let mut controller_cfg = cfg.controller.clone();

    if let Some(text) = &opts.filter_alpha {
        controller_cfg.filter_alpha = parse_field("filter_alpha", text)?;
    }
    if opts.no_anti_windup {
        controller_cfg.anti_windup = false;
    }

    // Gains missing on the command line come from the config file.
    let gain_text = |flag: &Option<String>, fallback: f64| {
        flag.clone().unwrap_or_else(|| fallback.to_string())
    };
    let input = match (&opts.zeta, &opts.omega_n) {
        (Some(zeta), Some(omega_n)) => GainInput::parse_specifications(zeta, omega_n)?,
        _ => GainInput::Gains(parse_gains(
            &gain_text(&opts.kp, controller_cfg.kp),
            &gain_text(&opts.ki, controller_cfg.ki),
            &gain_text(&opts.kd, controller_cfg.kd),
        )?),
    };
    let mut controller = input.into_controller()?;
    controller_cfg.configure(&mut controller)?;

    let config = cfg.simulation.clone();
    config.validate()?;
    Ok(SimulationRequest { controller, config })
}

fn run(opts: Opts) -> Result<()> {
    println!("===========================================");
    println!("PID Step Response Simulation");
    println!("===========================================\n");

    let cfg = load_config(&opts.config);
    let request = build_request(&opts, &cfg)?;
    let gains = request.controller.gains();
    let (u_min, u_max) = request.controller.limits();
    println!("Gains: Kp = {}, Ki = {}, Kd = {}", gains.kp, gains.ki, gains.kd);
    println!(
        "Limits: [{}, {}], anti-windup: {}, filter alpha: {}",
        u_min,
        u_max,
        request.controller.anti_windup(),
        request.controller.filter_alpha()
    );
    println!(
        "Horizon: {} steps of {} s ({:.2} s)\n",
        request.config.steps,
        request.config.dt,
        request.config.horizon()
    );

    let store = ResultStore::new();
    let timings = RunTimings::new()?;

    let handle = spawn_timed_simulation(request.clone(), timings.clone())?;
    info!("Submitted run #{}", handle.run_id());
    let result = store.publish(handle.wait()?);

    let metrics = StepMetrics::analyze(result.time(), result.output_after())?;
    println!("=== Closed-Loop Metrics ===");
    println!("{}\n", metrics.report());

    if opts.repeat > 1 {
        let outcomes = run_parallel(vec![request; opts.repeat - 1], &timings)?;
        let mut identical = 0;
        for outcome in outcomes {
            if outcome? == *result {
                identical += 1;
            }
        }
        let report = timings.report();
        println!("=== Repeat Runs ===");
        println!("Identical to first run: {}/{}", identical, opts.repeat - 1);
        println!("Run P50: {:?}, P99: {:?}, Max: {:?}", report.p50, report.p99, report.max);
        println!();
    }

    if let Some(path) = opts.csv.as_ref().or(cfg.output.csv_path.as_ref()) {
        let latest = store.latest()?;
        export_csv(&latest, path)?;
        println!("Data exported to: {}", path.display());
    }
    if let Some(path) = opts.chart.as_ref().or(cfg.output.chart_path.as_ref()) {
        let latest = store.latest()?;
        render_step_response(&latest, path)?;
        println!("Chart saved to: {}", path.display());
    }

    Ok(())
}
