//! # Motor Neuron Simulation CLI
//!
//! Command-line interface for single runs, parameter sweeps, and a
//! solver sanity demo.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use motoneuron_sim::model::{NAI_REST, V_REST};
use motoneuron_sim::prelude::*;

/// Conductance-based motor neuron simulator
#[derive(Parser)]
#[command(name = "motoneuron_cli")]
#[command(version = "0.1.0")]
#[command(about = "Simulate a motor neuron and extract spike/AHP features")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation and report its feature summary
    Run(RunArgs),

    /// Sweep one parameter across a grid, one run per point
    Sweep(SweepArgs),

    /// Hold the resting state with both solvers and report drift
    Demo,
}

#[derive(Args)]
struct RunArgs {
    /// Step stimulus amplitude (pA)
    #[arg(short, long, default_value = "50.0")]
    inj: f64,

    /// Stimulus onset (ms)
    #[arg(long, default_value = "1000.0")]
    onset: f64,

    /// Stimulus duration (ms)
    #[arg(long, default_value = "5000.0")]
    duration: f64,

    /// Simulation horizon (ms)
    #[arg(short, long, default_value = "8000.0")]
    t_end: f64,

    /// Pump half-activation concentration naih (M)
    #[arg(long)]
    naih: Option<f64>,

    /// Pump sigmoid slope nais (M)
    #[arg(long)]
    nais: Option<f64>,

    /// Pump maximal current Imax (pA)
    #[arg(long)]
    imax: Option<f64>,

    /// Disable the Na/K pump
    #[arg(long)]
    no_pump: bool,

    /// Freeze the intracellular sodium concentration
    #[arg(long)]
    fixed_sodium: bool,

    /// Use the fixed sodium reversal potential instead of the Nernst value
    #[arg(long)]
    fixed_reversal: bool,

    /// Integrator: dopri5 or rk4
    #[arg(short, long, default_value = "dopri5")]
    solver: String,

    /// JSON file with a full parameter set (overrides the defaults)
    #[arg(short, long)]
    params: Option<String>,

    /// Write the sampled trajectory to a CSV file
    #[arg(long)]
    trace: Option<String>,

    /// Write the feature summary to a JSON file
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args)]
struct SweepArgs {
    /// Parameter to vary: naih or amplitude
    #[arg(short = 'P', long, default_value = "naih")]
    parameter: String,

    /// Grid start value
    #[arg(long, default_value = "0.035")]
    start: f64,

    /// Grid stop value
    #[arg(long, default_value = "0.070")]
    stop: f64,

    /// Number of grid points
    #[arg(short = 'n', long, default_value = "8")]
    points: usize,

    /// Step stimulus amplitude (pA), the base value when sweeping naih
    #[arg(short, long, default_value = "50.0")]
    inj: f64,

    /// Stimulus onset (ms)
    #[arg(long, default_value = "1000.0")]
    onset: f64,

    /// Stimulus duration (ms)
    #[arg(long, default_value = "5000.0")]
    duration: f64,

    /// Simulation horizon (ms)
    #[arg(short, long, default_value = "8000.0")]
    t_end: f64,

    /// Write the summary table to a CSV file
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_simulation(args)?,
        Commands::Sweep(args) => run_sweep(args)?,
        Commands::Demo => demo_solvers()?,
    }

    Ok(())
}

fn run_simulation(args: RunArgs) -> Result<()> {
    let mut params = match &args.params {
        Some(path) => load_params(path)?,
        None => Parameters::default(),
    };

    if let Some(naih) = args.naih {
        params.pump.na_half = naih;
    }
    if let Some(nais) = args.nais {
        params.pump.na_slope = nais;
    }
    if let Some(imax) = args.imax {
        params.pump.i_max = imax;
    }
    if args.no_pump {
        params.pump_on = false;
    }
    if args.fixed_sodium {
        params.dynamic_sodium = false;
    }
    if args.fixed_reversal {
        params.dynamic_reversal = false;
    }

    let solver: SolverKind = args.solver.parse()?;
    let config = SimulationConfig::new(args.t_end).with_solver(solver);
    let sim = Simulation::new(params, config)?;

    let pulse = StepPulse::new(args.inj, args.onset, args.duration);
    let start = std::time::Instant::now();
    let trajectory = sim.run(&pulse)?;
    info!("integrated {} samples in {:?}", trajectory.len(), start.elapsed());

    let features = FeatureExtractor::default().extract(
        trajectory.times(),
        &trajectory.voltage(),
        StimulusWindow::from(&pulse),
    );
    report_features(&features);

    if let Some(path) = &args.trace {
        save_trace_csv(&trajectory, path)?;
        info!("Trajectory saved to {}", path);
    }
    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(&features)?)?;
        info!("Feature summary saved to {}", path);
    }

    Ok(())
}

fn report_features(features: &FeatureSummary) {
    info!("=== Feature Summary ===");
    info!("Spikes:                {}", features.spike_count);
    info!(
        "Delay to first spike:  {}",
        fmt_opt(features.delay_to_first_spike, "ms")
    );
    info!(
        "Firing rate mean/ini/fin: {:.2} / {:.2} / {:.2} Hz",
        features.mean_firing_rate, features.initial_firing_rate, features.final_firing_rate
    );
    info!(
        "Adaptation slope:      {}",
        fmt_opt(features.adaptation_slope, "Hz/ms")
    );
    info!(
        "AHP amplitude:         {}",
        fmt_opt(features.ahp_amplitude, "mV")
    );
    info!(
        "AHP recovery 25/50/75: {} / {} / {}",
        fmt_opt(features.ahp_recovery_25, "ms"),
        fmt_opt(features.ahp_recovery_50, "ms"),
        fmt_opt(features.ahp_recovery_75, "ms")
    );
    info!(
        "Spiking integrity:     {}",
        fmt_opt(features.spiking_integrity, "%")
    );
    info!(
        "Mean trough voltage:   {}",
        fmt_opt(features.mean_trough_voltage, "mV")
    );
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.3} {}", v, unit),
        None => "n/a".to_string(),
    }
}

fn load_params(path: &str) -> Result<Parameters> {
    let text = std::fs::read_to_string(path)?;
    let params: Parameters = serde_json::from_str(&text)?;
    info!("Loaded parameters from {}", path);
    Ok(params)
}

fn save_trace_csv(trajectory: &Trajectory, path: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "time_ms", "v_mv", "m_nat", "h_nat", "m_nap", "n", "m_kf", "h_kf1", "h_kf2", "nai_m",
    ])?;

    for (t, z) in trajectory.times().iter().zip(trajectory.states()) {
        let mut record = Vec::with_capacity(10);
        record.push(t.to_string());
        record.extend(z.iter().map(|x| x.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn run_sweep(args: SweepArgs) -> Result<()> {
    let parameter: SweepParameter = args.parameter.parse()?;
    let sweep = Sweep::new(parameter, args.start, args.stop, args.points);

    let config = SimulationConfig::new(args.t_end);
    let pulse = StepPulse::new(args.inj, args.onset, args.duration);

    let start = std::time::Instant::now();
    let points = sweep.run(&Parameters::default(), &config, &pulse)?;
    info!("{} points in {:?}", points.len(), start.elapsed());

    info!("=== Sweep Results ===");
    for point in &points {
        match (&point.features, &point.error) {
            (Some(f), _) => info!(
                "{} = {:<12.6} spikes {:<4} mean rate {}",
                parameter,
                point.value,
                f.spike_count,
                fmt_opt(Some(f.mean_firing_rate), "Hz")
            ),
            (None, Some(e)) => info!("{} = {:<12.6} FAILED: {}", parameter, point.value, e),
            (None, None) => {}
        }
    }

    if let Some(path) = &args.output {
        save_sweep_csv(&points, path)?;
        info!("Sweep table saved to {}", path);
    }

    Ok(())
}

fn save_sweep_csv(points: &[SweepPoint], path: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "value",
        "spike_count",
        "delay_ms",
        "mean_rate_hz",
        "initial_rate_hz",
        "final_rate_hz",
        "adaptation_hz_per_ms",
        "ahp_amplitude_mv",
        "ahp_recovery25_ms",
        "ahp_recovery50_ms",
        "ahp_recovery75_ms",
        "integrity_pct",
        "mean_trough_mv",
        "error",
    ])?;

    for point in points {
        let row = match &point.features {
            Some(f) => vec![
                point.value.to_string(),
                f.spike_count.to_string(),
                opt_cell(f.delay_to_first_spike),
                f.mean_firing_rate.to_string(),
                f.initial_firing_rate.to_string(),
                f.final_firing_rate.to_string(),
                opt_cell(f.adaptation_slope),
                opt_cell(f.ahp_amplitude),
                opt_cell(f.ahp_recovery_25),
                opt_cell(f.ahp_recovery_50),
                opt_cell(f.ahp_recovery_75),
                opt_cell(f.spiking_integrity),
                opt_cell(f.mean_trough_voltage),
                String::new(),
            ],
            None => {
                let mut row = vec![point.value.to_string()];
                row.extend(std::iter::repeat(String::new()).take(12));
                row.push(point.error.clone().unwrap_or_default());
                row
            }
        };
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn demo_solvers() -> Result<()> {
    info!("=== Resting-State Solver Check ===");
    info!("Holding the documented rest for 1000 ms with zero injection");
    info!("Documented rest: V = {} mV, Nai = {} M", V_REST, NAI_REST);
    info!("");

    for kind in [SolverKind::Dopri5, SolverKind::Rk4] {
        let config = SimulationConfig::new(1000.0).with_solver(kind);
        let sim = Simulation::new(Parameters::default(), config)?;

        let start = std::time::Instant::now();
        let trajectory = sim.run(&0.0)?;
        let duration = start.elapsed();

        let last = trajectory.last_state().context("run produced no samples")?;
        info!("{} solver:", kind);
        info!("  Final V:   {:.6} mV (drift {:+.3e} mV)", last.v, last.v - V_REST);
        info!("  Final Nai: {:.8} M (drift {:+.3e} M)", last.nai, last.nai - NAI_REST);
        info!("  Time:      {:?}", duration);
        info!("");
    }

    Ok(())
}
