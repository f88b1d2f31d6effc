use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use heat2d::draw::{RerunConfig, RerunFieldView, save_session, start_session};
use heat2d::io::config_file::{read_config_builder, write_config};
use heat2d::sim::heat_transfer::stability::{max_stable_dt, stability_number};
use heat2d::sim::heat_transfer::{EnergyRecorder, is_stable};
use heat2d::{SimulationConfig, StepDriver, WallSet, initialize_grid};

/// 2D heat conduction on a rectangular grid with insulated and flux walls
#[derive(Parser)]
#[command(name = "heat2d")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Explicit finite-difference 2D heat equation solver", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and stream every step to Rerun
    Run(RunArgs),
    /// Validate parameters and report the stability number
    Check(ParamArgs),
    /// Write the resolved parameters to a JSON config file
    WriteConfig {
        /// Output path
        path: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
    },
}

/// Simulation parameters. Unset flags fall back to the config file, then to
/// the built-in defaults.
#[derive(Args, Debug)]
struct ParamArgs {
    /// JSON config file used as the base for the flags below
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Thermal diffusivity alpha [default: 0.000023]
    #[arg(long)]
    alpha: Option<f64>,

    /// Spatial step in x direction [default: 0.01]
    #[arg(long)]
    dx: Option<f64>,

    /// Spatial step in y direction [default: 0.01]
    #[arg(long)]
    dy: Option<f64>,

    /// Time step [default: 0.001]
    #[arg(long)]
    dt: Option<f64>,

    /// Number of grid points in x direction (rows) [default: 50]
    #[arg(long)]
    nx: Option<usize>,

    /// Number of grid points in y direction (columns) [default: 50]
    #[arg(long)]
    ny: Option<usize>,

    /// Number of time steps [default: 100]
    #[arg(long)]
    nt: Option<usize>,

    /// Heat source term Q [default: 0.05]
    #[arg(short, long = "q", allow_negative_numbers = true)]
    q: Option<f64>,

    /// Insulated walls, comma-separated, e.g. "top,left" ("" for none) [default: all]
    #[arg(long, value_parser = parse_walls)]
    insulated: Option<WallSet>,

    /// Constant-flux walls, comma-separated ("" for none) [default: none]
    #[arg(long, value_parser = parse_walls)]
    flux: Option<WallSet>,

    /// Split the interior update across threads
    #[arg(long)]
    parallel: bool,
}

fn parse_walls(s: &str) -> Result<WallSet, heat2d::ConfigError> {
    s.parse()
}

impl ParamArgs {
    fn to_config(&self) -> Result<SimulationConfig> {
        let mut b = match &self.config {
            Some(path) => read_config_builder(path)?,
            None => SimulationConfig::builder(),
        };
        if let Some(v) = self.alpha {
            b.alpha = v;
        }
        if let Some(v) = self.dx {
            b.dx = v;
        }
        if let Some(v) = self.dy {
            b.dy = v;
        }
        if let Some(v) = self.dt {
            b.dt = v;
        }
        if let Some(v) = self.nx {
            b.nx = v;
        }
        if let Some(v) = self.ny {
            b.ny = v;
        }
        if let Some(v) = self.nt {
            b.nt = v;
        }
        if let Some(v) = self.q {
            b.q = v;
        }
        if let Some(v) = self.insulated {
            b.insulated_walls = v;
        }
        if let Some(v) = self.flux {
            b.flux_walls = v;
        }
        if self.parallel {
            b.parallel = true;
        }

        let config = b.build().context("Invalid simulation parameters")?;
        Ok(config)
    }
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Do not open a viewer; only log progress
    #[arg(long)]
    headless: bool,

    /// Record to an .rrd file instead of spawning a viewer
    #[arg(long, conflicts_with = "headless")]
    save: Option<PathBuf>,

    /// Temperature shown as white in the viewer
    #[arg(long, default_value = "100.0")]
    t_max: f64,

    /// Number of worker threads for --parallel (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Print the run summary as JSON
    #[arg(long)]
    summary: bool,
}

fn report_stability(config: &SimulationConfig) {
    let number = stability_number(config);
    if is_stable(config) {
        info!(stability_number = number, "explicit scheme is stable");
    } else {
        warn!(
            stability_number = number,
            max_stable_dt = max_stable_dt(config),
            "alpha*dt*(1/dx^2 + 1/dy^2) exceeds 0.5; values will diverge"
        );
    }
}

fn run(args: RunArgs) -> Result<()> {
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("Failed to configure the thread pool")?;
    }

    let config = args.params.to_config()?;
    info!(
        insulated = %config.insulated_walls(),
        flux = %config.flux_walls(),
        q = config.q(),
        "walls"
    );
    report_stability(&config);

    let initial = initialize_grid(&config);
    let mut driver = StepDriver::new(initial, config)?;

    let summary = if args.headless {
        driver.run(&mut EnergyRecorder::default())?
    } else {
        let mut viz = RerunConfig::new();
        viz.t_max = args.t_max;
        let session = match &args.save {
            Some(path) => save_session(&viz, path)?,
            None => start_session(&viz)?,
        };
        let mut view = RerunFieldView::new(session, viz);
        driver.run(&mut view)?
    };

    info!(
        steps = summary.steps,
        initial_energy = summary.initial_energy,
        final_energy = summary.final_energy,
        max = summary.max_value,
        min = summary.min_value,
        "done"
    );
    if args.summary {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn check(params: ParamArgs) -> Result<()> {
    let config = params.to_config()?;
    report_stability(&config);
    let overlap = config.overlapping_walls();
    if !overlap.is_empty() {
        warn!(walls = %overlap, "walls in both sets receive the insulation copy plus Q");
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Check(params) => check(params),
        Commands::WriteConfig { path, params } => {
            let config = params.to_config()?;
            write_config(&path, &config)?;
            info!(path = %path.display(), "config written");
            Ok(())
        }
    }
}
