//! # Greenhouse Controller
//!
//! Loads the configuration, brings up a HAL driver and runs the controller
//! threads until interrupted.
//!
//! # Usage
//!
//! ```bash
//! # Simulation with factory defaults
//! greenhouse
//!
//! # Telemetry on stdout, commands from stdin
//! greenhouse --stdio
//!
//! # Explicit config and driver, verbose JSON logs
//! greenhouse --config /etc/greenhouse/greenhouse.toml --driver simulation -v --json
//! ```

use clap::Parser;
use greenhouse_common::config::{ConfigLoader, GreenhouseConfig};
use greenhouse_controller::Greenhouse;
use greenhouse_hal::DriverRegistry;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Greenhouse Controller - sensor sampling, threshold actuation, serial channel and console
#[derive(Parser, Debug)]
#[command(name = "greenhouse")]
#[command(version)]
#[command(about = "Automated greenhouse controller")]
#[command(long_about = None)]
struct Args {
    /// Path to the TOML configuration. Factory defaults are used when absent.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// HAL driver to load.
    #[arg(short, long, default_value = "simulation")]
    driver: String,

    /// Bridge the simulated serial port to stdin/stdout.
    #[arg(long)]
    stdio: bool,

    /// Print the built-in drivers and exit.
    #[arg(long)]
    list_drivers: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    if args.list_drivers {
        for entry in DriverRegistry::with_builtin_drivers().entries() {
            println!("{:<18} {}", entry.name, entry.summary);
        }
        return;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet.
            eprintln!("FATAL: {e}");
            process::exit(1);
        }
    };
    setup_tracing(&args, &config);

    info!("Greenhouse Controller v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Greenhouse Controller shutdown complete");
}

fn load_config(args: &Args) -> Result<GreenhouseConfig, Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => Ok(GreenhouseConfig::load(path)?),
        None => Ok(GreenhouseConfig::default()),
    }
}

fn run(args: &Args, config: &GreenhouseConfig) -> Result<(), Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file given, using defaults"),
    }

    if detect_rt_mode() {
        info!("Running under a real-time scheduler policy");
    } else {
        info!("Running in standard (non-RT) mode");
    }

    let driver_name = if args.stdio && args.driver == "simulation" {
        "simulation-stdio"
    } else {
        args.driver.as_str()
    };

    let registry = DriverRegistry::with_builtin_drivers();
    let mut driver = registry.create_driver(driver_name)?;
    info!("Using driver '{}' v{}", driver.name(), driver.version());
    driver.init(config)?;
    let peripherals = driver.take_peripherals()?;

    let greenhouse = Greenhouse::start(config, peripherals)?;

    let running = greenhouse.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    greenhouse.wait();
    greenhouse.shutdown();
    driver.shutdown()?;
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
/// Logs go to stderr; stdout may carry telemetry.
fn setup_tracing(args: &Args, config: &GreenhouseConfig) {
    let directive = if args.verbose {
        "debug"
    } else {
        config.shared.log_level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Detect if running in real-time mode by checking scheduler policy.
fn detect_rt_mode() -> bool {
    #[cfg(target_os = "linux")]
    {
        use libc::{SCHED_FIFO, SCHED_RR, sched_getscheduler};
        // SAFETY: querying the calling process's policy has no preconditions.
        unsafe {
            let policy = sched_getscheduler(0);
            policy == SCHED_FIFO || policy == SCHED_RR
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}
