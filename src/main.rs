use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use print_osd::{CameraService, Config, ConsoleSink, MockSource, Poller, PrinterService};

/// print-osd - show OctoPrint job status on a camera's on-screen display.
///
/// Every `interval` seconds the job and printer endpoints of OctoPrint are
/// read, merged into one status record and pushed to the camera as a
/// five-line custom title:
///
/// ```text
/// State: Printing
/// Progress: 42.50 %
/// Bed: 60.1 °C (60.0 °C)
/// Tool: 200.3 °C (200.0 °C)
/// Print Time: 01:23:45
/// ```
///
/// # Usage
///
/// ```bash
/// # Run against the configured printer and camera:
/// ./print-osd --config /etc/print-osd/config.toml
///
/// # Check camera reachability and credentials, then exit:
/// ./print-osd --test-connect
///
/// # Verbose logging:
/// RUST_LOG=debug ./print-osd
/// ```
#[derive(Debug, Parser)]
#[command(version, about = "Push OctoPrint status to a camera OSD")]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, env = "PRINT_OSD_CONFIG", default_value = print_osd::config::constants::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Push a placeholder title to the camera and exit.
    #[arg(long)]
    test_connect: bool,

    /// Run a single poll cycle and exit.
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    // Initialize logger to output to stdout, using RUST_LOG env var or info level by default
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stdout)
        .filter_level(
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|level| level.parse().ok())
                .unwrap_or(log::LevelFilter::Info),
        )
        .init();

    let args = Args::parse();

    info!("Reading {}", args.config.display());
    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            info!("Done");
            std::process::exit(1);
        }
    };

    info!("Starting ...");
    info!("Using OctoPrint at {}", config.octo_base_url());
    info!("Using camera at {}", config.cam_base_url());

    let interval = config.interval_seconds();
    info!("Interval: {} seconds", interval);

    if args.test_connect {
        let camera = CameraService::new(
            config.cam_base_url(),
            config.cam_user.clone(),
            config.cam_password.clone(),
        )?;
        let reply = camera.test_connection()?;
        info!("Camera replied: {}", reply.trim());
        return Ok(());
    }

    if config.is_mock() {
        info!("Mock mode enabled, reading fixtures and printing to the console");
        let poller = Poller::new(MockSource::from_default_fixtures(), ConsoleSink, interval);
        drive(poller, args.once)
    } else {
        let printer = PrinterService::new(config.octo_base_url(), config.octo_api_key.clone())?;
        let camera = CameraService::new(
            config.cam_base_url(),
            config.cam_user.clone(),
            config.cam_password.clone(),
        )?;
        drive(Poller::new(printer, camera, interval), args.once)
    }
}

fn drive<S, K>(mut poller: Poller<S, K>, once: bool) -> Result<()>
where
    S: print_osd::StatusSource,
    K: print_osd::OsdSink,
{
    if once {
        poller.run_cycle()?;
        return Ok(());
    }

    poller.run()
}
