//! print-osd - show 3D printer status on a network camera's on-screen display.
//!
//! This library polls an OctoPrint server for job progress and temperatures,
//! merges both payloads into a single status record and pushes it to a
//! camera's custom OSD title on a fixed interval.
//!
//! # Core Components
//!
//! * [`config`] - Configuration file loading and validation
//! * [`status`] - Status record, payload parser and OSD formatter
//! * [`printer`] - OctoPrint API client
//! * [`camera`] - Camera OSD client
//! * [`mock`] - Fixture source and console sink for offline runs
//! * [`poller`] - Poll cycle and fixed-tick loop driver
//! * [`error`] - Error types for configuration and parsing
//!
//! # Quick Start
//!
//! ```no_run
//! use print_osd::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load(&config::default_config_path())?;
//! let printer = PrinterService::new(config.octo_base_url(), config.octo_api_key.clone())?;
//! let camera = CameraService::new(
//!     config.cam_base_url(),
//!     config.cam_user.clone(),
//!     config.cam_password.clone(),
//! )?;
//!
//! Poller::new(printer, camera, config.interval_seconds()).run();
//! # }
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod mock;
pub mod poller;
pub mod printer;
pub mod status;

// Re-export commonly used types for convenience
pub use camera::CameraService;
pub use config::Config;
pub use error::{ConfigError, StatusError};
pub use mock::{ConsoleSink, MockSource};
pub use poller::{OsdSink, Poller, StatusSource};
pub use printer::PrinterService;
pub use status::PrinterStatus;
