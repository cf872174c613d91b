pub mod autoplay;
pub mod chart;
pub mod config;
pub mod controller;
pub mod distribution;
pub mod error;
pub mod explorer;
pub mod montage;
pub mod report;
pub mod scheduler;
pub mod surface;

pub use error::{Result, VizError};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "distviz=info";

/// Install the fmt subscriber, honoring `RUST_LOG` when set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .init();
}
