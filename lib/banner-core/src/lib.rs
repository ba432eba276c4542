use crate::clock::RuntimeClock;
use crate::config::ConfigError;
use crate::event_loop::BannerEventLoop;
use crate::platform::{PlatformError, SurfaceHostImpl};
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub mod animation;
pub mod bridge;
pub mod clock;
pub mod config;
pub mod content;
pub mod controller;
pub mod event_loop;
pub mod overlay_window;
pub mod paths;
pub mod platform;
pub mod profile;

pub use bridge::{BannerCommand, BannerHandle, Completion};
pub use config::Config;
pub use content::{BannerContent, ContentId, DEFAULT_CONTENT_HEIGHT};
pub use controller::{BannerController, BannerPhase, PendingDismiss, PresentRequest};
pub use profile::{
    AnimationCurve, AnimationOptions, AnimationProfile, BannerAttributes, SlideDirection,
    SlideProfile,
};

pub fn version() -> &'static str {
    option_env!("VERSION").unwrap_or("v0.0.0-dev")
}

pub fn start_with_config<H, F>(
    host: H,
    config: Config,
    shutdown: Arc<AtomicBool>,
    on_ready: F,
) -> BannerResult<()>
where
    H: SurfaceHostImpl,
    F: FnOnce(BannerHandle),
{
    Config::set_config(config)?;
    start(host, shutdown, on_ready)
}

/// Runs a banner controller for `host` on the current thread until `shutdown` is set.
///
/// `on_ready` receives a handle to the controller before the loop starts. It can be moved to
/// other threads to present and dismiss banners.
pub fn start<H, F>(host: H, shutdown: Arc<AtomicBool>, on_ready: F) -> BannerResult<()>
where
    H: SurfaceHostImpl,
    F: FnOnce(BannerHandle),
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to build banner runtime: {e}"))?;

    runtime.block_on(async move {
        let mut controller = BannerController::with_clock(host, RuntimeClock);
        on_ready(controller.handle());
        BannerEventLoop::run(&mut controller, shutdown).await
    })
}

#[derive(Debug)]
pub enum BannerFatalError {
    Error(String),
    ConfigError(ConfigError),
    PlatformError(PlatformError),
}

pub type BannerResult<T> = Result<T, BannerFatalError>;

impl fmt::Display for BannerFatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BannerFatalError::Error(message) => write!(f, "{message}"),
            BannerFatalError::ConfigError(error) => write!(f, "{error}"),
            BannerFatalError::PlatformError(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for BannerFatalError {}

impl From<PlatformError> for BannerFatalError {
    fn from(error: PlatformError) -> Self {
        BannerFatalError::PlatformError(error)
    }
}

impl From<ConfigError> for BannerFatalError {
    fn from(error: ConfigError) -> Self {
        BannerFatalError::ConfigError(error)
    }
}

impl From<&str> for BannerFatalError {
    fn from(value: &str) -> Self {
        BannerFatalError::Error(value.to_owned())
    }
}

impl From<String> for BannerFatalError {
    fn from(error: String) -> Self {
        BannerFatalError::Error(error)
    }
}
