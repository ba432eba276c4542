use banner_core::platform::{Bounds, HeadlessHost};
use banner_core::{BannerContent, BannerResult, Config, ContentId, PresentRequest};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod cli;
mod logger;

/// A text banner as printed by the headless host.
struct TextBanner {
    id: ContentId,
    message: String,
    height: f64,
    /// Set once the last banner of the script leaves the overlay
    finished: Option<Arc<AtomicBool>>,
}

impl BannerContent for TextBanner {
    fn content_id(&self) -> ContentId {
        self.id
    }

    fn preferred_height(&self) -> f64 {
        self.height
    }

    fn on_detached(&mut self) {
        info!("{} dismissed: {}", self.id, self.message);
        if let Some(finished) = &self.finished {
            finished.store(true, Ordering::SeqCst);
        }
    }

    fn on_layout(&mut self, bounds: &Bounds) {
        debug!(
            "{} laid out at {}x{}",
            self.id, bounds.size.width, bounds.size.height
        );
    }
}

fn load_config(args: &cli::Args) -> BannerResult<Config> {
    let mut config = if args.use_defaults {
        info!("Using default configuration");
        Config::default()
    } else {
        let path = args.config_path.clone().map(cli::expand_home);
        let config = Config::load(path.as_deref(), true)?;
        if let Some(path) = &config.config_path {
            info!("Loaded config from {}", path.display());
        }
        config
    };

    if let Some(duration) = args.duration {
        config.default_duration_secs = duration;
    }
    if let Some(direction) = args.direction {
        config.direction = direction.into();
    }

    config.validate()?;
    Ok(config)
}

fn main() -> BannerResult<()> {
    let args = cli::parse_args();

    if let Err(e) = logger::init_logger(args.quiet, args.verbose) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!("Starting banner {}", banner_core::version());

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return Err(e);
        }
    };

    if args.dry_run {
        info!("Configuration is valid");
        return Ok(());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_ctrlc = shutdown.clone();
    ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down...");
        shutdown_ctrlc.store(true, Ordering::SeqCst);
    })
    .map_err(|e| format!("Error setting Ctrl+C handler: {e}"))?;

    let host = HeadlessHost::new(args.screen);
    let probe = host.probe();
    let app_surface = probe.focused();

    let script_shutdown = shutdown.clone();
    banner_core::start_with_config(host, config, shutdown, move |handle| {
        thread::spawn(move || {
            for index in 0..args.count {
                let last = index + 1 == args.count;
                let banner = TextBanner {
                    id: ContentId::next(),
                    message: if args.count > 1 {
                        format!("{} ({}/{})", args.message, index + 1, args.count)
                    } else {
                        args.message.clone()
                    },
                    height: args.height,
                    finished: last.then(|| script_shutdown.clone()),
                };
                let id = banner.id;
                let request = PresentRequest::new().animated(!args.no_animate);
                let queued = handle.present(
                    Box::new(banner),
                    request,
                    Some(Box::new(move || info!("{id} presented"))),
                );
                if !queued {
                    break;
                }
                if !last {
                    thread::sleep(Duration::from_millis(args.interval_ms));
                }
            }
        });
    })?;

    let focused = probe.focused();
    if focused == app_surface {
        debug!("Focus returned to surface {:?}", focused);
    } else {
        warn!("Focus ended on {:?} instead of {:?}", focused, app_surface);
    }
    info!("Banner stopped");
    Ok(())
}
