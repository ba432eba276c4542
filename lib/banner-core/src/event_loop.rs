use crate::config::Config;
use crate::controller::BannerController;
use crate::platform::SurfaceHostImpl;
use crate::BannerResult;
use log::trace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Longest the loop sleeps before checking the shutdown flag again.
const IDLE_POLL: Duration = Duration::from_millis(100);

pub struct BannerEventLoop {}

impl BannerEventLoop {
    /// Drives `controller` until `shutdown` is set: applies commands as they arrive, renders
    /// animation frames at the configured rate and fires the dismiss timer on time.
    pub async fn run<H: SurfaceHostImpl>(
        controller: &mut BannerController<H>,
        shutdown: Arc<AtomicBool>,
    ) -> BannerResult<()> {
        trace!("Running banner event loop...");

        let fps = Config::animation_fps();
        let frame_duration = Duration::from_secs_f64(1.0 / fps as f64);

        while !shutdown.load(Ordering::SeqCst) {
            controller.tick();
            if shutdown.load(Ordering::SeqCst) {
                break;
            }

            let wait = if controller.is_animating() {
                frame_duration
            } else {
                controller
                    .next_wakeup()
                    .map(|at| at.saturating_duration_since(controller.now()))
                    .unwrap_or(IDLE_POLL)
                    .min(IDLE_POLL)
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                received = controller.process_next_command() => {
                    if !received {
                        break;
                    }
                }
            }
        }

        trace!("Banner event loop stopped");
        Ok(())
    }
}
