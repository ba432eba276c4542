//! The banner presentation state machine.
//!
//! ```text
//! Idle ──present──▶ Presenting ──animation done──▶ Shown ──dismiss/timer──▶ Dismissing ──▶ Idle
//! ```
//!
//! Only one banner occupies the overlay at a time. Any `present` or `dismiss` supersedes the
//! transition in flight: every request takes a new sequence number, and a finished animation only
//! changes state if it still carries the latest one.

use crate::animation::Animator;
use crate::bridge::{BannerCommand, BannerHandle, CommandBridge, Completion};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::content::{content_height, BannerContent, ContentId};
use crate::overlay_window::OverlayWindow;
use crate::platform::{Bounds, PlatformResult, Position, SurfaceHostImpl};
use crate::profile::{AnimationProfile, BannerAttributes, SlideProfile};
use log::{debug, trace, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a banner should be presented.
#[derive(Debug, Clone)]
pub struct PresentRequest {
    /// Time until the banner dismisses itself. Must be longer than the profile's duration.
    pub duration: Duration,
    pub profile: Arc<dyn AnimationProfile>,
    pub animated: bool,
}

impl PresentRequest {
    /// A request using the configured duration and slide profile, animated.
    pub fn new() -> Self {
        Self {
            duration: Config::default_duration(),
            profile: Arc::new(SlideProfile::from_config()),
            animated: true,
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn profile<P: AnimationProfile + 'static>(mut self, profile: P) -> Self {
        self.profile = Arc::new(profile);
        self
    }

    pub fn shared_profile(mut self, profile: Arc<dyn AnimationProfile>) -> Self {
        self.profile = profile;
        self
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }
}

impl Default for PresentRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BannerPhase {
    #[default]
    Idle,
    Presenting,
    Shown,
    Dismissing,
}

/// The single outstanding auto-dismiss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDismiss {
    pub deadline: Instant,
    /// Captured when the timer was armed
    pub animated: bool,
    pub content: ContentId,
}

enum TransitionKind {
    Present { on_presented: Option<Completion> },
    Dismiss { on_dismissed: Option<Completion> },
}

struct Transition {
    seq: u64,
    animator: Animator<BannerAttributes>,
    allow_interaction: bool,
    kind: TransitionKind,
}

struct DisplayedContent {
    id: ContentId,
    content: Box<dyn BannerContent>,
}

pub struct BannerController<H: SurfaceHostImpl> {
    overlay: OverlayWindow<H>,
    clock: Box<dyn Clock>,
    bridge: CommandBridge,
    displayed: Option<DisplayedContent>,
    active_profile: Option<Arc<dyn AnimationProfile>>,
    attributes: BannerAttributes,
    is_showing: bool,
    phase: BannerPhase,
    transition: Option<Transition>,
    pending_dismiss: Option<PendingDismiss>,
    latest_seq: u64,
}

impl<H: SurfaceHostImpl> BannerController<H> {
    pub fn new(host: H) -> Self {
        Self::with_clock(host, SystemClock)
    }

    pub fn with_clock<C: Clock + 'static>(host: H, clock: C) -> Self {
        Self {
            overlay: OverlayWindow::new(host),
            clock: Box::new(clock),
            bridge: CommandBridge::new(),
            displayed: None,
            active_profile: None,
            attributes: BannerAttributes::empty(),
            is_showing: false,
            phase: BannerPhase::Idle,
            transition: None,
            pending_dismiss: None,
            latest_seq: 0,
        }
    }

    /// A non-owning handle other code can use to queue requests for this controller.
    pub fn handle(&self) -> BannerHandle {
        self.bridge.handle()
    }

    /// Shows `content`, replacing whatever is currently displayed.
    ///
    /// # Panics
    /// If `request.duration` is not longer than the profile's animation duration. This is
    /// checked before anything changes.
    pub fn present(
        &mut self,
        content: Box<dyn BannerContent>,
        request: PresentRequest,
        on_presented: Option<Completion>,
    ) {
        let PresentRequest {
            duration,
            profile,
            animated,
        } = request;
        assert!(
            duration > profile.duration(),
            "Showing duration ({:?}) must be longer than the animation duration ({:?})",
            duration,
            profile.duration()
        );

        let now = self.clock.now();
        let seq = self.next_seq();
        self.interrupt_transition(seq);

        let id = content.content_id();
        let height = content_height(content.as_ref());
        debug!(
            "Presenting {id} (seq {seq}, height {height}, duration {duration:?}, animated {animated})"
        );

        self.active_profile = Some(profile.clone());
        self.replace_content(id, content);
        self.schedule_dismiss(now + duration, animated, id);

        let result = self.overlay.set_content(Some(id));
        Self::log_platform("set overlay content", result);
        let result = self.overlay.show();
        Self::log_platform("show overlay", result);

        let rect = self.overlay.bounds();
        let initial = profile.initial_attributes(height, &rect);
        let target = profile.final_attributes(height, &rect);

        let mut completion = None;
        if animated && !self.is_showing {
            self.phase = BannerPhase::Presenting;
            self.begin_transition(
                seq,
                profile.as_ref(),
                initial,
                target,
                now,
                TransitionKind::Present { on_presented },
            );
        } else {
            self.is_showing = true;
            self.phase = BannerPhase::Shown;
            self.apply_attributes(target);
            completion = on_presented;
        }

        self.layout();

        if let Some(on_presented) = completion {
            on_presented();
        }
    }

    /// Dismisses the banner only if `content` is the one on display. Otherwise the request is a
    /// no-op, but `on_dismissed` still runs.
    pub fn dismiss_content(
        &mut self,
        content: ContentId,
        animated: bool,
        on_dismissed: Option<Completion>,
    ) {
        if self.displayed_content() == Some(content) {
            self.dismiss(animated, on_dismissed);
            return;
        }

        debug!("{content} is no longer displayed, ignoring dismiss");
        if let Some(on_dismissed) = on_dismissed {
            on_dismissed();
        }
    }

    /// Dismisses whatever is displayed. Safe to call when nothing is shown.
    pub fn dismiss(&mut self, animated: bool, on_dismissed: Option<Completion>) {
        let now = self.clock.now();
        let seq = self.next_seq();
        self.interrupt_transition(seq);
        self.cancel_dismiss_timer();

        let Some(profile) = self.active_profile.clone() else {
            debug!("Dismiss (seq {seq}) with no active banner");
            let reset = BannerAttributes::new(self.attributes.opacity, Bounds::zero());
            if self.overlay.has_surface() {
                self.apply_attributes(reset);
            } else {
                self.attributes = reset;
            }
            self.teardown();
            if let Some(on_dismissed) = on_dismissed {
                on_dismissed();
            }
            return;
        };

        let rect = self.overlay.bounds();
        let target = profile.initial_attributes(self.attributes.frame.size.height, &rect);
        debug!("Dismissing (seq {seq}, animated {animated})");

        if animated {
            // `is_showing` is only cleared once the exit animation lands.
            self.phase = BannerPhase::Dismissing;
            self.begin_transition(
                seq,
                profile.as_ref(),
                self.attributes,
                target,
                now,
                TransitionKind::Dismiss { on_dismissed },
            );
        } else {
            self.apply_attributes(BannerAttributes::new(1.0, target.frame));
            self.finish_dismiss(on_dismissed);
        }
    }

    /// Applies queued commands, advances the running animation and fires the dismiss timer.
    pub fn tick(&mut self) {
        while let Some(command) = self.bridge.try_next_command() {
            self.handle_command(command);
        }

        let now = self.clock.now();
        self.advance_transition(now);
        self.fire_dismiss_timer(now);
    }

    pub fn handle_command(&mut self, command: BannerCommand) {
        match command {
            BannerCommand::Present {
                content,
                request,
                on_presented,
            } => self.present(content, request, on_presented),
            BannerCommand::Dismiss {
                animated,
                on_dismissed,
            } => self.dismiss(animated, on_dismissed),
            BannerCommand::DismissContent {
                content,
                animated,
                on_dismissed,
            } => self.dismiss_content(content, animated, on_dismissed),
        }
    }

    /// Waits for the next queued command and applies it.
    pub async fn process_next_command(&mut self) -> bool {
        match self.bridge.next_command().await {
            Some(command) => {
                self.handle_command(command);
                true
            }
            None => false,
        }
    }

    pub fn is_showing(&self) -> bool {
        self.is_showing
    }

    pub fn phase(&self) -> BannerPhase {
        self.phase
    }

    pub fn is_animating(&self) -> bool {
        self.transition
            .as_ref()
            .is_some_and(|transition| transition.animator.is_animating())
    }

    pub fn displayed_content(&self) -> Option<ContentId> {
        self.displayed.as_ref().map(|displayed| displayed.id)
    }

    pub fn active_profile(&self) -> Option<&dyn AnimationProfile> {
        self.active_profile.as_deref()
    }

    pub fn attributes(&self) -> BannerAttributes {
        self.attributes
    }

    pub fn pending_dismiss(&self) -> Option<PendingDismiss> {
        self.pending_dismiss
    }

    /// The earliest moment `tick` has work to do, ignoring queued commands.
    pub fn next_wakeup(&self) -> Option<Instant> {
        let animation_end = self
            .transition
            .as_ref()
            .and_then(|transition| transition.animator.end_time());
        let timer = self.pending_dismiss.map(|pending| pending.deadline);
        match (animation_end, timer) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn overlay(&self) -> &OverlayWindow<H> {
        &self.overlay
    }

    /// The content that would receive input at `position`, if the banner is hit.
    pub fn hit_test(&self, position: &Position) -> Option<ContentId> {
        if self.overlay.hit_test(position) {
            self.displayed_content()
        } else {
            None
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.latest_seq += 1;
        self.latest_seq
    }

    fn interrupt_transition(&mut self, seq: u64) {
        if let Some(mut transition) = self.transition.take() {
            transition.animator.stop();
            debug!(
                "Transition {} superseded by request {seq}, dropping its completion",
                transition.seq
            );
        }
    }

    fn begin_transition(
        &mut self,
        seq: u64,
        profile: &dyn AnimationProfile,
        from: BannerAttributes,
        to: BannerAttributes,
        now: Instant,
        kind: TransitionKind,
    ) {
        let options = profile.options();
        let mut animator = Animator::new(from, to, options.curve.ease_fn());
        animator.start_from(from, to, profile.duration(), now);
        self.transition = Some(Transition {
            seq,
            animator,
            allow_interaction: options.allow_user_interaction,
            kind,
        });
        self.apply_attributes(from);
    }

    fn advance_transition(&mut self, now: Instant) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        let value = transition.animator.update(now);
        let finished = !transition.animator.is_animating();

        if let Some(value) = value {
            self.apply_attributes(value);
        }

        if finished {
            if let Some(transition) = self.transition.take() {
                self.complete_transition(transition);
            }
        }
    }

    fn complete_transition(&mut self, transition: Transition) {
        if transition.seq != self.latest_seq {
            debug!(
                "Discarding completion of stale transition {} (latest {})",
                transition.seq, self.latest_seq
            );
            return;
        }

        match transition.kind {
            TransitionKind::Present { on_presented } => {
                trace!("Present transition {} finished", transition.seq);
                self.is_showing = true;
                self.phase = BannerPhase::Shown;
                self.update_hit_region();
                if let Some(on_presented) = on_presented {
                    on_presented();
                }
            }
            TransitionKind::Dismiss { on_dismissed } => {
                trace!("Dismiss transition {} finished", transition.seq);
                self.finish_dismiss(on_dismissed);
            }
        }
    }

    fn finish_dismiss(&mut self, on_dismissed: Option<Completion>) {
        self.teardown();
        self.apply_attributes(BannerAttributes::new(1.0, self.attributes.frame));
        if let Some(on_dismissed) = on_dismissed {
            on_dismissed();
        }
    }

    fn schedule_dismiss(&mut self, deadline: Instant, animated: bool, content: ContentId) {
        if let Some(previous) = self.pending_dismiss.take() {
            trace!("Cancelled auto-dismiss for {}", previous.content);
        }
        trace!("Auto-dismiss for {content} armed (animated {animated})");
        self.pending_dismiss = Some(PendingDismiss {
            deadline,
            animated,
            content,
        });
    }

    fn cancel_dismiss_timer(&mut self) {
        if let Some(previous) = self.pending_dismiss.take() {
            trace!("Cancelled auto-dismiss for {}", previous.content);
        }
    }

    fn fire_dismiss_timer(&mut self, now: Instant) {
        let Some(pending) = self.pending_dismiss else {
            return;
        };
        if now < pending.deadline {
            return;
        }

        self.pending_dismiss = None;
        debug!("Auto-dismiss fired for {}", pending.content);
        self.dismiss_content(pending.content, pending.animated, None);
    }

    fn replace_content(&mut self, id: ContentId, mut content: Box<dyn BannerContent>) {
        if let Some(mut previous) = self.displayed.take() {
            trace!("{} superseded by {id}", previous.id);
            previous.content.on_detached();
        }
        content.on_attached(self.handle());
        self.displayed = Some(DisplayedContent { id, content });
    }

    /// Removes the overlay and releases the displayed content.
    fn teardown(&mut self) {
        self.overlay.teardown();
        if let Some(mut displayed) = self.displayed.take() {
            trace!("Released {}", displayed.id);
            displayed.content.on_detached();
            let result = self.overlay.set_content(None);
            Self::log_platform("clear overlay content", result);
        }
        self.active_profile = None;
        self.is_showing = false;
        self.phase = BannerPhase::Idle;
    }

    fn apply_attributes(&mut self, attributes: BannerAttributes) {
        self.attributes = attributes;
        let result = self.overlay.set_attributes(&attributes);
        Self::log_platform("set banner attributes", result);
        self.update_hit_region();
    }

    fn update_hit_region(&mut self) {
        let interactive = self.overlay.shown()
            && self.displayed.is_some()
            && !self.attributes.frame.is_empty()
            && self
                .transition
                .as_ref()
                .map_or(true, |transition| transition.allow_interaction);
        let region = interactive.then_some(self.attributes.frame);
        let result = self.overlay.set_hit_region(region);
        Self::log_platform("set overlay hit region", result);
    }

    fn layout(&mut self) {
        let result = self.overlay.layout();
        Self::log_platform("lay out overlay", result);
        let local = self.attributes.frame.local();
        if let Some(displayed) = self.displayed.as_mut() {
            displayed.content.on_layout(&local);
        }
    }

    fn log_platform(action: &str, result: PlatformResult<()>) {
        if let Err(e) = result {
            warn!("Failed to {action}: {e}");
        }
    }
}

impl<H: SurfaceHostImpl> Drop for BannerController<H> {
    fn drop(&mut self) {
        self.transition = None;
        self.pending_dismiss = None;
        self.teardown();
    }
}
