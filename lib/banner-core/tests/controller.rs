use banner_core::clock::{Clock, ManualClock};
use banner_core::platform::{Bounds, HeadlessHost, HeadlessProbe, Position};
use banner_core::{
    AnimationOptions, AnimationProfile, BannerAttributes, BannerContent, BannerController,
    BannerHandle, BannerPhase, Completion, Config, ContentId, PresentRequest, SlideProfile,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn screen() -> Bounds {
    Bounds::new(0.0, 0.0, 320.0, 568.0)
}

#[derive(Default, Clone)]
struct Lifecycle {
    attached: Arc<AtomicUsize>,
    detached: Arc<AtomicUsize>,
    layouts: Arc<Mutex<Vec<Bounds>>>,
}

struct Note {
    id: ContentId,
    height: f64,
    lifecycle: Lifecycle,
    handle: Option<BannerHandle>,
}

impl Note {
    fn new(height: f64) -> (Self, Lifecycle) {
        let lifecycle = Lifecycle::default();
        (
            Self {
                id: ContentId::next(),
                height,
                lifecycle: lifecycle.clone(),
                handle: None,
            },
            lifecycle,
        )
    }

    fn boxed(height: f64) -> (Box<dyn BannerContent>, ContentId) {
        let (note, _) = Self::new(height);
        let id = note.id;
        (Box::new(note), id)
    }
}

impl BannerContent for Note {
    fn content_id(&self) -> ContentId {
        self.id
    }

    fn preferred_height(&self) -> f64 {
        self.height
    }

    fn on_attached(&mut self, handle: BannerHandle) {
        self.lifecycle.attached.fetch_add(1, Ordering::SeqCst);
        self.handle = Some(handle);
    }

    fn on_detached(&mut self) {
        self.lifecycle.detached.fetch_add(1, Ordering::SeqCst);
        self.handle = None;
    }

    fn on_layout(&mut self, bounds: &Bounds) {
        if let Ok(mut layouts) = self.lifecycle.layouts.lock() {
            layouts.push(*bounds);
        }
    }
}

/// Dismisses itself through its handle as soon as it is attached.
struct SelfDismissing {
    id: ContentId,
}

impl BannerContent for SelfDismissing {
    fn content_id(&self) -> ContentId {
        self.id
    }

    fn preferred_height(&self) -> f64 {
        60.0
    }

    fn on_attached(&mut self, handle: BannerHandle) {
        handle.dismiss_content(self.id, false, None);
    }
}

/// Fades in place instead of sliding.
#[derive(Debug)]
struct FadeProfile {
    duration: Duration,
}

impl AnimationProfile for FadeProfile {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn options(&self) -> AnimationOptions {
        AnimationOptions {
            allow_user_interaction: false,
            ..AnimationOptions::default()
        }
    }

    fn initial_attributes(&self, content_height: f64, rect: &Bounds) -> BannerAttributes {
        BannerAttributes::new(0.0, Bounds::new(0.0, 0.0, rect.size.width, content_height))
    }

    fn final_attributes(&self, content_height: f64, rect: &Bounds) -> BannerAttributes {
        BannerAttributes::new(1.0, Bounds::new(0.0, 0.0, rect.size.width, content_height))
    }
}

fn counter() -> (Arc<AtomicUsize>, Completion) {
    let count = Arc::new(AtomicUsize::new(0));
    let clone = count.clone();
    (
        count,
        Box::new(move || {
            clone.fetch_add(1, Ordering::SeqCst);
        }),
    )
}

fn setup() -> (BannerController<HeadlessHost>, HeadlessProbe, ManualClock) {
    let clock = ManualClock::new();
    let host = HeadlessHost::new(screen());
    let probe = host.probe();
    (BannerController::with_clock(host, clock.clone()), probe, clock)
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn request(duration_ms: u64) -> PresentRequest {
    PresentRequest::new()
        .duration(ms(duration_ms))
        .profile(SlideProfile::from_top())
        .animated(true)
}

#[test]
fn test_present_and_auto_dismiss_end_to_end() {
    let (mut controller, probe, clock) = setup();
    let app = probe.focused();
    let start = clock.now();
    let (note, lifecycle) = Note::new(80.0);
    let id = note.id;
    let (presented, on_presented) = counter();

    controller.present(Box::new(note), request(10_000), Some(on_presented));

    assert_eq!(controller.phase(), BannerPhase::Presenting);
    assert!(!controller.is_showing());
    assert_eq!(controller.displayed_content(), Some(id));
    assert_eq!(
        controller.attributes(),
        BannerAttributes::new(1.0, Bounds::new(0.0, -80.0, 320.0, 80.0))
    );
    assert_eq!(lifecycle.attached.load(Ordering::SeqCst), 1);
    assert_eq!(presented.load(Ordering::SeqCst), 0);

    let overlay = probe.overlay().unwrap();
    assert!(overlay.visible);
    assert_eq!(overlay.content, Some(id));
    assert_eq!(probe.focused(), Some(overlay.id));
    assert_eq!(controller.overlay().prior_focus(), app);

    clock.advance(ms(140));
    controller.tick();
    let y = controller.attributes().frame.position.y;
    assert!(y > -80.0 && y < 0.0, "banner should be mid-slide, got y={y}");
    assert_eq!(presented.load(Ordering::SeqCst), 0);

    clock.advance(ms(160));
    controller.tick();
    assert_eq!(controller.phase(), BannerPhase::Shown);
    assert!(controller.is_showing());
    assert_eq!(
        controller.attributes(),
        BannerAttributes::new(1.0, Bounds::new(0.0, 0.0, 320.0, 80.0))
    );
    assert_eq!(probe.overlay().unwrap().attributes, controller.attributes());
    assert_eq!(presented.load(Ordering::SeqCst), 1);

    let pending = controller.pending_dismiss().unwrap();
    assert_eq!(pending.deadline, start + ms(10_000));
    assert!(pending.animated);
    assert_eq!(pending.content, id);

    clock.advance(ms(9_700));
    controller.tick();
    assert_eq!(controller.phase(), BannerPhase::Dismissing);
    assert!(controller.is_showing());
    assert!(controller.pending_dismiss().is_none());

    clock.advance(ms(300));
    controller.tick();
    assert_eq!(controller.phase(), BannerPhase::Idle);
    assert!(controller.active_profile().is_none());
    assert!(controller.displayed_content().is_none());
    assert_eq!(
        controller.attributes(),
        BannerAttributes::new(1.0, Bounds::new(0.0, -80.0, 320.0, 80.0))
    );
    assert!(!probe.is_overlay_in_stack());
    assert!(!probe.overlay().unwrap().visible);
    assert_eq!(probe.focused(), app);
    assert_eq!(lifecycle.detached.load(Ordering::SeqCst), 1);
    assert_eq!(presented.load(Ordering::SeqCst), 1);
}

#[test]
fn test_layout_receives_local_bounds() {
    let (mut controller, _probe, _clock) = setup();
    let (note, lifecycle) = Note::new(80.0);

    controller.present(Box::new(note), request(10_000).animated(false), None);

    let layouts = lifecycle.layouts.lock().unwrap();
    assert_eq!(layouts.last(), Some(&Bounds::new(0.0, 0.0, 320.0, 80.0)));
}

#[test]
fn test_slide_from_bottom() {
    let (mut controller, _probe, clock) = setup();
    let (note, _) = Note::boxed(80.0);

    controller.present(
        note,
        request(10_000).profile(SlideProfile::from_bottom()),
        None,
    );
    assert_eq!(
        controller.attributes().frame,
        Bounds::new(0.0, 568.0, 320.0, 80.0)
    );

    clock.advance(ms(300));
    controller.tick();
    assert_eq!(
        controller.attributes().frame,
        Bounds::new(0.0, 488.0, 320.0, 80.0)
    );
    assert!(screen().contains_bounds(&controller.attributes().frame));
}

#[test]
fn test_unusable_height_falls_back_to_default() {
    let (mut controller, _probe, _clock) = setup();
    let (note, _) = Note::boxed(f64::NAN);

    controller.present(note, request(10_000).animated(false), None);
    assert_eq!(
        controller.attributes().frame,
        Bounds::new(0.0, 0.0, 320.0, banner_core::DEFAULT_CONTENT_HEIGHT)
    );
}

#[test]
fn test_dismiss_twice_completes_both_times() {
    let (mut controller, probe, _clock) = setup();
    let app = probe.focused();
    let (note, _) = Note::boxed(80.0);
    controller.present(note, request(10_000).animated(false), None);
    assert!(controller.is_showing());

    let (first, on_first) = counter();
    let (second, on_second) = counter();
    controller.dismiss(false, Some(on_first));
    controller.dismiss(false, Some(on_second));

    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(controller.phase(), BannerPhase::Idle);
    assert!(!controller.is_showing());
    assert_eq!(probe.focused(), app);
}

#[test]
fn test_dismiss_when_nothing_was_shown() {
    let (mut controller, probe, _clock) = setup();
    let (done, on_done) = counter();

    controller.dismiss(true, Some(on_done));

    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert_eq!(controller.phase(), BannerPhase::Idle);
    assert_eq!(controller.attributes().frame, Bounds::zero());
    assert!(!probe.is_overlay_in_stack());
    assert_eq!(probe.overlay_count(), 0);
    assert!(!controller.overlay().has_surface());
}

#[test]
fn test_non_animated_dismiss_is_synchronous() {
    let (mut controller, probe, _clock) = setup();
    let (note, lifecycle) = Note::new(80.0);
    controller.present(Box::new(note), request(10_000).animated(false), None);

    let (done, on_done) = counter();
    controller.dismiss(false, Some(on_done));

    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert_eq!(lifecycle.detached.load(Ordering::SeqCst), 1);
    assert_eq!(controller.attributes().opacity, 1.0);
    assert_eq!(
        controller.attributes().frame,
        Bounds::new(0.0, -80.0, 320.0, 80.0)
    );
    assert!(controller.pending_dismiss().is_none());
    assert!(!probe.is_overlay_in_stack());
}

#[test]
fn test_repeated_present_keeps_single_timer_at_latest_deadline() {
    let (mut controller, _probe, clock) = setup();
    let start = clock.now();

    let mut last = None;
    for offset in 0..5 {
        clock.advance(ms(100));
        let (note, id) = Note::boxed(80.0);
        controller.present(note, request(10_000 + offset * 1000), None);
        last = Some(id);
    }

    let pending = controller.pending_dismiss().unwrap();
    assert_eq!(pending.content, last.unwrap());
    assert_eq!(
        pending.deadline,
        start + ms(500) + ms(14_000)
    );

    // Earlier deadlines pass without dismissing anything.
    clock.advance(ms(11_000));
    controller.tick();
    assert!(controller.is_showing());
    assert_eq!(controller.displayed_content(), last);
}

#[test]
fn test_content_scoped_dismiss_of_superseded_content() {
    let (mut controller, _probe, _clock) = setup();
    let (first, first_id) = Note::boxed(80.0);
    let (second, second_id) = Note::boxed(80.0);

    controller.present(first, request(10_000).animated(false), None);
    controller.present(second, request(10_000).animated(false), None);

    let (done, on_done) = counter();
    controller.dismiss_content(first_id, true, Some(on_done));

    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert_eq!(controller.displayed_content(), Some(second_id));
    assert!(controller.is_showing());
    assert_eq!(controller.phase(), BannerPhase::Shown);
    assert_eq!(controller.pending_dismiss().unwrap().content, second_id);
}

#[test]
fn test_content_scoped_dismiss_of_displayed_content() {
    let (mut controller, _probe, clock) = setup();
    let (note, id) = Note::boxed(80.0);
    controller.present(note, request(10_000).animated(false), None);

    let (done, on_done) = counter();
    controller.dismiss_content(id, true, Some(on_done));
    assert_eq!(controller.phase(), BannerPhase::Dismissing);
    assert_eq!(done.load(Ordering::SeqCst), 0);

    clock.advance(ms(300));
    controller.tick();
    assert_eq!(done.load(Ordering::SeqCst), 1);
    assert!(controller.displayed_content().is_none());
}

#[test]
fn test_superseded_present_never_completes() {
    let (mut controller, _probe, clock) = setup();
    let (first, first_lifecycle) = Note::new(80.0);
    let (second, second_id) = Note::boxed(80.0);
    let (first_presented, on_first) = counter();
    let (second_presented, on_second) = counter();

    controller.present(Box::new(first), request(5_000), Some(on_first));
    clock.advance(ms(100));
    controller.tick();

    controller.present(second, request(5_000).animated(false), Some(on_second));
    assert_eq!(second_presented.load(Ordering::SeqCst), 1);
    assert_eq!(first_lifecycle.detached.load(Ordering::SeqCst), 1);

    clock.advance(ms(1_000));
    controller.tick();

    assert_eq!(first_presented.load(Ordering::SeqCst), 0);
    assert_eq!(controller.displayed_content(), Some(second_id));
    assert!(controller.is_showing());
    assert_eq!(controller.phase(), BannerPhase::Shown);
    assert_eq!(
        controller.attributes(),
        BannerAttributes::new(1.0, Bounds::new(0.0, 0.0, 320.0, 80.0))
    );
}

#[test]
fn test_present_during_dismiss_drops_dismiss_completion() {
    let (mut controller, probe, clock) = setup();
    let (first, _) = Note::boxed(80.0);
    let (second, second_id) = Note::boxed(80.0);
    controller.present(first, request(10_000).animated(false), None);

    let (dismissed, on_dismissed) = counter();
    controller.dismiss(true, Some(on_dismissed));
    clock.advance(ms(100));
    controller.tick();

    controller.present(second, request(10_000), None);
    clock.advance(ms(500));
    controller.tick();

    assert_eq!(dismissed.load(Ordering::SeqCst), 0);
    assert_eq!(controller.displayed_content(), Some(second_id));
    assert_eq!(controller.phase(), BannerPhase::Shown);
    assert!(probe.is_overlay_in_stack());
}

#[test]
fn test_animated_present_during_dismiss_replaces_in_place() {
    let (mut controller, probe, clock) = setup();
    let (first, _) = Note::boxed(80.0);
    let (second, second_id) = Note::boxed(80.0);
    controller.present(first, request(10_000).animated(false), None);

    controller.dismiss(true, None);
    clock.advance(ms(100));
    controller.tick();
    assert_eq!(controller.phase(), BannerPhase::Dismissing);
    assert!(controller.is_showing());
    let y = controller.attributes().frame.position.y;
    assert!(y < 0.0 && y > -80.0, "banner should be mid-exit, got y={y}");

    let (presented, on_presented) = counter();
    controller.present(second, request(10_000), Some(on_presented));

    assert_eq!(presented.load(Ordering::SeqCst), 1);
    assert_eq!(controller.phase(), BannerPhase::Shown);
    assert!(controller.is_showing());
    assert!(!controller.is_animating());
    assert_eq!(controller.displayed_content(), Some(second_id));
    assert_eq!(
        controller.attributes(),
        BannerAttributes::new(1.0, Bounds::new(0.0, 0.0, 320.0, 80.0))
    );
    assert_eq!(probe.overlay().unwrap().attributes, controller.attributes());

    clock.advance(ms(500));
    controller.tick();
    assert_eq!(presented.load(Ordering::SeqCst), 1);
    assert_eq!(
        controller.attributes().frame,
        Bounds::new(0.0, 0.0, 320.0, 80.0)
    );
}

#[test]
fn test_present_rejects_duration_shorter_than_animation() {
    let (mut controller, probe, _clock) = setup();
    let (note, _) = Note::boxed(80.0);

    let result = catch_unwind(AssertUnwindSafe(|| {
        controller.present(note, request(200), None);
    }));

    assert!(result.is_err());
    assert_eq!(controller.phase(), BannerPhase::Idle);
    assert!(controller.displayed_content().is_none());
    assert!(controller.pending_dismiss().is_none());
    assert!(controller.active_profile().is_none());
    assert_eq!(probe.overlay_count(), 0);
}

#[test]
#[should_panic(expected = "must be longer than the animation duration")]
fn test_present_with_equal_duration_panics() {
    let (mut controller, _probe, _clock) = setup();
    let (note, _) = Note::boxed(80.0);
    controller.present(note, request(280), None);
}

#[test]
fn test_timer_uses_animated_flag_from_present() {
    let (mut controller, _probe, clock) = setup();
    let (note, _) = Note::boxed(80.0);
    controller.present(note, request(2_000).animated(false), None);
    assert!(!controller.pending_dismiss().unwrap().animated);

    clock.advance(ms(2_000));
    controller.tick();
    assert_eq!(controller.phase(), BannerPhase::Idle);
    assert!(!controller.is_animating());
}

#[test]
fn test_global_dismiss_cancels_timer() {
    let (mut controller, _probe, clock) = setup();
    let (first, _) = Note::boxed(80.0);
    controller.present(first, request(2_000).animated(false), None);
    controller.dismiss(false, None);
    assert!(controller.pending_dismiss().is_none());

    let (second, second_id) = Note::boxed(80.0);
    clock.advance(ms(1_000));
    controller.present(second, request(10_000).animated(false), None);
    clock.advance(ms(1_500));
    controller.tick();
    assert_eq!(controller.displayed_content(), Some(second_id));
}

#[test]
fn test_hit_test_passes_through_outside_banner() {
    let (mut controller, probe, _clock) = setup();
    let app = probe.stack()[0];
    let (note, id) = Note::boxed(80.0);
    controller.present(note, request(10_000).animated(false), None);
    let overlay = probe.overlay().unwrap().id;

    let inside = Position::new(160.0, 40.0);
    let outside = Position::new(160.0, 300.0);
    assert_eq!(controller.hit_test(&inside), Some(id));
    assert_eq!(controller.hit_test(&outside), None);
    assert_eq!(probe.hit_test(&inside), Some(overlay));
    assert_eq!(probe.hit_test(&outside), Some(app));

    controller.dismiss(false, None);
    assert_eq!(controller.hit_test(&inside), None);
    assert_eq!(probe.hit_test(&inside), Some(app));
}

#[test]
fn test_custom_profile_blocks_input_while_animating() {
    let (mut controller, probe, clock) = setup();
    let (note, id) = Note::boxed(40.0);
    let inside = Position::new(10.0, 10.0);

    controller.present(
        note,
        request(3_000).profile(FadeProfile {
            duration: Duration::from_secs(1),
        }),
        None,
    );
    assert_eq!(controller.attributes().opacity, 0.0);
    assert_eq!(controller.hit_test(&inside), None);

    clock.advance(ms(500));
    controller.tick();
    let opacity = controller.attributes().opacity;
    assert!(opacity > 0.0 && opacity < 1.0);
    assert_eq!(controller.attributes().frame, Bounds::new(0.0, 0.0, 320.0, 40.0));
    assert_eq!(probe.overlay().unwrap().hit_region, None);

    clock.advance(ms(500));
    controller.tick();
    assert_eq!(controller.attributes().opacity, 1.0);
    assert_eq!(controller.hit_test(&inside), Some(id));
}

#[test]
fn test_content_can_dismiss_itself_through_handle() {
    let (mut controller, probe, _clock) = setup();
    let id = ContentId::next();

    controller.present(
        Box::new(SelfDismissing { id }),
        request(10_000).animated(false),
        None,
    );
    assert_eq!(controller.displayed_content(), Some(id));

    controller.tick();
    assert!(controller.displayed_content().is_none());
    assert!(!probe.is_overlay_in_stack());
}

#[test]
fn test_handle_commands_apply_on_tick() {
    let (mut controller, _probe, _clock) = setup();
    let handle = controller.handle();
    let (note, id) = Note::boxed(80.0);

    assert!(handle.present(note, request(10_000).animated(false), None));
    assert!(controller.displayed_content().is_none());

    controller.tick();
    assert_eq!(controller.displayed_content(), Some(id));

    drop(controller);
    assert!(handle.is_closed());
    assert!(!handle.dismiss(false, None));
}

#[test]
fn test_reshow_keeps_original_focus_holder() {
    let (mut controller, probe, _clock) = setup();
    let app = probe.focused();
    let (first, _) = Note::boxed(80.0);
    let (second, _) = Note::boxed(80.0);

    controller.present(first, request(10_000).animated(false), None);
    controller.present(second, request(10_000).animated(false), None);
    assert_eq!(controller.overlay().prior_focus(), app);

    controller.dismiss(false, None);
    assert_eq!(probe.focused(), app);
}

#[test]
fn test_drop_tears_down() {
    let (mut controller, probe, _clock) = setup();
    let app = probe.focused();
    let (note, lifecycle) = Note::new(80.0);
    controller.present(Box::new(note), request(10_000), None);

    drop(controller);

    assert!(!probe.is_overlay_in_stack());
    assert!(!probe.overlay().unwrap().visible);
    assert_eq!(probe.focused(), app);
    assert_eq!(lifecycle.detached.load(Ordering::SeqCst), 1);
}

#[test]
fn test_rejected_config_update_keeps_default_request_usable() {
    assert!(Config::update(|config| config.default_duration_secs = -1.0).is_err());
    assert!(Config::update(|config| config.animation_duration_secs = f64::NAN).is_err());

    let request = PresentRequest::new();
    assert!(request.duration > request.profile.duration());

    let (mut controller, _probe, _clock) = setup();
    let (note, id) = Note::boxed(80.0);
    controller.present(note, request.animated(false), None);
    assert_eq!(controller.displayed_content(), Some(id));
}
