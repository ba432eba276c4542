use banner_core::clock::ManualClock;
use banner_core::platform::{Bounds, HeadlessHost};
use banner_core::{BannerContent, BannerController, ContentId, PresentRequest, SlideProfile};
use std::time::Duration;

struct Text(ContentId);

impl BannerContent for Text {
    fn content_id(&self) -> ContentId {
        self.0
    }

    fn preferred_height(&self) -> f64 {
        80.0
    }
}

fn main() {
    let clock = ManualClock::new();
    let host = HeadlessHost::new(Bounds::new(0.0, 0.0, 320.0, 568.0));
    let mut controller = BannerController::with_clock(host, clock.clone());

    let request = PresentRequest::new()
        .duration(Duration::from_secs(2))
        .profile(SlideProfile::from_top());
    controller.present(Box::new(Text(ContentId::next())), request, None);

    let frame = Duration::from_millis(40);
    for step in 0..70 {
        controller.tick();
        let attributes = controller.attributes();
        println!(
            "{:>5}ms {:?} y={:.1}",
            step * frame.as_millis(),
            controller.phase(),
            attributes.frame.position.y
        );
        clock.advance(frame);
    }
}
