use crate::bridge::BannerHandle;
use crate::platform::Bounds;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

/// Height used when content does not report a usable preferred height.
pub const DEFAULT_CONTENT_HEIGHT: f64 = 50.0;

static NEXT_CONTENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a piece of banner content. Two providers with the same id are
/// considered the same drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(u64);

impl ContentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_CONTENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for ContentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "content#{}", self.0)
    }
}

/// Something that can be shown inside the banner.
///
/// The controller owns the content while it occupies the banner slot. The handle
/// passed to [`BannerContent::on_attached`] is a non-owning route back to the
/// controller, so content can request its own dismissal.
pub trait BannerContent: Send + 'static {
    fn content_id(&self) -> ContentId;

    fn preferred_height(&self) -> f64;

    fn on_attached(&mut self, _handle: BannerHandle) {}

    fn on_detached(&mut self) {}

    /// Called with the banner-local bounds the content should fill.
    fn on_layout(&mut self, _bounds: &Bounds) {}
}

/// Preferred height of `content`, falling back to [`DEFAULT_CONTENT_HEIGHT`].
pub(crate) fn content_height(content: &dyn BannerContent) -> f64 {
    let height = content.preferred_height();
    if height.is_finite() && height > 0.0 {
        height
    } else {
        log::warn!(
            "{} reported unusable height {height}, using {DEFAULT_CONTENT_HEIGHT}",
            content.content_id()
        );
        DEFAULT_CONTENT_HEIGHT
    }
}
