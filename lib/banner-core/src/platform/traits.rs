use crate::content::ContentId;
use crate::platform::{Bounds, PlatformResult, SurfaceId};
use crate::profile::BannerAttributes;

/// The host side of the overlay: creates surfaces and moves input focus between them.
pub trait SurfaceHostImpl
where
    Self: Sized,
{
    type Surface: OverlaySurfaceImpl;

    /// Creates an always-on-top surface covering the screen. It should not be visible or take
    /// focus until `show` is called.
    fn create_overlay_surface(&mut self) -> PlatformResult<Self::Surface>;

    /// The surface currently receiving input, if any.
    fn focused_surface(&self) -> Option<SurfaceId>;

    fn focus_surface(&mut self, id: SurfaceId) -> PlatformResult<()>;
}

/// An always-on-top surface hosting the banner. Input only lands on the surface inside its hit
/// region; everywhere else it passes through to whatever is below.
pub trait OverlaySurfaceImpl {
    fn id(&self) -> SurfaceId;

    /// The rect the banner can be laid out in.
    fn bounds(&self) -> Bounds;

    /// Brings the surface to the front and makes it the input target. Should be idempotent.
    fn show(&mut self) -> PlatformResult<()>;

    /// Should be idempotent.
    fn hide(&mut self) -> PlatformResult<()>;

    fn remove_from_stack(&mut self) -> PlatformResult<()>;

    fn resign_focus(&mut self) -> PlatformResult<()>;

    fn set_content(&mut self, content: Option<ContentId>) -> PlatformResult<()>;

    fn set_banner_attributes(&mut self, attributes: &BannerAttributes) -> PlatformResult<()>;

    /// `None` makes the whole surface transparent to input.
    fn set_hit_region(&mut self, region: Option<Bounds>) -> PlatformResult<()>;

    fn layout(&mut self) -> PlatformResult<()>;
}
