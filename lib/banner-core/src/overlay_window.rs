use crate::content::ContentId;
use crate::platform::{
    Bounds, OverlaySurfaceImpl, PlatformResult, Position, SurfaceHostImpl, SurfaceId,
};
use crate::profile::BannerAttributes;
use log::{error, trace, warn};

/// The always-on-top surface the banner lives on.
///
/// The surface is created the first time it is needed. Showing it records whichever surface
/// held focus beforehand, and tearing it down hands focus back to that surface.
pub struct OverlayWindow<H: SurfaceHostImpl> {
    host: H,
    surface: Option<H::Surface>,
    prior_focus: Option<SurfaceId>,
    hit_region: Option<Bounds>,
    shown: bool,
}

impl<H: SurfaceHostImpl> OverlayWindow<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            surface: None,
            prior_focus: None,
            hit_region: None,
            shown: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn shown(&self) -> bool {
        self.shown
    }

    pub fn prior_focus(&self) -> Option<SurfaceId> {
        self.prior_focus
    }

    /// Whether the host surface has been created yet.
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    fn surface(&mut self) -> PlatformResult<&mut H::Surface> {
        if self.surface.is_none() {
            let surface = self.host.create_overlay_surface()?;
            trace!("Created overlay surface {}", surface.id());
            self.surface = Some(surface);
        }
        self.surface
            .as_mut()
            .ok_or_else(|| "Overlay surface missing after creation".into())
    }

    /// The rect the banner is laid out in, or an empty rect if no surface could be created.
    pub fn bounds(&mut self) -> Bounds {
        match self.surface() {
            Ok(surface) => surface.bounds(),
            Err(e) => {
                error!("Failed to create overlay surface: {e}");
                Bounds::zero()
            }
        }
    }

    pub fn show(&mut self) -> PlatformResult<()> {
        let focused = self.host.focused_surface();
        let surface = self.surface()?;
        let own_id = surface.id();

        // Re-showing while we already hold focus must not overwrite the original holder.
        if focused.is_some() && focused != Some(own_id) {
            self.prior_focus = focused;
        }

        self.surface()?.show()?;
        self.shown = true;
        Ok(())
    }

    /// Takes the surface off screen and gives focus back. Safe to call any number of times.
    pub fn teardown(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            if self.shown {
                trace!("Tearing down overlay surface {}", surface.id());
            }
            if let Err(e) = surface.remove_from_stack() {
                warn!("Failed to remove overlay surface from stack: {e}");
            }
            if let Err(e) = surface.hide() {
                warn!("Failed to hide overlay surface: {e}");
            }
            if let Err(e) = surface.resign_focus() {
                warn!("Failed to resign overlay focus: {e}");
            }
            if let Err(e) = surface.set_hit_region(None) {
                warn!("Failed to clear overlay hit region: {e}");
            }
        }
        self.shown = false;
        self.hit_region = None;

        if let Some(prior) = self.prior_focus.take() {
            if let Err(e) = self.host.focus_surface(prior) {
                warn!("Failed to restore focus to surface {prior}: {e}");
            }
        }
    }

    pub fn set_content(&mut self, content: Option<ContentId>) -> PlatformResult<()> {
        self.surface()?.set_content(content)
    }

    pub fn set_attributes(&mut self, attributes: &BannerAttributes) -> PlatformResult<()> {
        self.surface()?.set_banner_attributes(attributes)
    }

    pub fn set_hit_region(&mut self, region: Option<Bounds>) -> PlatformResult<()> {
        if self.hit_region == region {
            return Ok(());
        }
        self.surface()?.set_hit_region(region)?;
        self.hit_region = region;
        Ok(())
    }

    pub fn layout(&mut self) -> PlatformResult<()> {
        self.surface()?.layout()
    }

    /// Whether input at `position` lands on the banner rather than passing through.
    pub fn hit_test(&self, position: &Position) -> bool {
        self.shown
            && self
                .hit_region
                .is_some_and(|region| region.contains(position))
    }
}

impl<H: SurfaceHostImpl> Drop for OverlayWindow<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
