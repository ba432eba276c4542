//! In-memory surface host.
//!
//! Keeps track of stacking, focus, visibility and banner geometry without drawing
//! anything. The `banner` binary runs on it, and tests inspect it through
//! [`HeadlessProbe`].

use crate::content::ContentId;
use crate::platform::{
    Bounds, OverlaySurfaceImpl, PlatformResult, Position, SurfaceHostImpl, SurfaceId,
};
use crate::profile::BannerAttributes;
use log::trace;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessOverlay {
    pub id: SurfaceId,
    pub visible: bool,
    pub attributes: BannerAttributes,
    pub hit_region: Option<Bounds>,
    pub content: Option<ContentId>,
    pub layout_passes: usize,
    pub show_count: usize,
}

impl HeadlessOverlay {
    fn new(id: SurfaceId) -> Self {
        Self {
            id,
            visible: false,
            attributes: BannerAttributes::empty(),
            hit_region: None,
            content: None,
            layout_passes: 0,
            show_count: 0,
        }
    }
}

#[derive(Debug)]
struct HeadlessState {
    screen: Bounds,
    /// Bottom to top
    stack: Vec<SurfaceId>,
    app_surfaces: Vec<SurfaceId>,
    overlays: HashMap<SurfaceId, HeadlessOverlay>,
    focused: Option<SurfaceId>,
    focus_history: Vec<SurfaceId>,
    next_id: SurfaceId,
}

impl HeadlessState {
    fn allocate_id(&mut self) -> SurfaceId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn focus(&mut self, id: SurfaceId) {
        self.focused = Some(id);
        self.focus_history.push(id);
    }

    fn overlay_mut(&mut self, id: SurfaceId) -> PlatformResult<&mut HeadlessOverlay> {
        self.overlays
            .get_mut(&id)
            .ok_or_else(|| format!("Unknown overlay surface {id}").into())
    }
}

fn lock(state: &Mutex<HeadlessState>) -> MutexGuard<'_, HeadlessState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct HeadlessHost {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessHost {
    /// Creates a host with a single focused application surface covering `screen`.
    pub fn new(screen: Bounds) -> Self {
        let mut state = HeadlessState {
            screen,
            stack: Vec::new(),
            app_surfaces: Vec::new(),
            overlays: HashMap::new(),
            focused: None,
            focus_history: Vec::new(),
            next_id: 1,
        };
        let app = state.allocate_id();
        state.app_surfaces.push(app);
        state.stack.push(app);
        state.focus(app);

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Adds another application surface on top of the existing ones.
    pub fn add_app_surface(&mut self) -> SurfaceId {
        let mut state = lock(&self.state);
        let id = state.allocate_id();
        state.app_surfaces.push(id);
        state.stack.push(id);
        id
    }

    pub fn probe(&self) -> HeadlessProbe {
        HeadlessProbe {
            state: self.state.clone(),
        }
    }
}

impl SurfaceHostImpl for HeadlessHost {
    type Surface = HeadlessSurface;

    fn create_overlay_surface(&mut self) -> PlatformResult<Self::Surface> {
        let mut state = lock(&self.state);
        let id = state.allocate_id();
        state.overlays.insert(id, HeadlessOverlay::new(id));
        trace!("Created headless overlay surface {id}");
        Ok(HeadlessSurface {
            id,
            state: self.state.clone(),
        })
    }

    fn focused_surface(&self) -> Option<SurfaceId> {
        lock(&self.state).focused
    }

    fn focus_surface(&mut self, id: SurfaceId) -> PlatformResult<()> {
        let mut state = lock(&self.state);
        if !state.app_surfaces.contains(&id) && !state.overlays.contains_key(&id) {
            return Err(format!("Cannot focus unknown surface {id}").into());
        }
        state.focus(id);
        Ok(())
    }
}

pub struct HeadlessSurface {
    id: SurfaceId,
    state: Arc<Mutex<HeadlessState>>,
}

impl OverlaySurfaceImpl for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn bounds(&self) -> Bounds {
        lock(&self.state).screen
    }

    fn show(&mut self) -> PlatformResult<()> {
        let mut state = lock(&self.state);
        let id = self.id;
        let overlay = state.overlay_mut(id)?;
        overlay.visible = true;
        overlay.show_count += 1;
        state.stack.retain(|surface| *surface != id);
        state.stack.push(id);
        if state.focused != Some(id) {
            state.focus(id);
        }
        Ok(())
    }

    fn hide(&mut self) -> PlatformResult<()> {
        let mut state = lock(&self.state);
        state.overlay_mut(self.id)?.visible = false;
        if state.focused == Some(self.id) {
            state.focused = None;
        }
        Ok(())
    }

    fn remove_from_stack(&mut self) -> PlatformResult<()> {
        let mut state = lock(&self.state);
        let id = self.id;
        state.stack.retain(|surface| *surface != id);
        Ok(())
    }

    fn resign_focus(&mut self) -> PlatformResult<()> {
        let mut state = lock(&self.state);
        if state.focused == Some(self.id) {
            state.focused = None;
        }
        Ok(())
    }

    fn set_content(&mut self, content: Option<ContentId>) -> PlatformResult<()> {
        lock(&self.state).overlay_mut(self.id)?.content = content;
        Ok(())
    }

    fn set_banner_attributes(&mut self, attributes: &BannerAttributes) -> PlatformResult<()> {
        lock(&self.state).overlay_mut(self.id)?.attributes = *attributes;
        Ok(())
    }

    fn set_hit_region(&mut self, region: Option<Bounds>) -> PlatformResult<()> {
        lock(&self.state).overlay_mut(self.id)?.hit_region = region;
        Ok(())
    }

    fn layout(&mut self) -> PlatformResult<()> {
        lock(&self.state).overlay_mut(self.id)?.layout_passes += 1;
        Ok(())
    }
}

/// Read access to a [`HeadlessHost`] that outlives moving the host into a controller.
#[derive(Clone)]
pub struct HeadlessProbe {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessProbe {
    pub fn screen(&self) -> Bounds {
        lock(&self.state).screen
    }

    pub fn focused(&self) -> Option<SurfaceId> {
        lock(&self.state).focused
    }

    pub fn focus_history(&self) -> Vec<SurfaceId> {
        lock(&self.state).focus_history.clone()
    }

    /// Bottom to top
    pub fn stack(&self) -> Vec<SurfaceId> {
        lock(&self.state).stack.clone()
    }

    pub fn overlay_count(&self) -> usize {
        lock(&self.state).overlays.len()
    }

    /// The most recently created overlay surface.
    pub fn overlay(&self) -> Option<HeadlessOverlay> {
        let state = lock(&self.state);
        state
            .overlays
            .keys()
            .max()
            .and_then(|id| state.overlays.get(id))
            .cloned()
    }

    pub fn is_overlay_in_stack(&self) -> bool {
        let state = lock(&self.state);
        state.stack.iter().any(|id| state.overlays.contains_key(id))
    }

    /// Which surface would receive input at `position`.
    pub fn hit_test(&self, position: &Position) -> Option<SurfaceId> {
        let state = lock(&self.state);
        state.stack.iter().rev().copied().find(|id| {
            match state.overlays.get(id) {
                Some(overlay) => {
                    overlay.visible
                        && overlay
                            .hit_region
                            .is_some_and(|region| region.contains(position))
                }
                None => state.screen.contains(position),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> HeadlessHost {
        HeadlessHost::new(Bounds::new(0.0, 0.0, 320.0, 568.0))
    }

    #[test]
    fn test_show_takes_focus_and_raises() {
        let mut host = host();
        let probe = host.probe();
        let app = probe.focused().unwrap();
        let mut surface = host.create_overlay_surface().unwrap();

        assert_eq!(probe.stack(), vec![app]);
        surface.show().unwrap();
        surface.show().unwrap();
        assert_eq!(probe.stack(), vec![app, surface.id()]);
        assert_eq!(probe.focused(), Some(surface.id()));
        assert_eq!(probe.focus_history(), vec![app, surface.id()]);
    }

    #[test]
    fn test_hit_test_passes_through_outside_region() {
        let mut host = host();
        let probe = host.probe();
        let app = probe.focused().unwrap();
        let mut surface = host.create_overlay_surface().unwrap();
        surface.show().unwrap();
        surface
            .set_hit_region(Some(Bounds::new(0.0, 0.0, 320.0, 80.0)))
            .unwrap();

        assert_eq!(probe.hit_test(&Position::new(10.0, 10.0)), Some(surface.id()));
        assert_eq!(probe.hit_test(&Position::new(10.0, 300.0)), Some(app));

        surface.set_hit_region(None).unwrap();
        assert_eq!(probe.hit_test(&Position::new(10.0, 10.0)), Some(app));
    }

    #[test]
    fn test_hide_and_remove() {
        let mut host = host();
        let probe = host.probe();
        let mut surface = host.create_overlay_surface().unwrap();
        surface.show().unwrap();
        surface.remove_from_stack().unwrap();
        surface.hide().unwrap();
        surface.hide().unwrap();

        assert!(!probe.is_overlay_in_stack());
        assert_eq!(probe.focused(), None);
        assert!(!probe.overlay().unwrap().visible);
    }

    #[test]
    fn test_focus_unknown_surface_fails() {
        let mut host = host();
        assert!(host.focus_surface(99).is_err());
    }
}
