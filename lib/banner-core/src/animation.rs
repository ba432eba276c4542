use crate::platform::{Bounds, Position, Size};
use crate::profile::{AnimationCurve, BannerAttributes};
use std::time::{Duration, Instant};

/// Trait for types that can be interpolated.
pub trait Interpolatable: Sized + Clone {
    fn interpolate(&self, target: &Self, t: f64) -> Self;
}

impl Interpolatable for f64 {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        self + (target - self) * t
    }
}

impl Interpolatable for Position {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        Position::new(
            self.x.interpolate(&target.x, t),
            self.y.interpolate(&target.y, t),
        )
    }
}

impl Interpolatable for Size {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        Size::new(
            self.width.interpolate(&target.width, t),
            self.height.interpolate(&target.height, t),
        )
    }
}

impl Interpolatable for Bounds {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        Bounds::from_position(
            self.position.interpolate(&target.position, t),
            self.size.interpolate(&target.size, t),
        )
    }
}

impl Interpolatable for BannerAttributes {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        BannerAttributes::new(
            self.opacity.interpolate(&target.opacity, t).clamp(0.0, 1.0),
            self.frame.interpolate(&target.frame, t),
        )
    }
}

pub fn linear(t: f64) -> f64 {
    t
}

pub fn ease_in_cubic(t: f64) -> f64 {
    t * t * t
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - 4.0 * (1.0 - t) * (1.0 - t) * (1.0 - t)
    }
}

impl AnimationCurve {
    pub fn ease_fn(self) -> fn(f64) -> f64 {
        match self {
            AnimationCurve::Linear => linear,
            AnimationCurve::EaseIn => ease_in_cubic,
            AnimationCurve::EaseOut => ease_out_cubic,
            AnimationCurve::EaseInOut => ease_in_out_cubic,
        }
    }
}

pub struct Animator<T>
where
    T: Interpolatable,
{
    pub from: T,
    pub to: T,
    pub duration: Duration,
    pub start_time: Option<Instant>,
    pub ease_fn: fn(f64) -> f64,
    pub animating: bool,
    pub last_value: T,
}

impl<T> Animator<T>
where
    T: Interpolatable,
{
    pub fn new(from: T, to: T, ease_fn: fn(f64) -> f64) -> Self {
        Self {
            from: from.clone(),
            to,
            duration: Duration::ZERO,
            start_time: None,
            ease_fn,
            animating: false,
            last_value: from,
        }
    }

    pub fn start_from(&mut self, from: T, to: T, duration: Duration, now: Instant) {
        self.from = from.clone();
        self.to = to;
        self.duration = duration;
        self.start_time = Some(now);
        self.animating = true;
        self.last_value = from;
    }

    pub fn start(&mut self, to: T, duration: Duration, now: Instant) {
        self.start_from(self.last_value.clone(), to, duration, now);
    }

    /// Returns Some(new_value) if animating, None if finished
    pub fn update(&mut self, now: Instant) -> Option<T> {
        if !self.animating {
            return None;
        }

        let Some(start) = self.start_time else {
            self.animating = false;
            return None;
        };

        if self.duration.is_zero() {
            self.animating = false;
            self.last_value = self.to.clone();
            return Some(self.to.clone());
        }

        let elapsed = now.saturating_duration_since(start).as_secs_f64();
        let mut t = (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        if t >= 1.0 {
            t = 1.0;
            self.animating = false;
        }

        // Land exactly on the target so callers can compare against it.
        let value = if self.animating {
            let eased_t = (self.ease_fn)(t);
            self.from.interpolate(&self.to, eased_t)
        } else {
            self.to.clone()
        };
        self.last_value = value.clone();
        Some(value)
    }

    /// Stops the animation where it currently is.
    pub fn stop(&mut self) {
        self.animating = false;
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn current_value(&self) -> &T {
        &self.last_value
    }

    /// When the animation will reach its target, if it is running.
    pub fn end_time(&self) -> Option<Instant> {
        match (self.animating, self.start_time) {
            (true, Some(start)) => Some(start + self.duration),
            _ => None,
        }
    }
}
