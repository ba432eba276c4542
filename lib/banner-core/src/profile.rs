//! Animation profiles describe where a banner sits before and after it is presented.
//!
//! A profile is a pure strategy: given the content height and the rect the overlay
//! covers, it produces the off-screen ("initial") and on-screen ("final") attributes,
//! together with the duration and options of the transition between them. The
//! controller never looks at the concrete profile type.

use crate::config::Config;
use crate::platform::Bounds;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

pub const DEFAULT_SLIDE_DURATION: Duration = Duration::from_millis(280);

/// Opacity and frame of the banner at one end of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BannerAttributes {
    pub opacity: f64,
    pub frame: Bounds,
}

impl BannerAttributes {
    pub fn new(opacity: f64, frame: Bounds) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            frame,
        }
    }

    /// Fully opaque, zero-sized attributes at the origin.
    pub fn empty() -> Self {
        Self::new(1.0, Bounds::zero())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnimationCurve {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

/// Hints handed through to the animation primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    pub curve: AnimationCurve,
    /// Whether the banner receives input while a transition is running
    pub allow_user_interaction: bool,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            curve: AnimationCurve::default(),
            allow_user_interaction: true,
        }
    }
}

pub trait AnimationProfile: Debug + Send + Sync {
    fn duration(&self) -> Duration;

    fn options(&self) -> AnimationOptions;

    /// Attributes the banner starts from when presented, and returns to when dismissed.
    fn initial_attributes(&self, content_height: f64, rect: &Bounds) -> BannerAttributes;

    /// Attributes of the banner at rest.
    fn final_attributes(&self, content_height: f64, rect: &Bounds) -> BannerAttributes;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlideDirection {
    #[default]
    #[serde(alias = "from_top")]
    Top,
    #[serde(alias = "from_bottom")]
    Bottom,
}

/// Slides the banner in from one edge of the rect, keeping it fully opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideProfile {
    pub direction: SlideDirection,
    pub duration: Duration,
    pub options: AnimationOptions,
}

impl SlideProfile {
    pub fn new(direction: SlideDirection, duration: Duration, options: AnimationOptions) -> Self {
        Self {
            direction,
            duration,
            options,
        }
    }

    pub fn from_top() -> Self {
        Self {
            direction: SlideDirection::Top,
            ..Self::default()
        }
    }

    pub fn from_bottom() -> Self {
        Self {
            direction: SlideDirection::Bottom,
            ..Self::default()
        }
    }

    /// Builds the profile described by the current config.
    pub fn from_config() -> Self {
        Self::new(
            Config::direction(),
            Config::animation_duration(),
            Config::animation_options(),
        )
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_options(mut self, options: AnimationOptions) -> Self {
        self.options = options;
        self
    }
}

impl Default for SlideProfile {
    fn default() -> Self {
        Self::new(
            SlideDirection::Top,
            DEFAULT_SLIDE_DURATION,
            AnimationOptions::default(),
        )
    }
}

impl AnimationProfile for SlideProfile {
    fn duration(&self) -> Duration {
        self.duration
    }

    fn options(&self) -> AnimationOptions {
        self.options
    }

    fn initial_attributes(&self, content_height: f64, rect: &Bounds) -> BannerAttributes {
        let y = match self.direction {
            SlideDirection::Top => -content_height,
            SlideDirection::Bottom => rect.size.height,
        };
        BannerAttributes::new(1.0, Bounds::new(0.0, y, rect.size.width, content_height))
    }

    fn final_attributes(&self, content_height: f64, rect: &Bounds) -> BannerAttributes {
        let y = match self.direction {
            SlideDirection::Top => 0.0,
            SlideDirection::Bottom => rect.size.height - content_height,
        };
        BannerAttributes::new(1.0, Bounds::new(0.0, y, rect.size.width, content_height))
    }
}
