pub use common::*;
pub use headless::{HeadlessHost, HeadlessOverlay, HeadlessProbe, HeadlessSurface};
pub use traits::*;

mod common;
mod headless;
mod traits;
