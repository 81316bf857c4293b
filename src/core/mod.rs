mod bindings;
mod geometry;
mod locator;
mod placement;
mod scroll;
mod toggles;

pub use bindings::*;
pub use geometry::*;
pub use locator::*;
pub use placement::*;
pub use scroll::*;
pub use toggles::*;
