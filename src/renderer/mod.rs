//! Rendering glue
//!
//! Projects simulation snapshots into drawables and packs them into GPU
//! instance buffers. Drawing itself belongs to the presenter.

pub mod instance;
pub mod palette;
pub mod sync;

pub use instance::{CircleInstance, RectInstance, as_bytes, pack_frame};
pub use sync::{Drawable, Frame, IndicatorDrawable, RectDrawable, project};
