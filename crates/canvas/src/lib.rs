//! # Canvas Layout Catalog
//!
//! Static geometry for placing images on the 1080×1920 portrait video
//! canvas, plus the per-line capacity rules that decide which placements are
//! still open.
//!
//! Everything here is pure data and pure functions. The stateful edit
//! session lives in `clip-editor` and consults this crate before offering a
//! placement to the UI; nothing in this crate ever holds a transcript.

pub mod grid;
pub mod position;
pub mod size;
pub mod slots;

pub use grid::{GridSlot, PercentRect, grid_slots, grid_slots_for};
pub use position::{CANVAS_HEIGHT, CANVAS_WIDTH, Coordinates, ImagePosition, MEDIUM_BOTTOM_WIDTH};
pub use size::ImageSize;
pub use slots::{Headroom, Placement, available_positions, headroom, reposition_options};
