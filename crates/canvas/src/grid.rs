//! Percent-space geometry for the position picker grid.
//!
//! The picker renders a miniature of the canvas and needs each slot as
//! percentages of the full frame rather than pixels, with an estimated
//! height since the real one depends on the uploaded image.

use crate::position::{CANVAS_HEIGHT, CANVAS_WIDTH, Coordinates, ImagePosition};
use crate::size::ImageSize;

/// A rectangle in percent of the canvas, for absolute-positioned overlay
/// layout.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One selectable slot in the picker grid.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct GridSlot {
    pub position: ImagePosition,
    pub size: ImageSize,
    pub rect: PercentRect,
    pub label: String,
}

fn to_percent(coords: Coordinates, estimated_height: u32) -> PercentRect {
    PercentRect {
        x: coords.x as f64 / CANVAS_WIDTH as f64 * 100.0,
        y: coords.y as f64 / CANVAS_HEIGHT as f64 * 100.0,
        width: coords.width as f64 / CANVAS_WIDTH as f64 * 100.0,
        height: estimated_height as f64 / CANVAS_HEIGHT as f64 * 100.0,
    }
}

/// All seven slots in catalog order: small, then medium, then large.
pub fn grid_slots() -> Vec<GridSlot> {
    ImageSize::ALL
        .into_iter()
        .flat_map(|size| {
            size.positions().iter().map(move |&position| GridSlot {
                position,
                size,
                rect: to_percent(position.coordinates(), size.estimated_height()),
                label: position.label().to_string(),
            })
        })
        .collect()
}

/// The slots selectable for one size class.
pub fn grid_slots_for(size: ImageSize) -> Vec<GridSlot> {
    grid_slots().into_iter().filter(|slot| slot.size == size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_slots_grouped_by_class() {
        let slots = grid_slots();
        assert_eq!(slots.len(), 7);
        let sizes: Vec<ImageSize> = slots.iter().map(|s| s.size).collect();
        assert_eq!(
            sizes,
            [
                ImageSize::Small,
                ImageSize::Small,
                ImageSize::Small,
                ImageSize::Medium,
                ImageSize::Medium,
                ImageSize::Medium,
                ImageSize::Large,
            ]
        );
    }

    #[test]
    fn percentages_scale_against_the_canvas() {
        let slots = grid_slots();
        let right_high = slots.iter().find(|s| s.position == ImagePosition::RightHigh).unwrap();
        assert!((right_high.rect.x - 730.0 / 1080.0 * 100.0).abs() < 1e-9);
        assert!((right_high.rect.y - 1000.0 / 1920.0 * 100.0).abs() < 1e-9);
        assert!((right_high.rect.width - 300.0 / 1080.0 * 100.0).abs() < 1e-9);
        assert!((right_high.rect.height - 225.0 / 1920.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn filtering_by_size_keeps_catalog_order() {
        let mediums = grid_slots_for(ImageSize::Medium);
        let positions: Vec<ImagePosition> = mediums.iter().map(|s| s.position).collect();
        assert_eq!(positions, ImageSize::Medium.positions());
    }

    #[test]
    fn labels_are_human_readable() {
        let slots = grid_slots_for(ImageSize::Large);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].label, "Top Center");
    }
}
