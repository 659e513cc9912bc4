//! Per-line slot availability.
//!
//! Answers two questions for a dialogue line that already carries some
//! images: which size classes still have room, and which named positions are
//! free for one more image of a given class. The capacity rules live here
//! and nowhere else:
//!
//! - at most 3 small, 2 medium, 1 large per line
//! - medium and large are mutually exclusive (a large image claims the
//!   whole top area)
//! - small coexists with either
//! - no two images on a line share a named position
//!
//! These functions are the complete authority on what the editing UI may
//! offer; the edit session consults them rather than re-deriving the rules.

use crate::position::ImagePosition;
use crate::size::ImageSize;

/// The slice of one attached image the allocator cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Placement {
    pub size: ImageSize,
    /// `None` means the image falls back to its size's default position at
    /// render time; it still counts toward the size caps but blocks no slot.
    pub position: Option<ImagePosition>,
}

impl Placement {
    pub fn new(size: ImageSize, position: impl Into<Option<ImagePosition>>) -> Self {
        Self { size, position: position.into() }
    }
}

/// Which size classes still have room on a line.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Headroom {
    pub can_add: bool,
    /// Classes with room, smallest first.
    pub allowed_sizes: Vec<ImageSize>,
}

fn count(current: &[Placement], size: ImageSize) -> usize {
    current.iter().filter(|p| p.size == size).count()
}

/// Per-size cap plus the medium/large exclusivity rule. Ignores position
/// occupancy.
fn size_allowed(current: &[Placement], size: ImageSize) -> bool {
    if count(current, size) >= size.max_per_line() {
        return false;
    }
    match size {
        ImageSize::Small => true,
        ImageSize::Medium => count(current, ImageSize::Large) == 0,
        ImageSize::Large => count(current, ImageSize::Medium) == 0,
    }
}

/// Free positions for adding one image of `target` to a line currently
/// holding `current`. Empty when the class is capped out or excluded by the
/// medium/large rule; otherwise the class's positions minus the occupied
/// ones, in catalog order.
pub fn available_positions(current: &[Placement], target: ImageSize) -> Vec<ImagePosition> {
    if !size_allowed(current, target) {
        return Vec::new();
    }
    target
        .positions()
        .iter()
        .copied()
        .filter(|pos| !current.iter().any(|p| p.position == Some(*pos)))
        .collect()
}

/// Positions the image at `index` may move to: the free positions for its
/// size plus the one it already occupies. Empty when `index` is out of
/// range. Size caps do not apply; the image is already on the line.
pub fn reposition_options(current: &[Placement], index: usize) -> Vec<ImagePosition> {
    let Some(subject) = current.get(index) else {
        return Vec::new();
    };
    subject
        .size
        .positions()
        .iter()
        .copied()
        .filter(|pos| {
            subject.position == Some(*pos)
                || !current
                    .iter()
                    .enumerate()
                    .any(|(i, p)| i != index && p.position == Some(*pos))
        })
        .collect()
}

/// Evaluate all three classes against the capacity rules at once.
pub fn headroom(current: &[Placement]) -> Headroom {
    let allowed_sizes: Vec<ImageSize> = ImageSize::ALL
        .into_iter()
        .filter(|size| size_allowed(current, *size))
        .collect();
    Headroom { can_add: !allowed_sizes.is_empty(), allowed_sizes }
}
