use crate::position::{ImagePosition, MEDIUM_BOTTOM_WIDTH};

/// The three image size classes. The class decides which named positions an
/// image may occupy and how many of its kind fit on one dialogue line.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    specta::Type,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageSize {
    Small,
    Medium,
    Large,
}

impl ImageSize {
    /// Every class, smallest first. Capacity checks report in this order.
    pub const ALL: [ImageSize; 3] = [ImageSize::Small, ImageSize::Medium, ImageSize::Large];

    /// Render width in canvas pixels, before any position override.
    pub const fn nominal_width(self) -> u32 {
        match self {
            ImageSize::Small => 300,
            ImageSize::Medium => 540,
            ImageSize::Large => 800,
        }
    }

    /// Render width at a concrete position. Medium narrows at
    /// [`ImagePosition::BottomRight`] so it clears the character art in the
    /// lower-left corner; every other combination uses the nominal width.
    pub fn width_at(self, position: Option<ImagePosition>) -> u32 {
        match (self, position) {
            (ImageSize::Medium, Some(ImagePosition::BottomRight)) => MEDIUM_BOTTOM_WIDTH,
            _ => self.nominal_width(),
        }
    }

    /// Height the preview grid assumes, roughly 4:3 against the nominal
    /// width. The real render height follows the uploaded image's aspect
    /// ratio.
    pub const fn estimated_height(self) -> u32 {
        match self {
            ImageSize::Small => 225,
            ImageSize::Medium => 405,
            ImageSize::Large => 600,
        }
    }

    /// Most images of this class one dialogue line may carry.
    pub const fn max_per_line(self) -> usize {
        match self {
            ImageSize::Small => 3,
            ImageSize::Medium => 2,
            ImageSize::Large => 1,
        }
    }

    /// Named positions this class may occupy, in catalog order. The three
    /// sets are disjoint: no position is shared between classes.
    pub const fn positions(self) -> &'static [ImagePosition] {
        match self {
            ImageSize::Small => &[
                ImagePosition::RightHigh,
                ImagePosition::RightMid,
                ImagePosition::RightLow,
            ],
            ImageSize::Medium => &[
                ImagePosition::TopLeft,
                ImagePosition::TopRight,
                ImagePosition::BottomRight,
            ],
            ImageSize::Large => &[ImagePosition::TopCenter],
        }
    }

    /// Where an image of this class lands when the caller picks no position.
    pub const fn default_position(self) -> ImagePosition {
        match self {
            ImageSize::Small => ImagePosition::RightLow,
            ImageSize::Medium => ImagePosition::TopRight,
            ImageSize::Large => ImagePosition::TopCenter,
        }
    }

    /// Picker label carrying the effective width, e.g. `"Medium (540px)"`.
    pub fn label_at(self, position: Option<ImagePosition>) -> String {
        let name = match self {
            ImageSize::Small => "Small",
            ImageSize::Medium => "Medium",
            ImageSize::Large => "Large",
        };
        format!("{name} ({}px)", self.width_at(position))
    }
}
