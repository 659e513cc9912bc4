use crate::size::ImageSize;

/// Canvas width in pixels (9:16 portrait).
pub const CANVAS_WIDTH: u32 = 1080;
/// Canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1920;

/// Width a medium image renders at when placed bottom-right. Narrower than
/// the nominal 540 px so it clears the character art in the lower-left
/// corner.
pub const MEDIUM_BOTTOM_WIDTH: u32 = 400;

/// A named placement slot on the canvas. Transcripts and the picker UI speak
/// slot names, never raw pixels; every slot belongs to exactly one
/// [`ImageSize`] class.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ImagePosition {
    RightHigh,
    RightMid,
    RightLow,
    TopLeft,
    TopRight,
    BottomRight,
    TopCenter,
}

/// Canvas-space geometry of one slot. Height is deliberately absent: the
/// render height follows the uploaded image's aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Coordinates {
    pub x: u32,
    pub y: u32,
    pub width: u32,
}

impl ImagePosition {
    /// Every slot, grouped by class: small, then medium, then large.
    pub const ALL: [ImagePosition; 7] = [
        ImagePosition::RightHigh,
        ImagePosition::RightMid,
        ImagePosition::RightLow,
        ImagePosition::TopLeft,
        ImagePosition::TopRight,
        ImagePosition::BottomRight,
        ImagePosition::TopCenter,
    ];

    /// The size class this slot belongs to.
    pub const fn size_class(self) -> ImageSize {
        match self {
            ImagePosition::RightHigh | ImagePosition::RightMid | ImagePosition::RightLow => {
                ImageSize::Small
            }
            ImagePosition::TopLeft | ImagePosition::TopRight | ImagePosition::BottomRight => {
                ImageSize::Medium
            }
            ImagePosition::TopCenter => ImageSize::Large,
        }
    }

    /// Top-left corner and width on the canvas. Small slots stagger down the
    /// right edge with `right-mid` shifted 150 px inward; medium slots line
    /// the top corners plus the narrowed bottom-right; the single large slot
    /// sits centered near the top.
    pub const fn coordinates(self) -> Coordinates {
        match self {
            ImagePosition::RightHigh => Coordinates { x: 730, y: 1000, width: 300 },
            ImagePosition::RightMid => Coordinates { x: 580, y: 1250, width: 300 },
            ImagePosition::RightLow => Coordinates { x: 730, y: 1500, width: 300 },
            ImagePosition::TopLeft => Coordinates { x: 50, y: 100, width: 540 },
            ImagePosition::TopRight => Coordinates { x: 490, y: 100, width: 540 },
            ImagePosition::BottomRight => {
                Coordinates { x: 630, y: 1620, width: MEDIUM_BOTTOM_WIDTH }
            }
            ImagePosition::TopCenter => Coordinates { x: 140, y: 100, width: 800 },
        }
    }

    /// Picker label, e.g. `"Right High"`.
    pub const fn label(self) -> &'static str {
        match self {
            ImagePosition::RightHigh => "Right High",
            ImagePosition::RightMid => "Right Mid",
            ImagePosition::RightLow => "Right Low",
            ImagePosition::TopLeft => "Top Left",
            ImagePosition::TopRight => "Top Right",
            ImagePosition::BottomRight => "Bottom Right",
            ImagePosition::TopCenter => "Top Center",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_match_the_catalog() {
        let cases = [
            (ImagePosition::RightHigh, 730, 1000, 300),
            (ImagePosition::RightMid, 580, 1250, 300),
            (ImagePosition::RightLow, 730, 1500, 300),
            (ImagePosition::TopLeft, 50, 100, 540),
            (ImagePosition::TopRight, 490, 100, 540),
            (ImagePosition::BottomRight, 630, 1620, 400),
            (ImagePosition::TopCenter, 140, 100, 800),
        ];
        for (pos, x, y, width) in cases {
            assert_eq!(pos.coordinates(), Coordinates { x, y, width }, "{pos}");
        }
    }

    #[test]
    fn every_slot_fits_the_canvas_horizontally() {
        for pos in ImagePosition::ALL {
            let c = pos.coordinates();
            assert!(c.x + c.width <= CANVAS_WIDTH, "{pos} overflows the right edge");
            assert!(c.y < CANVAS_HEIGHT, "{pos} starts below the canvas");
        }
    }

    #[test]
    fn slot_width_agrees_with_its_class() {
        for pos in ImagePosition::ALL {
            let expected = pos.size_class().width_at(Some(pos));
            assert_eq!(pos.coordinates().width, expected, "{pos}");
        }
    }

    #[test]
    fn wire_spelling_is_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ImagePosition::RightHigh).unwrap(),
            "\"right-high\""
        );
        let parsed: ImagePosition = serde_json::from_str("\"bottom-right\"").unwrap();
        assert_eq!(parsed, ImagePosition::BottomRight);
        assert_eq!(ImagePosition::TopCenter.to_string(), "top-center");
        assert_eq!("right-mid".parse::<ImagePosition>().unwrap(), ImagePosition::RightMid);
    }
}
