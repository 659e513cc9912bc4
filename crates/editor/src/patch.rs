//! Partial updates for attached images.
//!
//! The editing UI patches one field at a time (position picker, timing
//! inputs) and must also be able to *clear* an optional field, so a plain
//! `Option<T>` per field cannot express "leave it alone" and "unset it" at
//! once. [`Patch`] carries all three intents.

use clip_canvas::{ImagePosition, ImageSize};

use crate::dialogue::ImageConfig;

/// One field of a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the field as it is.
    Keep,
    /// Reset the field to unset.
    Clear,
    /// Overwrite the field.
    Set(T),
}

// Not derived: the derive would demand `T: Default` for a unit variant.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(value) => *slot = Some(value),
        }
    }
}

/// A partial update across an image's editable fields. The default patch
/// changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImagePatch {
    /// Size is never cleared, only replaced; every image has one.
    pub size: Option<ImageSize>,
    pub position: Patch<ImagePosition>,
    pub start_time: Patch<f64>,
    pub duration: Patch<f64>,
}

impl ImagePatch {
    pub fn size(size: ImageSize) -> Self {
        Self { size: Some(size), ..Self::default() }
    }

    pub fn position(position: ImagePosition) -> Self {
        Self { position: Patch::Set(position), ..Self::default() }
    }

    pub fn start_time(seconds: f64) -> Self {
        Self { start_time: Patch::Set(seconds), ..Self::default() }
    }

    pub fn duration(seconds: f64) -> Self {
        Self { duration: Patch::Set(seconds), ..Self::default() }
    }

    /// Unset both timing fields, returning the image to "whole line".
    pub fn clear_timing() -> Self {
        Self { start_time: Patch::Clear, duration: Patch::Clear, ..Self::default() }
    }

    pub fn with_position(mut self, position: ImagePosition) -> Self {
        self.position = Patch::Set(position);
        self
    }

    /// Merge this patch into an image. Untouched fields keep their values.
    pub fn apply(self, image: &mut ImageConfig) {
        if let Some(size) = self.size {
            image.size = size;
        }
        self.position.apply(&mut image.position);
        self.start_time.apply(&mut image.start_time);
        self.duration.apply(&mut image.duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageConfig {
        let mut c = ImageConfig::new("a.png", ImageSize::Small, ImagePosition::RightLow);
        c.start_time = Some(1.0);
        c.duration = Some(2.0);
        c
    }

    #[test]
    fn default_patch_changes_nothing() {
        let mut img = image();
        ImagePatch::default().apply(&mut img);
        assert_eq!(img, image());
    }

    #[test]
    fn set_overwrites_only_its_field() {
        let mut img = image();
        ImagePatch::position(ImagePosition::RightHigh).apply(&mut img);
        assert_eq!(img.position, Some(ImagePosition::RightHigh));
        assert_eq!(img.start_time, Some(1.0));
        assert_eq!(img.duration, Some(2.0));
        assert_eq!(img.size, ImageSize::Small);
    }

    #[test]
    fn clear_unsets_timing() {
        let mut img = image();
        ImagePatch::clear_timing().apply(&mut img);
        assert_eq!(img.start_time, None);
        assert_eq!(img.duration, None);
        assert_eq!(img.position, Some(ImagePosition::RightLow));
    }

    #[test]
    fn size_change_can_carry_a_new_position() {
        let mut img = image();
        ImagePatch::size(ImageSize::Medium).with_position(ImagePosition::TopLeft).apply(&mut img);
        assert_eq!(img.size, ImageSize::Medium);
        assert_eq!(img.position, Some(ImagePosition::TopLeft));
    }
}
