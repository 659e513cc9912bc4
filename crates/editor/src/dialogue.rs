//! The dialogue document model.
//!
//! This is the wire shape the generation service produces and the video
//! assembler consumes, `{ "dialogue": { "title": …, "dialogue": [ … ] } }`,
//! kept serde-faithful so a document survives an edit session byte-for-byte
//! where it was not touched.
//!
//! Attached images have two wire encodings: the legacy single `image` field
//! and the list-valued `images` field. Reading code merges them through
//! [`DialogueLine::all_images`]; mutation goes through
//! [`DialogueLine::images_mut`], which folds the legacy field into the list
//! first so the two representations never diverge in memory.

use clip_canvas::{ImagePosition, ImageSize, Placement};

use crate::error::Error;

/// The two fixed voices dialogue lines are spoken in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    specta::Type,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Speaker {
    Peter,
    Stewie,
}

/// One image attached to a dialogue line.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct ImageConfig {
    /// Key into the session's uploaded files.
    pub filename: String,
    pub size: ImageSize,
    /// `None` falls back to the size's default position at render time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<ImagePosition>,
    /// Seconds after the line starts before the image appears. `None` means
    /// from the start of the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    /// Seconds the image stays visible. `None` means until the line ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Clamped show window for one image, in seconds from line start.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct ResolvedTiming {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
}

impl ImageConfig {
    pub fn new(filename: impl Into<String>, size: ImageSize, position: ImagePosition) -> Self {
        Self {
            filename: filename.into(),
            size,
            position: Some(position),
            start_time: None,
            duration: None,
        }
    }

    /// The slice of this config the slot allocator operates on.
    pub fn placement(&self) -> Placement {
        Placement { size: self.size, position: self.position }
    }

    /// The configured position, or the size's default when unset.
    pub fn effective_position(&self) -> ImagePosition {
        self.position.unwrap_or(self.size.default_position())
    }

    /// Clamp the configured timing against the line's duration: the window
    /// never starts before the line, never outruns it, and never runs
    /// backwards. A missing `duration` means "until the line ends".
    pub fn resolved_timing(&self, line_duration: f64) -> ResolvedTiming {
        let start = self.start_time.unwrap_or(0.0).max(0.0);
        let requested_end = match self.duration {
            Some(duration) => start + duration,
            None => line_duration,
        };
        let end = requested_end.min(line_duration).max(start);
        ResolvedTiming { start, end, duration: end - start }
    }
}

/// One captioned utterance. Images attach here.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct DialogueLine {
    pub caption: String,
    pub speaker: Speaker,
    /// Legacy single-image encoding. Superseded by `images`; mutation folds
    /// it into the list and leaves this `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageConfig>>,
    /// 1-based position assigned by the generator; informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Seconds the narration of this line is expected to take.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_estimate: Option<f64>,
}

impl DialogueLine {
    pub fn new(speaker: Speaker, caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            speaker,
            image: None,
            images: None,
            line_number: None,
            duration_estimate: None,
        }
    }

    /// The logical image list: the list field when non-empty, else the
    /// legacy single field, else nothing.
    pub fn all_images(&self) -> &[ImageConfig] {
        match &self.images {
            Some(list) if !list.is_empty() => list,
            _ => self.image.as_slice(),
        }
    }

    /// Mutable access to the image list, folding the legacy single-image
    /// encoding into the list first (the legacy image keeps its place at the
    /// front). After this call the `image` field is always `None`.
    pub fn images_mut(&mut self) -> &mut Vec<ImageConfig> {
        let list = self.images.get_or_insert_with(Vec::new);
        if let Some(legacy) = self.image.take() {
            list.insert(0, legacy);
        }
        list
    }

    /// Drop the list field once it has emptied, keeping the wire shape
    /// minimal.
    pub fn prune_images(&mut self) {
        if self.images.as_ref().is_some_and(Vec::is_empty) {
            self.images = None;
        }
    }

    /// Fold the legacy encoding into the canonical list form.
    pub fn normalize(&mut self) {
        if self.image.is_some() {
            self.images_mut();
        }
        self.prune_images();
    }

    /// Remove every image from the line, both encodings.
    pub fn clear_images(&mut self) {
        self.image = None;
        self.images = None;
    }

    pub fn has_images(&self) -> bool {
        !self.all_images().is_empty()
    }

    /// Placement views for the slot allocator.
    pub fn placements(&self) -> Vec<Placement> {
        self.all_images().iter().map(ImageConfig::placement).collect()
    }
}

/// The editable document: a titled, ordered sequence of dialogue lines.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct SingleDialogue {
    #[serde(default)]
    pub title: String,
    pub dialogue: Vec<DialogueLine>,
}

/// The `{ "dialogue": … }` envelope the generation service emits and the
/// submission endpoint consumes.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct DialogueDocument {
    pub dialogue: SingleDialogue,
}

impl DialogueDocument {
    pub fn new(dialogue: SingleDialogue) -> Self {
        Self { dialogue }
    }

    /// Parse an exported or imported transcript document. Shape problems
    /// (missing envelope, unknown speakers or sizes, malformed numbers)
    /// surface as [`Error::Json`] with serde's path context.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn lines(&self) -> &[DialogueLine] {
        &self.dialogue.dialogue
    }

    pub fn lines_mut(&mut self) -> &mut Vec<DialogueLine> {
        &mut self.dialogue.dialogue
    }

    /// Fold every line's legacy single-image field into the list encoding.
    pub fn normalize(&mut self) {
        for line in self.lines_mut() {
            line.normalize();
        }
    }

    /// Every non-empty filename any line references, in first-reference
    /// order, deduplicated.
    pub fn referenced_filenames(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for line in self.lines() {
            for image in line.all_images() {
                if !image.filename.is_empty() && !seen.contains(&image.filename) {
                    seen.push(image.filename.clone());
                }
            }
        }
        seen
    }

    /// Whether any line still references `filename`.
    pub fn references(&self, filename: &str) -> bool {
        self.lines().iter().any(|line| {
            line.all_images().iter().any(|image| image.filename == filename)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(filename: &str) -> ImageConfig {
        ImageConfig::new(filename, ImageSize::Small, ImagePosition::RightLow)
    }

    fn line() -> DialogueLine {
        DialogueLine::new(Speaker::Peter, "Hey Stewie, look at this")
    }

    // ── wire shape ───────────────────────────────────────────────────────

    #[test]
    fn speakers_use_upper_case_wire_spelling() {
        assert_eq!(serde_json::to_string(&Speaker::Peter).unwrap(), "\"PETER\"");
        let parsed: Speaker = serde_json::from_str("\"STEWIE\"").unwrap();
        assert_eq!(parsed, Speaker::Stewie);
        assert_eq!(Speaker::Peter.to_string(), "PETER");
        assert_eq!("STEWIE".parse::<Speaker>().unwrap(), Speaker::Stewie);
    }

    #[test]
    fn unknown_speaker_is_a_parse_error() {
        let json = r#"{"dialogue":{"title":"t","dialogue":[{"caption":"c","speaker":"BRIAN"}]}}"#;
        assert!(DialogueDocument::from_json(json).is_err());
    }

    #[test]
    fn absent_optional_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&line()).unwrap();
        assert!(!json.contains("image"));
        assert!(!json.contains("line_number"));
        assert!(!json.contains("duration_estimate"));
        assert!(!json.contains("position"));
    }

    #[test]
    fn missing_envelope_is_a_parse_error() {
        assert!(DialogueDocument::from_json(r#"{"title":"flat"}"#).is_err());
        assert!(DialogueDocument::from_json("not json").is_err());
    }

    #[test]
    fn document_round_trips_through_json() {
        let json = r#"{"dialogue":{"title":"Quantum","dialogue":[
            {"caption":"Look","speaker":"PETER",
             "images":[{"filename":"a.png","size":"small","position":"right-low"}],
             "duration_estimate":3.5},
            {"caption":"Fascinating","speaker":"STEWIE","image":{"filename":"b.png","size":"large"}}
        ]}}"#;
        let doc = DialogueDocument::from_json(json).unwrap();
        let reparsed = DialogueDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(doc, reparsed);
    }

    // ── merged image list ────────────────────────────────────────────────

    #[test]
    fn list_wins_over_legacy_when_both_present() {
        let mut l = line();
        l.image = Some(config("legacy.png"));
        l.images = Some(vec![config("list.png")]);
        let names: Vec<&str> = l.all_images().iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, ["list.png"]);
    }

    #[test]
    fn empty_list_falls_back_to_legacy() {
        let mut l = line();
        l.image = Some(config("legacy.png"));
        l.images = Some(Vec::new());
        assert_eq!(l.all_images().len(), 1);
        assert_eq!(l.all_images()[0].filename, "legacy.png");
    }

    #[test]
    fn images_mut_folds_legacy_to_the_front() {
        let mut l = line();
        l.image = Some(config("legacy.png"));
        l.images_mut().push(config("new.png"));
        assert!(l.image.is_none());
        let names: Vec<&str> = l.all_images().iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(names, ["legacy.png", "new.png"]);
    }

    #[test]
    fn normalize_prunes_an_empty_list() {
        let mut l = line();
        l.images = Some(Vec::new());
        l.normalize();
        assert!(l.images.is_none());
        assert!(!l.has_images());
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut l = line();
        l.image = Some(config("legacy.png"));
        l.normalize();
        let once = l.clone();
        l.normalize();
        assert_eq!(l, once);
        assert!(l.image.is_none());
        assert_eq!(l.all_images().len(), 1);
    }

    // ── references ───────────────────────────────────────────────────────

    #[test]
    fn referenced_filenames_dedup_in_first_seen_order() {
        let mut doc = DialogueDocument::default();
        let mut a = line();
        a.images = Some(vec![config("x.png"), config("y.png")]);
        let mut b = line();
        b.image = Some(config("x.png"));
        doc.lines_mut().extend([a, b]);

        assert_eq!(doc.referenced_filenames(), ["x.png", "y.png"]);
        assert!(doc.references("y.png"));
        assert!(!doc.references("z.png"));
    }

    #[test]
    fn empty_filenames_are_not_references() {
        let mut doc = DialogueDocument::default();
        let mut a = line();
        a.images = Some(vec![config("")]);
        doc.lines_mut().push(a);
        assert!(doc.referenced_filenames().is_empty());
    }

    // ── timing ───────────────────────────────────────────────────────────

    #[test]
    fn untimed_image_shows_for_the_whole_line() {
        let timing = config("a.png").resolved_timing(4.0);
        assert_eq!(timing.start, 0.0);
        assert_eq!(timing.end, 4.0);
        assert_eq!(timing.duration, 4.0);
    }

    #[test]
    fn missing_duration_runs_to_the_end_of_the_line() {
        let mut c = config("a.png");
        c.start_time = Some(1.5);
        let timing = c.resolved_timing(4.0);
        assert_eq!(timing.start, 1.5);
        assert_eq!(timing.end, 4.0);
        assert_eq!(timing.duration, 2.5);
    }

    #[test]
    fn overlong_duration_clamps_to_the_line() {
        let mut c = config("a.png");
        c.start_time = Some(2.0);
        c.duration = Some(10.0);
        let timing = c.resolved_timing(5.0);
        assert_eq!(timing.end, 5.0);
        assert_eq!(timing.duration, 3.0);
    }

    #[test]
    fn start_past_the_line_yields_a_zero_window() {
        let mut c = config("a.png");
        c.start_time = Some(7.0);
        c.duration = Some(1.0);
        let timing = c.resolved_timing(5.0);
        assert_eq!(timing.start, 7.0);
        assert_eq!(timing.end, 7.0);
        assert_eq!(timing.duration, 0.0);
    }

    #[test]
    fn effective_position_falls_back_to_class_default() {
        let mut c = config("a.png");
        assert_eq!(c.effective_position(), ImagePosition::RightLow);
        c.position = None;
        assert_eq!(c.effective_position(), ImageSize::Small.default_position());
    }
}
