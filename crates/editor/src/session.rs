//! # Transcript Edit Session
//!
//! A single-owner working copy of a dialogue document plus the uploaded
//! binaries and preview handles it references. One session backs one editing
//! screen, from "transcript generated" to "submitted for video assembly" or
//! discarded.
//!
//! ## Ground rules
//!
//! **Atomic operations** — every mutation either applies fully or leaves the
//! session untouched. Out-of-range indices are caller bugs; they log a
//! warning and no-op instead of panicking or half-applying, so a stray click
//! never poisons the user's in-progress work.
//!
//! **No rule enforcement on mutation** — add and update accept whatever the
//! caller asks for. The slot allocator in `clip-canvas` is the authority on
//! what the UI may *offer*, and [`EditSession::validate`] is the authority
//! on what may be *submitted*. Keeping enforcement out of mutation keeps
//! every operation reversible while editing.
//!
//! **Balanced previews** — each preview handle is released exactly once: on
//! replacement, on the last reference going away, on clear/reset, and at
//! close. Dropping the session closes it.

use std::collections::BTreeMap;

use clip_canvas::{ImagePosition, ImageSize};

use crate::dialogue::{DialogueDocument, ImageConfig};
use crate::error::Error;
use crate::files::{ImageFile, unique_filename};
use crate::patch::ImagePatch;
use crate::preview::{PreviewHandle, PreviewRegistry, UriPreviews};
use crate::validate::{ValidationReport, validate_session};

/// Seconds a line is assumed to narrate when the generator supplied no
/// estimate. Informational; used by span-duration math only.
pub const DEFAULT_LINE_SECONDS: f64 = 3.0;

/// What [`EditSession::add_image`] does when an upload's name is already
/// taken by a different binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Store the incoming file under `name_1.png`, `name_2.png`, … instead.
    #[default]
    AutoRename,
    /// Refuse the add and let the caller resolve the clash.
    Reject,
}

/// Session knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub collision_policy: CollisionPolicy,
    /// Refresh the cached [`ValidationReport`] after every mutation, so UI
    /// layers can read [`EditSession::validation`] without scheduling their
    /// own passes.
    pub validate_on_change: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { collision_policy: CollisionPolicy::default(), validate_on_change: true }
    }
}

/// See the [module docs](self).
pub struct EditSession {
    transcript_id: String,
    /// Pristine copy for [`EditSession::reset`], normalized once at
    /// construction.
    original: DialogueDocument,
    document: DialogueDocument,
    files: BTreeMap<String, ImageFile>,
    previews: BTreeMap<String, PreviewHandle>,
    registry: Box<dyn PreviewRegistry>,
    config: SessionConfig,
    validation: ValidationReport,
    closed: bool,
}

impl EditSession {
    /// Start editing a freshly generated transcript with the default config
    /// and the URI preview registry.
    pub fn new(transcript_id: impl Into<String>, document: DialogueDocument) -> Self {
        Self::with_config(transcript_id, document, SessionConfig::default(), UriPreviews::new())
    }

    pub fn with_config(
        transcript_id: impl Into<String>,
        mut document: DialogueDocument,
        config: SessionConfig,
        registry: impl PreviewRegistry + 'static,
    ) -> Self {
        document.normalize();
        let mut session = Self {
            transcript_id: transcript_id.into(),
            original: document.clone(),
            document,
            files: BTreeMap::new(),
            previews: BTreeMap::new(),
            registry: Box::new(registry),
            config,
            validation: ValidationReport::default(),
            closed: false,
        };
        if session.config.validate_on_change {
            session.validation = session.run_validation();
        }
        session
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    pub fn document(&self) -> &DialogueDocument {
        &self.document
    }

    pub fn line_count(&self) -> usize {
        self.document.lines().len()
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Whether any uploads are attached to the session.
    pub fn has_images(&self) -> bool {
        !self.files.is_empty()
    }

    /// The uploaded binaries, name-sorted.
    pub fn image_files(&self) -> Vec<&ImageFile> {
        self.files.values().collect()
    }

    /// The display URI for an uploaded file, if one is registered.
    pub fn preview_uri(&self, filename: &str) -> Option<&str> {
        self.previews.get(filename).map(|handle| handle.uri.as_str())
    }

    /// Filenames the transcript references but nobody uploaded, in
    /// first-reference order.
    pub fn missing_files(&self) -> Vec<String> {
        self.document
            .referenced_filenames()
            .into_iter()
            .filter(|name| !self.files.contains_key(name))
            .collect()
    }

    /// Seconds the inclusive line range `start_line..=end_line` is expected
    /// to narrate, substituting [`DEFAULT_LINE_SECONDS`] per line without an
    /// estimate. Out-of-range tails clamp to the transcript length.
    pub fn span_duration(&self, start_line: usize, end_line: usize) -> f64 {
        self.document
            .lines()
            .iter()
            .take(end_line.saturating_add(1))
            .skip(start_line)
            .map(|line| line.duration_estimate.unwrap_or(DEFAULT_LINE_SECONDS))
            .sum()
    }

    /// Serialize the working document into the submission envelope
    /// `{ "dialogue": … }`, reflecting the current state exactly.
    pub fn transcript_json(&self) -> Result<String, Error> {
        self.document.to_json()
    }

    /// The report from the most recent validation pass. Stale when
    /// `validate_on_change` is off and the session changed since the last
    /// explicit [`EditSession::validate`].
    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Attach an uploaded image to a line.
    ///
    /// Returns the filename the upload was stored under, which differs from
    /// `file.name` when a collision was auto-renamed, or `None` when the
    /// line index is out of range or a collision was rejected. Re-uploading
    /// byte-identical content under its existing name is not a collision;
    /// the file is simply attached again.
    pub fn add_image(
        &mut self,
        line_index: usize,
        file: ImageFile,
        size: ImageSize,
        position: ImagePosition,
    ) -> Option<String> {
        if !self.guard_open("add_image") {
            return None;
        }
        if line_index >= self.line_count() {
            tracing::warn!(line_index, lines = self.line_count(), "add_image: line out of range");
            return None;
        }

        let mut file = file;
        if let Some(existing) = self.files.get(&file.name) {
            if existing.bytes != file.bytes {
                match self.config.collision_policy {
                    CollisionPolicy::AutoRename => {
                        let fresh =
                            unique_filename(&file.name, |name| self.files.contains_key(name));
                        tracing::debug!(from = %file.name, to = %fresh, "add_image: renamed colliding upload");
                        file = file.renamed(fresh);
                    }
                    CollisionPolicy::Reject => {
                        tracing::warn!(name = %file.name, "add_image: name taken by a different file");
                        return None;
                    }
                }
            }
        }

        let filename = file.name.clone();
        let config = ImageConfig::new(filename.clone(), size, position);
        self.document.lines_mut()[line_index].images_mut().push(config);
        self.install_file(file);
        self.after_mutation();
        Some(filename)
    }

    /// Merge a partial update into the image at `line_index`/`image_index`.
    pub fn update_image(&mut self, line_index: usize, image_index: usize, patch: ImagePatch) -> bool {
        if !self.guard_open("update_image") {
            return false;
        }
        if !self.image_in_range(line_index, image_index) {
            tracing::warn!(line_index, image_index, "update_image: no image at that slot");
            return false;
        }
        let line = &mut self.document.lines_mut()[line_index];
        patch.apply(&mut line.images_mut()[image_index]);
        self.after_mutation();
        true
    }

    /// Detach the image at `line_index`/`image_index`. When that was the
    /// last reference to its filename anywhere in the transcript, the binary
    /// and its preview handle are purged too.
    pub fn remove_image(&mut self, line_index: usize, image_index: usize) -> bool {
        if !self.guard_open("remove_image") {
            return false;
        }
        if !self.image_in_range(line_index, image_index) {
            tracing::warn!(line_index, image_index, "remove_image: no image at that slot");
            return false;
        }

        let line = &mut self.document.lines_mut()[line_index];
        let removed = line.images_mut().remove(image_index);
        line.prune_images();

        if !self.document.references(&removed.filename) {
            self.purge_file(&removed.filename);
        }
        self.after_mutation();
        true
    }

    /// Propagate the image at `source_line`/`image_index` across every line
    /// through `target_line` inclusive, modeling "stays on screen until
    /// line N".
    ///
    /// Any previous span of the same filename is retracted first, so a
    /// second call with a nearer target pulls the image back out of the far
    /// lines, and `target_line <= source_line` just retracts. Targets past
    /// the end clamp to the last line.
    pub fn span_image(&mut self, source_line: usize, image_index: usize, target_line: usize) -> bool {
        if !self.guard_open("span_image") {
            return false;
        }
        let Some(config) = self
            .document
            .lines()
            .get(source_line)
            .and_then(|line| line.all_images().get(image_index))
            .cloned()
        else {
            tracing::warn!(source_line, image_index, "span_image: no image at that slot");
            return false;
        };

        let lines = self.document.lines_mut();
        for line in lines.iter_mut().skip(source_line + 1) {
            if line.has_images() {
                line.images_mut().retain(|image| image.filename != config.filename);
                line.prune_images();
            }
        }

        if target_line > source_line && source_line + 1 < lines.len() {
            let last = target_line.min(lines.len() - 1);
            for line in &mut lines[source_line + 1..=last] {
                line.images_mut().push(config.clone());
            }
        }

        self.after_mutation();
        true
    }

    /// Replace a line's caption text.
    pub fn update_caption(&mut self, line_index: usize, caption: impl Into<String>) -> bool {
        if !self.guard_open("update_caption") {
            return false;
        }
        let Some(line) = self.document.lines_mut().get_mut(line_index) else {
            tracing::warn!(line_index, "update_caption: line out of range");
            return false;
        };
        line.caption = caption.into();
        self.after_mutation();
        true
    }

    /// Swap the binary stored under `filename` for new content, keeping
    /// every transcript reference and the name itself. The superseded
    /// preview handle is released and a fresh one minted.
    pub fn replace_file(&mut self, filename: &str, replacement: ImageFile) -> bool {
        if !self.guard_open("replace_file") {
            return false;
        }
        if !self.files.contains_key(filename) {
            tracing::warn!(filename, "replace_file: no upload under that name");
            return false;
        }
        self.install_file(replacement.renamed(filename));
        self.after_mutation();
        true
    }

    /// Strip every image from every line and drop all uploads and previews.
    pub fn clear_all_images(&mut self) {
        if !self.guard_open("clear_all_images") {
            return;
        }
        for line in self.document.lines_mut() {
            line.clear_images();
        }
        self.release_all_previews();
        self.files.clear();
        self.after_mutation();
    }

    /// Discard every edit and return to a fresh copy of the original
    /// transcript, as if newly constructed.
    pub fn reset(&mut self) {
        if !self.guard_open("reset") {
            return;
        }
        self.release_all_previews();
        self.files.clear();
        self.document = self.original.clone();
        self.after_mutation();
    }

    // ── Validation ───────────────────────────────────────────────────────

    /// Run the full rule set, refresh the cached report, and return it.
    pub fn validate(&mut self) -> ValidationReport {
        self.validation = self.run_validation();
        self.validation.clone()
    }

    // ── Teardown ─────────────────────────────────────────────────────────

    /// Release every outstanding preview handle and end the session.
    /// Idempotent; runs automatically on drop. Reads keep working on a
    /// closed session, mutations become logged no-ops.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.release_all_previews();
    }

    // ── Internal ─────────────────────────────────────────────────────────

    fn guard_open(&self, op: &'static str) -> bool {
        if self.closed {
            tracing::warn!(op, "mutation on a closed session");
            return false;
        }
        true
    }

    fn image_in_range(&self, line_index: usize, image_index: usize) -> bool {
        self.document
            .lines()
            .get(line_index)
            .is_some_and(|line| image_index < line.all_images().len())
    }

    /// Store a binary and mint its preview, releasing any handle the same
    /// name already held.
    fn install_file(&mut self, file: ImageFile) {
        if let Some(superseded) = self.previews.remove(&file.name) {
            self.registry.release(superseded);
        }
        let handle = self.registry.create(&file);
        self.previews.insert(file.name.clone(), handle);
        self.files.insert(file.name.clone(), file);
    }

    /// Drop a binary and release its preview handle.
    fn purge_file(&mut self, filename: &str) {
        self.files.remove(filename);
        if let Some(handle) = self.previews.remove(filename) {
            tracing::debug!(filename, uri = %handle.uri, "releasing preview of unreferenced file");
            self.registry.release(handle);
        }
    }

    fn release_all_previews(&mut self) {
        for (_, handle) in std::mem::take(&mut self.previews) {
            self.registry.release(handle);
        }
    }

    fn run_validation(&self) -> ValidationReport {
        validate_session(&self.transcript_id, &self.document, &self.files)
    }

    fn after_mutation(&mut self) {
        if self.config.validate_on_change {
            self.validation = self.run_validation();
        }
    }
}

impl Drop for EditSession {
    fn drop(&mut self) {
        self.close();
    }
}
