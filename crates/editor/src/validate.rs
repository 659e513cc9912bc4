//! The pre-submission rule set.
//!
//! One pure pass over the whole session: transcript shape first, then every
//! line in order, then reference/upload matching, then the uploads
//! themselves, then totals. Every finding is collected, never just the
//! first, so the UI can show a complete list.
//!
//! Findings come in two tiers. **Errors** block submission. **Warnings**
//! flag things the assembler will quietly work around (clamped timings,
//! heavyweight files) and never block.

use std::collections::BTreeMap;

use crate::dialogue::{DialogueDocument, DialogueLine, ImageConfig};
use crate::files::{ImageFile, PROBLEM_FILENAME_CHARS, file_extension};

/// Extensions the video assembler accepts.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".gif"];
/// Hard per-file cap.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
/// Soft per-file threshold; above it we suggest compressing.
pub const WARN_FILE_BYTES: usize = 5 * 1024 * 1024;
/// Soft cap on the sum of all uploads in one session.
pub const MAX_TOTAL_BYTES: usize = 50 * 1024 * 1024;
/// Seconds the assembler's fade transition takes. An image shown for less
/// never becomes fully visible.
pub const FADE_SECONDS: f64 = 0.3;
/// Longest filename the storage layer tolerates.
pub const MAX_FILENAME_CHARS: usize = 255;

/// Outcome of one validation pass. `valid` tracks errors only; warnings
/// never block submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self { valid: true, errors: Vec::new(), warnings: Vec::new() }
    }
}

impl ValidationReport {
    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Run every rule against a session's document and uploads. Pure: same
/// inputs, same report, no side effects.
pub fn validate_session(
    transcript_id: &str,
    document: &DialogueDocument,
    files: &BTreeMap<String, ImageFile>,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    if transcript_id.trim().is_empty() {
        report.error("Missing transcript id".into());
    }

    let dialogue = &document.dialogue;
    if dialogue.title.trim().is_empty() {
        report.warn("Dialogue has no title".into());
    }
    if dialogue.dialogue.is_empty() {
        report.error("Dialogue has no lines".into());
    }

    for (index, line) in dialogue.dialogue.iter().enumerate() {
        check_line(index, line, &mut report);
    }

    for filename in document.referenced_filenames() {
        if !files.contains_key(&filename) {
            report.error(format!(
                "Missing file: \"{filename}\" is referenced in the transcript but was never uploaded"
            ));
        }
    }

    for file in files.values() {
        check_file(file, &mut report);
    }

    let total: usize = files.values().map(ImageFile::len).sum();
    if total > MAX_TOTAL_BYTES {
        report.warn(format!(
            "Total upload size {} exceeds the recommended {}",
            format_mb(total),
            format_mb(MAX_TOTAL_BYTES)
        ));
    }

    report.valid = report.errors.is_empty();
    report
}

// ── Per-line rules ───────────────────────────────────────────────────────

fn check_line(index: usize, line: &DialogueLine, report: &mut ValidationReport) {
    // Findings cite 1-based line numbers, matching what the UI shows.
    let label = format!("Line {}", index + 1);

    if line.caption.trim().is_empty() {
        report.error(format!("{label}: Missing caption"));
    }

    for image in line.all_images() {
        check_image(&label, image, line.duration_estimate, report);
    }
}

fn check_image(
    label: &str,
    image: &ImageConfig,
    line_duration: Option<f64>,
    report: &mut ValidationReport,
) {
    if image.filename.trim().is_empty() {
        report.error(format!("{label}: Image has an empty filename"));
    }

    if let Some(start) = image.start_time {
        if start < 0.0 {
            report.error(format!("{label}: start_time cannot be negative ({start}s)"));
        }
        if let Some(line_dur) = line_duration {
            if start >= line_dur {
                report.warn(format!(
                    "{label}: start_time {start}s is at or past the line's {line_dur}s; the image will never appear"
                ));
            }
        }
    }

    if let Some(duration) = image.duration {
        if duration <= 0.0 {
            report.error(format!("{label}: duration must be positive ({duration}s)"));
        }
        if duration < FADE_SECONDS {
            report.warn(format!(
                "{label}: duration {duration}s is shorter than the {FADE_SECONDS}s fade and may be invisible"
            ));
        }
        if let Some(line_dur) = line_duration {
            let end = image.start_time.unwrap_or(0.0) + duration;
            if end > line_dur {
                report.warn(format!(
                    "{label}: image ends at {end}s but the line ends at {line_dur}s; it will be clamped"
                ));
            }
        }
    }
}

// ── Per-file rules ───────────────────────────────────────────────────────

fn check_file(file: &ImageFile, report: &mut ValidationReport) {
    let name = &file.name;

    let ext = file_extension(name);
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        report.error(format!(
            "File \"{name}\": unsupported format (allowed: PNG, JPG, JPEG, GIF)"
        ));
    }

    if file.len() > MAX_FILE_BYTES {
        report.error(format!(
            "File \"{name}\": too large ({}, max {})",
            format_mb(file.len()),
            format_mb(MAX_FILE_BYTES)
        ));
    } else if file.len() > WARN_FILE_BYTES {
        report.warn(format!(
            "File \"{name}\": large file ({}); consider compressing",
            format_mb(file.len())
        ));
    }

    if file.is_empty() {
        report.error(format!("File \"{name}\": empty file (0 bytes)"));
    }

    if let Some(mime) = file.mime.as_deref().filter(|m| !m.is_empty()) {
        if !mime.starts_with("image/") {
            report.warn(format!(
                "File \"{name}\": declared type \"{mime}\" is not an image type"
            ));
        }
    }

    check_filename(name, report);
}

/// The three name rules are one rule with three trips; only the first match
/// is reported per file.
fn check_filename(name: &str, report: &mut ValidationReport) {
    if let Some(bad) = name.chars().find(|c| PROBLEM_FILENAME_CHARS.contains(c)) {
        report.error(format!("File \"{name}\": name contains unsupported character '{bad}'"));
    } else if name.chars().count() > MAX_FILENAME_CHARS {
        report.error(format!("File \"{name}\": name too long (max {MAX_FILENAME_CHARS} characters)"));
    } else if name.starts_with('.') {
        report.error(format!("File \"{name}\": hidden files are not allowed"));
    }
}

fn format_mb(bytes: usize) -> String {
    format!("{:.1}MB", bytes as f64 / 1024.0 / 1024.0)
}
