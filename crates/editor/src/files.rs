//! Uploaded image payloads and filename handling.

use bytes::Bytes;

/// Characters that break downstream path handling. Rejected by validation
/// and replaced by [`sanitize_filename`].
pub const PROBLEM_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Longest stem [`sanitize_filename`] keeps, in characters.
const MAX_STEM_CHARS: usize = 200;

/// One uploaded image binary, addressed by its session-unique filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Bytes,
    /// Declared MIME type, when the upload source provided one. Advisory;
    /// the extension is what validation enforces.
    pub mime: Option<String>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self { name: name.into(), bytes: bytes.into(), mime: None }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Same payload and MIME under a different name.
    pub(crate) fn renamed(&self, name: impl Into<String>) -> Self {
        Self { name: name.into(), bytes: self.bytes.clone(), mime: self.mime.clone() }
    }
}

/// Split a filename into stem and extension. The extension starts at the
/// last dot, provided the dot is neither the first nor the last character;
/// hidden files like `.png` have no extension.
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Lowercased extension including the dot (`".png"`), or `""` when the name
/// has none. Unlike [`split_name`] this treats a lone leading dot as an
/// extension, so hidden files still report a recognizable format.
pub fn file_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

/// Append `_1`, `_2`, … before the extension until `is_taken` stops
/// matching.
pub fn unique_filename(name: &str, mut is_taken: impl FnMut(&str) -> bool) -> String {
    if !is_taken(name) {
        return name.to_string();
    }
    let (stem, ext) = split_name(name);
    let mut counter = 1u32;
    loop {
        let candidate = format!("{stem}_{counter}{ext}");
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Replace problematic characters and whitespace runs in the stem with `_`
/// and cap the stem length. The extension passes through untouched.
pub fn sanitize_filename(name: &str) -> String {
    let (stem, ext) = split_name(name);
    let mut sanitized = String::with_capacity(stem.len());
    let mut in_whitespace = false;
    for ch in stem.chars() {
        if PROBLEM_FILENAME_CHARS.contains(&ch) {
            sanitized.push('_');
            in_whitespace = false;
        } else if ch.is_whitespace() {
            if !in_whitespace {
                sanitized.push('_');
            }
            in_whitespace = true;
        } else {
            sanitized.push(ch);
            in_whitespace = false;
        }
    }
    let mut out: String = sanitized.chars().take(MAX_STEM_CHARS).collect();
    out.push_str(ext);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── file_extension ───────────────────────────────────────────────────

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(file_extension("photo.PNG"), ".png");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("noext"), "");
        assert_eq!(file_extension("trailing."), "");
        assert_eq!(file_extension(".png"), ".png");
    }

    // ── unique_filename ──────────────────────────────────────────────────

    #[test]
    fn free_name_passes_through() {
        assert_eq!(unique_filename("a.png", |_| false), "a.png");
    }

    #[test]
    fn suffix_goes_before_the_extension() {
        let taken = ["a.png"];
        assert_eq!(unique_filename("a.png", |n| taken.contains(&n)), "a_1.png");
    }

    #[test]
    fn counter_skips_taken_candidates() {
        let taken = ["a.png", "a_1.png", "a_2.png"];
        assert_eq!(unique_filename("a.png", |n| taken.contains(&n)), "a_3.png");
    }

    #[test]
    fn extensionless_name_gets_a_plain_suffix() {
        let taken = ["notes"];
        assert_eq!(unique_filename("notes", |n| taken.contains(&n)), "notes_1");
    }

    #[test]
    fn hidden_file_suffix_lands_at_the_end() {
        let taken = [".png"];
        assert_eq!(unique_filename(".png", |n| taken.contains(&n)), ".png_1");
    }

    // ── sanitize_filename ────────────────────────────────────────────────

    #[test]
    fn problem_characters_become_underscores() {
        assert_eq!(sanitize_filename("a/b:c*d.png"), "a_b_c_d.png");
        assert_eq!(sanitize_filename("what?.gif"), "what_.gif");
    }

    #[test]
    fn whitespace_runs_collapse_to_one_underscore() {
        assert_eq!(sanitize_filename("my  cool\tphoto.jpg"), "my_cool_photo.jpg");
    }

    #[test]
    fn long_stems_are_truncated_but_keep_the_extension() {
        let name = format!("{}.png", "x".repeat(300));
        let out = sanitize_filename(&name);
        assert!(out.ends_with(".png"));
        assert_eq!(out.chars().count(), 200 + ".png".len());
    }

    #[test]
    fn clean_names_are_untouched() {
        assert_eq!(sanitize_filename("already_fine-01.jpeg"), "already_fine-01.jpeg");
    }
}
