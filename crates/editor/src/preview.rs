//! Display-only preview handles for uploaded images.
//!
//! The engine owns no windowing or DOM resources; whatever the embedding UI
//! uses to show a thumbnail (an object URL in a webview, a texture, a temp
//! file) is minted and torn down through [`PreviewRegistry`]. The edit
//! session releases each handle exactly once: when its file is replaced,
//! when the last transcript reference to the file goes away, and on
//! clear/reset/close.

use std::collections::HashSet;

use crate::files::ImageFile;

/// An opaque preview token. The `uri` is what the UI renders; the session
/// never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct PreviewHandle {
    pub uri: String,
}

/// Mints and tears down preview resources on behalf of the session.
///
/// Implementations may assume each handle they minted is released at most
/// once, in any order; the session upholds that.
pub trait PreviewRegistry: Send + Sync {
    fn create(&mut self, file: &ImageFile) -> PreviewHandle;
    fn release(&mut self, handle: PreviewHandle);
}

/// Default registry: mints `preview://<uuid>` URIs and tracks outstanding
/// handles, so a leaked handle is observable.
#[derive(Debug, Default)]
pub struct UriPreviews {
    outstanding: HashSet<String>,
}

impl UriPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles minted and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }
}

impl PreviewRegistry for UriPreviews {
    fn create(&mut self, file: &ImageFile) -> PreviewHandle {
        let uri = format!("preview://{}", uuid::Uuid::new_v4());
        tracing::debug!(file = %file.name, %uri, "minted preview");
        self.outstanding.insert(uri.clone());
        PreviewHandle { uri }
    }

    fn release(&mut self, handle: PreviewHandle) {
        if !self.outstanding.remove(&handle.uri) {
            tracing::warn!(uri = %handle.uri, "released a preview handle this registry never minted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uris_are_unique_per_mint() {
        let mut registry = UriPreviews::new();
        let file = ImageFile::new("a.png", vec![1, 2, 3]);
        let first = registry.create(&file);
        let second = registry.create(&file);
        assert_ne!(first.uri, second.uri);
        assert!(first.uri.starts_with("preview://"));
        assert_eq!(registry.outstanding(), 2);
    }

    #[test]
    fn release_retires_the_handle() {
        let mut registry = UriPreviews::new();
        let handle = registry.create(&ImageFile::new("a.png", vec![1]));
        registry.release(handle);
        assert_eq!(registry.outstanding(), 0);
    }

    #[test]
    fn releasing_a_foreign_handle_is_harmless() {
        let mut registry = UriPreviews::new();
        registry.release(PreviewHandle { uri: "preview://not-ours".into() });
        assert_eq!(registry.outstanding(), 0);
    }
}
