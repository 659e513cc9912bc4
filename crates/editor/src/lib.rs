//! # Transcript Editing Core
//!
//! The in-memory engine behind the dialogue editing screen: the document
//! model the generation service emits, a single-owner [`EditSession`] that
//! tracks attached images, uploaded binaries and their preview handles, and
//! the [`validate`] pass that gates submission to video assembly.
//!
//! Canvas geometry and slot-capacity rules live in [`clip_canvas`]; this
//! crate consults them and owns everything stateful.

pub mod dialogue;
mod error;
pub mod files;
pub mod patch;
pub mod preview;
pub mod session;
pub mod validate;

pub use dialogue::{
    DialogueDocument, DialogueLine, ImageConfig, ResolvedTiming, SingleDialogue, Speaker,
};
pub use error::Error;
pub use files::{ImageFile, file_extension, sanitize_filename, unique_filename};
pub use patch::{ImagePatch, Patch};
pub use preview::{PreviewHandle, PreviewRegistry, UriPreviews};
pub use session::{CollisionPolicy, DEFAULT_LINE_SECONDS, EditSession, SessionConfig};
pub use validate::{ValidationReport, validate_session};
