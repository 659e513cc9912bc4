#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transcript import or export hit malformed JSON or an unknown
    /// speaker/size/position spelling.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
