#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image encode failed: {0}")]
    Encode(String),
    #[error("invalid image dimensions")]
    Dimensions,
    #[error("no image loaded")]
    MissingImage,
}
