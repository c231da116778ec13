use thiserror::Error;

/// Why a document could not be turned into a `Proposal`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("failed to read document: {0}")]
    Read(String),

    #[error("document is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("no metadata block found")]
    MissingMetadataBlock,

    #[error("metadata block opened on line {opened_at} is never closed")]
    UnterminatedMetadataBlock { opened_at: usize },

    #[error("malformed metadata on line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
