// Public API exports
pub mod collection;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod source;

// Re-export main types for convenience
pub use parser::{parse, parse_str, ParseError, Proposal, BOUNDARY_MARKER};

pub use collection::{identifier, to_json_string, write_json, Collection};

pub use source::{
    discover, is_document, SourceBuilder, SourceConfig, SourceError, DEFAULT_EXTENSION,
    DEFAULT_IGNORED,
};

pub use error::KepifyError;
pub use pipeline::{check_files, parse_file, parse_files, run, write_output, RunOptions, RunSummary};
