use crate::parser::ParseError;
use crate::source::SourceError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a run
#[derive(Error, Debug)]
pub enum KepifyError {
    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),

    #[error("did not find any proposals in {}", .0.display())]
    EmptyCollection(PathBuf),

    #[error("could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} has an error: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{count} document(s) failed to parse")]
    CheckFailed { count: usize },

    #[error("could not write output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
