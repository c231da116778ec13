mod error;
mod metadata;
mod proposal;


pub use error::ParseError;
pub use metadata::BOUNDARY_MARKER;
pub use proposal::Proposal;

use std::io::Read;

/// Parse a proposal document from a byte stream
///
/// The stream is read to its end before parsing. Failures are returned as a
/// `ParseError` value so the caller decides whether a batch continues.
pub fn parse<R: Read>(mut reader: R) -> Result<Proposal, ParseError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ParseError::Read(e.to_string()))?;

    let text = String::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
        valid_up_to: e.utf8_error().valid_up_to(),
    })?;

    parse_str(&text)
}

/// Parse a proposal document that is already in memory
pub fn parse_str(text: &str) -> Result<Proposal, ParseError> {
    let sections = metadata::split_sections(text)?;

    let mut proposal = Proposal::default();
    metadata::apply_metadata(&sections.metadata, &mut proposal)?;
    proposal.contents = sections.contents.to_string();

    validate(&proposal)?;
    Ok(proposal)
}

/// Required fields must be present and non-empty
fn validate(proposal: &Proposal) -> Result<(), ParseError> {
    let required = [
        ("title", &proposal.title),
        ("owning-sig", &proposal.owning_sig),
        ("status", &proposal.status),
    ];

    for (name, value) in required {
        if value.is_empty() {
            return Err(ParseError::MissingField(name));
        }
    }
    Ok(())
}
