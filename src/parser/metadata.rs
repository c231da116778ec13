use super::proposal::{Field, Proposal, SequenceField};
use super::ParseError;

/// Line consisting solely of three hyphens that opens and closes the metadata block
pub const BOUNDARY_MARKER: &str = "---";

/// A single document line with its terminator removed
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    /// 1-based line number
    pub number: usize,
    /// Byte offset of the line start in the document
    pub start: usize,
    pub text: &'a str,
}

/// A document cut into its metadata lines and its verbatim body
#[derive(Debug)]
pub(crate) struct Sections<'a> {
    pub metadata: Vec<Line<'a>>,
    pub contents: &'a str,
}

/// Which key list items currently belong to
#[derive(Debug, Clone, Copy)]
enum OpenKey {
    Scalar,
    Sequence(SequenceField),
    Ignored,
}

fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut start = 0;
    text.split_inclusive('\n')
        .enumerate()
        .map(move |(index, raw)| {
            let line = Line {
                number: index + 1,
                start,
                text: raw.trim_end_matches(['\n', '\r']),
            };
            start += raw.len();
            line
        })
}

fn is_marker(text: &str) -> bool {
    text.trim_end() == BOUNDARY_MARKER
}

/// Locate the metadata block
///
/// The opening marker may be omitted, in which case the block starts at the
/// first non-blank line. The closing marker is always required.
pub(crate) fn split_sections(text: &str) -> Result<Sections<'_>, ParseError> {
    let mut lines = lines(text)
        .skip_while(|line| line.text.trim().is_empty())
        .peekable();

    let opened_at = match lines.peek() {
        None => return Err(ParseError::MissingMetadataBlock),
        Some(first) => is_marker(first.text).then_some(first.number),
    };
    if opened_at.is_some() {
        lines.next();
    }

    let mut metadata = Vec::new();
    for line in lines {
        if is_marker(line.text) {
            return Ok(Sections {
                metadata,
                contents: &text[line.start..],
            });
        }
        metadata.push(line);
    }

    Err(match opened_at {
        Some(opened_at) => ParseError::UnterminatedMetadataBlock { opened_at },
        None => ParseError::MissingMetadataBlock,
    })
}

/// Populate `proposal` from the lines of a metadata block
pub(crate) fn apply_metadata(lines: &[Line<'_>], proposal: &mut Proposal) -> Result<(), ParseError> {
    let mut open: Option<OpenKey> = None;

    for line in lines {
        let trimmed = line.text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(item) = list_item(trimmed) {
            match open {
                Some(OpenKey::Sequence(field)) => {
                    proposal
                        .sequence_mut(field)
                        .push(unquote(strip_comment(item)).to_string())
                }
                Some(OpenKey::Ignored) => {}
                Some(OpenKey::Scalar) | None => return Err(malformed(line)),
            }
            continue;
        }

        // Nested content under an unknown key, e.g. per-stage milestone maps
        let indented = line.text.starts_with([' ', '\t']);
        if indented {
            match open {
                Some(OpenKey::Ignored) => continue,
                _ => return Err(malformed(line)),
            }
        }

        // Only the first colon separates key from value
        let (key, value) = trimmed.split_once(':').ok_or_else(|| malformed(line))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed(line));
        }
        let value = strip_comment(value.trim());

        open = Some(match Field::from_key(key) {
            Some(Field::Scalar(field)) => {
                *proposal.scalar_mut(field) = unquote(value).to_string();
                OpenKey::Scalar
            }
            Some(Field::Sequence(field)) => {
                *proposal.sequence_mut(field) = inline_sequence(value);
                OpenKey::Sequence(field)
            }
            None => OpenKey::Ignored,
        });
    }

    Ok(())
}

fn malformed(line: &Line<'_>) -> ParseError {
    ParseError::MalformedLine {
        line: line.number,
        content: line.text.to_string(),
    }
}

/// Drop a trailing `# comment`
///
/// A `#` only starts a comment at the beginning of the value or after
/// whitespace, and never inside a leading quoted string.
fn strip_comment(value: &str) -> &str {
    let scan_from = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => value[1..]
            .find(quote)
            .map(|end| end + 2)
            .unwrap_or(value.len()),
        _ => 0,
    };

    let bytes = value.as_bytes();
    for i in scan_from..bytes.len() {
        if bytes[i] == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return value[..i].trim_end();
        }
    }
    value
}

/// `- value` (or a bare `-`) yields the item text
fn list_item(trimmed: &str) -> Option<&str> {
    if trimmed == "-" {
        return Some("");
    }
    trimmed.strip_prefix("- ").map(str::trim)
}

/// Values written on the key line of a sequence field
///
/// Empty means an empty sequence, `[a, b]` is a flow list, anything else is
/// a single item.
fn inline_sequence(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }

    match value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        Some(inner) => inner
            .split(',')
            .map(|item| unquote(item.trim()))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        None => vec![unquote(value).to_string()],
    }
}

/// Strip one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
