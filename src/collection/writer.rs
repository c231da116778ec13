use super::Collection;
use crate::parser::Proposal;
use serde::Serialize;
use std::io::{self, Write};

/// Write the collection as one JSON object keyed by identifier
///
/// Members follow collection order and each value lists the proposal fields
/// in a fixed order, tab indented.
pub fn write_json<W: Write>(collection: &Collection, mut out: W) -> io::Result<()> {
    writeln!(out, "{{")?;

    let total = collection.len();
    for (i, proposal) in collection.iter().enumerate() {
        write_member(&mut out, proposal)?;
        if i + 1 < total {
            writeln!(out, "\t}},")?;
        } else {
            writeln!(out, "\t}}")?;
        }
    }

    writeln!(out, "}}")?;
    out.flush()
}

/// Render the collection into a string
pub fn to_json_string(collection: &Collection) -> io::Result<String> {
    let mut buf = Vec::new();
    write_json(collection, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_member<W: Write>(out: &mut W, proposal: &Proposal) -> io::Result<()> {
    writeln!(out, "\t\"{}\": {{", proposal.identifier())?;

    field(out, "title", &proposal.title)?;
    field(out, "owning-sig", &proposal.owning_sig)?;
    field(out, "participating-sigs", &proposal.participating_sigs)?;
    field(out, "reviewers", &proposal.reviewers)?;
    field(out, "authors", &proposal.authors)?;
    field(out, "editor", &proposal.editor)?;
    field(out, "creation-date", &proposal.creation_date)?;
    field(out, "last-updated", &proposal.last_updated)?;
    field(out, "status", &proposal.status)?;
    field(out, "see-also", &proposal.see_also)?;
    field(out, "replaces", &proposal.replaces)?;
    field(out, "superseded-by", &proposal.superseded_by)?;

    write!(out, "\t\t\"markdown\": ")?;
    serde_json::to_writer(&mut *out, &proposal.contents)?;
    writeln!(out)
}

fn field<W: Write, T: Serialize + ?Sized>(out: &mut W, name: &str, value: &T) -> io::Result<()> {
    write!(out, "\t\t\"{}\": ", name)?;
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out, ",")
}
