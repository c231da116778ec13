use serde::{Deserialize, Serialize};

/// A parsed proposal document
///
/// Field order matches the member order of the emitted JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Proposal {
    /// Proposal title (required)
    pub title: String,
    /// The single group that owns the proposal (required)
    pub owning_sig: String,
    pub participating_sigs: Vec<String>,
    pub reviewers: Vec<String>,
    pub authors: Vec<String>,
    pub editor: String,
    /// Free-form date text, never interpreted
    pub creation_date: String,
    pub last_updated: String,
    /// Lifecycle label such as "provisional" or "implemented" (required)
    pub status: String,
    pub see_also: Vec<String>,
    pub replaces: Vec<String>,
    pub superseded_by: Vec<String>,
    /// Verbatim body, starting at the closing boundary marker
    #[serde(rename = "markdown")]
    pub contents: String,
}

/// Metadata keys holding a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarField {
    Title,
    OwningSig,
    Editor,
    CreationDate,
    LastUpdated,
    Status,
}

/// Metadata keys holding an ordered list of values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SequenceField {
    ParticipatingSigs,
    Reviewers,
    Authors,
    SeeAlso,
    Replaces,
    SupersededBy,
}

/// Classification of a metadata key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Scalar(ScalarField),
    Sequence(SequenceField),
}

impl Field {
    /// Map a metadata key to the field it populates, `None` for unknown keys
    pub(crate) fn from_key(key: &str) -> Option<Self> {
        let field = match key {
            "title" => Field::Scalar(ScalarField::Title),
            "owning-sig" => Field::Scalar(ScalarField::OwningSig),
            "editor" => Field::Scalar(ScalarField::Editor),
            "creation-date" => Field::Scalar(ScalarField::CreationDate),
            "last-updated" => Field::Scalar(ScalarField::LastUpdated),
            "status" => Field::Scalar(ScalarField::Status),
            "participating-sigs" => Field::Sequence(SequenceField::ParticipatingSigs),
            "reviewers" => Field::Sequence(SequenceField::Reviewers),
            "authors" => Field::Sequence(SequenceField::Authors),
            "see-also" => Field::Sequence(SequenceField::SeeAlso),
            "replaces" => Field::Sequence(SequenceField::Replaces),
            "superseded-by" => Field::Sequence(SequenceField::SupersededBy),
            _ => return None,
        };
        Some(field)
    }
}

impl Proposal {
    pub(crate) fn scalar_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::Title => &mut self.title,
            ScalarField::OwningSig => &mut self.owning_sig,
            ScalarField::Editor => &mut self.editor,
            ScalarField::CreationDate => &mut self.creation_date,
            ScalarField::LastUpdated => &mut self.last_updated,
            ScalarField::Status => &mut self.status,
        }
    }

    pub(crate) fn sequence_mut(&mut self, field: SequenceField) -> &mut Vec<String> {
        match field {
            SequenceField::ParticipatingSigs => &mut self.participating_sigs,
            SequenceField::Reviewers => &mut self.reviewers,
            SequenceField::Authors => &mut self.authors,
            SequenceField::SeeAlso => &mut self.see_also,
            SequenceField::Replaces => &mut self.replaces,
            SequenceField::SupersededBy => &mut self.superseded_by,
        }
    }

    /// Stable lookup key derived from `owning_sig` and `title`
    pub fn identifier(&self) -> String {
        crate::collection::identifier(&self.owning_sig, &self.title)
    }
}
