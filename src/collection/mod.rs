mod writer;


pub use writer::{to_json_string, write_json};

use crate::parser::Proposal;
use std::collections::HashMap;

/// Lookup key for a proposal: hex MD5 of `"<owning_sig>:<title>"`
///
/// Only stable across runs, not collision free.
pub fn identifier(owning_sig: &str, title: &str) -> String {
    let digest = md5::compute(format!("{}:{}", owning_sig, title));
    hex::encode(digest.0)
}

/// Proposals in discovery order
///
/// Nothing is deduplicated. Two proposals sharing an owning group and title
/// get the same identifier and both end up in the output under that key.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    proposals: Vec<Proposal>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a proposal
    pub fn add(&mut self, proposal: Proposal) {
        self.proposals.push(proposal);
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    /// Identifiers shared by more than one proposal, in first-seen order
    pub fn duplicate_identifiers(&self) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut order = Vec::new();

        for proposal in &self.proposals {
            let id = proposal.identifier();
            let count = counts.entry(id.clone()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(id);
            }
        }

        order
    }
}
