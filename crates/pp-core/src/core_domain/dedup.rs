use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::PreferencePair;

/// What to do with instruction examples that share an id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    /// No deduplication: every pair yields an example.
    #[default]
    KeepAll,
    /// Only the first example per id is kept.
    Dedup,
}

/// A (prompt, target) example built from the chosen side of a pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionExample {
    pub src: String,
    pub tgt: String,
    pub id: Uuid,
}

/// UUIDv5 in the DNS namespace of `src` followed by `tgt`.
pub fn instruction_id(src: &str, tgt: &str) -> Uuid {
    let mut name = String::with_capacity(src.len() + tgt.len());
    name.push_str(src);
    name.push_str(tgt);
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, name.as_bytes())
}

pub fn to_instruction_examples(
    pairs: &[PreferencePair],
    policy: DedupPolicy,
) -> Vec<InstructionExample> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut examples = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let id = instruction_id(&pair.src, &pair.tgt_chosen);
        if policy == DedupPolicy::Dedup && !seen.insert(id) {
            continue;
        }
        examples.push(InstructionExample {
            src: pair.src.clone(),
            tgt: pair.tgt_chosen.clone(),
            id,
        });
    }

    examples
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
