use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// String-based identity newtypes
// ---------------------------------------------------------------------------

macro_rules! string_newtype {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(MessageId);
string_newtype!(SplitName);

// ---------------------------------------------------------------------------
// Role: who authored a turn
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Prompter,
    Assistant,
}

impl Role {
    /// Parses the corpus spelling of a role. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "prompter" => Some(Self::Prompter),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompter => "prompter",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Turn: one raw record of a conversation tree corpus
// ---------------------------------------------------------------------------

/// A single message of a dialogue tree, as it appears in the corpus.
///
/// `role` is kept as the raw string so that an unexpected value can be
/// reported by the tree builder together with the offending message id.
/// Everything the core does not interpret (review status, deletion flag,
/// toxicity scores, ...) is preserved in `metadata`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub message_id: MessageId,
    pub parent_id: Option<MessageId>,
    #[serde(default)]
    pub message_tree_id: Option<MessageId>,
    pub role: String,
    pub text: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// GroupMember / ExampleGroup: sibling responses under a common parent
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct GroupMember {
    pub message_id: MessageId,
    pub parent_id: MessageId,
    pub message_tree_id: Option<MessageId>,
    pub role: Role,
    pub lang: String,
    pub rank: Option<u32>,
    /// The response text.
    pub label: String,
    /// Rendered conversation context shared by all siblings.
    pub input: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExampleGroup {
    pub parent_id: MessageId,
    pub members: Vec<GroupMember>,
}

impl ExampleGroup {
    /// Index of the first rank-0 member, in input order.
    pub fn best_index(&self) -> Option<usize> {
        self.members.iter().position(|m| m.rank == Some(0))
    }

    /// True when the group answers the root prompt of its tree.
    pub fn is_first_turn(&self) -> bool {
        self.members
            .first()
            .is_some_and(|m| m.message_tree_id.as_ref() == Some(&m.parent_id))
    }
}

// ---------------------------------------------------------------------------
// Emitted records
// ---------------------------------------------------------------------------

/// A (prompt, chosen, rejected) training triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencePair {
    pub src: String,
    pub tgt_chosen: String,
    pub tgt_rejected: String,
}

/// A question with its reference solution (GSM8K style).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaExample {
    pub input: String,
    pub label: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
