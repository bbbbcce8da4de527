use std::collections::HashMap;

use crate::core::{ExampleGroup, GroupMember, MessageId, Role, TreeError, Turn, TurnTemplate};

// ---------------------------------------------------------------------------
// AncestorIndex: every turn of the split, keyed by id
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AncestorEntry {
    pub text: String,
    pub parent_id: Option<MessageId>,
}

#[derive(Clone, Debug, Default)]
pub struct AncestorIndex {
    entries: HashMap<MessageId, AncestorEntry>,
}

impl AncestorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: MessageId, entry: AncestorEntry) {
        self.entries.insert(id, entry);
    }

    fn require(&self, id: &MessageId) -> Result<&AncestorEntry, TreeError> {
        self.entries
            .get(id)
            .ok_or_else(|| TreeError::MissingAncestor { id: id.clone() })
    }

    /// Renders the conversation leading up to (and including) prompt `parent_id`.
    ///
    /// Walks parent pointers iteratively: each step consumes one
    /// (prompter, assistant) exchange above the prompt. Exchanges come out
    /// root-first, joined by `\n`, and the prompt itself is rendered last
    /// with an empty assistant slot.
    pub fn render_multi_turn(
        &self,
        parent_id: &MessageId,
        template: &TurnTemplate,
    ) -> Result<String, TreeError> {
        let prompt = self.require(parent_id)?;
        let mut exchanges = vec![template.render(&prompt.text, "")];

        let mut current = prompt.parent_id.clone();
        while let Some(assistant_id) = current {
            // Each step consumes two distinct entries.
            if exchanges.len() > self.entries.len() {
                return Err(TreeError::Cycle {
                    id: parent_id.clone(),
                });
            }
            let assistant = self.require(&assistant_id)?;
            let user_id = assistant
                .parent_id
                .as_ref()
                .ok_or_else(|| TreeError::UnpairedAncestor {
                    id: assistant_id.clone(),
                })?;
            let user = self.require(user_id)?;

            exchanges.push(template.render(&user.text, &assistant.text));
            current = user.parent_id.clone();
        }

        exchanges.reverse();
        Ok(exchanges.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ContextMode {
    /// Context is the raw text of the immediate parent prompt.
    #[default]
    SingleTurn,
    /// Context is the full flattened transcript back to the tree root.
    MultiTurn(TurnTemplate),
}

#[derive(Clone, Debug, Default)]
pub struct TreeOptions {
    pub language: Option<String>,
    pub context: ContextMode,
}

// ---------------------------------------------------------------------------
// build_groups
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ConversationForest {
    /// Groups in first-seen order of their parent prompt.
    pub groups: Vec<ExampleGroup>,
    pub index: AncestorIndex,
}

/// Groups assistant replies by parent prompt and attaches each group's context.
///
/// Every turn lands in the ancestor index, including those dropped by the
/// language filter, so that the context of a kept group can still be
/// rendered through them.
pub fn build_groups<I>(turns: I, options: &TreeOptions) -> Result<ConversationForest, TreeError>
where
    I: IntoIterator<Item = Turn>,
{
    let mut index = AncestorIndex::new();
    let mut groups: Vec<ExampleGroup> = Vec::new();
    let mut positions: HashMap<MessageId, usize> = HashMap::new();

    for turn in turns {
        index.insert(
            turn.message_id.clone(),
            AncestorEntry {
                text: turn.text.clone(),
                parent_id: turn.parent_id.clone(),
            },
        );

        if let Some(language) = options.language.as_deref() {
            if turn.lang != language {
                continue;
            }
        }

        match Role::parse(&turn.role) {
            Some(Role::Assistant) => {}
            Some(Role::Prompter) => continue,
            None => {
                return Err(TreeError::UnsupportedRole {
                    role: turn.role,
                    message_id: turn.message_id,
                })
            }
        }

        let Some(parent_id) = turn.parent_id else {
            return Err(TreeError::OrphanAssistant {
                message_id: turn.message_id,
            });
        };

        let member = GroupMember {
            message_id: turn.message_id,
            parent_id: parent_id.clone(),
            message_tree_id: turn.message_tree_id,
            role: Role::Assistant,
            lang: turn.lang,
            rank: turn.rank,
            label: turn.text,
            input: String::new(),
            metadata: turn.metadata,
        };

        match positions.get(&parent_id) {
            Some(&pos) => groups[pos].members.push(member),
            None => {
                positions.insert(parent_id.clone(), groups.len());
                groups.push(ExampleGroup {
                    parent_id,
                    members: vec![member],
                });
            }
        }
    }

    for group in &mut groups {
        let context = match &options.context {
            ContextMode::SingleTurn => index.require(&group.parent_id)?.text.clone(),
            ContextMode::MultiTurn(template) => {
                index.render_multi_turn(&group.parent_id, template)?
            }
        };
        for member in &mut group.members {
            member.input = context.clone();
        }
    }

    Ok(ConversationForest { groups, index })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
