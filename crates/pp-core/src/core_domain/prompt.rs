use std::iter::Peekable;
use std::str::CharIndices;

use crate::core::TemplateError;

pub const LLAMA3_START_INST: &str = "<|start_header_id|>user<|end_header_id|>\n\n";
pub const LLAMA3_END_INST: &str = "<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n\n";

// ---------------------------------------------------------------------------
// PromptFormat: instruction-role delimiters around a rendered context
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptFormat {
    pub start_inst: String,
    pub end_inst: String,
}

impl PromptFormat {
    pub fn new(start_inst: impl Into<String>, end_inst: impl Into<String>) -> Self {
        Self {
            start_inst: start_inst.into(),
            end_inst: end_inst.into(),
        }
    }

    pub fn wrap(&self, input: &str) -> String {
        format!("{} {} {}", self.start_inst, input, self.end_inst)
    }
}

impl Default for PromptFormat {
    fn default() -> Self {
        Self::new(LLAMA3_START_INST, LLAMA3_END_INST)
    }
}

// ---------------------------------------------------------------------------
// TurnTemplate: two-slot template for one (user, assistant) exchange
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Literal(String),
    User,
    Assistant,
}

/// Renders one exchange of a multi-turn transcript.
///
/// Placeholders are `$user_prompt` and `$assistant_prompt` (or the braced
/// `${...}` forms); `$$` is a literal dollar sign. Both placeholders are
/// required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnTemplate {
    raw: String,
    pieces: Vec<Piece>,
}

impl TurnTemplate {
    pub const USER_SLOT: &'static str = "user_prompt";
    pub const ASSISTANT_SLOT: &'static str = "assistant_prompt";

    pub fn new(raw: impl Into<String>) -> Result<Self, TemplateError> {
        let raw = raw.into();
        let pieces = parse_pieces(&raw)?;

        if !pieces.contains(&Piece::User) {
            return Err(TemplateError::MissingPlaceholder(Self::USER_SLOT));
        }
        if !pieces.contains(&Piece::Assistant) {
            return Err(TemplateError::MissingPlaceholder(Self::ASSISTANT_SLOT));
        }

        Ok(Self { raw, pieces })
    }

    pub fn render(&self, user: &str, assistant: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + user.len() + assistant.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::User => out.push_str(user),
                Piece::Assistant => out.push_str(assistant),
            }
        }
        out
    }
}

fn parse_pieces(raw: &str) -> Result<Vec<Piece>, TemplateError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '$' {
            literal.push(c);
            continue;
        }

        let name = match chars.peek().copied() {
            Some((_, '$')) => {
                chars.next();
                literal.push('$');
                continue;
            }
            Some((_, '{')) => {
                chars.next();
                let name = take_identifier(&mut chars);
                match chars.next() {
                    Some((_, '}')) if !name.is_empty() => name,
                    _ => return Err(TemplateError::DanglingDollar(pos)),
                }
            }
            Some((_, ch)) if ch == '_' || ch.is_ascii_alphabetic() => take_identifier(&mut chars),
            _ => return Err(TemplateError::DanglingDollar(pos)),
        };

        let slot = match name.as_str() {
            TurnTemplate::USER_SLOT => Piece::User,
            TurnTemplate::ASSISTANT_SLOT => Piece::Assistant,
            _ => return Err(TemplateError::UnknownPlaceholder(name)),
        };
        if !literal.is_empty() {
            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        }
        pieces.push(slot);
    }

    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

fn take_identifier(chars: &mut Peekable<CharIndices<'_>>) -> String {
    let mut name = String::new();
    while let Some((_, ch)) = chars.peek().copied() {
        if ch == '_' || ch.is_ascii_alphanumeric() {
            name.push(ch);
            chars.next();
        } else {
            break;
        }
    }
    name
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
