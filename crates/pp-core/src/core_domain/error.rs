use crate::core::{MessageId, SplitName};

// ---------------------------------------------------------------------------
// Sub-error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("{requested} split is not supported. Available splits are: {}", .available.join(", "))]
    UnknownSplit {
        requested: SplitName,
        available: Vec<String>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("role `{role}` of message {message_id} is not supported (expected one of: prompter, assistant)")]
    UnsupportedRole { role: String, message_id: MessageId },
    #[error("assistant message {message_id} has no parent")]
    OrphanAssistant { message_id: MessageId },
    #[error("ancestor {id} is not present in the corpus")]
    MissingAncestor { id: MessageId },
    #[error("assistant ancestor {id} has no prompter parent")]
    UnpairedAncestor { id: MessageId },
    #[error("ancestor chain starting at {id} does not terminate")]
    Cycle { id: MessageId },
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template is missing the ${0} placeholder")]
    MissingPlaceholder(&'static str),
    #[error("template uses unknown placeholder ${0}")]
    UnknownPlaceholder(String),
    #[error("template has a dangling `$` at byte {0}")]
    DanglingDollar(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("reference solution has no parseable answer: {excerpt:?}")]
    MissingReferenceAnswer { excerpt: String },
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("generation service connection failed: {0}")]
    Connection(String),
    #[error("failed to parse generation response: {0}")]
    Parse(String),
    #[error("expected completions for {expected} prompts, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- From conversions --

    #[test]
    fn test_from_tree_error_to_core_error() {
        let err: CoreError = TreeError::MissingAncestor {
            id: MessageId::new("m-1"),
        }
        .into();
        assert!(matches!(
            err,
            CoreError::Tree(TreeError::MissingAncestor { .. })
        ));
    }

    #[test]
    fn test_from_generation_error_to_core_error() {
        let err: CoreError = GenerationError::Connection("refused".into()).into();
        assert!(matches!(
            err,
            CoreError::Generation(GenerationError::Connection(_))
        ));
    }

    // -- Display formatting --

    #[test]
    fn test_display_unknown_split() {
        let err = CorpusError::UnknownSplit {
            requested: SplitName::new("test"),
            available: vec!["train".to_owned(), "validation".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "test split is not supported. Available splits are: train, validation"
        );
    }

    #[test]
    fn test_display_unsupported_role() {
        let err = TreeError::UnsupportedRole {
            role: "system".to_owned(),
            message_id: MessageId::new("m-9"),
        };
        assert_eq!(
            err.to_string(),
            "role `system` of message m-9 is not supported (expected one of: prompter, assistant)"
        );
    }

    #[test]
    fn test_display_missing_placeholder() {
        let err = TemplateError::MissingPlaceholder("user_prompt");
        assert_eq!(err.to_string(), "template is missing the $user_prompt placeholder");
    }

    #[test]
    fn test_display_shape_mismatch() {
        let err = GenerationError::ShapeMismatch {
            expected: 4,
            got: 3,
        };
        assert_eq!(err.to_string(), "expected completions for 4 prompts, got 3");
    }

    #[test]
    fn test_display_core_transparent_answer() {
        let err: CoreError = AnswerError::MissingReferenceAnswer {
            excerpt: "no marker".to_owned(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "reference solution has no parseable answer: \"no marker\""
        );
    }
}
