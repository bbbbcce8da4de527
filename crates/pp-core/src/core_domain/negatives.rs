use crate::core::{
    extract_answer, is_correct, truncate_at_first_answer, AnswerError, Completion, CoreError,
    GenerationError, PreferencePair, PromptFormat, QaExample,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MiningStats {
    pub considered: usize,
    pub suitable: usize,
}

/// Looks for the first well-formed but wrong completion of `example`.
///
/// Completions are cut after their first answer marker. Those without a
/// marker, with an unparseable answer, or with the right answer are skipped.
/// Returns the pair (if any) and how many completions were looked at.
pub fn mine_negative(
    example: &QaExample,
    completions: &[Completion],
    format: &PromptFormat,
) -> Result<(Option<PreferencePair>, usize), AnswerError> {
    let mut considered = 0;

    for completion in completions {
        considered += 1;
        let Some(truncated) = truncate_at_first_answer(&completion.text) else {
            continue;
        };
        if extract_answer(truncated).is_none() {
            continue;
        }
        if is_correct(truncated, &example.label)? {
            continue;
        }
        let pair = PreferencePair {
            src: format.wrap(&example.input),
            tgt_chosen: example.label.clone(),
            tgt_rejected: truncated.to_owned(),
        };
        return Ok((Some(pair), considered));
    }

    Ok((None, considered))
}

/// Runs [`mine_negative`] over examples and their completions, in order.
pub fn mine_negatives(
    examples: &[QaExample],
    outputs: &[Vec<Completion>],
    format: &PromptFormat,
) -> Result<(Vec<PreferencePair>, MiningStats), CoreError> {
    if examples.len() != outputs.len() {
        return Err(GenerationError::ShapeMismatch {
            expected: examples.len(),
            got: outputs.len(),
        }
        .into());
    }

    let mut stats = MiningStats::default();
    let mut pairs = Vec::new();
    for (example, completions) in examples.iter().zip(outputs) {
        let (pair, considered) = mine_negative(example, completions, format)?;
        stats.considered += considered;
        if let Some(pair) = pair {
            stats.suitable += 1;
            pairs.push(pair);
        }
    }

    Ok((pairs, stats))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
