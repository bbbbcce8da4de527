use crate::core::{ExampleGroup, PreferencePair, PromptFormat};

/// Counters for one pairing pass; skipped groups are not errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PairingStats {
    pub considered_groups: usize,
    pub paired_groups: usize,
    pub pairs: usize,
}

impl PairingStats {
    pub fn skipped_groups(&self) -> usize {
        self.considered_groups - self.paired_groups
    }
}

/// Pairs the first rank-0 member against every other member of the group.
///
/// Returns an empty vec when the group has no rank-0 member.
pub fn pair_group(group: &ExampleGroup, format: &PromptFormat) -> Vec<PreferencePair> {
    let Some(chosen_i) = group.best_index() else {
        return Vec::new();
    };
    let chosen = &group.members[chosen_i];
    let src = format.wrap(&chosen.input);

    group
        .members
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != chosen_i)
        .map(|(_, rejected)| PreferencePair {
            src: src.clone(),
            tgt_chosen: chosen.label.clone(),
            tgt_rejected: rejected.label.clone(),
        })
        .collect()
}

pub fn pair_groups(
    groups: &[ExampleGroup],
    format: &PromptFormat,
) -> (Vec<PreferencePair>, PairingStats) {
    let mut stats = PairingStats::default();
    let mut pairs = Vec::new();

    for group in groups {
        stats.considered_groups += 1;
        if group.best_index().is_none() {
            continue;
        }
        stats.paired_groups += 1;
        let group_pairs = pair_group(group, format);
        stats.pairs += group_pairs.len();
        pairs.extend(group_pairs);
    }

    (pairs, stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GroupMember, MessageId, Role};

    fn group(entries: &[(&str, Option<u32>)]) -> ExampleGroup {
        ExampleGroup {
            parent_id: MessageId::new("p"),
            members: entries
                .iter()
                .enumerate()
                .map(|(i, (label, rank))| GroupMember {
                    message_id: MessageId::new(format!("m{i}")),
                    parent_id: MessageId::new("p"),
                    message_tree_id: None,
                    role: Role::Assistant,
                    lang: "en".to_owned(),
                    rank: *rank,
                    label: (*label).to_owned(),
                    input: "How do I boil an egg?".to_owned(),
                    metadata: serde_json::Map::new(),
                })
                .collect(),
        }
    }

    fn format() -> PromptFormat {
        PromptFormat::new("[INST]", "[/INST]")
    }

    #[test]
    fn test_pairs_best_against_all_others() {
        let g = group(&[("ok", Some(1)), ("best", Some(0)), ("meh", Some(2))]);
        let pairs = pair_group(&g, &format());

        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.tgt_chosen == "best"));
        assert_eq!(pairs[0].tgt_rejected, "ok");
        assert_eq!(pairs[1].tgt_rejected, "meh");
        assert_eq!(pairs[0].src, "[INST] How do I boil an egg? [/INST]");
    }

    #[test]
    fn test_first_rank_zero_is_chosen() {
        let g = group(&[("first", Some(0)), ("second", Some(0))]);
        let pairs = pair_group(&g, &format());

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].tgt_chosen, "first");
        assert_eq!(pairs[0].tgt_rejected, "second");
    }

    #[test]
    fn test_group_without_rank_zero_yields_nothing() {
        let g = group(&[("a", Some(1)), ("b", None)]);
        assert!(pair_group(&g, &format()).is_empty());
    }

    #[test]
    fn test_single_member_group_yields_nothing() {
        let g = group(&[("only", Some(0))]);
        assert!(pair_group(&g, &format()).is_empty());
    }

    #[test]
    fn test_pair_groups_counts() {
        let groups = vec![
            group(&[("a", Some(0)), ("b", Some(1)), ("c", None)]),
            group(&[("d", Some(1)), ("e", Some(2))]),
            group(&[("f", Some(0)), ("g", Some(1))]),
        ];
        let (pairs, stats) = pair_groups(&groups, &format());

        assert_eq!(pairs.len(), 3);
        assert_eq!(
            stats,
            PairingStats {
                considered_groups: 3,
                paired_groups: 2,
                pairs: 3,
            }
        );
        assert_eq!(stats.skipped_groups(), 1);
        assert!(pairs.iter().all(|p| p.tgt_chosen != p.tgt_rejected));
    }
}
