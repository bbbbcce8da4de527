use std::collections::{HashMap, HashSet};

use crate::core::{ExampleGroup, GroupMember, MessageId, Role};

/// Keeps the members of `group` that are usable at `target_rank`.
///
/// Without a target the group is returned as is. With target `k`:
/// - prompter members pass through;
/// - assistant members ranked `<= k` are kept, and a member ranked exactly
///   `k` marks its parent as found;
/// - assistant members without a rank are held, one per parent (the last
///   one seen), and kept only if their parent was never found.
///
/// Kept members stay in input order, followed by the held candidates that
/// survived. Returns `None` when nothing is left.
pub fn filter_by_rank(group: ExampleGroup, target_rank: Option<u32>) -> Option<ExampleGroup> {
    let Some(target) = target_rank else {
        return Some(group);
    };

    let parent_id = group.parent_id;
    let mut kept: Vec<GroupMember> = Vec::with_capacity(group.members.len());
    let mut held: Vec<(MessageId, GroupMember)> = Vec::new();
    let mut held_positions: HashMap<MessageId, usize> = HashMap::new();
    let mut found: HashSet<MessageId> = HashSet::new();

    for member in group.members {
        if member.role != Role::Assistant {
            kept.push(member);
            continue;
        }
        match member.rank {
            None => {
                let key = member.parent_id.clone();
                match held_positions.get(&key) {
                    Some(&pos) => held[pos].1 = member,
                    None => {
                        held_positions.insert(key.clone(), held.len());
                        held.push((key, member));
                    }
                }
            }
            Some(rank) if rank <= target => {
                if rank == target {
                    found.insert(member.parent_id.clone());
                }
                kept.push(member);
            }
            Some(_) => {}
        }
    }

    kept.extend(
        held.into_iter()
            .filter(|(parent, _)| !found.contains(parent))
            .map(|(_, member)| member),
    );

    if kept.is_empty() {
        None
    } else {
        Some(ExampleGroup {
            parent_id,
            members: kept,
        })
    }
}

/// Applies [`filter_by_rank`] to every group, dropping groups that end up empty.
pub fn filter_groups(groups: Vec<ExampleGroup>, target_rank: Option<u32>) -> Vec<ExampleGroup> {
    groups
        .into_iter()
        .filter_map(|group| filter_by_rank(group, target_rank))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
