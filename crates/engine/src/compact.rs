//! Change-list compaction: folds the session's applied change records into
//! the minimal committable list. The fold is a pure read of the history;
//! recorded changes are never rewritten, so undo stays exact no matter how
//! often the committable view is computed.

use topicdraft_core::change::{
    SubtopicPageChange, SubtopicPropertyUpdate, TopicChange, TopicPropertyUpdate,
};
use topicdraft_core::commit::CommittableChange;
use topicdraft_core::topic::SubtopicId;

/// One entry of the committable list while it is being folded. Skill
/// relocations are normalized to endpoint pairs (`None` = uncategorized),
/// so a chain of moves collapses to its endpoints.
#[derive(Debug, Clone, PartialEq)]
enum Pending {
    TopicProperty(TopicPropertyUpdate),
    SubtopicProperty {
        subtopic_id: SubtopicId,
        update: SubtopicPropertyUpdate,
    },
    AddSubtopic {
        subtopic_id: SubtopicId,
        title: String,
    },
    DeleteSubtopic {
        subtopic_id: SubtopicId,
    },
    DeleteCanonicalStory {
        story_id: String,
    },
    DeleteAdditionalStory {
        story_id: String,
    },
    RemoveUncategorizedSkill {
        skill_id: String,
    },
    Reloc {
        skill_id: String,
        old: Option<SubtopicId>,
        new: Option<SubtopicId>,
    },
}

/// Fold applied topic changes (oldest first) into committable form.
pub fn compact_topic_changes(changes: &[TopicChange]) -> Vec<CommittableChange> {
    let mut pending: Vec<Pending> = Vec::new();
    for change in changes {
        match change {
            TopicChange::UpdateTopicProperty(update) => {
                collapse_topic_property(&mut pending, update);
            }
            TopicChange::UpdateSubtopicProperty {
                subtopic_id,
                update,
            } => {
                collapse_subtopic_property(&mut pending, *subtopic_id, update);
            }
            TopicChange::AddSubtopic { subtopic_id, title } => {
                pending.push(Pending::AddSubtopic {
                    subtopic_id: *subtopic_id,
                    title: title.clone(),
                });
            }
            TopicChange::DeleteSubtopic {
                subtopic_id,
                created_this_session,
                ..
            } => {
                pending = apply_delete(pending, *subtopic_id, *created_this_session);
            }
            TopicChange::RemoveCanonicalStory { story, .. } => {
                pending.push(Pending::DeleteCanonicalStory {
                    story_id: story.story_id.clone(),
                });
            }
            TopicChange::RemoveAdditionalStory { story, .. } => {
                pending.push(Pending::DeleteAdditionalStory {
                    story_id: story.story_id.clone(),
                });
            }
            TopicChange::RemoveUncategorizedSkill { skill, .. } => {
                pending.push(Pending::RemoveUncategorizedSkill {
                    skill_id: skill.id.clone(),
                });
            }
            TopicChange::MoveSkillToSubtopic {
                skill,
                old_subtopic_id,
                new_subtopic_id,
                ..
            } => {
                chain_reloc(
                    &mut pending,
                    &skill.id,
                    *old_subtopic_id,
                    Some(*new_subtopic_id),
                );
            }
            TopicChange::RemoveSkillFromSubtopic {
                subtopic_id, skill, ..
            } => {
                chain_reloc(&mut pending, &skill.id, Some(*subtopic_id), None);
            }
            // Rearranges are session-local ordering; they never reach the
            // commit payload.
            TopicChange::RearrangeCanonicalStory { .. }
            | TopicChange::RearrangeSkillInSubtopic { .. }
            | TopicChange::RearrangeSubtopic { .. } => {}
        }
    }
    pending.into_iter().filter_map(render).collect()
}

/// Fold applied page changes into committable form: repeated edits of the
/// same property collapse to first-old/last-new, and a record that ends
/// where it started disappears.
pub fn compact_page_changes(changes: &[SubtopicPageChange]) -> Vec<CommittableChange> {
    let mut pending: Vec<SubtopicPageChange> = Vec::new();
    for change in changes {
        let merged = match pending.iter().position(|p| {
            p.subtopic_id() == change.subtopic_id() && p.property_name() == change.property_name()
        }) {
            Some(at) => {
                let first = pending.remove(at);
                SubtopicPageChange::merged(&first, change)
            }
            None => change.clone(),
        };
        if !merged.is_noop() {
            pending.push(merged);
        }
    }
    pending
        .into_iter()
        .map(|p| CommittableChange::UpdateSubtopicPageProperty {
            subtopic_id: p.subtopic_id(),
            property_name: p.property_name(),
            new_value: p.new_value(),
            old_value: p.old_value(),
        })
        .collect()
}

fn collapse_topic_property(pending: &mut Vec<Pending>, update: &TopicPropertyUpdate) {
    let merged = match pending
        .iter()
        .position(|p| matches!(p, Pending::TopicProperty(u) if u.name() == update.name()))
    {
        Some(at) => {
            let Pending::TopicProperty(first) = pending.remove(at) else {
                unreachable!()
            };
            TopicPropertyUpdate::merged(&first, update)
        }
        None => update.clone(),
    };
    if !merged.is_noop() {
        pending.push(Pending::TopicProperty(merged));
    }
}

fn collapse_subtopic_property(
    pending: &mut Vec<Pending>,
    subtopic_id: SubtopicId,
    update: &SubtopicPropertyUpdate,
) {
    let merged = match pending.iter().position(|p| {
        matches!(p, Pending::SubtopicProperty { subtopic_id: id, update: u }
            if *id == subtopic_id && u.name() == update.name())
    }) {
        Some(at) => {
            let Pending::SubtopicProperty { update: first, .. } = pending.remove(at) else {
                unreachable!()
            };
            SubtopicPropertyUpdate::merged(&first, update)
        }
        None => update.clone(),
    };
    if !merged.is_noop() {
        pending.push(Pending::SubtopicProperty {
            subtopic_id,
            update: merged,
        });
    }
}

/// Merge a new relocation into the skill's pending one, keeping only the
/// endpoints. A skill that ends up back where it started leaves no record.
fn chain_reloc(
    pending: &mut Vec<Pending>,
    skill_id: &str,
    old: Option<SubtopicId>,
    new: Option<SubtopicId>,
) {
    let old = match pending
        .iter()
        .position(|p| matches!(p, Pending::Reloc { skill_id: s, .. } if s == skill_id))
    {
        Some(at) => {
            let Pending::Reloc { old: first_old, .. } = pending.remove(at) else {
                unreachable!()
            };
            first_old
        }
        None => old,
    };
    if old != new {
        pending.push(Pending::Reloc {
            skill_id: skill_id.to_string(),
            old,
            new,
        });
    }
}

/// Fold a subtopic deletion through the pending list.
///
/// Relocations into the deleted subtopic lose their destination (the skills
/// fall back to uncategorized), records about the subtopic itself are
/// dropped, and every pending reference to a higher subtopic id is
/// renumbered down by one so the list replays correctly against a fresh
/// snapshot. A pre-existing subtopic additionally emits a delete record,
/// placed before the first pending record the renumbering rewrote.
fn apply_delete(pending: Vec<Pending>, d: SubtopicId, created_this_session: bool) -> Vec<Pending> {
    let mut kept: Vec<(Pending, bool)> = Vec::with_capacity(pending.len());
    for record in pending {
        match record {
            Pending::Reloc {
                skill_id,
                mut old,
                mut new,
            } => {
                let mut touched = false;
                if new == Some(d) {
                    new = None;
                    touched = true;
                }
                if old == Some(d) {
                    old = None;
                    touched = true;
                }
                if old == new {
                    continue;
                }
                kept.push((Pending::Reloc { skill_id, old, new }, touched));
            }
            Pending::SubtopicProperty { subtopic_id, .. } if subtopic_id == d => continue,
            Pending::AddSubtopic { subtopic_id, .. }
                if created_this_session && subtopic_id == d =>
            {
                continue;
            }
            other => kept.push((other, false)),
        }
    }

    for (record, touched) in &mut kept {
        match record {
            Pending::AddSubtopic { subtopic_id, .. }
            | Pending::SubtopicProperty { subtopic_id, .. }
            | Pending::DeleteSubtopic { subtopic_id }
                if *subtopic_id > d =>
            {
                *subtopic_id -= 1;
                *touched = true;
            }
            Pending::Reloc { old, new, .. } => {
                if let Some(o) = old
                    && *o > d
                {
                    *o -= 1;
                    *touched = true;
                }
                if let Some(n) = new
                    && *n > d
                {
                    *n -= 1;
                    *touched = true;
                }
            }
            _ => {}
        }
    }

    let insert_at = if created_this_session {
        None
    } else {
        Some(
            kept.iter()
                .position(|(_, touched)| *touched)
                .unwrap_or(kept.len()),
        )
    };
    let mut result: Vec<Pending> = kept.into_iter().map(|(record, _)| record).collect();
    if let Some(at) = insert_at {
        result.insert(at, Pending::DeleteSubtopic { subtopic_id: d });
    }
    result
}

fn render(pending: Pending) -> Option<CommittableChange> {
    match pending {
        Pending::TopicProperty(update) => Some(CommittableChange::UpdateTopicProperty {
            property_name: update.name(),
            new_value: update.new_value(),
            old_value: update.old_value(),
        }),
        Pending::SubtopicProperty {
            subtopic_id,
            update,
        } => Some(CommittableChange::UpdateSubtopicProperty {
            subtopic_id,
            property_name: update.name(),
            new_value: update.new_value(),
            old_value: update.old_value(),
        }),
        Pending::AddSubtopic { subtopic_id, title } => {
            Some(CommittableChange::AddSubtopic { subtopic_id, title })
        }
        Pending::DeleteSubtopic { subtopic_id } => {
            Some(CommittableChange::DeleteSubtopic { subtopic_id })
        }
        Pending::DeleteCanonicalStory { story_id } => {
            Some(CommittableChange::DeleteCanonicalStory { story_id })
        }
        Pending::DeleteAdditionalStory { story_id } => {
            Some(CommittableChange::DeleteAdditionalStory { story_id })
        }
        Pending::RemoveUncategorizedSkill { skill_id } => {
            Some(CommittableChange::RemoveUncategorizedSkillId {
                uncategorized_skill_id: skill_id,
            })
        }
        Pending::Reloc {
            skill_id,
            old,
            new: Some(new_subtopic_id),
        } => Some(CommittableChange::MoveSkillIdToSubtopic {
            skill_id,
            old_subtopic_id: old,
            new_subtopic_id,
        }),
        Pending::Reloc {
            skill_id,
            old: Some(subtopic_id),
            new: None,
        } => Some(CommittableChange::RemoveSkillIdFromSubtopic {
            subtopic_id,
            skill_id,
        }),
        // A relocation that starts and ends uncategorized carries nothing.
        Pending::Reloc {
            old: None,
            new: None,
            ..
        } => None,
    }
}
