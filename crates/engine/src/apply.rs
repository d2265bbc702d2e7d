//! Execution of recorded changes against their target documents. Every
//! change applies forward and reverts exactly, using only the state it
//! captured when it was recorded.

use topicdraft_core::change::{
    SubtopicPageChange, SubtopicPropertyUpdate, TopicChange, TopicPropertyUpdate,
};
use topicdraft_core::page::SubtopicPage;
use topicdraft_core::topic::{rearrange, Topic};

use crate::error::ChangeError;

pub trait ApplicableChange<T> {
    fn apply(&self, target: &mut T) -> Result<(), ChangeError>;
    fn revert(&self, target: &mut T) -> Result<(), ChangeError>;
}

fn stale(what: impl Into<String>) -> ChangeError {
    ChangeError::StaleTarget(what.into())
}

// ============================================================================
// Topic changes
// ============================================================================

/// Write one side of a property update into the topic. `forward` selects
/// the new value; reverting writes the captured old value back.
fn write_topic_property(topic: &mut Topic, update: &TopicPropertyUpdate, forward: bool) {
    match update {
        TopicPropertyUpdate::Name { new, old } => {
            topic.name = if forward { new.clone() } else { old.clone() };
        }
        TopicPropertyUpdate::Description { new, old } => {
            topic.description = if forward { new.clone() } else { old.clone() };
        }
        TopicPropertyUpdate::AbbreviatedName { new, old } => {
            topic.abbreviated_name = if forward { Some(new.clone()) } else { old.clone() };
        }
        TopicPropertyUpdate::MetaTagContent { new, old } => {
            topic.meta_tag_content = if forward { Some(new.clone()) } else { old.clone() };
        }
        TopicPropertyUpdate::PracticeTabIsDisplayed { new, old } => {
            topic.practice_tab_is_displayed = if forward { Some(*new) } else { *old };
        }
        TopicPropertyUpdate::UrlFragment { new, old } => {
            topic.url_fragment = if forward { Some(new.clone()) } else { old.clone() };
        }
        TopicPropertyUpdate::ThumbnailFilename { new, old } => {
            topic.thumbnail_filename = if forward { Some(new.clone()) } else { old.clone() };
        }
        TopicPropertyUpdate::ThumbnailBgColor { new, old } => {
            topic.thumbnail_bg_color = if forward { Some(new.clone()) } else { old.clone() };
        }
        TopicPropertyUpdate::LanguageCode { new, old } => {
            topic.language_code = if forward { new.clone() } else { old.clone() };
        }
    }
}

fn write_subtopic_property(
    topic: &mut Topic,
    subtopic_id: topicdraft_core::SubtopicId,
    update: &SubtopicPropertyUpdate,
    forward: bool,
) -> Result<(), ChangeError> {
    let subtopic = topic
        .subtopic_mut(subtopic_id)
        .ok_or_else(|| stale(format!("subtopic {subtopic_id} is gone")))?;
    match update {
        SubtopicPropertyUpdate::Title { new, old } => {
            subtopic.title = if forward { new.clone() } else { old.clone() };
        }
        SubtopicPropertyUpdate::ThumbnailFilename { new, old } => {
            subtopic.thumbnail_filename = if forward { Some(new.clone()) } else { old.clone() };
        }
        SubtopicPropertyUpdate::ThumbnailBgColor { new, old } => {
            subtopic.thumbnail_bg_color = if forward { Some(new.clone()) } else { old.clone() };
        }
        SubtopicPropertyUpdate::UrlFragment { new, old } => {
            subtopic.url_fragment = if forward { Some(new.clone()) } else { old.clone() };
        }
    }
    Ok(())
}

impl ApplicableChange<Topic> for TopicChange {
    fn apply(&self, topic: &mut Topic) -> Result<(), ChangeError> {
        match self {
            Self::UpdateTopicProperty(update) => {
                write_topic_property(topic, update, true);
                Ok(())
            }
            Self::UpdateSubtopicProperty {
                subtopic_id,
                update,
            } => write_subtopic_property(topic, *subtopic_id, update, true),
            Self::AddSubtopic { subtopic_id, title } => {
                topic.add_subtopic(*subtopic_id, title);
                Ok(())
            }
            Self::DeleteSubtopic { subtopic_id, .. } => {
                if topic.delete_subtopic(*subtopic_id) {
                    Ok(())
                } else {
                    Err(stale(format!("subtopic {subtopic_id} is gone")))
                }
            }
            Self::RemoveCanonicalStory { story, position } => {
                let refs = &mut topic.canonical_story_references;
                if refs.get(*position) != Some(story) {
                    return Err(stale(format!(
                        "story {} moved in canonical references",
                        story.story_id
                    )));
                }
                refs.remove(*position);
                Ok(())
            }
            Self::RemoveAdditionalStory { story, position } => {
                let refs = &mut topic.additional_story_references;
                if refs.get(*position) != Some(story) {
                    return Err(stale(format!(
                        "story {} moved in additional references",
                        story.story_id
                    )));
                }
                refs.remove(*position);
                Ok(())
            }
            Self::RemoveUncategorizedSkill { skill, position } => {
                let skills = &mut topic.uncategorized_skill_summaries;
                if skills.get(*position) != Some(skill) {
                    return Err(stale(format!("skill {} moved", skill.id)));
                }
                skills.remove(*position);
                Ok(())
            }
            Self::MoveSkillToSubtopic {
                skill,
                old_subtopic_id,
                new_subtopic_id,
                old_position,
            } => {
                let taken = topic
                    .take_skill(*old_subtopic_id, *old_position)
                    .ok_or_else(|| stale(format!("skill {} moved", skill.id)))?;
                if taken.id != skill.id {
                    topic.put_skill(*old_subtopic_id, Some(*old_position), taken);
                    return Err(stale(format!("skill {} moved", skill.id)));
                }
                if !topic.put_skill(Some(*new_subtopic_id), None, taken) {
                    return Err(stale(format!("subtopic {new_subtopic_id} is gone")));
                }
                Ok(())
            }
            Self::RemoveSkillFromSubtopic {
                subtopic_id,
                skill,
                old_position,
            } => {
                let taken = topic
                    .take_skill(Some(*subtopic_id), *old_position)
                    .ok_or_else(|| stale(format!("skill {} moved", skill.id)))?;
                if taken.id != skill.id {
                    topic.put_skill(Some(*subtopic_id), Some(*old_position), taken);
                    return Err(stale(format!("skill {} moved", skill.id)));
                }
                // Skills removed from a subtopic become uncategorized again.
                topic.uncategorized_skill_summaries.push(taken);
                Ok(())
            }
            Self::RearrangeCanonicalStory {
                from_index,
                to_index,
            } => {
                if rearrange(&mut topic.canonical_story_references, *from_index, *to_index) {
                    Ok(())
                } else {
                    Err(stale("canonical story list shrank".to_string()))
                }
            }
            Self::RearrangeSkillInSubtopic {
                subtopic_id,
                from_index,
                to_index,
            } => {
                let subtopic = topic
                    .subtopic_mut(*subtopic_id)
                    .ok_or_else(|| stale(format!("subtopic {subtopic_id} is gone")))?;
                if rearrange(&mut subtopic.skill_summaries, *from_index, *to_index) {
                    Ok(())
                } else {
                    Err(stale("subtopic skill list shrank".to_string()))
                }
            }
            Self::RearrangeSubtopic {
                from_index,
                to_index,
            } => {
                if rearrange(&mut topic.subtopics, *from_index, *to_index) {
                    Ok(())
                } else {
                    Err(stale("subtopic list shrank".to_string()))
                }
            }
        }
    }

    fn revert(&self, topic: &mut Topic) -> Result<(), ChangeError> {
        match self {
            Self::UpdateTopicProperty(update) => {
                write_topic_property(topic, update, false);
                Ok(())
            }
            Self::UpdateSubtopicProperty {
                subtopic_id,
                update,
            } => write_subtopic_property(topic, *subtopic_id, update, false),
            Self::AddSubtopic { subtopic_id, .. } => {
                if topic.remove_added_subtopic(*subtopic_id) {
                    Ok(())
                } else {
                    Err(stale(format!("subtopic {subtopic_id} is gone")))
                }
            }
            Self::DeleteSubtopic {
                subtopic,
                position,
                created_this_session,
                ..
            } => {
                if !created_this_session {
                    return Err(ChangeError::Irreversible(
                        "A deleted subtopic cannot be restored",
                    ));
                }
                if topic.restore_subtopic(subtopic.clone(), *position) {
                    Ok(())
                } else {
                    Err(stale(format!("position {position} no longer valid")))
                }
            }
            Self::RemoveCanonicalStory { story, position } => {
                let refs = &mut topic.canonical_story_references;
                if *position > refs.len() {
                    return Err(stale(format!("position {position} no longer valid")));
                }
                refs.insert(*position, story.clone());
                Ok(())
            }
            Self::RemoveAdditionalStory { story, position } => {
                let refs = &mut topic.additional_story_references;
                if *position > refs.len() {
                    return Err(stale(format!("position {position} no longer valid")));
                }
                refs.insert(*position, story.clone());
                Ok(())
            }
            Self::RemoveUncategorizedSkill { skill, position } => {
                let skills = &mut topic.uncategorized_skill_summaries;
                if *position > skills.len() {
                    return Err(stale(format!("position {position} no longer valid")));
                }
                skills.insert(*position, skill.clone());
                Ok(())
            }
            Self::MoveSkillToSubtopic {
                skill,
                old_subtopic_id,
                new_subtopic_id,
                old_position,
            } => {
                let at = topic
                    .subtopic(*new_subtopic_id)
                    .and_then(|s| s.skill_position(&skill.id))
                    .ok_or_else(|| stale(format!("skill {} moved", skill.id)))?;
                let taken = topic
                    .take_skill(Some(*new_subtopic_id), at)
                    .ok_or_else(|| stale(format!("skill {} moved", skill.id)))?;
                if !topic.put_skill(*old_subtopic_id, Some(*old_position), taken) {
                    return Err(stale(format!("position {old_position} no longer valid")));
                }
                Ok(())
            }
            Self::RemoveSkillFromSubtopic {
                subtopic_id,
                skill,
                old_position,
            } => {
                let at = topic
                    .uncategorized_skill_position(&skill.id)
                    .ok_or_else(|| stale(format!("skill {} moved", skill.id)))?;
                let taken = topic
                    .take_skill(None, at)
                    .ok_or_else(|| stale(format!("skill {} moved", skill.id)))?;
                if !topic.put_skill(Some(*subtopic_id), Some(*old_position), taken) {
                    return Err(stale(format!("position {old_position} no longer valid")));
                }
                Ok(())
            }
            Self::RearrangeCanonicalStory {
                from_index,
                to_index,
            } => {
                if rearrange(&mut topic.canonical_story_references, *to_index, *from_index) {
                    Ok(())
                } else {
                    Err(stale("canonical story list shrank".to_string()))
                }
            }
            Self::RearrangeSkillInSubtopic {
                subtopic_id,
                from_index,
                to_index,
            } => {
                let subtopic = topic
                    .subtopic_mut(*subtopic_id)
                    .ok_or_else(|| stale(format!("subtopic {subtopic_id} is gone")))?;
                if rearrange(&mut subtopic.skill_summaries, *to_index, *from_index) {
                    Ok(())
                } else {
                    Err(stale("subtopic skill list shrank".to_string()))
                }
            }
            Self::RearrangeSubtopic {
                from_index,
                to_index,
            } => {
                if rearrange(&mut topic.subtopics, *to_index, *from_index) {
                    Ok(())
                } else {
                    Err(stale("subtopic list shrank".to_string()))
                }
            }
        }
    }
}

// ============================================================================
// Subtopic page changes
// ============================================================================

impl ApplicableChange<SubtopicPage> for SubtopicPageChange {
    fn apply(&self, page: &mut SubtopicPage) -> Result<(), ChangeError> {
        if self.subtopic_id() != page.subtopic_id {
            return Err(stale(format!(
                "change targets subtopic {}, page belongs to {}",
                self.subtopic_id(),
                page.subtopic_id
            )));
        }
        match self {
            Self::UpdatePageContentsHtml { new, .. } => {
                page.page_contents.subtitled_html = new.clone();
            }
            Self::UpdatePageContentsAudio { new, .. } => {
                page.page_contents.recorded_voiceovers = new.clone();
            }
        }
        Ok(())
    }

    fn revert(&self, page: &mut SubtopicPage) -> Result<(), ChangeError> {
        if self.subtopic_id() != page.subtopic_id {
            return Err(stale(format!(
                "change targets subtopic {}, page belongs to {}",
                self.subtopic_id(),
                page.subtopic_id
            )));
        }
        match self {
            Self::UpdatePageContentsHtml { old, .. } => {
                page.page_contents.subtitled_html = old.clone();
            }
            Self::UpdatePageContentsAudio { old, .. } => {
                page.page_contents.recorded_voiceovers = old.clone();
            }
        }
        Ok(())
    }
}
