pub mod apply;
pub mod compact;
pub mod error;
pub mod history;

pub use apply::ApplicableChange;
pub use compact::{compact_page_changes, compact_topic_changes};
pub use error::{ChangeError, EngineError, HistoryError};
pub use history::HistoryStack;

use tracing::debug;

use topicdraft_core::change::{
    SubtopicPageChange, SubtopicPropertyUpdate, TopicChange, TopicPropertyUpdate,
};
use topicdraft_core::commit::CommittableChange;
use topicdraft_core::page::{RecordedVoiceovers, SubtitledHtml, SubtopicPage};
use topicdraft_core::topic::{SubtopicId, Topic};

/// Editing session over one topic. Every mutation validates its
/// preconditions against the current document, applies immediately, and
/// records a reversible change. The committable view is computed on demand
/// and never alters the recorded history.
pub struct TopicEditor {
    topic: Topic,
    history: HistoryStack<TopicChange>,
}

impl TopicEditor {
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            history: HistoryStack::new(),
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Give up the session, keeping the document as edited.
    pub fn into_topic(self) -> Topic {
        self.topic
    }

    fn record(&mut self, change: TopicChange) -> Result<(), EngineError> {
        self.history.record(change, &mut self.topic)?;
        Ok(())
    }

    // ========================================================================
    // Topic properties
    // ========================================================================

    pub fn set_name(&mut self, name: &str) -> Result<(), EngineError> {
        self.record(TopicChange::UpdateTopicProperty(TopicPropertyUpdate::Name {
            new: name.to_string(),
            old: self.topic.name.clone(),
        }))
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), EngineError> {
        self.record(TopicChange::UpdateTopicProperty(
            TopicPropertyUpdate::Description {
                new: description.to_string(),
                old: self.topic.description.clone(),
            },
        ))
    }

    pub fn set_abbreviated_name(&mut self, abbreviated_name: &str) -> Result<(), EngineError> {
        self.record(TopicChange::UpdateTopicProperty(
            TopicPropertyUpdate::AbbreviatedName {
                new: abbreviated_name.to_string(),
                old: self.topic.abbreviated_name.clone(),
            },
        ))
    }

    pub fn set_meta_tag_content(&mut self, meta_tag_content: &str) -> Result<(), EngineError> {
        self.record(TopicChange::UpdateTopicProperty(
            TopicPropertyUpdate::MetaTagContent {
                new: meta_tag_content.to_string(),
                old: self.topic.meta_tag_content.clone(),
            },
        ))
    }

    pub fn set_practice_tab_is_displayed(&mut self, displayed: bool) -> Result<(), EngineError> {
        self.record(TopicChange::UpdateTopicProperty(
            TopicPropertyUpdate::PracticeTabIsDisplayed {
                new: displayed,
                old: self.topic.practice_tab_is_displayed,
            },
        ))
    }

    pub fn set_url_fragment(&mut self, url_fragment: &str) -> Result<(), EngineError> {
        self.record(TopicChange::UpdateTopicProperty(
            TopicPropertyUpdate::UrlFragment {
                new: url_fragment.to_string(),
                old: self.topic.url_fragment.clone(),
            },
        ))
    }

    pub fn set_thumbnail_filename(&mut self, filename: &str) -> Result<(), EngineError> {
        self.record(TopicChange::UpdateTopicProperty(
            TopicPropertyUpdate::ThumbnailFilename {
                new: filename.to_string(),
                old: self.topic.thumbnail_filename.clone(),
            },
        ))
    }

    pub fn set_thumbnail_bg_color(&mut self, color: &str) -> Result<(), EngineError> {
        self.record(TopicChange::UpdateTopicProperty(
            TopicPropertyUpdate::ThumbnailBgColor {
                new: color.to_string(),
                old: self.topic.thumbnail_bg_color.clone(),
            },
        ))
    }

    pub fn set_language_code(&mut self, language_code: &str) -> Result<(), EngineError> {
        self.record(TopicChange::UpdateTopicProperty(
            TopicPropertyUpdate::LanguageCode {
                new: language_code.to_string(),
                old: self.topic.language_code.clone(),
            },
        ))
    }

    // ========================================================================
    // Subtopic properties
    // ========================================================================

    fn require_subtopic(&self, subtopic_id: SubtopicId) -> Result<(), EngineError> {
        if self.topic.subtopic(subtopic_id).is_none() {
            return Err(EngineError::SubtopicNotFound { subtopic_id });
        }
        Ok(())
    }

    pub fn set_subtopic_title(
        &mut self,
        subtopic_id: SubtopicId,
        title: &str,
    ) -> Result<(), EngineError> {
        let old = self
            .topic
            .subtopic(subtopic_id)
            .ok_or(EngineError::SubtopicNotFound { subtopic_id })?
            .title
            .clone();
        self.record(TopicChange::UpdateSubtopicProperty {
            subtopic_id,
            update: SubtopicPropertyUpdate::Title {
                new: title.to_string(),
                old,
            },
        })
    }

    pub fn set_subtopic_thumbnail_filename(
        &mut self,
        subtopic_id: SubtopicId,
        filename: &str,
    ) -> Result<(), EngineError> {
        let old = self
            .topic
            .subtopic(subtopic_id)
            .ok_or(EngineError::SubtopicNotFound { subtopic_id })?
            .thumbnail_filename
            .clone();
        self.record(TopicChange::UpdateSubtopicProperty {
            subtopic_id,
            update: SubtopicPropertyUpdate::ThumbnailFilename {
                new: filename.to_string(),
                old,
            },
        })
    }

    pub fn set_subtopic_thumbnail_bg_color(
        &mut self,
        subtopic_id: SubtopicId,
        color: &str,
    ) -> Result<(), EngineError> {
        let old = self
            .topic
            .subtopic(subtopic_id)
            .ok_or(EngineError::SubtopicNotFound { subtopic_id })?
            .thumbnail_bg_color
            .clone();
        self.record(TopicChange::UpdateSubtopicProperty {
            subtopic_id,
            update: SubtopicPropertyUpdate::ThumbnailBgColor {
                new: color.to_string(),
                old,
            },
        })
    }

    pub fn set_subtopic_url_fragment(
        &mut self,
        subtopic_id: SubtopicId,
        url_fragment: &str,
    ) -> Result<(), EngineError> {
        let old = self
            .topic
            .subtopic(subtopic_id)
            .ok_or(EngineError::SubtopicNotFound { subtopic_id })?
            .url_fragment
            .clone();
        self.record(TopicChange::UpdateSubtopicProperty {
            subtopic_id,
            update: SubtopicPropertyUpdate::UrlFragment {
                new: url_fragment.to_string(),
                old,
            },
        })
    }

    // ========================================================================
    // Subtopic structure
    // ========================================================================

    /// Create a subtopic with the next dense id and return that id.
    pub fn add_subtopic(&mut self, title: &str) -> Result<SubtopicId, EngineError> {
        let subtopic_id = self.topic.next_subtopic_id;
        debug!(subtopic_id, title, "adding subtopic");
        self.record(TopicChange::AddSubtopic {
            subtopic_id,
            title: title.to_string(),
        })?;
        Ok(subtopic_id)
    }

    /// Delete a subtopic. Its skills fall back to the uncategorized list
    /// and higher subtopic ids shift down by one. Deleting a subtopic that
    /// predates this session is recorded but cannot be undone.
    pub fn delete_subtopic(&mut self, subtopic_id: SubtopicId) -> Result<(), EngineError> {
        let position = self
            .topic
            .subtopic_position(subtopic_id)
            .ok_or(EngineError::SubtopicNotFound { subtopic_id })?;
        let subtopic = self.topic.subtopics[position].clone();
        let created_this_session = subtopic.created_this_session;
        debug!(subtopic_id, created_this_session, "deleting subtopic");
        self.record(TopicChange::DeleteSubtopic {
            subtopic_id,
            subtopic,
            position,
            created_this_session,
        })
    }

    // ========================================================================
    // Stories and skills
    // ========================================================================

    pub fn remove_canonical_story(&mut self, story_id: &str) -> Result<(), EngineError> {
        let position = self
            .topic
            .canonical_story_references
            .iter()
            .position(|r| r.story_id == story_id)
            .ok_or_else(|| EngineError::CanonicalStoryNotPresent {
                story_id: story_id.to_string(),
            })?;
        let story = self.topic.canonical_story_references[position].clone();
        self.record(TopicChange::RemoveCanonicalStory { story, position })
    }

    pub fn remove_additional_story(&mut self, story_id: &str) -> Result<(), EngineError> {
        let position = self
            .topic
            .additional_story_references
            .iter()
            .position(|r| r.story_id == story_id)
            .ok_or_else(|| EngineError::AdditionalStoryNotPresent {
                story_id: story_id.to_string(),
            })?;
        let story = self.topic.additional_story_references[position].clone();
        self.record(TopicChange::RemoveAdditionalStory { story, position })
    }

    pub fn remove_uncategorized_skill(&mut self, skill_id: &str) -> Result<(), EngineError> {
        let position = self
            .topic
            .uncategorized_skill_position(skill_id)
            .ok_or_else(|| EngineError::NotUncategorizedSkill {
                skill_id: skill_id.to_string(),
            })?;
        let skill = self.topic.uncategorized_skill_summaries[position].clone();
        self.record(TopicChange::RemoveUncategorizedSkill { skill, position })
    }

    /// Move a skill into a subtopic. `old_subtopic_id` of `None` moves it
    /// out of the uncategorized list.
    pub fn move_skill_to_subtopic(
        &mut self,
        old_subtopic_id: Option<SubtopicId>,
        new_subtopic_id: SubtopicId,
        skill_id: &str,
    ) -> Result<(), EngineError> {
        self.require_subtopic(new_subtopic_id)?;
        let (skill, old_position) = match old_subtopic_id {
            None => {
                let position = self.topic.uncategorized_skill_position(skill_id).ok_or_else(
                    || EngineError::NotUncategorizedSkill {
                        skill_id: skill_id.to_string(),
                    },
                )?;
                (
                    self.topic.uncategorized_skill_summaries[position].clone(),
                    position,
                )
            }
            Some(old_id) => {
                let subtopic = self
                    .topic
                    .subtopic(old_id)
                    .ok_or(EngineError::SubtopicNotFound {
                        subtopic_id: old_id,
                    })?;
                let position =
                    subtopic
                        .skill_position(skill_id)
                        .ok_or_else(|| EngineError::SkillNotInSubtopic {
                            subtopic_id: old_id,
                            skill_id: skill_id.to_string(),
                        })?;
                (subtopic.skill_summaries[position].clone(), position)
            }
        };
        self.record(TopicChange::MoveSkillToSubtopic {
            skill,
            old_subtopic_id,
            new_subtopic_id,
            old_position,
        })
    }

    /// Take a skill out of a subtopic; it becomes uncategorized again.
    pub fn remove_skill_from_subtopic(
        &mut self,
        subtopic_id: SubtopicId,
        skill_id: &str,
    ) -> Result<(), EngineError> {
        let subtopic = self
            .topic
            .subtopic(subtopic_id)
            .ok_or(EngineError::SubtopicNotFound { subtopic_id })?;
        let old_position =
            subtopic
                .skill_position(skill_id)
                .ok_or_else(|| EngineError::SkillNotInSubtopic {
                    subtopic_id,
                    skill_id: skill_id.to_string(),
                })?;
        let skill = subtopic.skill_summaries[old_position].clone();
        self.record(TopicChange::RemoveSkillFromSubtopic {
            subtopic_id,
            skill,
            old_position,
        })
    }

    // ========================================================================
    // Rearranges
    // ========================================================================

    fn check_index(index: usize, len: usize) -> Result<(), EngineError> {
        if index < len {
            Ok(())
        } else {
            Err(EngineError::IndexOutOfRange { index, len })
        }
    }

    pub fn rearrange_canonical_story(
        &mut self,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), EngineError> {
        let len = self.topic.canonical_story_references.len();
        Self::check_index(from_index, len)?;
        Self::check_index(to_index, len)?;
        self.record(TopicChange::RearrangeCanonicalStory {
            from_index,
            to_index,
        })
    }

    pub fn rearrange_skill_in_subtopic(
        &mut self,
        subtopic_id: SubtopicId,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), EngineError> {
        let len = self
            .topic
            .subtopic(subtopic_id)
            .ok_or(EngineError::SubtopicNotFound { subtopic_id })?
            .skill_summaries
            .len();
        Self::check_index(from_index, len)?;
        Self::check_index(to_index, len)?;
        self.record(TopicChange::RearrangeSkillInSubtopic {
            subtopic_id,
            from_index,
            to_index,
        })
    }

    pub fn rearrange_subtopic(
        &mut self,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), EngineError> {
        let len = self.topic.subtopics.len();
        Self::check_index(from_index, len)?;
        Self::check_index(to_index, len)?;
        self.record(TopicChange::RearrangeSubtopic {
            from_index,
            to_index,
        })
    }

    // ========================================================================
    // History
    // ========================================================================

    pub fn undo(&mut self) -> Result<(), EngineError> {
        debug!("undo topic change");
        self.history.undo(&mut self.topic)?;
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), EngineError> {
        debug!("redo topic change");
        self.history.redo(&mut self.topic)?;
        Ok(())
    }

    pub fn applied_changes(&self) -> &[TopicChange] {
        self.history.applied_changes()
    }

    pub fn change_count(&self) -> usize {
        self.history.change_count()
    }

    pub fn has_changes(&self) -> bool {
        self.history.has_changes()
    }

    /// Drop all history; the document keeps its edited state.
    pub fn clear_changes(&mut self) {
        self.history.clear();
    }

    /// Compute the committable change list for the session so far.
    pub fn committable_changes(&self) -> Vec<CommittableChange> {
        compact_topic_changes(self.history.applied_changes())
    }
}

/// Editing session over one subtopic page, tracked independently of the
/// owning topic's session.
pub struct SubtopicPageEditor {
    page: SubtopicPage,
    history: HistoryStack<SubtopicPageChange>,
}

impl SubtopicPageEditor {
    pub fn new(page: SubtopicPage) -> Self {
        Self {
            page,
            history: HistoryStack::new(),
        }
    }

    pub fn page(&self) -> &SubtopicPage {
        &self.page
    }

    pub fn set_page_contents_html(&mut self, html: SubtitledHtml) -> Result<(), EngineError> {
        let change = SubtopicPageChange::UpdatePageContentsHtml {
            subtopic_id: self.page.subtopic_id,
            new: html,
            old: self.page.page_contents.subtitled_html.clone(),
        };
        self.history.record(change, &mut self.page)?;
        Ok(())
    }

    pub fn set_page_contents_audio(
        &mut self,
        voiceovers: RecordedVoiceovers,
    ) -> Result<(), EngineError> {
        let change = SubtopicPageChange::UpdatePageContentsAudio {
            subtopic_id: self.page.subtopic_id,
            new: voiceovers,
            old: self.page.page_contents.recorded_voiceovers.clone(),
        };
        self.history.record(change, &mut self.page)?;
        Ok(())
    }

    pub fn undo(&mut self) -> Result<(), EngineError> {
        self.history.undo(&mut self.page)?;
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), EngineError> {
        self.history.redo(&mut self.page)?;
        Ok(())
    }

    pub fn applied_changes(&self) -> &[SubtopicPageChange] {
        self.history.applied_changes()
    }

    pub fn change_count(&self) -> usize {
        self.history.change_count()
    }

    pub fn has_changes(&self) -> bool {
        self.history.has_changes()
    }

    pub fn clear_changes(&mut self) {
        self.history.clear();
    }

    pub fn committable_changes(&self) -> Vec<CommittableChange> {
        compact_page_changes(self.history.applied_changes())
    }
}
