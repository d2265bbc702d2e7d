//! Recorded change types. One record is pushed per accepted edit; each
//! carries enough captured state (old values, positions, snapshots) to be
//! reverted exactly without consulting anything outside the record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::commit::{SubtopicPagePropertyName, SubtopicPropertyName, TopicPropertyName};
use crate::page::{RecordedVoiceovers, SubtitledHtml};
use crate::topic::{SkillSummary, StoryReference, Subtopic, SubtopicId};

fn json<T: Serialize>(value: &T) -> Value {
    // All property payloads are plain strings/bools; serialization cannot fail.
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ============================================================================
// Topic property updates
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopicPropertyUpdate {
    Name { new: String, old: String },
    Description { new: String, old: String },
    AbbreviatedName { new: String, old: Option<String> },
    MetaTagContent { new: String, old: Option<String> },
    PracticeTabIsDisplayed { new: bool, old: Option<bool> },
    UrlFragment { new: String, old: Option<String> },
    ThumbnailFilename { new: String, old: Option<String> },
    ThumbnailBgColor { new: String, old: Option<String> },
    LanguageCode { new: String, old: String },
}

impl TopicPropertyUpdate {
    pub fn name(&self) -> TopicPropertyName {
        match self {
            Self::Name { .. } => TopicPropertyName::Name,
            Self::Description { .. } => TopicPropertyName::Description,
            Self::AbbreviatedName { .. } => TopicPropertyName::AbbreviatedName,
            Self::MetaTagContent { .. } => TopicPropertyName::MetaTagContent,
            Self::PracticeTabIsDisplayed { .. } => TopicPropertyName::PracticeTabIsDisplayed,
            Self::UrlFragment { .. } => TopicPropertyName::UrlFragment,
            Self::ThumbnailFilename { .. } => TopicPropertyName::ThumbnailFilename,
            Self::ThumbnailBgColor { .. } => TopicPropertyName::ThumbnailBgColor,
            Self::LanguageCode { .. } => TopicPropertyName::LanguageCode,
        }
    }

    pub fn old_value(&self) -> Value {
        match self {
            Self::Name { old, .. } | Self::Description { old, .. } | Self::LanguageCode { old, .. } => {
                json(old)
            }
            Self::AbbreviatedName { old, .. }
            | Self::MetaTagContent { old, .. }
            | Self::UrlFragment { old, .. }
            | Self::ThumbnailFilename { old, .. }
            | Self::ThumbnailBgColor { old, .. } => json(old),
            Self::PracticeTabIsDisplayed { old, .. } => json(old),
        }
    }

    pub fn new_value(&self) -> Value {
        match self {
            Self::Name { new, .. }
            | Self::Description { new, .. }
            | Self::AbbreviatedName { new, .. }
            | Self::MetaTagContent { new, .. }
            | Self::UrlFragment { new, .. }
            | Self::ThumbnailFilename { new, .. }
            | Self::ThumbnailBgColor { new, .. }
            | Self::LanguageCode { new, .. } => json(new),
            Self::PracticeTabIsDisplayed { new, .. } => json(new),
        }
    }

    /// Collapse two updates of the same property into one spanning record:
    /// the first edit's old value, the last edit's new value.
    pub fn merged(first: &Self, last: &Self) -> Self {
        let mut merged = last.clone();
        match (&mut merged, first) {
            (Self::Name { old, .. }, Self::Name { old: o, .. })
            | (Self::Description { old, .. }, Self::Description { old: o, .. })
            | (Self::LanguageCode { old, .. }, Self::LanguageCode { old: o, .. }) => {
                *old = o.clone();
            }
            (Self::AbbreviatedName { old, .. }, Self::AbbreviatedName { old: o, .. })
            | (Self::MetaTagContent { old, .. }, Self::MetaTagContent { old: o, .. })
            | (Self::UrlFragment { old, .. }, Self::UrlFragment { old: o, .. })
            | (Self::ThumbnailFilename { old, .. }, Self::ThumbnailFilename { old: o, .. })
            | (Self::ThumbnailBgColor { old, .. }, Self::ThumbnailBgColor { old: o, .. }) => {
                *old = o.clone();
            }
            (Self::PracticeTabIsDisplayed { old, .. }, Self::PracticeTabIsDisplayed { old: o, .. }) => {
                *old = *o;
            }
            _ => {}
        }
        merged
    }

    /// True when a merged record ended up back where it started.
    pub fn is_noop(&self) -> bool {
        self.old_value() == self.new_value()
    }
}

// ============================================================================
// Subtopic property updates
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubtopicPropertyUpdate {
    Title { new: String, old: String },
    ThumbnailFilename { new: String, old: Option<String> },
    ThumbnailBgColor { new: String, old: Option<String> },
    UrlFragment { new: String, old: Option<String> },
}

impl SubtopicPropertyUpdate {
    pub fn name(&self) -> SubtopicPropertyName {
        match self {
            Self::Title { .. } => SubtopicPropertyName::Title,
            Self::ThumbnailFilename { .. } => SubtopicPropertyName::ThumbnailFilename,
            Self::ThumbnailBgColor { .. } => SubtopicPropertyName::ThumbnailBgColor,
            Self::UrlFragment { .. } => SubtopicPropertyName::UrlFragment,
        }
    }

    pub fn old_value(&self) -> Value {
        match self {
            Self::Title { old, .. } => json(old),
            Self::ThumbnailFilename { old, .. }
            | Self::ThumbnailBgColor { old, .. }
            | Self::UrlFragment { old, .. } => json(old),
        }
    }

    pub fn new_value(&self) -> Value {
        match self {
            Self::Title { new, .. }
            | Self::ThumbnailFilename { new, .. }
            | Self::ThumbnailBgColor { new, .. }
            | Self::UrlFragment { new, .. } => json(new),
        }
    }

    pub fn merged(first: &Self, last: &Self) -> Self {
        let mut merged = last.clone();
        match (&mut merged, first) {
            (Self::Title { old, .. }, Self::Title { old: o, .. }) => *old = o.clone(),
            (Self::ThumbnailFilename { old, .. }, Self::ThumbnailFilename { old: o, .. })
            | (Self::ThumbnailBgColor { old, .. }, Self::ThumbnailBgColor { old: o, .. })
            | (Self::UrlFragment { old, .. }, Self::UrlFragment { old: o, .. }) => {
                *old = o.clone();
            }
            _ => {}
        }
        merged
    }

    pub fn is_noop(&self) -> bool {
        self.old_value() == self.new_value()
    }
}

// ============================================================================
// Topic change records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TopicChange {
    UpdateTopicProperty(TopicPropertyUpdate),
    UpdateSubtopicProperty {
        subtopic_id: SubtopicId,
        update: SubtopicPropertyUpdate,
    },
    AddSubtopic {
        subtopic_id: SubtopicId,
        title: String,
    },
    /// Captures the full subtopic snapshot and its list position so the
    /// delete can be reverted exactly. Deleting a pre-existing subtopic is
    /// recorded but not reversible.
    DeleteSubtopic {
        subtopic_id: SubtopicId,
        subtopic: Subtopic,
        position: usize,
        created_this_session: bool,
    },
    RemoveCanonicalStory {
        story: StoryReference,
        position: usize,
    },
    RemoveAdditionalStory {
        story: StoryReference,
        position: usize,
    },
    RemoveUncategorizedSkill {
        skill: SkillSummary,
        position: usize,
    },
    /// `old_subtopic_id` of `None` means the skill came from the
    /// uncategorized list.
    MoveSkillToSubtopic {
        skill: SkillSummary,
        old_subtopic_id: Option<SubtopicId>,
        new_subtopic_id: SubtopicId,
        old_position: usize,
    },
    RemoveSkillFromSubtopic {
        subtopic_id: SubtopicId,
        skill: SkillSummary,
        old_position: usize,
    },
    RearrangeCanonicalStory {
        from_index: usize,
        to_index: usize,
    },
    RearrangeSkillInSubtopic {
        subtopic_id: SubtopicId,
        from_index: usize,
        to_index: usize,
    },
    RearrangeSubtopic {
        from_index: usize,
        to_index: usize,
    },
}

// ============================================================================
// Subtopic page change records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubtopicPageChange {
    UpdatePageContentsHtml {
        subtopic_id: SubtopicId,
        new: SubtitledHtml,
        old: SubtitledHtml,
    },
    UpdatePageContentsAudio {
        subtopic_id: SubtopicId,
        new: RecordedVoiceovers,
        old: RecordedVoiceovers,
    },
}

impl SubtopicPageChange {
    pub fn subtopic_id(&self) -> SubtopicId {
        match self {
            Self::UpdatePageContentsHtml { subtopic_id, .. }
            | Self::UpdatePageContentsAudio { subtopic_id, .. } => *subtopic_id,
        }
    }

    pub fn property_name(&self) -> SubtopicPagePropertyName {
        match self {
            Self::UpdatePageContentsHtml { .. } => SubtopicPagePropertyName::PageContentsHtml,
            Self::UpdatePageContentsAudio { .. } => SubtopicPagePropertyName::PageContentsAudio,
        }
    }

    pub fn old_value(&self) -> Value {
        match self {
            Self::UpdatePageContentsHtml { old, .. } => json(old),
            Self::UpdatePageContentsAudio { old, .. } => json(old),
        }
    }

    pub fn new_value(&self) -> Value {
        match self {
            Self::UpdatePageContentsHtml { new, .. } => json(new),
            Self::UpdatePageContentsAudio { new, .. } => json(new),
        }
    }

    /// Collapse two edits of the same page property, keeping the first old
    /// state and the last new state.
    pub fn merged(first: &Self, last: &Self) -> Self {
        let mut merged = last.clone();
        match (&mut merged, first) {
            (Self::UpdatePageContentsHtml { old, .. }, Self::UpdatePageContentsHtml { old: o, .. }) => {
                *old = o.clone();
            }
            (
                Self::UpdatePageContentsAudio { old, .. },
                Self::UpdatePageContentsAudio { old: o, .. },
            ) => {
                *old = o.clone();
            }
            _ => {}
        }
        merged
    }

    pub fn is_noop(&self) -> bool {
        self.old_value() == self.new_value()
    }
}
