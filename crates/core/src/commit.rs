//! The committable wire contract: the flat change dicts the backend accepts
//! when an edit session is saved. These serialize with a `cmd` tag and
//! snake_case field names so the JSON matches the server's change schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::topic::SubtopicId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicPropertyName {
    Name,
    Description,
    AbbreviatedName,
    MetaTagContent,
    PracticeTabIsDisplayed,
    UrlFragment,
    ThumbnailFilename,
    ThumbnailBgColor,
    LanguageCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtopicPropertyName {
    Title,
    ThumbnailFilename,
    ThumbnailBgColor,
    UrlFragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtopicPagePropertyName {
    PageContentsHtml,
    PageContentsAudio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum CommittableChange {
    UpdateTopicProperty {
        property_name: TopicPropertyName,
        new_value: Value,
        old_value: Value,
    },
    UpdateSubtopicProperty {
        subtopic_id: SubtopicId,
        property_name: SubtopicPropertyName,
        new_value: Value,
        old_value: Value,
    },
    UpdateSubtopicPageProperty {
        subtopic_id: SubtopicId,
        property_name: SubtopicPagePropertyName,
        new_value: Value,
        old_value: Value,
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
    RemoveUncategorizedSkillId {
        uncategorized_skill_id: String,
    },
    MoveSkillIdToSubtopic {
        skill_id: String,
        old_subtopic_id: Option<SubtopicId>,
        new_subtopic_id: SubtopicId,
    },
    RemoveSkillIdFromSubtopic {
        subtopic_id: SubtopicId,
        skill_id: String,
    },
}
