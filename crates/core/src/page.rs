//! Subtopic pages: the rich-text contents shown for one subtopic, tracked
//! by their own history stack independent of the owning topic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::topic::SubtopicId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitledHtml {
    pub html: String,
    pub content_id: String,
}

impl SubtitledHtml {
    pub fn new(html: impl Into<String>, content_id: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            content_id: content_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voiceover {
    pub filename: String,
    pub file_size_bytes: u64,
    pub needs_update: bool,
    pub duration_secs: f64,
}

/// Voiceovers keyed by content id, then language code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedVoiceovers {
    pub voiceovers_mapping: BTreeMap<String, BTreeMap<String, Voiceover>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageContents {
    pub subtitled_html: SubtitledHtml,
    pub recorded_voiceovers: RecordedVoiceovers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtopicPageDict {
    pub id: String,
    pub topic_id: String,
    pub page_contents: PageContents,
    pub language_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtopicPage {
    pub id: String,
    pub topic_id: String,
    pub subtopic_id: SubtopicId,
    pub page_contents: PageContents,
    pub language_code: String,
}

impl SubtopicPage {
    /// Build a page from a backend snapshot. The page id carries the
    /// subtopic id as its `-<n>` suffix.
    pub fn from_backend(dict: SubtopicPageDict) -> Result<Self, CoreError> {
        let subtopic_id = dict
            .id
            .rsplit('-')
            .next()
            .and_then(|raw| raw.parse::<SubtopicId>().ok())
            .ok_or_else(|| {
                CoreError::InvalidData(format!("subtopic page id {} has no numeric suffix", dict.id))
            })?;
        Ok(Self {
            id: dict.id,
            topic_id: dict.topic_id,
            subtopic_id,
            page_contents: dict.page_contents,
            language_code: dict.language_code,
        })
    }
}
