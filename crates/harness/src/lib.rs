//! Shared fixtures for the integration tests: a small topic with one
//! pre-existing subtopic, three canonical stories, and a subtopic page
//! with one recorded voiceover.

use std::collections::BTreeMap;

use serde_json::json;
use topicdraft_core::page::{SubtopicPage, SubtopicPageDict};
use topicdraft_core::topic::{SkillSummary, Topic, TopicDict};
use topicdraft_engine::{SubtopicPageEditor, TopicEditor};

pub fn sample_topic() -> Topic {
    let dict: TopicDict = serde_json::from_value(json!({
        "id": "sample_topic_id",
        "name": "Topic name",
        "description": "Topic description",
        "version": 1,
        "uncategorized_skill_ids": ["skill_1"],
        "canonical_story_references": [
            { "story_id": "story_1", "story_is_published": true },
            { "story_id": "story_2", "story_is_published": true },
            { "story_id": "story_3", "story_is_published": true }
        ],
        "additional_story_references": [
            { "story_id": "story_2", "story_is_published": true }
        ],
        "subtopics": [
            { "id": 1, "title": "Title", "skill_ids": ["skill_2"] }
        ],
        "next_subtopic_id": 2,
        "language_code": "en"
    }))
    .expect("fixture dict is well formed");
    let skill_descriptions: BTreeMap<String, String> = [
        ("skill_1".to_string(), "Description 1".to_string()),
        ("skill_2".to_string(), "Description 2".to_string()),
    ]
    .into();
    Topic::from_backend(dict, &skill_descriptions).expect("fixture topic is valid")
}

pub fn sample_topic_editor() -> TopicEditor {
    TopicEditor::new(sample_topic())
}

pub fn sample_subtopic_page() -> SubtopicPage {
    let dict: SubtopicPageDict = serde_json::from_value(json!({
        "id": "topic_id-1",
        "topic_id": "topic_id",
        "page_contents": {
            "subtitled_html": {
                "html": "test content",
                "content_id": "content"
            },
            "recorded_voiceovers": {
                "voiceovers_mapping": {
                    "content": {
                        "en": {
                            "filename": "test.mp3",
                            "file_size_bytes": 100,
                            "needs_update": false,
                            "duration_secs": 0.1
                        }
                    }
                }
            }
        },
        "language_code": "en"
    }))
    .expect("fixture dict is well formed");
    SubtopicPage::from_backend(dict).expect("fixture page is valid")
}

pub fn sample_page_editor() -> SubtopicPageEditor {
    SubtopicPageEditor::new(sample_subtopic_page())
}

pub fn first_skill() -> SkillSummary {
    SkillSummary::new("skill_1", "Description 1")
}

pub fn second_skill() -> SkillSummary {
    SkillSummary::new("skill_2", "Description 2")
}

pub fn third_skill() -> SkillSummary {
    SkillSummary::new("skill_3", "Description 3")
}
