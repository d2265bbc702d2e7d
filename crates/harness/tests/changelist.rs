//! Committable change lists: wire shape and compaction behavior.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use topicdraft_core::page::{RecordedVoiceovers, SubtitledHtml};
use topicdraft_core::topic::{Topic, TopicDict};
use topicdraft_engine::{SubtopicPageEditor, TopicEditor};
use topicdraft_harness::{sample_page_editor, sample_topic_editor};

fn committable(editor: &TopicEditor) -> Value {
    serde_json::to_value(editor.committable_changes()).unwrap()
}

fn committable_page(editor: &SubtopicPageEditor) -> Value {
    serde_json::to_value(editor.committable_changes()).unwrap()
}

// ============================================================================
// Wire shape
// ============================================================================

#[test]
fn story_and_skill_removals_serialize_flat() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.remove_additional_story("story_2")?;
    editor.remove_canonical_story("story_1")?;
    editor.remove_uncategorized_skill("skill_1")?;
    assert_eq!(
        committable(&editor),
        json!([
            { "cmd": "delete_additional_story", "story_id": "story_2" },
            { "cmd": "delete_canonical_story", "story_id": "story_1" },
            { "cmd": "remove_uncategorized_skill_id", "uncategorized_skill_id": "skill_1" }
        ])
    );
    Ok(())
}

#[test]
fn topic_property_updates_carry_old_and_new_values() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.set_name("new unique value")?;
    assert_eq!(
        committable(&editor),
        json!([{
            "cmd": "update_topic_property",
            "property_name": "name",
            "new_value": "new unique value",
            "old_value": "Topic name"
        }])
    );
    Ok(())
}

#[test]
fn unset_optional_properties_serialize_null_old_values() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.set_abbreviated_name("new unique value")?;
    editor.set_practice_tab_is_displayed(true)?;
    assert_eq!(
        committable(&editor),
        json!([
            {
                "cmd": "update_topic_property",
                "property_name": "abbreviated_name",
                "new_value": "new unique value",
                "old_value": null
            },
            {
                "cmd": "update_topic_property",
                "property_name": "practice_tab_is_displayed",
                "new_value": true,
                "old_value": null
            }
        ])
    );
    Ok(())
}

#[test]
fn subtopic_property_updates_carry_the_subtopic_id() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.set_subtopic_title(1, "new unique value")?;
    editor.set_subtopic_url_fragment(1, "subtopic-url")?;
    assert_eq!(
        committable(&editor),
        json!([
            {
                "cmd": "update_subtopic_property",
                "subtopic_id": 1,
                "property_name": "title",
                "new_value": "new unique value",
                "old_value": "Title"
            },
            {
                "cmd": "update_subtopic_property",
                "subtopic_id": 1,
                "property_name": "url_fragment",
                "new_value": "subtopic-url",
                "old_value": null
            }
        ])
    );
    Ok(())
}

#[test]
fn structural_changes_serialize_flat() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.add_subtopic("Title2")?;
    editor.move_skill_to_subtopic(None, 1, "skill_1")?;
    editor.remove_skill_from_subtopic(1, "skill_2")?;
    assert_eq!(
        committable(&editor),
        json!([
            { "cmd": "add_subtopic", "subtopic_id": 2, "title": "Title2" },
            {
                "cmd": "move_skill_id_to_subtopic",
                "skill_id": "skill_1",
                "old_subtopic_id": null,
                "new_subtopic_id": 1
            },
            { "cmd": "remove_skill_id_from_subtopic", "subtopic_id": 1, "skill_id": "skill_2" }
        ])
    );
    Ok(())
}

#[test]
fn deleting_a_pre_existing_subtopic_emits_a_delete() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.delete_subtopic(1)?;
    assert_eq!(
        committable(&editor),
        json!([{ "cmd": "delete_subtopic", "subtopic_id": 1 }])
    );
    Ok(())
}

// ============================================================================
// Property collapse
// ============================================================================

#[test]
fn repeated_property_edits_collapse_to_one_record() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.set_name("first rename")?;
    editor.set_name("second rename")?;
    assert_eq!(
        committable(&editor),
        json!([{
            "cmd": "update_topic_property",
            "property_name": "name",
            "new_value": "second rename",
            "old_value": "Topic name"
        }])
    );
    Ok(())
}

#[test]
fn a_property_edited_back_to_its_original_value_vanishes()
-> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.set_name("temporary")?;
    editor.set_name("Topic name")?;
    assert_eq!(committable(&editor), json!([]));
    // The history itself is untouched, both edits stay undoable.
    assert_eq!(editor.change_count(), 2);
    Ok(())
}

#[test]
fn a_collapsed_record_sits_at_the_position_of_the_last_edit()
-> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.set_name("first rename")?;
    editor.remove_canonical_story("story_1")?;
    editor.set_name("second rename")?;
    let changes = committable(&editor);
    assert_eq!(changes[0]["cmd"], "delete_canonical_story");
    assert_eq!(changes[1]["property_name"], "name");
    Ok(())
}

#[test]
fn undone_changes_leave_the_committable_list() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.set_name("kept")?;
    editor.remove_canonical_story("story_1")?;
    editor.undo()?;
    assert_eq!(
        committable(&editor),
        json!([{
            "cmd": "update_topic_property",
            "property_name": "name",
            "new_value": "kept",
            "old_value": "Topic name"
        }])
    );
    Ok(())
}

#[test]
fn a_failed_precondition_leaves_the_committable_list_alone()
-> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.remove_uncategorized_skill("skill_1")?;
    assert!(editor.remove_uncategorized_skill("skill_3").is_err());
    assert_eq!(
        committable(&editor),
        json!([{
            "cmd": "remove_uncategorized_skill_id",
            "uncategorized_skill_id": "skill_1"
        }])
    );
    Ok(())
}

// ============================================================================
// Skill relocation chains
// ============================================================================

#[test]
fn a_move_chain_collapses_to_its_endpoints() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.add_subtopic("Title 2")?;
    editor.move_skill_to_subtopic(None, 1, "skill_1")?;
    editor.move_skill_to_subtopic(Some(1), 2, "skill_1")?;
    assert_eq!(
        committable(&editor),
        json!([
            { "cmd": "add_subtopic", "subtopic_id": 2, "title": "Title 2" },
            {
                "cmd": "move_skill_id_to_subtopic",
                "skill_id": "skill_1",
                "old_subtopic_id": null,
                "new_subtopic_id": 2
            }
        ])
    );
    Ok(())
}

#[test]
fn a_move_chain_that_returns_home_vanishes() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.add_subtopic("Title 2")?;
    editor.move_skill_to_subtopic(Some(1), 2, "skill_2")?;
    editor.move_skill_to_subtopic(Some(2), 1, "skill_2")?;
    editor.delete_subtopic(2)?;
    assert_eq!(committable(&editor), json!([]));
    Ok(())
}

// ============================================================================
// Subtopic deletion
// ============================================================================

#[test]
fn a_created_edited_and_deleted_subtopic_leaves_no_trace()
-> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.add_subtopic("Title 2")?;
    editor.set_subtopic_title(2, "Renamed")?;
    editor.move_skill_to_subtopic(None, 2, "skill_1")?;
    editor.remove_skill_from_subtopic(2, "skill_1")?;
    editor.delete_subtopic(2)?;
    assert_eq!(committable(&editor), json!([]));
    Ok(())
}

#[test]
fn deleting_a_created_subtopic_renumbers_later_references()
-> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.add_subtopic("Title 2")?;
    editor.add_subtopic("Title 3")?;
    editor.move_skill_to_subtopic(Some(1), 3, "skill_2")?;
    editor.delete_subtopic(2)?;
    assert_eq!(
        committable(&editor),
        json!([
            { "cmd": "add_subtopic", "subtopic_id": 2, "title": "Title 3" },
            {
                "cmd": "move_skill_id_to_subtopic",
                "skill_id": "skill_2",
                "old_subtopic_id": 1,
                "new_subtopic_id": 2
            }
        ])
    );
    Ok(())
}

#[test]
fn a_chained_move_through_deleted_subtopics_keeps_only_endpoints()
-> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.add_subtopic("Title 2")?;
    editor.add_subtopic("Title 3")?;
    editor.add_subtopic("Title 4")?;
    editor.move_skill_to_subtopic(Some(1), 3, "skill_2")?;
    editor.move_skill_to_subtopic(Some(3), 4, "skill_2")?;
    editor.delete_subtopic(2)?;
    assert_eq!(
        committable(&editor),
        json!([
            { "cmd": "add_subtopic", "subtopic_id": 2, "title": "Title 3" },
            { "cmd": "add_subtopic", "subtopic_id": 3, "title": "Title 4" },
            {
                "cmd": "move_skill_id_to_subtopic",
                "skill_id": "skill_2",
                "old_subtopic_id": 1,
                "new_subtopic_id": 3
            }
        ])
    );
    Ok(())
}

#[test]
fn a_skill_stranded_by_a_deleted_destination_becomes_a_removal()
-> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.add_subtopic("Title 2")?;
    editor.move_skill_to_subtopic(None, 2, "skill_1")?;
    editor.move_skill_to_subtopic(Some(1), 2, "skill_2")?;
    editor.delete_subtopic(2)?;
    assert_eq!(
        committable(&editor),
        json!([{
            "cmd": "remove_skill_id_from_subtopic",
            "subtopic_id": 1,
            "skill_id": "skill_2"
        }])
    );
    Ok(())
}

#[test]
fn deleting_a_pre_existing_subtopic_orders_before_rewritten_records()
-> Result<(), Box<dyn std::error::Error>> {
    let dict: TopicDict = serde_json::from_value(json!({
        "id": "t",
        "name": "n",
        "description": "d",
        "language_code": "en",
        "uncategorized_skill_ids": ["skill_a"],
        "subtopics": [
            { "id": 1, "title": "First" },
            { "id": 2, "title": "Second" }
        ],
        "next_subtopic_id": 3
    }))?;
    let skills: BTreeMap<String, String> = [("skill_a".to_string(), "A".to_string())].into();
    let mut editor = TopicEditor::new(Topic::from_backend(dict, &skills)?);

    editor.move_skill_to_subtopic(None, 1, "skill_a")?;
    editor.move_skill_to_subtopic(Some(1), 2, "skill_a")?;
    editor.delete_subtopic(1)?;

    // The delete replays first so the surviving move targets the renumbered
    // subtopic against a fresh snapshot.
    assert_eq!(
        committable(&editor),
        json!([
            { "cmd": "delete_subtopic", "subtopic_id": 1 },
            {
                "cmd": "move_skill_id_to_subtopic",
                "skill_id": "skill_a",
                "old_subtopic_id": null,
                "new_subtopic_id": 1
            }
        ])
    );
    Ok(())
}

#[test]
fn successive_deletes_of_pre_existing_subtopics() -> Result<(), Box<dyn std::error::Error>> {
    let dict: TopicDict = serde_json::from_value(json!({
        "id": "t",
        "name": "n",
        "description": "d",
        "language_code": "en",
        "subtopics": [
            { "id": 1, "title": "First" },
            { "id": 2, "title": "Second" },
            { "id": 3, "title": "Third" }
        ],
        "next_subtopic_id": 4
    }))?;
    let mut editor = TopicEditor::new(Topic::from_backend(dict, &BTreeMap::new())?);

    editor.delete_subtopic(3)?;
    editor.delete_subtopic(1)?;
    assert_eq!(
        committable(&editor),
        json!([
            { "cmd": "delete_subtopic", "subtopic_id": 1 },
            { "cmd": "delete_subtopic", "subtopic_id": 2 }
        ])
    );
    Ok(())
}

// ============================================================================
// Rearranges
// ============================================================================

#[test]
fn rearranges_never_reach_the_committable_list() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_topic_editor();
    editor.rearrange_canonical_story(1, 0)?;
    editor.rearrange_skill_in_subtopic(1, 0, 0)?;
    assert_eq!(editor.change_count(), 2);
    assert_eq!(committable(&editor), json!([]));
    Ok(())
}

// ============================================================================
// Subtopic pages
// ============================================================================

#[test]
fn page_content_updates_serialize_with_full_payloads() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_page_editor();
    editor.set_page_contents_html(SubtitledHtml::new("new content", "content"))?;
    assert_eq!(
        committable_page(&editor),
        json!([{
            "cmd": "update_subtopic_page_property",
            "subtopic_id": 1,
            "property_name": "page_contents_html",
            "new_value": { "html": "new content", "content_id": "content" },
            "old_value": { "html": "test content", "content_id": "content" }
        }])
    );
    Ok(())
}

#[test]
fn repeated_page_edits_collapse_per_property() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_page_editor();
    editor.set_page_contents_html(SubtitledHtml::new("draft one", "content"))?;
    editor.set_page_contents_audio(RecordedVoiceovers::default())?;
    editor.set_page_contents_html(SubtitledHtml::new("draft two", "content"))?;

    let changes = committable_page(&editor);
    assert_eq!(changes.as_array().map(Vec::len), Some(2));
    assert_eq!(changes[0]["property_name"], "page_contents_audio");
    assert_eq!(changes[1]["property_name"], "page_contents_html");
    assert_eq!(changes[1]["new_value"]["html"], "draft two");
    assert_eq!(changes[1]["old_value"]["html"], "test content");
    Ok(())
}

#[test]
fn a_page_edited_back_to_its_original_contents_vanishes()
-> Result<(), Box<dyn std::error::Error>> {
    let mut editor = sample_page_editor();
    let original = editor.page().page_contents.subtitled_html.clone();
    editor.set_page_contents_html(SubtitledHtml::new("temporary", "content"))?;
    editor.set_page_contents_html(original)?;
    assert_eq!(committable_page(&editor), json!([]));
    assert_eq!(editor.change_count(), 2);
    Ok(())
}
