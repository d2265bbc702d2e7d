use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CoreError;

/// Dense integer id assigned to subtopics from the topic's counter.
/// Ids start at 1 and stay contiguous: deleting a subtopic decrements
/// every higher id by one.
pub type SubtopicId = i32;

/// Referential handle on a skill: removing it from a topic never
/// destroys the skill itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub id: String,
    pub description: String,
}

impl SkillSummary {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryReference {
    pub story_id: String,
    pub story_is_published: bool,
}

impl StoryReference {
    pub fn new(story_id: impl Into<String>, story_is_published: bool) -> Self {
        Self {
            story_id: story_id.into(),
            story_is_published,
        }
    }
}

// ============================================================================
// Backend-shaped snapshots
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtopicDict {
    pub id: SubtopicId,
    pub title: String,
    #[serde(default)]
    pub skill_ids: Vec<String>,
    #[serde(default)]
    pub url_fragment: Option<String>,
    #[serde(default)]
    pub thumbnail_filename: Option<String>,
    #[serde(default)]
    pub thumbnail_bg_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDict {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub version: u32,
    pub language_code: String,
    #[serde(default)]
    pub abbreviated_name: Option<String>,
    #[serde(default)]
    pub meta_tag_content: Option<String>,
    #[serde(default)]
    pub practice_tab_is_displayed: Option<bool>,
    #[serde(default)]
    pub url_fragment: Option<String>,
    #[serde(default)]
    pub thumbnail_filename: Option<String>,
    #[serde(default)]
    pub thumbnail_bg_color: Option<String>,
    #[serde(default)]
    pub uncategorized_skill_ids: Vec<String>,
    #[serde(default)]
    pub canonical_story_references: Vec<StoryReference>,
    #[serde(default)]
    pub additional_story_references: Vec<StoryReference>,
    #[serde(default)]
    pub subtopics: Vec<SubtopicDict>,
    pub next_subtopic_id: SubtopicId,
}

// ============================================================================
// Domain objects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    pub id: SubtopicId,
    pub title: String,
    pub url_fragment: Option<String>,
    pub thumbnail_filename: Option<String>,
    pub thumbnail_bg_color: Option<String>,
    pub skill_summaries: Vec<SkillSummary>,
    /// True only for subtopics created by the current edit session.
    /// Drives delete reversibility and compactor cancellation.
    #[serde(skip)]
    pub created_this_session: bool,
}

impl Subtopic {
    /// A fresh subtopic created mid-session.
    pub fn new(id: SubtopicId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url_fragment: None,
            thumbnail_filename: None,
            thumbnail_bg_color: None,
            skill_summaries: Vec::new(),
            created_this_session: true,
        }
    }

    pub fn skill_ids(&self) -> Vec<&str> {
        self.skill_summaries.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn skill_position(&self, skill_id: &str) -> Option<usize> {
        self.skill_summaries.iter().position(|s| s.id == skill_id)
    }
}

/// The in-memory document: a topic plus its ordered subtopics, story
/// references, and uncategorized skills. Constructed once from a backend
/// snapshot and mutated in place for the life of an edit session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: u32,
    pub language_code: String,
    pub abbreviated_name: Option<String>,
    pub meta_tag_content: Option<String>,
    pub practice_tab_is_displayed: Option<bool>,
    pub url_fragment: Option<String>,
    pub thumbnail_filename: Option<String>,
    pub thumbnail_bg_color: Option<String>,
    pub canonical_story_references: Vec<StoryReference>,
    pub additional_story_references: Vec<StoryReference>,
    pub uncategorized_skill_summaries: Vec<SkillSummary>,
    pub subtopics: Vec<Subtopic>,
    pub next_subtopic_id: SubtopicId,
}

impl Topic {
    /// Build a topic from a backend snapshot plus the skill-id lookup that
    /// resolves display descriptions.
    pub fn from_backend(
        dict: TopicDict,
        skill_id_to_description: &BTreeMap<String, String>,
    ) -> Result<Self, CoreError> {
        let describe = |skill_id: &str| -> Result<SkillSummary, CoreError> {
            let description = skill_id_to_description.get(skill_id).ok_or_else(|| {
                CoreError::InvalidData(format!("no description for skill id {skill_id}"))
            })?;
            Ok(SkillSummary::new(skill_id, description.clone()))
        };

        let uncategorized_skill_summaries = dict
            .uncategorized_skill_ids
            .iter()
            .map(|id| describe(id))
            .collect::<Result<Vec<_>, _>>()?;

        let subtopics = dict
            .subtopics
            .into_iter()
            .map(|sub| {
                let skill_summaries = sub
                    .skill_ids
                    .iter()
                    .map(|id| describe(id))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Subtopic {
                    id: sub.id,
                    title: sub.title,
                    url_fragment: sub.url_fragment,
                    thumbnail_filename: sub.thumbnail_filename,
                    thumbnail_bg_color: sub.thumbnail_bg_color,
                    skill_summaries,
                    created_this_session: false,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        Ok(Self {
            id: dict.id,
            name: dict.name,
            description: dict.description,
            version: dict.version,
            language_code: dict.language_code,
            abbreviated_name: dict.abbreviated_name,
            meta_tag_content: dict.meta_tag_content,
            practice_tab_is_displayed: dict.practice_tab_is_displayed,
            url_fragment: dict.url_fragment,
            thumbnail_filename: dict.thumbnail_filename,
            thumbnail_bg_color: dict.thumbnail_bg_color,
            canonical_story_references: dict.canonical_story_references,
            additional_story_references: dict.additional_story_references,
            uncategorized_skill_summaries,
            subtopics,
            next_subtopic_id: dict.next_subtopic_id,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn subtopic(&self, id: SubtopicId) -> Option<&Subtopic> {
        self.subtopics.iter().find(|s| s.id == id)
    }

    pub fn subtopic_mut(&mut self, id: SubtopicId) -> Option<&mut Subtopic> {
        self.subtopics.iter_mut().find(|s| s.id == id)
    }

    pub fn subtopic_position(&self, id: SubtopicId) -> Option<usize> {
        self.subtopics.iter().position(|s| s.id == id)
    }

    pub fn canonical_story_ids(&self) -> Vec<&str> {
        self.canonical_story_references
            .iter()
            .map(|r| r.story_id.as_str())
            .collect()
    }

    pub fn additional_story_ids(&self) -> Vec<&str> {
        self.additional_story_references
            .iter()
            .map(|r| r.story_id.as_str())
            .collect()
    }

    pub fn uncategorized_skill_position(&self, skill_id: &str) -> Option<usize> {
        self.uncategorized_skill_summaries
            .iter()
            .position(|s| s.id == skill_id)
    }

    // ========================================================================
    // Mutation primitives
    //
    // These do not validate preconditions; the engine's mutation facade does
    // that before a change record is constructed, and the applier calls
    // these to execute recorded changes.
    // ========================================================================

    /// Append a session-created subtopic and advance the id counter.
    pub fn add_subtopic(&mut self, id: SubtopicId, title: &str) {
        self.subtopics.push(Subtopic::new(id, title));
        self.next_subtopic_id = id + 1;
    }

    /// Remove the subtopic added last by `add_subtopic`. Returns false when
    /// no subtopic carries the given id.
    pub fn remove_added_subtopic(&mut self, id: SubtopicId) -> bool {
        match self.subtopic_position(id) {
            Some(position) => {
                self.subtopics.remove(position);
                self.next_subtopic_id = id;
                true
            }
            None => false,
        }
    }

    /// Delete a subtopic: its skills return to the uncategorized list (in
    /// order, appended), every higher subtopic id decrements by one, and the
    /// id counter decrements to keep ids dense. Returns false when the id
    /// does not resolve.
    pub fn delete_subtopic(&mut self, id: SubtopicId) -> bool {
        let Some(position) = self.subtopic_position(id) else {
            return false;
        };
        let removed = self.subtopics.remove(position);
        self.uncategorized_skill_summaries
            .extend(removed.skill_summaries);
        for subtopic in &mut self.subtopics {
            if subtopic.id > id {
                subtopic.id -= 1;
            }
        }
        self.next_subtopic_id -= 1;
        true
    }

    /// Exact inverse of `delete_subtopic` for a recorded snapshot: takes the
    /// subtopic's skills back off the uncategorized list, re-increments the
    /// renumbered ids, and reinserts the snapshot at its old position.
    pub fn restore_subtopic(&mut self, subtopic: Subtopic, position: usize) -> bool {
        if position > self.subtopics.len() {
            return false;
        }
        for skill in &subtopic.skill_summaries {
            if let Some(at) = self
                .uncategorized_skill_summaries
                .iter()
                .rposition(|s| s.id == skill.id)
            {
                self.uncategorized_skill_summaries.remove(at);
            }
        }
        for existing in &mut self.subtopics {
            if existing.id >= subtopic.id {
                existing.id += 1;
            }
        }
        self.next_subtopic_id += 1;
        self.subtopics.insert(position, subtopic);
        true
    }

    /// Take a skill out of its container (`None` = uncategorized) at a known
    /// position.
    pub fn take_skill(
        &mut self,
        from: Option<SubtopicId>,
        position: usize,
    ) -> Option<SkillSummary> {
        let list = match from {
            None => &mut self.uncategorized_skill_summaries,
            Some(id) => &mut self.subtopic_mut(id)?.skill_summaries,
        };
        if position < list.len() {
            Some(list.remove(position))
        } else {
            None
        }
    }

    /// Put a skill into a container, at a position or appended.
    pub fn put_skill(
        &mut self,
        to: Option<SubtopicId>,
        position: Option<usize>,
        skill: SkillSummary,
    ) -> bool {
        let list = match to {
            None => &mut self.uncategorized_skill_summaries,
            Some(id) => match self.subtopic_mut(id) {
                Some(subtopic) => &mut subtopic.skill_summaries,
                None => return false,
            },
        };
        match position {
            Some(at) if at <= list.len() => list.insert(at, skill),
            Some(_) => return false,
            None => list.push(skill),
        }
        true
    }
}

/// Move one element of a list from one index to another, shifting the
/// elements in between. Both indices are positions in the list's current
/// order; the inverse of `rearrange(from, to)` is `rearrange(to, from)`.
pub fn rearrange<T>(list: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= list.len() || to >= list.len() {
        return false;
    }
    let item = list.remove(from);
    list.insert(to, item);
    true
}
