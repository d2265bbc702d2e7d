use thiserror::Error;
use topicdraft_core::SubtopicId;

/// Failure applying or reverting a single recorded change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeError {
    /// Reverting would need state the session never captured.
    #[error("{0}")]
    Irreversible(&'static str),

    /// The record no longer matches the document it was made against.
    #[error("change target is stale: {0}")]
    StaleTarget(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("there are no changes to undo")]
    NothingToUndo,

    #[error("there are no changes to redo")]
    NothingToRedo,

    #[error(transparent)]
    Change(#[from] ChangeError),
}

/// Precondition failures surfaced by the editor facades. The display
/// strings are the messages callers show to users, so they stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Given story id not present in canonical story ids.")]
    CanonicalStoryNotPresent { story_id: String },

    #[error("Given story id not present in additional story ids.")]
    AdditionalStoryNotPresent { story_id: String },

    #[error("Given skillId is not an uncategorized skill.")]
    NotUncategorizedSkill { skill_id: String },

    #[error("Subtopic doesn't exist")]
    SubtopicNotFound { subtopic_id: SubtopicId },

    #[error("The given skill doesn't exist in the subtopic")]
    SkillNotInSubtopic {
        subtopic_id: SubtopicId,
        skill_id: String,
    },

    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Change(#[from] ChangeError),
}
