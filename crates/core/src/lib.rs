pub mod change;
pub mod commit;
pub mod error;
pub mod page;
pub mod topic;

pub use change::{SubtopicPageChange, SubtopicPropertyUpdate, TopicChange, TopicPropertyUpdate};
pub use commit::{
    CommittableChange, SubtopicPagePropertyName, SubtopicPropertyName, TopicPropertyName,
};
pub use error::CoreError;
pub use page::{PageContents, RecordedVoiceovers, SubtitledHtml, SubtopicPage, Voiceover};
pub use topic::{SkillSummary, StoryReference, Subtopic, SubtopicId, Topic};
