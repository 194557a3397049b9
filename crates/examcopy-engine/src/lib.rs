pub mod media;
pub mod model;
pub mod parsing;

// Re-export key types for easier usage
pub use media::{
    Keyspace, MediaError, MediaKind, MediaPayload, MediaRegistry, MediaResolver, SlotKey,
    populate_registry,
};
pub use model::{ContentBlock, ExamDocument, GeneratedExam};
pub use parsing::{InlineFragment, parse_content, split_math};
