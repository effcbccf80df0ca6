//! Patent document engine: markup repair and prioritized field extraction.
mod extract;
mod pipeline;
mod priority;
mod repair;
mod select;

pub use extract::{
    extract, require_non_empty, ExtractError, ExtractionRequest, ProjectionTable, ResultProjection,
};
pub use pipeline::PatentExtractor;
pub use priority::{assign_priority, default_tiers, PriorityTier};
pub use repair::repair;
pub use select::{DocumentIndex, ElementSource, FieldRecord, SelectError};
