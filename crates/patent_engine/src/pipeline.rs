use crate::extract::{extract, ExtractError, ExtractionRequest, ResultProjection};
use crate::repair::repair;
use crate::select::DocumentIndex;

/// Repairs and parses a raw patent document once, then serves any
/// number of extraction requests against the cached parse.
pub struct PatentExtractor {
    index: DocumentIndex,
}

impl PatentExtractor {
    /// Accepts arbitrarily malformed input; repair is total, so
    /// construction never fails.
    pub fn new(raw: &str) -> Self {
        let repaired = repair(raw);
        Self {
            index: DocumentIndex::parse(&repaired),
        }
    }

    pub fn extract(&self, request: &ExtractionRequest) -> Result<ResultProjection, ExtractError> {
        extract(&self.index, request)
    }
}
