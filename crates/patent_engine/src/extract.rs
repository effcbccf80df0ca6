use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use log::debug;
use thiserror::Error;

use crate::priority::{assign_priority, default_tiers, PriorityTier};
use crate::select::{ElementSource, SelectError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error("at least one target field is required")]
    NoTargetFields,
    #[error("field `{field}` does not exist on any element matched by the path expression")]
    SchemaMismatch { field: String },
    #[error("path expression matched no elements")]
    EmptySelection,
}

/// What to extract: a path expression selecting the elements, the
/// target fields to project, and the ordered priority tiers deciding
/// which elements come first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub path: String,
    pub fields: Vec<String>,
    pub tiers: Vec<PriorityTier>,
}

impl Default for ExtractionRequest {
    /// Document identifiers under the standard patent-office precedence.
    fn default() -> Self {
        Self {
            path: "document-id".to_string(),
            fields: vec!["doc-number".to_string()],
            tiers: default_tiers(),
        }
    }
}

/// A flat value list (single target field, deduplicated) or a row table
/// (several target fields, duplicates preserved), already in priority
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultProjection {
    Values(Vec<String>),
    Table(ProjectionTable),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultProjection {
    pub fn len(&self) -> usize {
        match self {
            ResultProjection::Values(values) => values.len(),
            ResultProjection::Table(table) => table.rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One row per matched element, alive only for the duration of a call.
struct CandidateRecord {
    priority: Option<usize>,
    values: Vec<String>,
}

/// Sort behavior of one projected column, inferred once per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Numeric,
    Text,
}

/// Select elements and project the requested fields in priority order.
///
/// Fails up front with [`ExtractError::SchemaMismatch`] when a target
/// field or tier attribute exists on none of the matched elements; a
/// field merely absent on some rows projects as an empty string there.
/// An empty selection is not an error and yields an empty projection.
pub fn extract<S>(source: &S, request: &ExtractionRequest) -> Result<ResultProjection, ExtractError>
where
    S: ElementSource + ?Sized,
{
    if request.fields.is_empty() {
        return Err(ExtractError::NoTargetFields);
    }

    let matched = source.select(&request.path)?;
    debug!(
        "path `{}` matched {} element(s)",
        request.path,
        matched.len()
    );
    if matched.is_empty() {
        return Ok(empty_projection(request));
    }

    // The schema is the union of field names across all matches, the
    // same shape a tabular import of the elements would have.
    let schema: BTreeSet<&str> = matched.iter().flat_map(|r| r.field_names()).collect();
    let required = request
        .fields
        .iter()
        .map(String::as_str)
        .chain(request.tiers.iter().map(PriorityTier::attribute));
    for field in required {
        if !schema.contains(field) {
            return Err(ExtractError::SchemaMismatch {
                field: field.to_string(),
            });
        }
    }

    let mut candidates: Vec<CandidateRecord> = matched
        .iter()
        .map(|record| CandidateRecord {
            priority: assign_priority(record, &request.tiers),
            values: request
                .fields
                .iter()
                .map(|field| record.get(field).unwrap_or_default().to_string())
                .collect(),
        })
        .collect();

    let kinds = infer_field_kinds(&candidates, request.fields.len());
    candidates.sort_by(|a, b| {
        // Unmatched tiers sort after every defined tier.
        let pa = a.priority.unwrap_or(usize::MAX);
        let pb = b.priority.unwrap_or(usize::MAX);
        pa.cmp(&pb)
            .then_with(|| compare_values(&a.values, &b.values, &kinds))
    });

    if request.fields.len() == 1 {
        let mut seen = HashSet::new();
        let mut values = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let value = candidate.values.into_iter().next().unwrap_or_default();
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
        Ok(ResultProjection::Values(values))
    } else {
        Ok(ResultProjection::Table(ProjectionTable {
            columns: request.fields.clone(),
            rows: candidates.into_iter().map(|c| c.values).collect(),
        }))
    }
}

/// Strictness layer over the default empty-is-ok policy.
pub fn require_non_empty(projection: ResultProjection) -> Result<ResultProjection, ExtractError> {
    if projection.is_empty() {
        Err(ExtractError::EmptySelection)
    } else {
        Ok(projection)
    }
}

fn empty_projection(request: &ExtractionRequest) -> ResultProjection {
    if request.fields.len() == 1 {
        ResultProjection::Values(Vec::new())
    } else {
        ResultProjection::Table(ProjectionTable {
            columns: request.fields.clone(),
            rows: Vec::new(),
        })
    }
}

/// A column is numeric iff it has at least one non-empty value and
/// every non-empty value parses as a number. Inferred once here, never
/// re-derived inside the comparator.
fn infer_field_kinds(candidates: &[CandidateRecord], field_count: usize) -> Vec<FieldKind> {
    (0..field_count)
        .map(|col| {
            let mut saw_value = false;
            for candidate in candidates {
                let value = &candidate.values[col];
                if value.is_empty() {
                    continue;
                }
                saw_value = true;
                if value.parse::<f64>().is_err() {
                    return FieldKind::Text;
                }
            }
            if saw_value {
                FieldKind::Numeric
            } else {
                FieldKind::Text
            }
        })
        .collect()
}

fn compare_values(a: &[String], b: &[String], kinds: &[FieldKind]) -> Ordering {
    for ((va, vb), kind) in a.iter().zip(b).zip(kinds) {
        let ord = match kind {
            FieldKind::Numeric => match (parse_numeric(va), parse_numeric(vb)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                // Empty values sort before any number.
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            FieldKind::Text => va.cmp(vb),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn parse_numeric(value: &str) -> Option<f64> {
    if value.is_empty() {
        None
    } else {
        value.parse().ok()
    }
}
