use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("invalid path expression `{path}`: {message}")]
    InvalidPath { path: String, message: String },
}

/// One matched element flattened to a name→value map: its attributes
/// plus the trimmed text of each direct child element. Absent fields
/// are simply missing from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRecord {
    fields: BTreeMap<String, String>,
}

impl FieldRecord {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Anything that can resolve a path expression to a set of flattened
/// element records. The production implementation is [`DocumentIndex`];
/// tests substitute fixed record sets.
pub trait ElementSource {
    fn select(&self, path: &str) -> Result<Vec<FieldRecord>, SelectError>;
}

/// A parsed document ready for repeated path selection.
///
/// Path expressions are CSS selector strings, e.g. `document-id` or
/// `document-id[format="epo"]`.
pub struct DocumentIndex {
    doc: Html,
}

impl DocumentIndex {
    /// Parse well-formed markup. Input is expected to have gone through
    /// [`crate::repair`] first; the parser itself is lenient and will
    /// not fail, but unrepaired input can silently lose fields.
    pub fn parse(markup: &str) -> Self {
        Self {
            doc: Html::parse_document(markup),
        }
    }
}

impl ElementSource for DocumentIndex {
    fn select(&self, path: &str) -> Result<Vec<FieldRecord>, SelectError> {
        let selector = Selector::parse(path).map_err(|e| SelectError::InvalidPath {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.doc.select(&selector).map(flatten_element).collect())
    }
}

fn flatten_element(element: ElementRef<'_>) -> FieldRecord {
    let mut fields = BTreeMap::new();
    for (name, value) in element.value().attrs() {
        fields.insert(name.to_string(), value.to_string());
    }
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name().to_string();
            let text = child_el.text().collect::<String>().trim().to_string();
            // Attributes win over same-named children; first child wins
            // over later duplicates.
            fields.entry(name).or_insert(text);
        }
    }
    FieldRecord { fields }
}

#[cfg(test)]
mod tests {
    use super::{DocumentIndex, ElementSource, SelectError};

    #[test]
    fn flattens_attributes_and_child_text() {
        let index = DocumentIndex::parse(
            "<root><document-id format=\"epo\"><doc-number> 123 </doc-number></document-id></root>",
        );
        let records = index.select("document-id").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("format"), Some("epo"));
        assert_eq!(records[0].get("doc-number"), Some("123"));
        assert_eq!(records[0].get("kind"), None);
    }

    #[test]
    fn attribute_predicate_narrows_selection() {
        let index = DocumentIndex::parse(
            "<root>\
             <document-id format=\"epo\"><doc-number>1</doc-number></document-id>\
             <document-id format=\"original\"><doc-number>2</doc-number></document-id>\
             </root>",
        );
        let records = index.select("document-id[format=\"epo\"]").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("doc-number"), Some("1"));
    }

    #[test]
    fn bad_selector_is_reported() {
        let index = DocumentIndex::parse("<root/>");
        let err = index.select("document-id[").unwrap_err();
        assert!(matches!(err, SelectError::InvalidPath { .. }));
    }
}
