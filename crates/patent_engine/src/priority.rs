use crate::select::FieldRecord;

/// One priority rule: an attribute name bound to the set of values it
/// must take for a record to win this tier.
///
/// Tiers carry no explicit rank; their position in the request's tier
/// list is the rank, lowest position = highest precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTier {
    attribute: String,
    accepted: Vec<String>,
}

impl PriorityTier {
    pub fn new<A, I, V>(attribute: A, accepted: I) -> Self
    where
        A: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            attribute: attribute.into(),
            accepted: accepted.into_iter().map(Into::into).collect(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    fn accepts(&self, value: &str) -> bool {
        self.accepted.iter().any(|v| v == value)
    }
}

/// Resolve a record's priority against an ordered tier list.
///
/// First match wins: tiers are walked in list order and the position of
/// the first tier whose attribute value is accepted becomes the
/// priority. `None` means no tier matched; callers must sort it after
/// every defined tier.
pub fn assign_priority(record: &FieldRecord, tiers: &[PriorityTier]) -> Option<usize> {
    tiers.iter().position(|tier| {
        record
            .get(tier.attribute())
            .is_some_and(|value| tier.accepts(value))
    })
}

/// The standard patent-office precedence: EPO-format records first,
/// then records loaded straight from a patent office.
pub fn default_tiers() -> Vec<PriorityTier> {
    vec![
        PriorityTier::new("format", ["epo"]),
        PriorityTier::new("load-source", ["patent-office"]),
    ]
}
