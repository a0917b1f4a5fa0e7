use chrono::NaiveDateTime;
use hashbrown::HashMap;
use polarix_error::PolarixResult;

/// The value of a named statement attribute: either an entity label or an
/// integer category (booleans are categories 0/1).
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Entity(String),
    Category(i64),
}

/// The declared type of a statement variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeType {
    ShortText,
    Integer,
    Boolean,
}

/// One coded statement: a timestamp plus named attribute values. Statements
/// are immutable once built; the slicing machinery clones them into buckets.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    time: NaiveDateTime,
    attributes: HashMap<String, AttributeValue>,
}

impl Statement {
    pub fn new(time: NaiveDateTime) -> Self {
        Statement {
            time,
            attributes: HashMap::new(),
        }
    }

    pub fn with_entity(mut self, name: impl Into<String>, label: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into(), AttributeValue::Entity(label.into()));
        self
    }

    pub fn with_category(mut self, name: impl Into<String>, value: i64) -> Self {
        self.attributes
            .insert(name.into(), AttributeValue::Category(value));
        self
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub fn value(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn entity(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name) {
            Some(AttributeValue::Entity(label)) => Some(label),
            _ => None,
        }
    }

    pub fn category(&self, name: &str) -> Option<i64> {
        match self.attributes.get(name) {
            Some(AttributeValue::Category(value)) => Some(*value),
            _ => None,
        }
    }

    /// The attribute rendered as a label: entity labels as-is, categories
    /// stringified.
    pub fn label(&self, name: &str) -> Option<String> {
        match self.attributes.get(name) {
            Some(AttributeValue::Entity(label)) => Some(label.clone()),
            Some(AttributeValue::Category(value)) => Some(value.to_string()),
            None => None,
        }
    }
}

/// The storage-side collaborator feeding the engine.
///
/// Implementations load statements from wherever they live, apply the host's
/// filters, and answer questions about variable metadata. The engine only
/// relies on `load_and_filter` being sorted ascending by timestamp.
pub trait StatementSource: Send + Sync {
    /// The filtered statement stream, sorted ascending by timestamp.
    fn load_and_filter(&self) -> PolarixResult<Vec<Statement>>;

    /// The ordered unique labels a variable takes over the given statements.
    /// `document_level` distinguishes document metadata from statement-level
    /// variables when both carry the same name.
    fn extract_labels(
        &self,
        statements: &[Statement],
        variable: &str,
        document_level: bool,
    ) -> Vec<String>;

    /// The declared type of a variable.
    fn data_type(&self, variable: &str) -> AttributeType;

    /// The unfiltered statements, used only to widen integer qualifier
    /// ranges so sparse levels still get buckets.
    fn original_statements(&self) -> &[Statement];
}
