use serde::Serialize;

/// Storage type of a single record field, with its width where one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Character data bounded by `max_length` characters
    Text { max_length: usize },
    /// Calendar date stored as `YYYY-MM-DD`
    Date,
    /// 32-bit signed integer
    Integer,
    /// Absolute URL bounded by `max_length` characters
    Url { max_length: usize },
}

impl FieldKind {
    /// Maximum number of characters the field may hold, if bounded
    pub const fn max_length(&self) -> Option<usize> {
        match self {
            FieldKind::Text { max_length } | FieldKind::Url { max_length } => Some(*max_length),
            FieldKind::Date | FieldKind::Integer => None,
        }
    }
}

/// A named field of a record definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn text(name: &'static str, max_length: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Text { max_length },
        }
    }

    pub const fn date(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Date,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
        }
    }

    pub const fn url(name: &'static str, max_length: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Url { max_length },
        }
    }
}

/// Declared shape of a persisted entity.
///
/// Modules hand these to the store at startup; every listed field is
/// mandatory and no other fields are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordSchema {
    pub table: &'static str,
    pub fields: &'static [FieldDef],
}

impl RecordSchema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }
}
