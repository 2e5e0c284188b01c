//! # Field Descriptors
//!
//! The single description of every record in a COCO dataset document.
//!
//! The structural schema generator and the model binder both iterate these
//! tables. The split of responsibility is:
//!
//! - **structure**: which keys must be present and their JSON primitive type;
//! - **binding**: value semantics (integer range, timestamp syntax,
//!   segmentation shape, bbox arity, string-valued maps, alias conflicts).
//!
//! Adding a field here changes both layers at once.

use serde_json::Value;

/// Whether a field must be present.
///
/// `Optional` fields may be absent or JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// The value type of a field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Whole number representable as `i64`.
    Integer,
    /// Any JSON number, bound as `f64`.
    Number,
    String,
    /// A capture time; see [`crate::CaptureTime`].
    Timestamp,
    /// Object whose values are all strings.
    StringMap,
    /// Array of numbers, optionally of a fixed length.
    NumberArray { len: Option<usize> },
    /// Polygon list or run-length mapping; see [`crate::Segmentation`].
    Segmentation,
    /// Array of nested records.
    Records(&'static RecordSpec),
}

impl FieldKind {
    /// Human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Integer => "integer".to_string(),
            Self::Number => "number".to_string(),
            Self::String => "string".to_string(),
            Self::Timestamp => "timestamp (ISO-8601 string or Unix time)".to_string(),
            Self::StringMap => "object of strings".to_string(),
            Self::NumberArray { len: Some(n) } => format!("array of {n} numbers"),
            Self::NumberArray { len: None } => "array of numbers".to_string(),
            Self::Segmentation => "polygon list or run-length mapping".to_string(),
            Self::Records(spec) => format!("array of {} objects", spec.name),
        }
    }
}

/// One field of a record.
#[derive(Debug)]
pub struct FieldSpec {
    /// Canonical key.
    pub name: &'static str,
    /// Alternative keys accepted in place of `name`. At most one of the
    /// canonical key and its aliases may appear in a record.
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            aliases: &[],
            kind,
            presence: Presence::Required,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            aliases: &[],
            kind,
            presence: Presence::Optional,
        }
    }

    const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// The canonical key followed by every alias.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// A record type: a JSON object with a fixed set of known fields.
///
/// Unknown keys are always permitted.
#[derive(Debug)]
pub struct RecordSpec {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordSpec {
    /// Look up a field by canonical key or alias.
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.keys().any(|k| k == key))
    }
}

pub static LICENSE: RecordSpec = RecordSpec {
    name: "license",
    fields: &[
        FieldSpec::required("id", FieldKind::Integer),
        FieldSpec::required("name", FieldKind::String),
        FieldSpec::optional("url", FieldKind::String),
    ],
};

pub static IMAGE: RecordSpec = RecordSpec {
    name: "image",
    fields: &[
        FieldSpec::required("id", FieldKind::Integer),
        FieldSpec::optional("license", FieldKind::Integer),
        FieldSpec::required("file_name", FieldKind::String),
        FieldSpec::required("coco_url", FieldKind::String),
        FieldSpec::required("height", FieldKind::Integer),
        FieldSpec::required("width", FieldKind::Integer),
        FieldSpec::required("date_captured", FieldKind::Timestamp),
        FieldSpec::optional("flickr_url", FieldKind::String),
    ],
};

pub static ANNOTATION: RecordSpec = RecordSpec {
    name: "annotation",
    fields: &[
        FieldSpec::required("id", FieldKind::Integer),
        FieldSpec::required("image_id", FieldKind::Integer),
        FieldSpec::required("category_id", FieldKind::Integer),
        FieldSpec::optional("area", FieldKind::Number),
        FieldSpec::optional("iscrowd", FieldKind::Integer).with_aliases(&["idcrowd"]),
        FieldSpec::required("segmentation", FieldKind::Segmentation),
        FieldSpec::optional("bbox", FieldKind::NumberArray { len: Some(4) }),
    ],
};

pub static CATEGORY: RecordSpec = RecordSpec {
    name: "category",
    fields: &[
        FieldSpec::required("id", FieldKind::Integer),
        FieldSpec::required("name", FieldKind::String),
        FieldSpec::optional("supercategory", FieldKind::String),
    ],
};

pub static DATASET: RecordSpec = RecordSpec {
    name: "dataset",
    fields: &[
        FieldSpec::required("info", FieldKind::StringMap),
        FieldSpec::optional("licenses", FieldKind::Records(&LICENSE)).with_aliases(&["licences"]),
        FieldSpec::required("images", FieldKind::Records(&IMAGE)),
        FieldSpec::required("annotations", FieldKind::Records(&ANNOTATION)),
        FieldSpec::required("categories", FieldKind::Records(&CATEGORY)),
    ],
};

/// JSON type name of a value, as used in error messages.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Append one reference token to a JSON pointer, escaping `~` and `/`.
pub fn pointer_push(pointer: &str, token: &str) -> String {
    let escaped = token.replace('~', "~0").replace('/', "~1");
    format!("{pointer}/{escaped}")
}
