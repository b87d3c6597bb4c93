//! Field table and value converter.
//!
//! Every patchable field of every entity is one [`FieldSpec`] row. The
//! converter turns a raw string into the [`FieldValue`] the store writes; it is
//! pure, so the same `(field, raw)` always yields the same result.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{CoreError, CoreResult};
use crate::status::{NamedEnum, Priority, ProjectStatus, TaskStatus};
use crate::types::{Date, EntityId, Timestamp};

/// Wire pattern for pure dates (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire pattern for timestamps (`yyyy-MM-dd'T'HH:mm:ss`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/* --------------------------------------------------------------------------
Field table
-------------------------------------------------------------------------- */

/// Typed representation a field's raw value converts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Timestamp,
    ProjectStatus,
    TaskStatus,
    Priority,
    /// Id of an existing task.
    TaskRef,
}

impl FieldKind {
    pub fn is_status(self) -> bool {
        matches!(self, FieldKind::ProjectStatus | FieldKind::TaskStatus)
    }
}

/// One row of an entity's mutable-field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name as it appears in a patch path (`/deadLine` -> `deadLine`).
    pub name: &'static str,
    /// Storage column the value is written to.
    pub column: &'static str,
    pub kind: FieldKind,
    /// A patch on this field must carry a value.
    pub value_required: bool,
    /// Text values must contain a non-whitespace character.
    pub non_blank: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column,
            kind,
            value_required: true,
            non_blank: false,
        }
    }

    const fn optional(mut self) -> Self {
        self.value_required = false;
        self
    }

    const fn non_blank(mut self) -> Self {
        self.non_blank = true;
        self
    }
}

pub const PROJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "name", FieldKind::Text).non_blank(),
    FieldSpec::new("description", "description", FieldKind::Text).optional(),
    FieldSpec::new("deadLine", "dead_line", FieldKind::Date),
    FieldSpec::new("status", "status", FieldKind::ProjectStatus),
];

pub const TASK_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("currentTime", "current_at", FieldKind::Timestamp),
    FieldSpec::new("priority", "priority", FieldKind::Priority),
    FieldSpec::new("status", "status", FieldKind::TaskStatus),
];

pub const SESSION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("startTime", "start_time", FieldKind::Timestamp),
    FieldSpec::new("endTime", "end_time", FieldKind::Timestamp),
];

pub const USER_FIELDS: &[FieldSpec] =
    &[FieldSpec::new("selectedTask", "selected_task", FieldKind::TaskRef).non_blank()];

/// Find a field by its patch name. `id` is never part of any table.
pub fn lookup(fields: &'static [FieldSpec], name: &str) -> Option<&'static FieldSpec> {
    fields.iter().find(|f| f.name == name)
}

/// Find a field that must exist in the given table.
///
/// Used by code paths that write a known field directly (e.g. the dedicated
/// task-status setter), not by client patches.
pub fn field(fields: &'static [FieldSpec], name: &str) -> CoreResult<&'static FieldSpec> {
    lookup(fields, name)
        .ok_or_else(|| CoreError::Internal(format!("Field '{name}' is not in the field table")))
}

/* --------------------------------------------------------------------------
Values
-------------------------------------------------------------------------- */

/// A converted, typed field value ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Date(Date),
    Timestamp(Timestamp),
    ProjectStatus(ProjectStatus),
    TaskStatus(TaskStatus),
    Priority(Priority),
    TaskRef(EntityId),
}

impl FieldValue {
    /// Render the value back into its wire form.
    pub fn to_raw(&self) -> Option<String> {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Date(date) => Some(format_date(*date)),
            FieldValue::Timestamp(ts) => Some(format_timestamp(*ts)),
            FieldValue::ProjectStatus(s) => Some(s.as_str().to_string()),
            FieldValue::TaskStatus(s) => Some(s.as_str().to_string()),
            FieldValue::Priority(p) => Some(p.as_str().to_string()),
            FieldValue::TaskRef(id) => Some(id.clone()),
        }
    }
}

/* --------------------------------------------------------------------------
Conversion
-------------------------------------------------------------------------- */

/// Convert a raw patch value into the typed value for `field`.
///
/// An absent value only converts for optional text fields; presence rules for
/// other fields are enforced by the validator before this is reached.
pub fn convert(field: &FieldSpec, raw: Option<&str>) -> CoreResult<FieldValue> {
    let Some(raw) = raw else {
        return match field.kind {
            FieldKind::Text if !field.value_required => Ok(FieldValue::Text(None)),
            _ => Err(CoreError::bad_request(format!(
                "Field '{}' requires a value",
                field.name
            ))),
        };
    };

    match field.kind {
        FieldKind::Text => Ok(FieldValue::Text(Some(raw.to_string()))),
        FieldKind::Date => parse_date(field.name, raw).map(FieldValue::Date),
        FieldKind::Timestamp => parse_timestamp(field.name, raw).map(FieldValue::Timestamp),
        FieldKind::ProjectStatus => parse_enum(field.name, raw).map(FieldValue::ProjectStatus),
        FieldKind::TaskStatus => parse_enum(field.name, raw).map(FieldValue::TaskStatus),
        FieldKind::Priority => parse_enum(field.name, raw).map(FieldValue::Priority),
        FieldKind::TaskRef => Ok(FieldValue::TaskRef(raw.to_string())),
    }
}

/// Parse a `yyyy-MM-dd` date. The input must be in canonical form.
pub fn parse_date(field: &str, raw: &str) -> CoreResult<Date> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .filter(|d| format_date(*d) == raw)
        .ok_or_else(|| {
            CoreError::bad_request(format!(
                "Invalid date '{raw}' for field '{field}'. Expected yyyy-MM-dd"
            ))
        })
}

/// Parse a `yyyy-MM-dd'T'HH:mm:ss` timestamp. The input must be in canonical form.
pub fn parse_timestamp(field: &str, raw: &str) -> CoreResult<Timestamp> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .filter(|ts| format_timestamp(*ts) == raw)
        .ok_or_else(|| {
            CoreError::bad_request(format!(
                "Invalid timestamp '{raw}' for field '{field}'. Expected yyyy-MM-ddTHH:mm:ss"
            ))
        })
}

/// Parse an enum member by its exact literal name.
pub fn parse_enum<T: NamedEnum>(field: &str, raw: &str) -> CoreResult<T> {
    T::from_name(raw).ok_or_else(|| {
        let allowed: Vec<&str> = T::ALL.iter().map(|v| v.as_str()).collect();
        CoreError::bad_request(format!(
            "Invalid value '{raw}' for field '{field}'. Must be one of: {}",
            allowed.join(", ")
        ))
    })
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(ts: Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/* --------------------------------------------------------------------------
Serde adapters for the wire patterns
-------------------------------------------------------------------------- */

/// `#[serde(with = "...")]` adapter for `Option<Date>` in `yyyy-MM-dd`.
pub mod serde_date {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::Date;

    pub fn serialize<S: Serializer>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&super::format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse_date("date", &raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// `#[serde(with = "...")]` adapter for `Option<Timestamp>` in `yyyy-MM-dd'T'HH:mm:ss`.
pub mod serde_timestamp {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::Timestamp;

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&super::format_timestamp(*ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse_timestamp("timestamp", &raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
