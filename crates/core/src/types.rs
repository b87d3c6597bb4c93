/// Entity ids are opaque strings assigned by the store on insert.
pub type EntityId = String;

/// Timestamps are local wall-clock values with second precision on the wire.
pub type Timestamp = chrono::NaiveDateTime;

/// Calendar date without a time component.
pub type Date = chrono::NaiveDate;
