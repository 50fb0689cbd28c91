//! Conversion of OData entities into typed records
//!
//! Each record type has a wire struct mirroring the entity's PascalCase
//! fields. Fields are optional on the wire so that an absent or null field is
//! reported by name instead of as a generic deserialization failure.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use orchview_types::{Folder, JobRecord, JobState, LogLevel, LogRecord, Release};

use crate::error::{ApiError, Result};

/// A record type that can be built from one OData entity
pub trait FromEntity: Sized {
    /// Entity name used in error messages
    const ENTITY: &'static str;

    /// Shape of the entity as the service sends it
    type Wire: DeserializeOwned;

    fn from_wire(wire: Self::Wire) -> Result<Self>;
}

/// Decode one entity
pub fn parse_entity<T: FromEntity>(value: Value) -> Result<T> {
    let wire = serde_json::from_value::<T::Wire>(value).map_err(|e| ApiError::InvalidField {
        entity: T::ENTITY,
        field: "(record)",
        value: e.to_string(),
    })?;
    T::from_wire(wire)
}

/// Convert every entity of a result set, failing on the first bad one
pub fn parse_all<T: FromEntity>(values: Vec<Value>) -> Result<Vec<T>> {
    values.into_iter().map(parse_entity).collect()
}

fn required<T>(entity: &'static str, field: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or(ApiError::MissingField { entity, field })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FolderWire {
    id: Option<i64>,
    display_name: Option<String>,
    fully_qualified_name: Option<String>,
}

impl FromEntity for Folder {
    const ENTITY: &'static str = "Folder";
    type Wire = FolderWire;

    fn from_wire(wire: FolderWire) -> Result<Self> {
        Ok(Self {
            id: required(Self::ENTITY, "Id", wire.id)?,
            display_name: required(Self::ENTITY, "DisplayName", wire.display_name)?,
            fully_qualified_name: wire.fully_qualified_name,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseWire {
    id: Option<i64>,
    name: Option<String>,
    process_key: Option<String>,
}

impl FromEntity for Release {
    const ENTITY: &'static str = "Release";
    type Wire = ReleaseWire;

    fn from_wire(wire: ReleaseWire) -> Result<Self> {
        Ok(Self {
            id: required(Self::ENTITY, "Id", wire.id)?,
            name: required(Self::ENTITY, "Name", wire.name)?,
            process_key: required(Self::ENTITY, "ProcessKey", wire.process_key)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobWire {
    key: Option<String>,
    release_name: Option<String>,
    state: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    process_key: Option<String>,
}

impl FromEntity for JobRecord {
    const ENTITY: &'static str = "Job";
    type Wire = JobWire;

    fn from_wire(wire: JobWire) -> Result<Self> {
        let state = required(Self::ENTITY, "State", wire.state)?;
        Ok(Self {
            key: required(Self::ENTITY, "Key", wire.key)?,
            release_name: required(Self::ENTITY, "ReleaseName", wire.release_name)?,
            state: JobState::from(state.as_str()),
            start_time: wire.start_time,
            end_time: wire.end_time,
            process_key: wire.process_key,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RobotLogWire {
    job_key: Option<String>,
    level: Option<String>,
    time_stamp: Option<String>,
    message: Option<String>,
}

impl FromEntity for LogRecord {
    const ENTITY: &'static str = "RobotLog";
    type Wire = RobotLogWire;

    fn from_wire(wire: RobotLogWire) -> Result<Self> {
        let level_name = required(Self::ENTITY, "Level", wire.level)?;
        // Wire names are matched exactly
        let level = LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == level_name)
            .ok_or(ApiError::InvalidField {
                entity: Self::ENTITY,
                field: "Level",
                value: level_name,
            })?;

        Ok(Self {
            job_key: required(Self::ENTITY, "JobKey", wire.job_key)?,
            level,
            timestamp: required(Self::ENTITY, "TimeStamp", wire.time_stamp)?,
            message: required(Self::ENTITY, "Message", wire.message)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_record_from_entity() {
        let value = json!({
            "Id": 991,
            "JobKey": "6b1f",
            "Level": "Error",
            "TimeStamp": "2025-05-16T10:20:30.123Z",
            "Message": "Selector not found",
            "RobotName": "bot-01"
        });
        let record = parse_entity::<LogRecord>(value).unwrap();
        assert_eq!(record.job_key, "6b1f");
        assert_eq!(record.level, LogLevel::Error);
        assert_eq!(record.timestamp, "2025-05-16T10:20:30.123Z");
        assert_eq!(record.message, "Selector not found");
    }

    #[test]
    fn test_missing_field_is_named() {
        let value = json!({ "JobKey": "6b1f", "Level": "Info", "TimeStamp": "t" });
        match parse_entity::<LogRecord>(value) {
            Err(ApiError::MissingField { entity, field }) => {
                assert_eq!(entity, "RobotLog");
                assert_eq!(field, "Message");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        let value = json!({ "Id": 1, "DisplayName": null });
        assert!(matches!(
            parse_entity::<Folder>(value),
            Err(ApiError::MissingField { field: "DisplayName", .. })
        ));
    }

    #[test]
    fn test_unknown_level_is_invalid() {
        let value = json!({
            "JobKey": "k", "Level": "Notice", "TimeStamp": "t", "Message": "m"
        });
        assert!(matches!(
            parse_entity::<LogRecord>(value),
            Err(ApiError::InvalidField { field: "Level", .. })
        ));
    }

    #[test]
    fn test_level_must_match_wire_name_exactly() {
        let value = json!({
            "JobKey": "k", "Level": "error", "TimeStamp": "t", "Message": "m"
        });
        match parse_entity::<LogRecord>(value) {
            Err(ApiError::InvalidField { field, value, .. }) => {
                assert_eq!(field, "Level");
                assert_eq!(value, "error");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_job_with_null_start_time() {
        let value = json!({
            "Key": "a-b", "ReleaseName": "Invoices_Prod", "State": "Faulted", "StartTime": null
        });
        let job = parse_entity::<JobRecord>(value).unwrap();
        assert_eq!(job.state, JobState::Faulted);
        assert_eq!(job.start_time, None);
    }

    #[test]
    fn test_parse_all_stops_on_bad_entity() {
        let values = vec![
            json!({ "Id": 1, "DisplayName": "Shared" }),
            json!({ "Id": "two", "DisplayName": "Finance" }),
        ];
        match parse_all::<Folder>(values) {
            Err(ApiError::InvalidField { entity, value, .. }) => {
                assert_eq!(entity, "Folder");
                assert!(value.contains("two"), "{value}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
