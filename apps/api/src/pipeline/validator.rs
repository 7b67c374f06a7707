//! Validator — required-field checks on raw model output.
//!
//! Missing fields are never an error: `ProfileRecord` deserializes them to
//! their empty value. This stage records which ones the model dropped.

use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::models::profile::ProfileRecord;

const RESUME_REQUIRED: &[&str] = &[
    "firstName",
    "lastName",
    "email",
    "phone",
    "location",
    "headline",
    "summary",
    "experience",
    "education",
    "skills",
];

const ORCID_REQUIRED: &[&str] = &[
    "firstName",
    "lastName",
    "email",
    "phone",
    "location",
    "headline",
    "summary",
    "orcidId",
    "website",
    "experience",
    "education",
    "publications",
    "skills",
    "keywords",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFlavor {
    Resume,
    Orcid,
}

impl ProfileFlavor {
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            ProfileFlavor::Resume => RESUME_REQUIRED,
            ProfileFlavor::Orcid => ORCID_REQUIRED,
        }
    }
}

/// Required fields that are absent or `null` in the model's output.
pub fn missing_required_fields(fields: &Map<String, Value>, flavor: ProfileFlavor) -> Vec<&'static str> {
    flavor
        .required_fields()
        .iter()
        .copied()
        .filter(|name| fields.get(*name).map_or(true, Value::is_null))
        .collect()
}

/// Converts model output into a record, logging any required field that had to be defaulted.
///
/// Never fails: every `ProfileRecord` field reads any JSON value, and a field
/// of the wrong shape falls back to its empty value on its own.
pub fn validate(fields: Map<String, Value>, flavor: ProfileFlavor) -> ProfileRecord {
    let missing = missing_required_fields(&fields, flavor);
    if missing.is_empty() {
        debug!("{flavor:?} extraction returned every required field");
    } else {
        warn!(
            "{flavor:?} extraction omitted {} required field(s), defaulting: {}",
            missing.len(),
            missing.join(", ")
        );
    }
    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        error!("{flavor:?} extraction could not be read as a profile: {e}");
        ProfileRecord::default()
    })
}

/// Fills `orcidId` from the requested identifier when the model left it empty.
pub fn finalize_orcid_id(record: &mut ProfileRecord, supplied: Option<&str>) {
    if record.orcid_id.trim().is_empty() {
        record.orcid_id = supplied.map(str::trim).unwrap_or_default().to_string();
    }
}
