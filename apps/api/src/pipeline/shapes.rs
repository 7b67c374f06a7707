//! Source shapes of ORCID JSON.
//!
//! The same data arrives in several nestings depending on which endpoint (or
//! which client) produced it. Each category gets an explicit shape enum whose
//! `detect` checks shapes in a fixed order.

use serde_json::Value;

/// Nestings a works collection may arrive in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorksShape<'a> {
    /// Already a flat array of work summaries.
    Flat(&'a [Value]),
    /// `/works` response: `{ group: [{ "work-summary": [...] }] }`.
    Grouped(&'a [Value]),
    /// Full record: `{ "activities-summary": { works: ... } }`.
    ActivitiesSummary(&'a Value),
    Unknown,
}

impl<'a> WorksShape<'a> {
    pub fn detect(value: Option<&'a Value>) -> Self {
        let Some(value) = value else {
            return WorksShape::Unknown;
        };
        if let Some(items) = value.as_array() {
            WorksShape::Flat(items)
        } else if let Some(groups) = value.get("group").and_then(Value::as_array) {
            WorksShape::Grouped(groups)
        } else if let Some(inner) = value.get("activities-summary") {
            WorksShape::ActivitiesSummary(inner)
        } else {
            WorksShape::Unknown
        }
    }

    /// Flattens to one summary per work. Grouped works keep only the first
    /// summary of each group so duplicates from several sources count once.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            WorksShape::Flat(items) => items.to_vec(),
            WorksShape::Grouped(groups) => groups
                .iter()
                .filter_map(|group| {
                    ["work-summary", "summary", "works"]
                        .iter()
                        .find_map(|key| group.get(*key).and_then(Value::as_array))
                        .and_then(|summaries| summaries.first())
                })
                .cloned()
                .collect(),
            WorksShape::ActivitiesSummary(inner) => {
                WorksShape::detect(Some(inner.get("works").unwrap_or(inner))).into_items()
            }
            WorksShape::Unknown => Vec::new(),
        }
    }
}

/// Nestings an education or employment collection may arrive in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AffiliationsShape<'a> {
    Flat(&'a [Value]),
    /// `{ "affiliation-group": [{ summaries: [...] }] }`.
    Grouped(&'a [Value]),
    /// `{ summary: {...} }` or `{ summary: [...] }`.
    Summary(&'a Value),
    /// Full record: `{ "activities-summary": { educations: ... } }`.
    ActivitiesSummary(&'a Value),
    Unknown,
}

impl<'a> AffiliationsShape<'a> {
    pub fn detect(value: Option<&'a Value>) -> Self {
        let Some(value) = value else {
            return AffiliationsShape::Unknown;
        };
        if let Some(items) = value.as_array() {
            AffiliationsShape::Flat(items)
        } else if let Some(groups) = value.get("affiliation-group").and_then(Value::as_array) {
            AffiliationsShape::Grouped(groups)
        } else if let Some(summary) = value.get("summary").filter(|s| !s.is_null()) {
            AffiliationsShape::Summary(summary)
        } else if let Some(inner) = value.get("activities-summary") {
            AffiliationsShape::ActivitiesSummary(inner)
        } else {
            AffiliationsShape::Unknown
        }
    }

    /// Flattens every summary of every group. `section` is the
    /// activities-summary key to descend into (`educations` or `employments`).
    pub fn into_items(self, section: &str) -> Vec<Value> {
        match self {
            AffiliationsShape::Flat(items) => items.to_vec(),
            AffiliationsShape::Grouped(groups) => groups
                .iter()
                .flat_map(|group| {
                    ["summaries", "summary", "affiliations"]
                        .iter()
                        .find_map(|key| group.get(*key).filter(|v| !v.is_null()))
                        .map(one_or_many)
                        .unwrap_or_default()
                })
                .collect(),
            AffiliationsShape::Summary(summary) => one_or_many(summary),
            AffiliationsShape::ActivitiesSummary(inner) => {
                AffiliationsShape::detect(inner.get(section)).into_items(section)
            }
            AffiliationsShape::Unknown => Vec::new(),
        }
    }
}

fn one_or_many(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// How a single text field is wrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldShape<'a> {
    /// `"text"`, or a bare number/boolean.
    Plain(&'a Value),
    /// `{ title: ... }`, e.g. a work title.
    Named(&'a Value),
    /// `{ value: ... }` or `{ content: ... }`.
    Wrapped(&'a Value),
    Missing,
}

impl<'a> FieldShape<'a> {
    pub fn detect(value: Option<&'a Value>) -> Self {
        match value {
            Some(v) if v.is_string() || v.is_number() || v.is_boolean() => FieldShape::Plain(v),
            Some(Value::Object(map)) => {
                if let Some(inner) = map.get("title") {
                    FieldShape::Named(inner)
                } else if let Some(inner) = map.get("value").or_else(|| map.get("content")) {
                    FieldShape::Wrapped(inner)
                } else {
                    FieldShape::Missing
                }
            }
            _ => FieldShape::Missing,
        }
    }

    pub fn text(self) -> String {
        match self {
            FieldShape::Plain(Value::String(s)) => s.clone(),
            FieldShape::Plain(other) => other.to_string(),
            FieldShape::Named(inner) | FieldShape::Wrapped(inner) => {
                FieldShape::detect(Some(inner)).text()
            }
            FieldShape::Missing => String::new(),
        }
    }
}

/// Text of an optional field in any supported shape; `""` when absent.
pub fn text_of(value: Option<&Value>) -> String {
    FieldShape::detect(value).text()
}

/// Follows `path` through nested objects and returns the text found there.
pub fn text_at(value: &Value, path: &[&str]) -> String {
    text_of(lookup(value, path))
}

pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// Publication year of a work summary, if it has a parseable one.
pub fn publication_year(work: &Value) -> Option<i32> {
    text_at(work, &["publication-date", "year"]).trim().parse().ok()
}

/// Formats an ORCID fuzzy date as `YYYY-MM` or `YYYY`; `""` without a year.
pub fn fuzzy_date(date: Option<&Value>) -> String {
    let Some(date) = date else {
        return String::new();
    };
    let year = text_at(date, &["year"]).trim().to_string();
    if year.is_empty() {
        return year;
    }
    match text_at(date, &["month"]).trim().parse::<u32>() {
        Ok(month @ 1..=12) => format!("{year}-{month:02}"),
        _ => year,
    }
}
