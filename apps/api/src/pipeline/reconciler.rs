//! Reconciler — replaces model-derived lists with ones built from the verbatim
//! ORCID sections.
//!
//! The model only ever sees a sample of the works, so its lists are
//! incomplete by construction. A non-empty source list always wins; an empty
//! one leaves the model's value untouched.

use serde_json::Value;
use tracing::info;

use crate::models::profile::{EducationItem, ExperienceItem, ProfileRecord, PublicationItem};
use crate::pipeline::compactor::CompleteLists;
use crate::pipeline::shapes::{fuzzy_date, lookup, text_at, text_of};

const OPEN_END_DATE: &str = "Present";

pub fn reconcile(record: &mut ProfileRecord, complete: &CompleteLists) {
    if !complete.works.is_empty() {
        record.publications = complete.works.iter().filter_map(publication).collect();
    }
    if !complete.educations.is_empty() {
        record.education = complete.educations.iter().filter_map(education).collect();
    }
    if !complete.employments.is_empty() {
        record.experience = complete.employments.iter().filter_map(experience).collect();
    }

    info!(
        "Reconciled profile: publications={} education={} experience={}",
        record.publications.len(),
        record.education.len(),
        record.experience.len()
    );
}

fn publication(work: &Value) -> Option<PublicationItem> {
    let title = text_of(work.get("title"));
    if title.trim().is_empty() {
        return None;
    }

    // `title` is `{title, subtitle}` on work summaries; flat works put subtitle at the top.
    let subtitle = match lookup(work, &["title", "subtitle"]) {
        Some(subtitle) => text_of(Some(subtitle)),
        None => text_of(work.get("subtitle")),
    };
    let journal = match work.get("journal-title") {
        Some(journal) if !journal.is_null() => text_of(Some(journal)),
        _ => text_of(work.get("journal")),
    };

    Some(PublicationItem {
        title,
        subtitle,
        journal,
        year: text_at(work, &["publication-date", "year"]),
        kind: text_of(work.get("type")),
        doi: doi(work),
        authors: authors(work),
    })
}

fn doi(work: &Value) -> String {
    lookup(work, &["external-ids", "external-id"])
        .and_then(Value::as_array)
        .and_then(|ids| {
            ids.iter()
                .find(|id| text_of(id.get("external-id-type")).eq_ignore_ascii_case("doi"))
        })
        .map(|id| text_of(id.get("external-id-value")))
        .unwrap_or_default()
}

fn authors(work: &Value) -> String {
    work.get("authors")
        .and_then(Value::as_array)
        .map(|authors| {
            authors
                .iter()
                .map(|a| text_of(Some(a)))
                .filter(|a| !a.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn education(item: &Value) -> Option<EducationItem> {
    let summary = item.get("education-summary").unwrap_or(item);
    let institution = text_at(summary, &["organization", "name"]);
    if institution.trim().is_empty() {
        return None;
    }

    Some(EducationItem {
        institution,
        degree: text_of(summary.get("role-title")),
        field_of_study: text_of(summary.get("department-name")),
        start_date: fuzzy_date(summary.get("start-date")),
        end_date: end_date(summary),
        description: text_of(summary.get("description")),
    })
}

fn experience(item: &Value) -> Option<ExperienceItem> {
    let summary = item.get("employment-summary").unwrap_or(item);
    let company = text_at(summary, &["organization", "name"]);
    if company.trim().is_empty() {
        return None;
    }

    let department = text_of(summary.get("department-name"));
    let title = non_empty_or(text_of(summary.get("role-title")), &department);
    let description = non_empty_or(text_of(summary.get("description")), &department);

    Some(ExperienceItem {
        title,
        company,
        location: location(summary),
        start_date: fuzzy_date(summary.get("start-date")),
        end_date: end_date(summary),
        description,
    })
}

fn end_date(summary: &Value) -> String {
    non_empty_or(fuzzy_date(summary.get("end-date")), OPEN_END_DATE)
}

fn location(summary: &Value) -> String {
    let Some(address) = lookup(summary, &["organization", "address"]) else {
        return String::new();
    };
    ["city", "region", "country"]
        .iter()
        .map(|key| text_of(address.get(*key)))
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
