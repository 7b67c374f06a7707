//! Payload Compactor — shrinks an ORCID document to fit one generation request.
//!
//! Works are summarized (count, year range, 15 most recent) instead of sent in
//! full. If the estimate is still over budget the payload is stripped level by
//! level until it fits or only the identity skeleton is left. The normalized
//! lists are kept verbatim in `CompleteLists` for the reconciler either way.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::models::orcid::OrcidDocument;
use crate::pipeline::shapes::{publication_year, AffiliationsShape, WorksShape};

pub const SAMPLE_SIZE: usize = 15;
const AFFILIATION_PREVIEW: usize = 5;
const YEAR_SENTINEL_EARLIEST: i32 = 9999;
const YEAR_SENTINEL_LATEST: i32 = 0;
const MINIMAL_PERSON_FIELDS: &[&str] = &[
    "name",
    "emails",
    "biography",
    "researcher-urls",
    "addresses",
    "keywords",
];

/// Size ceiling for the compacted payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadBudget {
    pub max_tokens: usize,
    /// Heuristic, not a tokenizer: serialized characters per token.
    pub chars_per_token: f64,
}

impl Default for PayloadBudget {
    fn default() -> Self {
        Self {
            max_tokens: 8000,
            chars_per_token: 2.5,
        }
    }
}

impl PayloadBudget {
    pub fn estimate_tokens(&self, serialized: &str) -> usize {
        let ratio = self.chars_per_token.max(f64::EPSILON);
        (serialized.chars().count() as f64 / ratio).ceil() as usize
    }

    pub fn fits(&self, estimated_tokens: usize) -> bool {
        estimated_tokens <= self.max_tokens
    }
}

/// Verbatim, normalized lists retained for reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompleteLists {
    pub works: Vec<Value>,
    pub educations: Vec<Value>,
    pub employments: Vec<Value>,
}

pub fn normalize(document: &OrcidDocument) -> CompleteLists {
    CompleteLists {
        works: WorksShape::detect(document.works.as_ref()).into_items(),
        educations: AffiliationsShape::detect(document.educations.as_ref())
            .into_items("educations"),
        employments: AffiliationsShape::detect(document.employments.as_ref())
            .into_items("employments"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub earliest: i32,
    pub latest: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationAnalytics {
    pub total_publications: usize,
    pub year_range: Option<YearRange>,
    pub sample_recent_publications: Vec<Value>,
}

impl PublicationAnalytics {
    fn without_sample(&self) -> Self {
        Self {
            sample_recent_publications: Vec::new(),
            ..self.clone()
        }
    }
}

pub fn analyze_publications(works: &[Value]) -> PublicationAnalytics {
    let years: Vec<Option<i32>> = works.iter().map(publication_year).collect();

    let earliest = years
        .iter()
        .map(|y| y.unwrap_or(YEAR_SENTINEL_EARLIEST))
        .min();
    let latest = years.iter().map(|y| y.unwrap_or(YEAR_SENTINEL_LATEST)).max();
    let year_range = match (earliest, latest) {
        (Some(earliest), Some(latest)) if years.iter().any(Option::is_some) => {
            Some(YearRange { earliest, latest })
        }
        _ => None,
    };

    // Stable sort: equal years keep their original order.
    let mut order: Vec<usize> = (0..works.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(years[i].unwrap_or(YEAR_SENTINEL_LATEST)));
    let sample_recent_publications = order
        .into_iter()
        .take(SAMPLE_SIZE)
        .map(|i| works[i].clone())
        .collect();

    PublicationAnalytics {
        total_publications: works.len(),
        year_range,
        sample_recent_publications,
    }
}

/// How much of the document survived compaction, most to least complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactionLevel {
    Full,
    NoSample,
    Minimal,
    IdentityOnly,
}

impl CompactionLevel {
    fn next(self) -> Option<Self> {
        match self {
            CompactionLevel::Full => Some(CompactionLevel::NoSample),
            CompactionLevel::NoSample => Some(CompactionLevel::Minimal),
            CompactionLevel::Minimal => Some(CompactionLevel::IdentityOnly),
            CompactionLevel::IdentityOnly => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompactedPayload {
    /// What gets embedded in the generation prompt.
    pub payload: Value,
    pub level: CompactionLevel,
    pub estimated_tokens: usize,
    /// Side channel for the reconciler; never sent to the model.
    pub complete: CompleteLists,
}

pub fn compact(document: &OrcidDocument, budget: &PayloadBudget) -> CompactedPayload {
    let complete = normalize(document);
    let analytics = analyze_publications(&complete.works);
    debug!(
        "Normalized ORCID lists: works={} educations={} employments={}",
        complete.works.len(),
        complete.educations.len(),
        complete.employments.len()
    );

    let mut level = CompactionLevel::Full;
    loop {
        let payload = build_payload(level, document, &complete, &analytics);
        let estimated_tokens = budget.estimate_tokens(&render_payload(&payload));

        match level.next() {
            Some(next) if !budget.fits(estimated_tokens) => {
                warn!(
                    "ORCID payload at {level:?} is ~{estimated_tokens} tokens (ceiling {}), stripping to {next:?}",
                    budget.max_tokens
                );
                level = next;
            }
            _ => {
                return CompactedPayload {
                    payload,
                    level,
                    estimated_tokens,
                    complete,
                }
            }
        }
    }
}

/// The form the payload takes inside the generation prompt. Budget estimates
/// are made on this same text.
pub fn render_payload(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

fn build_payload(
    level: CompactionLevel,
    document: &OrcidDocument,
    complete: &CompleteLists,
    analytics: &PublicationAnalytics,
) -> Value {
    let identity = json!({
        "orcid-identifier": document.identifier().cloned().unwrap_or_else(|| json!({}))
    });
    let person = document.person();
    let affiliation_counts = json!({
        "educations": complete.educations.len(),
        "employments": complete.employments.len(),
    });

    match level {
        CompactionLevel::Full | CompactionLevel::NoSample => {
            let analytics = if level == CompactionLevel::Full {
                analytics.clone()
            } else {
                analytics.without_sample()
            };
            json!({
                "profile": profile_summary(document),
                "person": person.cloned().unwrap_or(Value::Null),
                "publicationAnalytics": analytics,
                "educations": preview(&complete.educations),
                "employments": preview(&complete.employments),
            })
        }
        CompactionLevel::Minimal => json!({
            "profile": identity,
            "person": pick(person, MINIMAL_PERSON_FIELDS),
            "publicationAnalytics": analytics.without_sample(),
            "affiliationCounts": affiliation_counts,
        }),
        CompactionLevel::IdentityOnly => json!({
            "profile": identity,
            "person": pick(person, &["name"]),
            "publicationAnalytics": {"totalPublications": analytics.total_publications},
            "affiliationCounts": affiliation_counts,
        }),
    }
}

/// The top-level record minus the sections sent separately.
fn profile_summary(document: &OrcidDocument) -> Value {
    match &document.profile {
        Some(Value::Object(map)) => Value::Object(
            map.iter()
                .filter(|(key, _)| !matches!(key.as_str(), "activities-summary" | "person"))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        Some(other) => other.clone(),
        None => Value::Null,
    }
}

fn preview(items: &[Value]) -> Vec<Value> {
    items.iter().take(AFFILIATION_PREVIEW).cloned().collect()
}

/// Copies the listed keys of `person`; missing keys become `null`.
fn pick(person: Option<&Value>, keys: &[&str]) -> Value {
    let mut out = Map::new();
    for key in keys {
        let value = person
            .and_then(|p| p.get(*key))
            .cloned()
            .unwrap_or(Value::Null);
        out.insert((*key).to_string(), value);
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{orcid_document, ORCID_ID};

    fn work(title: &str, year: Option<i32>) -> Value {
        json!({
            "title": {"title": {"value": title}},
            "publication-date": year.map(|y| json!({"year": {"value": y.to_string()}})),
        })
    }

    /// The fixture with `works` publications, each titled with `title_len` characters.
    fn document_with_works(works: usize, title_len: usize) -> OrcidDocument {
        let group: Vec<Value> = (0..works)
            .map(|i| {
                let title = format!("{i:04} {}", "radiochemistry ".repeat(title_len / 15));
                json!({"work-summary": [work(&title, Some(1900 + (i % 40) as i32))]})
            })
            .collect();
        OrcidDocument {
            works: Some(json!({ "group": group })),
            ..orcid_document()
        }
    }

    /// The fixture with `key` added to the person section, holding `entries` long items.
    fn document_with_person_section(key: &str, entries: usize) -> OrcidDocument {
        let mut person = crate::testing::orcid_person();
        let items: Vec<Value> = (0..entries)
            .map(|i| json!({"content": format!("{i} {}", "polonium and radium ".repeat(20))}))
            .collect();
        person[key] = json!({ "entries": items });
        OrcidDocument {
            person: Some(person),
            ..orcid_document()
        }
    }

    fn rendered_tokens(budget: &PayloadBudget, document: &OrcidDocument, level: CompactionLevel) -> usize {
        let complete = normalize(document);
        let analytics = analyze_publications(&complete.works);
        budget.estimate_tokens(&render_payload(&build_payload(level, document, &complete, &analytics)))
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        let budget = PayloadBudget {
            max_tokens: 10,
            chars_per_token: 2.5,
        };
        assert_eq!(budget.estimate_tokens("abcde"), 2);
        assert_eq!(budget.estimate_tokens("abcdef"), 3);
        assert_eq!(budget.estimate_tokens(""), 0);
        assert!(budget.fits(10));
        assert!(!budget.fits(11));
    }

    #[test]
    fn test_normalize_fixture() {
        let lists = normalize(&orcid_document());
        assert_eq!(lists.works.len(), 3);
        assert_eq!(lists.educations.len(), 1);
        assert_eq!(lists.employments.len(), 2);
    }

    #[test]
    fn test_analytics_year_range_ignores_missing_years() {
        let works = vec![work("a", Some(2010)), work("b", None), work("c", Some(2003))];
        let analytics = analyze_publications(&works);
        assert_eq!(analytics.total_publications, 3);
        assert_eq!(
            analytics.year_range,
            Some(YearRange {
                earliest: 2003,
                latest: 2010
            })
        );
    }

    #[test]
    fn test_analytics_without_any_year_has_no_range() {
        let works = vec![work("a", None), work("b", None)];
        let analytics = analyze_publications(&works);
        assert_eq!(analytics.year_range, None);
        assert_eq!(analytics.sample_recent_publications.len(), 2);

        let empty = analyze_publications(&[]);
        assert_eq!(empty.total_publications, 0);
        assert_eq!(empty.year_range, None);
        assert!(empty.sample_recent_publications.is_empty());
    }

    #[test]
    fn test_sample_is_most_recent_fifteen_with_stable_ties() {
        let mut works = vec![work("undated", None)];
        works.extend((0..20).map(|i| work(&format!("w{i}"), Some(2000 + i / 2))));
        let analytics = analyze_publications(&works);

        let titles: Vec<String> = analytics
            .sample_recent_publications
            .iter()
            .map(|w| w["title"]["title"]["value"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles.len(), SAMPLE_SIZE);
        // 2009 is w18, w19 in original order, then 2008 is w16, w17
        assert_eq!(&titles[..4], &["w18", "w19", "w16", "w17"]);
        assert!(!titles.contains(&"undated".to_string()));
    }

    #[test]
    fn test_small_document_stays_full() {
        let compacted = compact(&orcid_document(), &PayloadBudget::default());
        assert_eq!(compacted.level, CompactionLevel::Full);

        let analytics = &compacted.payload["publicationAnalytics"];
        assert_eq!(analytics["totalPublications"], 3);
        assert_eq!(analytics["yearRange"]["earliest"], 1898);
        assert_eq!(analytics["yearRange"]["latest"], 1904);
        assert_eq!(
            analytics["sampleRecentPublications"].as_array().unwrap().len(),
            3
        );
        assert_eq!(compacted.payload["employments"].as_array().unwrap().len(), 2);
        assert!(compacted.payload["profile"].get("person").is_none());
    }

    #[test]
    fn test_large_sample_strips_to_no_sample() {
        let document = document_with_works(40, 2000);
        let budget = PayloadBudget::default();
        assert!(!budget.fits(rendered_tokens(&budget, &document, CompactionLevel::Full)));

        let compacted = compact(&document, &budget);
        assert_eq!(compacted.level, CompactionLevel::NoSample);
        assert!(budget.fits(compacted.estimated_tokens));

        let analytics = &compacted.payload["publicationAnalytics"];
        assert_eq!(analytics["totalPublications"], 40);
        assert_eq!(analytics["sampleRecentPublications"], json!([]));
        assert_eq!(
            compacted.payload["person"]["other-names"]["other-name"][0]["content"],
            json!("Maria Skłodowska")
        );
        // the verbatim side channel is never sampled
        assert_eq!(compacted.complete.works.len(), 40);
    }

    #[test]
    fn test_large_person_strips_to_minimal() {
        let document = document_with_person_section("other-names", 80);
        let budget = PayloadBudget::default();
        assert!(!budget.fits(rendered_tokens(&budget, &document, CompactionLevel::NoSample)));

        let compacted = compact(&document, &budget);
        assert_eq!(compacted.level, CompactionLevel::Minimal);
        assert!(budget.fits(compacted.estimated_tokens));
        assert_eq!(
            compacted.estimated_tokens,
            budget.estimate_tokens(&render_payload(&compacted.payload))
        );

        let payload = &compacted.payload;
        assert_eq!(payload["profile"]["orcid-identifier"]["path"], json!(ORCID_ID));
        assert_eq!(payload["person"]["name"]["family-name"]["value"], json!("Curie"));
        assert_eq!(
            payload["person"]["emails"]["email"][0]["email"],
            json!("marie@example.org")
        );
        assert!(payload["person"].get("other-names").is_none());
        assert_eq!(payload["affiliationCounts"]["employments"], 2);
        assert_eq!(payload["publicationAnalytics"]["yearRange"]["latest"], 1904);
    }

    #[test]
    fn test_large_biography_strips_to_identity_only() {
        let mut document = orcid_document();
        let mut person = crate::testing::orcid_person();
        person["biography"]["content"] = json!("Pioneer of radioactivity research. ".repeat(1000));
        document.person = Some(person);
        let budget = PayloadBudget::default();
        assert!(!budget.fits(rendered_tokens(&budget, &document, CompactionLevel::Minimal)));

        let compacted = compact(&document, &budget);
        assert_eq!(compacted.level, CompactionLevel::IdentityOnly);
        assert!(budget.fits(compacted.estimated_tokens));
        assert_eq!(
            compacted.payload["profile"]["orcid-identifier"]["path"],
            json!(ORCID_ID)
        );
        assert_eq!(
            compacted.payload["person"]["name"]["given-names"]["value"],
            json!("Marie")
        );
        assert!(compacted.payload["person"].get("biography").is_none());
        assert_eq!(compacted.payload["publicationAnalytics"]["totalPublications"], 3);
    }

    #[test]
    fn test_rendered_payload_is_pretty_printed() {
        let payload = json!({"profile": {"orcid-identifier": {"path": ORCID_ID}}});
        let rendered = render_payload(&payload);
        assert!(rendered.contains("\n  \"profile\": {"));
        assert_eq!(serde_json::from_str::<Value>(&rendered).unwrap(), payload);
    }

    #[test]
    fn test_identity_only_is_returned_even_when_over_budget() {
        let budget = PayloadBudget {
            max_tokens: 1,
            chars_per_token: 2.5,
        };
        let compacted = compact(&orcid_document(), &budget);
        assert_eq!(compacted.level, CompactionLevel::IdentityOnly);
        assert!(!budget.fits(compacted.estimated_tokens));
    }
}
