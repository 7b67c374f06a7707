//! Shared fakes, ORCID fixtures and PDF builders for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use serde_json::{json, Value};

use crate::llm_client::LlmError;
use crate::models::orcid::OrcidDocument;
use crate::orcid_client::{OrcidId, RegistryClient, RegistryError, RegistrySection};
use crate::pipeline::extractor::{CompletionRequest, TextGenerator};

pub const ORCID_ID: &str = "0000-0001-2345-678X";

pub fn orcid_record() -> Value {
    json!({
        "orcid-identifier": {
            "uri": "https://orcid.org/0000-0001-2345-678X",
            "path": ORCID_ID,
            "host": "orcid.org"
        },
        "person": orcid_person()
    })
}

pub fn orcid_person() -> Value {
    json!({
        "name": {
            "given-names": {"value": "Marie"},
            "family-name": {"value": "Curie"}
        },
        "biography": {"content": "Physicist and chemist."},
        "emails": {"email": [{"email": "marie@example.org"}]},
        "researcher-urls": {"researcher-url": [{"url": {"value": "https://curie.example.org"}}]},
        "addresses": {"address": [{"country": {"value": "FR"}}]},
        "keywords": {"keyword": [{"content": "radioactivity"}]},
        "other-names": {"other-name": [{"content": "Maria Skłodowska"}]},
        "external-identifiers": {"external-identifier": []}
    })
}

fn work(title: &str, year: Option<&str>, doi: &str) -> Value {
    json!({
        "title": {"title": {"value": title}, "subtitle": null},
        "publication-date": year.map(|y| json!({"year": {"value": y}, "month": null})),
        "journal-title": {"value": "Annales de Physique"},
        "type": "journal-article",
        "external-ids": {"external-id": [
            {"external-id-type": "issn", "external-id-value": "0003-4169"},
            {"external-id-type": "doi", "external-id-value": doi}
        ]}
    })
}

/// Three groups; the first carries a duplicate summary that must not be counted.
pub fn orcid_works() -> Value {
    json!({
        "group": [
            {"work-summary": [
                work("Radioactive substances", Some("1904"), "10.1000/rs"),
                work("Radioactive substances (duplicate)", Some("1904"), "10.1000/rs")
            ]},
            {"work-summary": [work("On a new radioactive substance", Some("1898"), "10.1000/po")]},
            {"work-summary": [work("Untitled notes", None, "10.1000/un")]}
        ]
    })
}

pub fn orcid_educations() -> Value {
    json!({
        "affiliation-group": [
            {"summaries": [{"education-summary": {
                "organization": {"name": "University of Paris", "address": {"city": "Paris", "region": null, "country": "FR"}},
                "role-title": "DSc",
                "department-name": "Physics",
                "start-date": {"year": {"value": "1897"}, "month": {"value": "10"}},
                "end-date": {"year": {"value": "1903"}}
            }}]}
        ]
    })
}

pub fn orcid_employments() -> Value {
    json!({
        "affiliation-group": [
            {"summaries": [{"employment-summary": {
                "organization": {"name": "University of Paris", "address": {"city": "Paris", "region": "Île-de-France", "country": "FR"}},
                "role-title": "Professor",
                "department-name": "Faculty of Sciences",
                "start-date": {"year": {"value": "1906"}},
                "end-date": null
            }}]},
            {"summaries": [{"employment-summary": {
                "organization": {"name": "  ", "address": null},
                "role-title": "Volunteer"
            }}]}
        ]
    })
}

pub fn orcid_document() -> OrcidDocument {
    OrcidDocument {
        profile: Some(orcid_record()),
        person: Some(orcid_person()),
        works: Some(orcid_works()),
        educations: Some(orcid_educations()),
        employments: Some(orcid_employments()),
    }
}

/// In-memory registry with per-endpoint failure injection.
pub struct FakeRegistry {
    record_error: Option<u16>,
    section_errors: Vec<(RegistrySection, u16)>,
    requests: AtomicUsize,
}

impl FakeRegistry {
    pub fn complete() -> Self {
        Self {
            record_error: None,
            section_errors: Vec::new(),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_record_error(mut self, status: u16) -> Self {
        self.record_error = Some(status);
        self
    }

    pub fn with_section_error(mut self, section: RegistrySection, status: u16) -> Self {
        self.section_errors.push((section, status));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn status_error(status: u16) -> RegistryError {
    if status == 404 {
        RegistryError::NotFound
    } else {
        RegistryError::Status { status }
    }
}

#[async_trait]
impl RegistryClient for FakeRegistry {
    async fn fetch_record(&self, _id: &OrcidId) -> Result<Value, RegistryError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.record_error {
            Some(status) => Err(status_error(status)),
            None => Ok(orcid_record()),
        }
    }

    async fn fetch_section(
        &self,
        _id: &OrcidId,
        section: RegistrySection,
    ) -> Result<Value, RegistryError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some((_, status)) = self.section_errors.iter().find(|(s, _)| *s == section) {
            return Err(status_error(*status));
        }
        Ok(match section {
            RegistrySection::Works => orcid_works(),
            RegistrySection::Educations => orcid_educations(),
            RegistrySection::Employments => orcid_employments(),
            RegistrySection::Person => orcid_person(),
        })
    }
}

/// Text generator returning a canned reply (or API error) and recording prompts.
pub struct FakeGenerator {
    reply: Result<String, (u16, String)>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            reply: Err((status, message.into())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, message)) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Builds an n-page PDF with empty content streams.
pub fn blank_pdf(pages: usize) -> Vec<u8> {
    text_pdf(&vec![""; pages])
}

/// Builds a PDF with one page per entry, each drawing its line in Helvetica.
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for line in pages {
        let operations = if line.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*line)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
