use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The canonical output shape of every extraction route.
///
/// All fields are always serialized. Missing or `null` fields in model output
/// deserialize to their zero value; unknown top-level fields are carried in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub headline: String,
    #[serde(deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(deserialize_with = "lenient::string")]
    pub orcid_id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub website: String,
    #[serde(deserialize_with = "lenient::list")]
    pub experience: Vec<ExperienceItem>,
    #[serde(deserialize_with = "lenient::list")]
    pub education: Vec<EducationItem>,
    #[serde(deserialize_with = "lenient::list")]
    pub publications: Vec<PublicationItem>,
    #[serde(deserialize_with = "lenient::list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub certifications: Vec<CertificationItem>,
    #[serde(deserialize_with = "lenient::list")]
    pub languages: Vec<LanguageItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceItem {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationItem {
    #[serde(deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(deserialize_with = "lenient::string")]
    pub field_of_study: String,
    #[serde(deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationItem {
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub subtitle: String,
    #[serde(deserialize_with = "lenient::string")]
    pub journal: String,
    #[serde(deserialize_with = "lenient::string")]
    pub year: String,
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub kind: String,
    #[serde(deserialize_with = "lenient::string")]
    pub doi: String,
    /// Comma-separated author list.
    #[serde(deserialize_with = "lenient::string")]
    pub authors: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CertificationItem {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub organization: String,
    #[serde(deserialize_with = "lenient::string")]
    pub issue_date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub expiration_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageItem {
    #[serde(deserialize_with = "lenient::string")]
    pub language: String,
    #[serde(deserialize_with = "lenient::string")]
    pub proficiency: String,
}

impl lenient::ListItem for ExperienceItem {
    fn from_text(text: String) -> Self {
        Self {
            title: text,
            ..Default::default()
        }
    }
}

impl lenient::ListItem for EducationItem {
    fn from_text(text: String) -> Self {
        Self {
            institution: text,
            ..Default::default()
        }
    }
}

impl lenient::ListItem for PublicationItem {
    fn from_text(text: String) -> Self {
        Self {
            title: text,
            ..Default::default()
        }
    }
}

impl lenient::ListItem for CertificationItem {
    fn from_text(text: String) -> Self {
        Self {
            name: text,
            ..Default::default()
        }
    }
}

impl lenient::ListItem for LanguageItem {
    fn from_text(text: String) -> Self {
        Self {
            language: text,
            ..Default::default()
        }
    }
}

/// Deserializers that accept the loose scalar types text-generation models emit.
///
/// Neither one ever returns an error: a field that can't be read becomes its
/// empty value, so one odd field never costs the rest of the record.
mod lenient {
    use serde::{de::DeserializeOwned, Deserialize, Deserializer};
    use serde_json::Value;

    /// A list element that can also be written as a bare scalar, e.g.
    /// `"languages": ["English"]` instead of `[{"language": "English"}]`.
    pub trait ListItem: DeserializeOwned {
        /// Builds the item with `text` in its primary field.
        fn from_text(text: String) -> Self;
    }

    impl ListItem for String {
        fn from_text(text: String) -> Self {
            text
        }
    }

    /// Strings pass through, numbers and booleans are stringified, arrays of
    /// scalars are joined with ", ", and null or objects become "".
    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_text(&Value::deserialize(deserializer)?))
    }

    /// Lenient per item. Scalars go through `ListItem::from_text`, objects that
    /// don't fit `T` and nulls are dropped. A bare string is split on commas and
    /// newlines, a lone object is a one-item list, anything else is empty.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: ListItem,
    {
        let values = match Value::deserialize(deserializer)? {
            Value::Array(values) => values,
            Value::String(text) => text
                .split([',', '\n'])
                .map(|part| Value::String(part.to_string()))
                .collect(),
            object @ Value::Object(_) => vec![object],
            _ => Vec::new(),
        };
        Ok(values.into_iter().filter_map(list_item).collect())
    }

    fn list_item<T: ListItem>(value: Value) -> Option<T> {
        match value {
            Value::Object(_) => serde_json::from_value(value).ok(),
            Value::Null | Value::Array(_) => None,
            scalar => {
                let text = scalar_text(&scalar);
                let text = text.trim();
                (!text.is_empty()).then(|| T::from_text(text.to_string()))
            }
        }
    }

    fn scalar_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            Value::Null | Value::Object(_) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_record_serializes_every_field() {
        let value = serde_json::to_value(ProfileRecord::default()).unwrap();
        for field in [
            "firstName",
            "lastName",
            "email",
            "phone",
            "location",
            "headline",
            "summary",
            "orcidId",
            "website",
        ] {
            assert_eq!(value[field], "", "{field} should be an empty string");
        }
        for field in [
            "experience",
            "education",
            "publications",
            "skills",
            "keywords",
            "certifications",
            "languages",
        ] {
            assert_eq!(value[field], json!([]), "{field} should be an empty list");
        }
    }

    #[test]
    fn test_nulls_and_loose_scalars_are_tolerated() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "firstName": "Ada",
            "lastName": null,
            "phone": 5551234,
            "experience": null,
            "education": [{"institution": "MIT", "startDate": 2016, "endDate": null}],
            "publications": [{"title": "Paper", "year": 2021, "authors": ["A. Lovelace", "C. Babbage"]}]
        }))
        .unwrap();

        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.last_name, "");
        assert_eq!(record.phone, "5551234");
        assert!(record.experience.is_empty());
        assert_eq!(record.education[0].start_date, "2016");
        assert_eq!(record.education[0].end_date, "");
        assert_eq!(record.publications[0].year, "2021");
        assert_eq!(record.publications[0].authors, "A. Lovelace, C. Babbage");
    }

    #[test]
    fn test_bare_strings_become_list_items() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "firstName": "Ada",
            "email": "ada@example.com",
            "languages": ["English", {"language": "French", "proficiency": "Fluent"}],
            "certifications": ["AWS Solutions Architect"],
            "experience": ["Analyst at Babbage & Co"],
            "skills": ["Rust", 5, null, {"name": "Go"}, "  "]
        }))
        .unwrap();

        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.email, "ada@example.com");
        assert_eq!(record.languages[0].language, "English");
        assert_eq!(record.languages[0].proficiency, "");
        assert_eq!(record.languages[1].proficiency, "Fluent");
        assert_eq!(record.certifications[0].name, "AWS Solutions Architect");
        assert_eq!(record.experience[0].title, "Analyst at Babbage & Co");
        assert_eq!(record.skills, vec!["Rust", "5"]);
    }

    #[test]
    fn test_non_list_values_do_not_fail_the_record() {
        let record: ProfileRecord = serde_json::from_value(json!({
            "firstName": "Ada",
            "skills": "Rust, Go\nSQL",
            "keywords": 42,
            "education": {"institution": "University of London"},
            "publications": true
        }))
        .unwrap();

        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.skills, vec!["Rust", "Go", "SQL"]);
        assert!(record.keywords.is_empty());
        assert_eq!(record.education[0].institution, "University of London");
        assert!(record.publications.is_empty());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let input = json!({
            "firstName": "Ada",
            "researchInterests": ["engines"]
        });
        let record: ProfileRecord = serde_json::from_value(input).unwrap();
        assert_eq!(record.extra["researchInterests"], json!(["engines"]));

        let output = serde_json::to_value(&record).unwrap();
        assert_eq!(output["researchInterests"], json!(["engines"]));
        assert_eq!(output["firstName"], "Ada");
    }

    #[test]
    fn test_publication_type_field_name() {
        let item = PublicationItem {
            kind: "journal-article".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(item).unwrap();
        assert_eq!(value["type"], "journal-article");
    }
}
