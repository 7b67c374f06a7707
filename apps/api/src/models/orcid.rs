use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything fetched from the ORCID public API for one identifier.
///
/// Each section is the provider's JSON as returned. `None` means the section
/// fetch failed and was recorded absent; it serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrcidDocument {
    pub profile: Option<Value>,
    pub person: Option<Value>,
    pub works: Option<Value>,
    pub educations: Option<Value>,
    pub employments: Option<Value>,
}

impl OrcidDocument {
    /// Accepts either the bare document or the `{ "data": {...} }` envelope
    /// returned by the fetch route.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let inner = match value {
            Value::Object(mut map) if map.get("data").is_some_and(Value::is_object) => {
                map.remove("data").unwrap_or_default()
            }
            other => other,
        };
        serde_json::from_value(inner)
    }

    /// The `person` section, falling back to the copy embedded in the record.
    pub fn person(&self) -> Option<&Value> {
        present(self.person.as_ref())
            .or_else(|| present(self.profile.as_ref().and_then(|p| p.get("person"))))
    }

    pub fn identifier(&self) -> Option<&Value> {
        present(
            self.profile
                .as_ref()
                .and_then(|p| p.get("orcid-identifier")),
        )
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}
