//! Registry acquisition — fetches an ORCID record and its sections.

use serde_json::Value;
use tracing::{info, warn};

use crate::models::orcid::OrcidDocument;
use crate::orcid_client::{OrcidId, RegistryClient, RegistryError, RegistrySection};

/// Fetches the record for `raw_id` plus every section.
///
/// The identifier is validated before any request is made. Errors on the
/// top-level record are returned; a failed section is logged and left absent.
pub async fn acquire_orcid(
    client: &dyn RegistryClient,
    raw_id: &str,
) -> Result<(OrcidId, OrcidDocument), RegistryError> {
    let id = OrcidId::parse(raw_id)?;
    let profile = client.fetch_record(&id).await?;

    let (works, educations, employments, person) = tokio::join!(
        fetch_optional(client, &id, RegistrySection::Works),
        fetch_optional(client, &id, RegistrySection::Educations),
        fetch_optional(client, &id, RegistrySection::Employments),
        fetch_optional(client, &id, RegistrySection::Person),
    );

    info!(
        "Fetched ORCID {id}: works={} educations={} employments={} person={}",
        works.is_some(),
        educations.is_some(),
        employments.is_some(),
        person.is_some()
    );

    Ok((
        id,
        OrcidDocument {
            profile: Some(profile),
            person,
            works,
            educations,
            employments,
        },
    ))
}

async fn fetch_optional(
    client: &dyn RegistryClient,
    id: &OrcidId,
    section: RegistrySection,
) -> Option<Value> {
    match client.fetch_section(id, section).await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to fetch {} for {id}: {e}", section.path());
            None
        }
    }
}
