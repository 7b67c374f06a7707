// Source acquisition: uploaded documents and the ORCID registry.
// Errors raised here are the only ones surfaced to callers with their own status.

pub mod document;
pub mod registry;
