pub mod orcid;
pub mod profile;
