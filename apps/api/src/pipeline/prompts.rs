// Profile extraction prompt templates.
// Placeholders: {profile_text}, {orcid_payload}, {output_rules}.

pub const RESUME_EXTRACT_SYSTEM: &str = "\
You are a professional profile extractor. \
Extract structured data from LinkedIn profiles and resumes.";

pub const RESUME_EXTRACT_PROMPT: &str = r#"Extract the following information from this LinkedIn profile text and return it as a JSON object:

Required fields:
- firstName: string
- lastName: string
- email: string (extract from contact info)
- phone: string (extract from contact info)
- location: string
- headline: string (professional title/headline)
- summary: string (about section or summary)
- experience: array of objects with: title, company, location, startDate, endDate, description
- education: array of objects with: institution, degree, fieldOfStudy, startDate, endDate, description
- skills: array of strings
- certifications: array of objects with: name, organization, issueDate, expirationDate
- languages: array of objects with: language, proficiency

{output_rules}

LinkedIn Profile Text:
{profile_text}"#;

pub const ORCID_EXTRACT_SYSTEM: &str = "\
You are a professional profile extractor specializing in academic and research profiles. \
Extract structured data from ORCID profiles. \
Also give at least 25 additional relevant research keywords and at least 25 technical skills \
that are not already present in the user's profile.";

pub const ORCID_EXTRACT_PROMPT: &str = r#"Extract and structure the following information from this ORCID profile data and return it as a JSON object:

Required fields:
- firstName: string (from person.name.given-names.value)
- lastName: string (from person.name.family-name.value)
- email: string (from person.emails.email[0].email or similar nested structure)
- phone: string (from contact details if available, empty if not)
- location: string (from person.addresses.address[0].country.value or similar)
- headline: string (create professional headline from current position/research area)
- summary: string (from person.biography.content or create from research interests)
- orcidId: string (from profile.orcid-identifier.path)
- website: string (from person.researcher-urls.researcher-url[0].url.value or similar)
- experience: array of objects with: title, company, location, startDate, endDate, description (from employments)
- education: array of objects with: institution, degree, fieldOfStudy, startDate, endDate, description (from educations)
- publications: array of objects with: title, journal, year, doi, authors (analyze from publicationAnalytics)
- skills: array of strings (extract from research areas, keywords, or work descriptions)
- keywords: array of strings (from person.keywords.keyword[].content or researcher keywords)
- languages: array of objects with: language, proficiency (if available)

ORCID data has nested structures with .value properties, extract carefully.
Extract research keywords and technical skills separately.
Create meaningful descriptions for experience and education.
For publications, analyze the publicationAnalytics summary and sample recent publications.

{output_rules}

ORCID Profile Data:
{orcid_payload}"#;
