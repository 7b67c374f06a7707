// Fixed records returned when no generation credential is configured.

use crate::models::profile::{
    EducationItem, ExperienceItem, LanguageItem, ProfileRecord, PublicationItem,
};

const PLACEHOLDER_ORCID_ID: &str = "0000-0000-0000-0000";

pub fn resume_profile() -> ProfileRecord {
    ProfileRecord {
        first_name: "John".into(),
        last_name: "Doe".into(),
        email: "john.doe@email.com".into(),
        phone: "+1 (555) 123-4567".into(),
        location: "San Francisco, CA".into(),
        headline: "Software Engineer at TechCorp".into(),
        summary: "Experienced software engineer with 5+ years in full-stack development, \
                  passionate about creating innovative solutions and mentoring teams."
            .into(),
        experience: vec![ExperienceItem {
            title: "Senior Software Engineer".into(),
            company: "TechCorp".into(),
            location: "San Francisco, California, United States".into(),
            start_date: "2020-01".into(),
            end_date: "Present".into(),
            description: "Led development of key features for the main product. \
                          Mentored junior developers and improved team productivity by 30%."
                .into(),
        }],
        education: vec![EducationItem {
            institution: "Stanford University".into(),
            degree: "Master of Science".into(),
            field_of_study: "Computer Science".into(),
            start_date: "2016".into(),
            end_date: "2018".into(),
            description: "Focus on Machine Learning and Distributed Systems".into(),
        }],
        skills: ["JavaScript", "React", "Node.js", "Python", "SQL", "AWS", "Docker"]
            .map(String::from)
            .to_vec(),
        languages: vec![english()],
        ..Default::default()
    }
}

/// `orcid_id` is the requested identifier, or a placeholder when there is none.
pub fn orcid_profile(supplied_id: Option<&str>) -> ProfileRecord {
    let orcid_id = supplied_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(PLACEHOLDER_ORCID_ID);

    ProfileRecord {
        first_name: "Dr. Jane".into(),
        last_name: "Smith".into(),
        location: "Stanford, CA".into(),
        headline: "Research Scientist at Stanford University".into(),
        summary: "Experienced researcher in computational biology with focus on \
                  machine learning applications in genomics."
            .into(),
        orcid_id: orcid_id.to_string(),
        website: "https://example.com".into(),
        experience: vec![ExperienceItem {
            title: "Research Scientist".into(),
            company: "Stanford University".into(),
            location: "Stanford, CA".into(),
            start_date: "2020-01".into(),
            end_date: "Present".into(),
            description: "Leading research in computational biology and machine learning applications."
                .into(),
        }],
        education: vec![EducationItem {
            institution: "MIT".into(),
            degree: "PhD".into(),
            field_of_study: "Computer Science".into(),
            start_date: "2016".into(),
            end_date: "2020".into(),
            description: "Dissertation on machine learning applications in biological systems"
                .into(),
        }],
        publications: vec![PublicationItem {
            title: "Machine Learning Applications in Genomics".into(),
            journal: "Nature Biotechnology".into(),
            year: "2023".into(),
            doi: "10.1038/s41587-023-01234-5".into(),
            authors: "Smith, J., et al.".into(),
            ..Default::default()
        }],
        skills: [
            "Machine Learning",
            "Python",
            "Bioinformatics",
            "Statistical Analysis",
        ]
        .map(String::from)
        .to_vec(),
        keywords: [
            "Computational Biology",
            "Genomics",
            "Machine Learning",
            "Data Science",
        ]
        .map(String::from)
        .to_vec(),
        languages: vec![english()],
        ..Default::default()
    }
}

fn english() -> LanguageItem {
    LanguageItem {
        language: "English".into(),
        proficiency: "Native".into(),
    }
}
