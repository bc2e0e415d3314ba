//! The structured resume artifact and the optional-field candidate it is normalized from.
//!
//! The generation service returns loosely-shaped JSON: any field may be missing or carry
//! the wrong type. `DocumentCandidate` captures that shape explicitly (every field optional,
//! mistyped values dropped) and `DocumentCandidate::normalize` is the only way to turn it into a
//! `StructuredDocument`. The editor and exporters never see an absent field.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ────────────────────────────────────────────────────────────────────────────
// Canonical model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDocument {
    pub summary: String,
    /// Bullet points, in display order.
    pub resume_highlights: Vec<String>,
    pub cover_letter: String,
    pub profile_bio: String,
    /// Reverse-chronological by convention only.
    pub experience: Vec<ExperienceEntry>,
    pub qualifications: Qualifications,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub title: String,
    pub organization: String,
    pub date_range: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qualifications {
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<String>,
    pub skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation response candidate
// ────────────────────────────────────────────────────────────────────────────

/// The generation service's response body before normalization.
///
/// Wire names follow the generation backend (`resume`, `linkedIn`, `company`, `dates`); the
/// model names are accepted too. Each field is resolved from an ordered key list, so a body
/// carrying both spellings keeps the first one that has the right type. A value of the wrong
/// type is `None`, and a body that is not an object is an empty candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentCandidate {
    pub summary: Option<String>,
    pub resume: Option<Vec<Value>>,
    pub cover_letter: Option<String>,
    pub linked_in: Option<String>,
    pub experience: Option<Vec<Value>>,
    pub qualifications: Option<QualificationsCandidate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualificationsCandidate {
    pub education: Option<Vec<Value>>,
    pub certifications: Option<Vec<Value>>,
    pub skills: Option<Vec<Value>>,
}

#[derive(Debug, Default)]
struct ExperienceCandidate {
    title: Option<String>,
    company: Option<String>,
    dates: Option<String>,
    details: Option<String>,
}

#[derive(Debug, Default)]
struct EducationCandidate {
    degree: Option<String>,
    institution: Option<String>,
    year: Option<String>,
}

impl DocumentCandidate {
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        Self {
            summary: take(&mut map, &["summary"]),
            resume: take(&mut map, &["resume", "resumeHighlights"]),
            cover_letter: take(&mut map, &["coverLetter"]),
            linked_in: take(&mut map, &["linkedIn", "profileBio"]),
            experience: take(&mut map, &["experience"]),
            qualifications: take::<Map<String, Value>>(&mut map, &["qualifications"])
                .map(QualificationsCandidate::from_map),
        }
    }
}

impl<'de> Deserialize<'de> for DocumentCandidate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl QualificationsCandidate {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            education: take(&mut map, &["education"]),
            certifications: take(&mut map, &["certifications"]),
            skills: take(&mut map, &["skills"]),
        }
    }
}

impl ExperienceCandidate {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            title: take(&mut map, &["title"]),
            company: take(&mut map, &["company", "organization"]),
            dates: take(&mut map, &["dates", "dateRange"]),
            details: take(&mut map, &["details"]),
        }
    }
}

impl EducationCandidate {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            degree: take(&mut map, &["degree"]),
            institution: take(&mut map, &["institution"]),
            year: take(&mut map, &["year"]),
        }
    }
}

/// First key in `keys` whose value deserializes as `T`. Mistyped values are skipped.
fn take<T: DeserializeOwned>(map: &mut Map<String, Value>, keys: &[&str]) -> Option<T> {
    keys.iter()
        .filter_map(|key| map.remove(*key))
        .find_map(|value| serde_json::from_value(value).ok())
}

impl DocumentCandidate {
    /// Fills every missing or mistyped field with its zero value.
    pub fn normalize(self) -> StructuredDocument {
        let qualifications = self.qualifications.unwrap_or_default();

        StructuredDocument {
            summary: self.summary.unwrap_or_default(),
            resume_highlights: string_items(self.resume),
            cover_letter: self.cover_letter.unwrap_or_default(),
            profile_bio: self.linked_in.unwrap_or_default(),
            experience: object_items(self.experience)
                .into_iter()
                .map(ExperienceCandidate::from_map)
                .map(|e| ExperienceEntry {
                    title: e.title.unwrap_or_default(),
                    organization: e.company.unwrap_or_default(),
                    date_range: e.dates.unwrap_or_default(),
                    details: e.details.unwrap_or_default(),
                })
                .collect(),
            qualifications: Qualifications {
                education: object_items(qualifications.education)
                    .into_iter()
                    .map(EducationCandidate::from_map)
                    .map(|e| EducationEntry {
                        degree: e.degree.unwrap_or_default(),
                        institution: e.institution.unwrap_or_default(),
                        year: e.year.unwrap_or_default(),
                    })
                    .collect(),
                certifications: string_items(qualifications.certifications),
                skills: string_items(qualifications.skills),
            },
        }
    }
}

/// Keeps only the string items of a list; anything else is dropped.
fn string_items(items: Option<Vec<Value>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Keeps only the object items of a list.
fn object_items(items: Option<Vec<Value>>) -> Vec<Map<String, Value>> {
    items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> StructuredDocument {
        serde_json::from_value::<DocumentCandidate>(value)
            .unwrap()
            .normalize()
    }

    #[test]
    fn test_empty_object_normalizes_to_default() {
        assert_eq!(normalize(json!({})), StructuredDocument::default());
    }

    #[test]
    fn test_wire_names_map_to_model_fields() {
        let doc = normalize(json!({
            "summary": "Experienced engineer",
            "resume": ["Led team of 5"],
            "coverLetter": "Dear Hiring Manager...",
            "linkedIn": "Results-driven engineer...",
            "experience": [{
                "title": "Engineer",
                "company": "Acme",
                "dates": "2019 - 2024",
                "details": "Shipped things\nFixed things"
            }],
            "qualifications": {
                "education": [{"degree": "BSc", "institution": "MIT", "year": "2018"}],
                "certifications": ["CKA"],
                "skills": ["Rust", "SQL"]
            }
        }));

        assert_eq!(doc.summary, "Experienced engineer");
        assert_eq!(doc.resume_highlights, vec!["Led team of 5"]);
        assert_eq!(doc.cover_letter, "Dear Hiring Manager...");
        assert_eq!(doc.profile_bio, "Results-driven engineer...");
        assert_eq!(doc.experience[0].organization, "Acme");
        assert_eq!(doc.experience[0].date_range, "2019 - 2024");
        assert_eq!(doc.qualifications.education[0].year, "2018");
        assert_eq!(doc.qualifications.certifications, vec!["CKA"]);
        assert_eq!(doc.qualifications.skills.len(), 2);
    }

    #[test]
    fn test_model_names_accepted_as_aliases() {
        let doc = normalize(json!({
            "resumeHighlights": ["a"],
            "profileBio": "bio",
            "experience": [{"organization": "Org", "dateRange": "2020"}]
        }));
        assert_eq!(doc.resume_highlights, vec!["a"]);
        assert_eq!(doc.profile_bio, "bio");
        assert_eq!(doc.experience[0].organization, "Org");
        assert_eq!(doc.experience[0].date_range, "2020");
        assert_eq!(doc.experience[0].title, "");
    }

    #[test]
    fn test_mistyped_highlights_coerced_to_empty() {
        let doc = normalize(json!({ "resume": "not a list", "summary": "ok" }));
        assert!(doc.resume_highlights.is_empty());
        assert_eq!(doc.summary, "ok");
    }

    #[test]
    fn test_mistyped_scalars_and_items_are_dropped() {
        let doc = normalize(json!({
            "summary": 42,
            "coverLetter": null,
            "experience": ["just a string", {"title": "Kept", "details": 7}],
            "qualifications": { "skills": ["Rust", 3, null, "Go"], "education": "none" }
        }));
        assert_eq!(doc.summary, "");
        assert_eq!(doc.cover_letter, "");
        assert_eq!(doc.experience.len(), 1);
        assert_eq!(doc.experience[0].title, "Kept");
        assert_eq!(doc.experience[0].details, "");
        assert_eq!(doc.qualifications.skills, vec!["Rust", "Go"]);
        assert!(doc.qualifications.education.is_empty());
        assert!(doc.qualifications.certifications.is_empty());
    }

    #[test]
    fn test_partial_qualifications_defaulted() {
        let doc = normalize(json!({ "qualifications": { "certifications": ["AWS"] } }));
        assert_eq!(doc.qualifications.certifications, vec!["AWS"]);
        assert!(doc.qualifications.skills.is_empty());
        assert!(doc.qualifications.education.is_empty());
    }

    #[test]
    fn test_both_spellings_present_keeps_wire_name() {
        let doc = normalize(json!({
            "summary": "ok",
            "resume": ["a"],
            "resumeHighlights": ["b"],
            "linkedIn": "wire bio",
            "profileBio": "model bio",
            "experience": [{"company": "Wire Co", "organization": "Model Co", "dates": "2021"}]
        }));
        assert_eq!(doc.summary, "ok");
        assert_eq!(doc.resume_highlights, vec!["a"]);
        assert_eq!(doc.profile_bio, "wire bio");
        assert_eq!(doc.experience[0].organization, "Wire Co");
        assert_eq!(doc.experience[0].date_range, "2021");
    }

    #[test]
    fn test_mistyped_wire_name_falls_back_to_model_name() {
        let doc = normalize(json!({ "resume": 5, "resumeHighlights": ["b"] }));
        assert_eq!(doc.resume_highlights, vec!["b"]);
    }

    #[test]
    fn test_non_object_bodies_normalize_to_default() {
        for body in [json!(null), json!([1, 2]), json!("text"), json!(3)] {
            assert_eq!(normalize(body), StructuredDocument::default());
        }
    }

    #[test]
    fn test_candidate_parses_from_raw_body_with_duplicate_spellings() {
        let candidate: DocumentCandidate =
            serde_json::from_str(r#"{"summary":"ok","resume":["a"],"resumeHighlights":["b"]}"#)
                .unwrap();
        assert_eq!(candidate.normalize().resume_highlights, vec!["a"]);
        let candidate: DocumentCandidate = serde_json::from_str("null").unwrap();
        assert_eq!(candidate, DocumentCandidate::default());
    }

    #[test]
    fn test_document_serializes_in_camel_case() {
        let value = serde_json::to_value(StructuredDocument::default()).unwrap();
        assert!(value.get("resumeHighlights").is_some());
        assert!(value.get("profileBio").is_some());
        assert!(value.get("coverLetter").is_some());
    }
}
