//! Addressing for the editable parts of a `StructuredDocument`: scalar fields, repeatable
//! collections, and the values/patches written into them.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::models::{EducationEntry, ExperienceEntry, StructuredDocument};

/// A free-text field replaced wholesale by `set_scalar_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Summary,
    CoverLetter,
    ProfileBio,
}

impl ScalarField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarField::Summary => "summary",
            ScalarField::CoverLetter => "coverLetter",
            ScalarField::ProfileBio => "profileBio",
        }
    }

    pub(crate) fn slot<'a>(&self, doc: &'a mut StructuredDocument) -> &'a mut String {
        match self {
            ScalarField::Summary => &mut doc.summary,
            ScalarField::CoverLetter => &mut doc.cover_letter,
            ScalarField::ProfileBio => &mut doc.profile_bio,
        }
    }
}

impl FromStr for ScalarField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(ScalarField::Summary),
            "coverLetter" => Ok(ScalarField::CoverLetter),
            "profileBio" => Ok(ScalarField::ProfileBio),
            other => Err(format!("Unknown document field '{other}'")),
        }
    }
}

/// A repeatable, index-addressed part of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    ResumeHighlights,
    Experience,
    Education,
    Certifications,
    Skills,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::ResumeHighlights => "resumeHighlights",
            Collection::Experience => "experience",
            Collection::Education => "education",
            Collection::Certifications => "certifications",
            Collection::Skills => "skills",
        }
    }

    /// Flat string lists take `ListValue::Text`; the entry collections take patches.
    pub fn holds_text(&self) -> bool {
        matches!(
            self,
            Collection::ResumeHighlights | Collection::Certifications | Collection::Skills
        )
    }

    pub(crate) fn len(&self, doc: &StructuredDocument) -> usize {
        match self {
            Collection::ResumeHighlights => doc.resume_highlights.len(),
            Collection::Experience => doc.experience.len(),
            Collection::Education => doc.qualifications.education.len(),
            Collection::Certifications => doc.qualifications.certifications.len(),
            Collection::Skills => doc.qualifications.skills.len(),
        }
    }

    /// The backing list for a flat text collection, `None` for entry collections.
    pub(crate) fn text_list<'a>(&self, doc: &'a mut StructuredDocument) -> Option<&'a mut Vec<String>> {
        match self {
            Collection::ResumeHighlights => Some(&mut doc.resume_highlights),
            Collection::Certifications => Some(&mut doc.qualifications.certifications),
            Collection::Skills => Some(&mut doc.qualifications.skills),
            Collection::Experience | Collection::Education => None,
        }
    }

    /// Appends a zero-valued item and returns its index.
    pub(crate) fn push_empty(&self, doc: &mut StructuredDocument) -> usize {
        match self {
            Collection::Experience => doc.experience.push(ExperienceEntry::default()),
            Collection::Education => doc.qualifications.education.push(EducationEntry::default()),
            _ => {
                if let Some(list) = self.text_list(doc) {
                    list.push(String::new());
                }
            }
        }
        self.len(doc) - 1
    }

    /// Removes the item at `index`. Returns `false` (and leaves the list alone) when it does not exist.
    pub(crate) fn remove(&self, doc: &mut StructuredDocument, index: usize) -> bool {
        if index >= self.len(doc) {
            return false;
        }
        match self {
            Collection::Experience => {
                doc.experience.remove(index);
            }
            Collection::Education => {
                doc.qualifications.education.remove(index);
            }
            _ => {
                if let Some(list) = self.text_list(doc) {
                    list.remove(index);
                }
            }
        }
        true
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resumeHighlights" => Ok(Collection::ResumeHighlights),
            "experience" => Ok(Collection::Experience),
            "education" => Ok(Collection::Education),
            "certifications" => Ok(Collection::Certifications),
            "skills" => Ok(Collection::Skills),
            other => Err(format!("Unknown document collection '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Values and patches
// ────────────────────────────────────────────────────────────────────────────

/// Partial update for an experience entry. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExperiencePatch {
    pub title: Option<String>,
    pub organization: Option<String>,
    pub date_range: Option<String>,
    pub details: Option<String>,
}

impl ExperiencePatch {
    pub fn apply(self, entry: &mut ExperienceEntry) {
        merge(&mut entry.title, self.title);
        merge(&mut entry.organization, self.organization);
        merge(&mut entry.date_range, self.date_range);
        merge(&mut entry.details, self.details);
    }
}

/// Partial update for an education entry. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EducationPatch {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub year: Option<String>,
}

impl EducationPatch {
    pub fn apply(self, entry: &mut EducationEntry) {
        merge(&mut entry.degree, self.degree);
        merge(&mut entry.institution, self.institution);
        merge(&mut entry.year, self.year);
    }
}

fn merge(slot: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// The value written by `update_list_item`: replacement text for flat lists, a patch for entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListValue {
    Text(String),
    Experience(ExperiencePatch),
    Education(EducationPatch),
}

impl ListValue {
    /// Reads a JSON value as the shape the target collection expects.
    ///
    /// A string is only accepted for flat lists and an object only for entry collections.
    /// Patches reject unknown keys, so an education patch never passes as an experience one.
    pub fn for_collection(value: serde_json::Value, collection: Collection) -> Option<Self> {
        match (collection, value) {
            (c, serde_json::Value::String(s)) if c.holds_text() => Some(ListValue::Text(s)),
            (Collection::Experience, v @ serde_json::Value::Object(_)) => {
                serde_json::from_value(v).ok().map(ListValue::Experience)
            }
            (Collection::Education, v @ serde_json::Value::Object(_)) => {
                serde_json::from_value(v).ok().map(ListValue::Education)
            }
            _ => None,
        }
    }
}
