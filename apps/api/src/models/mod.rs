pub mod document;

pub use document::{
    DocumentCandidate, EducationEntry, ExperienceEntry, Qualifications, StructuredDocument,
};
