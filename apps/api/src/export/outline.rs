//! Format-neutral outline of a document: the fixed section order and the blocks in each section.
//!
//! Both formatters walk this outline, so section order, placeholder text and line splitting are
//! decided once. The outline carries no styling.

use crate::models::{EducationEntry, ExperienceEntry, StructuredDocument};

pub const SECTION_TITLES: [&str; 8] = [
    "Summary",
    "Resume Highlights",
    "Cover Letter",
    "Bio",
    "Experience",
    "Education",
    "Certifications",
    "Skills",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// One non-empty line of free text.
    Text(String),
    /// One item of a flat list.
    Bullet(String),
    /// `title - organization` line opening an experience entry.
    EntryHeading(String),
    /// Date range line of an experience entry.
    DateRange(String),
    /// Shown in place of an empty collection.
    Placeholder(&'static str),
    /// Blank line between experience entries.
    Spacer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub blocks: Vec<Block>,
}

pub fn outline(doc: &StructuredDocument) -> Vec<Section> {
    let q = &doc.qualifications;
    vec![
        Section {
            title: SECTION_TITLES[0],
            blocks: text_blocks(&doc.summary),
        },
        Section {
            title: SECTION_TITLES[1],
            blocks: bullet_blocks(&doc.resume_highlights, "No highlights available."),
        },
        Section {
            title: SECTION_TITLES[2],
            blocks: text_blocks(&doc.cover_letter),
        },
        Section {
            title: SECTION_TITLES[3],
            blocks: text_blocks(&doc.profile_bio),
        },
        Section {
            title: SECTION_TITLES[4],
            blocks: experience_blocks(&doc.experience),
        },
        Section {
            title: SECTION_TITLES[5],
            blocks: if q.education.is_empty() {
                vec![Block::Placeholder("No education data provided.")]
            } else {
                q.education.iter().map(|e| Block::Text(education_line(e))).collect()
            },
        },
        Section {
            title: SECTION_TITLES[6],
            blocks: bullet_blocks(&q.certifications, "No certifications provided."),
        },
        Section {
            title: SECTION_TITLES[7],
            blocks: bullet_blocks(&q.skills, "No skills provided."),
        },
    ]
}

/// Splits free text on line breaks (`\n` or `\r\n`) and keeps the non-blank lines.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim_end).filter(|l| !l.trim().is_empty())
}

fn text_blocks(text: &str) -> Vec<Block> {
    split_lines(text).map(|l| Block::Text(l.to_string())).collect()
}

fn bullet_blocks(items: &[String], placeholder: &'static str) -> Vec<Block> {
    if items.is_empty() {
        return vec![Block::Placeholder(placeholder)];
    }
    items.iter().map(|i| Block::Bullet(i.clone())).collect()
}

fn experience_blocks(entries: &[ExperienceEntry]) -> Vec<Block> {
    if entries.is_empty() {
        return vec![Block::Placeholder("No experience data provided.")];
    }
    let mut blocks = Vec::new();
    for entry in entries {
        let heading = join_non_empty(&[&entry.title, &entry.organization], " - ");
        if !heading.is_empty() {
            blocks.push(Block::EntryHeading(heading));
        }
        if !entry.date_range.trim().is_empty() {
            blocks.push(Block::DateRange(entry.date_range.clone()));
        }
        blocks.extend(text_blocks(&entry.details));
        blocks.push(Block::Spacer);
    }
    blocks
}

/// `degree, institution (year)`, leaving out whatever is empty.
fn education_line(entry: &EducationEntry) -> String {
    let mut line = join_non_empty(&[&entry.degree, &entry.institution], ", ");
    let year = entry.year.trim();
    if !year.is_empty() {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&format!("({year})"));
    }
    line
}

fn join_non_empty(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Qualifications;

    #[test]
    fn test_empty_document_has_all_sections_in_order() {
        let sections = outline(&StructuredDocument::default());
        let titles: Vec<_> = sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, SECTION_TITLES);
        assert!(sections[0].blocks.is_empty());
        assert_eq!(
            sections[1].blocks,
            vec![Block::Placeholder("No highlights available.")]
        );
        assert!(sections[2].blocks.is_empty());
        assert_eq!(
            sections[4].blocks,
            vec![Block::Placeholder("No experience data provided.")]
        );
    }

    #[test]
    fn test_free_text_splits_and_drops_blank_lines() {
        let doc = StructuredDocument {
            cover_letter: "Dear team,\n\nI am applying.\r\nRegards".into(),
            ..Default::default()
        };
        assert_eq!(
            outline(&doc)[2].blocks,
            vec![
                Block::Text("Dear team,".into()),
                Block::Text("I am applying.".into()),
                Block::Text("Regards".into()),
            ]
        );
    }

    #[test]
    fn test_experience_details_keep_line_order() {
        let doc = StructuredDocument {
            experience: vec![ExperienceEntry {
                title: "Engineer".into(),
                organization: "Acme".into(),
                date_range: "2020 - 2024".into(),
                details: "first\nsecond\nthird\nfourth".into(),
            }],
            ..Default::default()
        };
        assert_eq!(
            outline(&doc)[4].blocks,
            vec![
                Block::EntryHeading("Engineer - Acme".into()),
                Block::DateRange("2020 - 2024".into()),
                Block::Text("first".into()),
                Block::Text("second".into()),
                Block::Text("third".into()),
                Block::Text("fourth".into()),
                Block::Spacer,
            ]
        );
    }

    #[test]
    fn test_blank_experience_entry_renders_only_spacer() {
        let doc = StructuredDocument {
            experience: vec![ExperienceEntry::default()],
            ..Default::default()
        };
        assert_eq!(outline(&doc)[4].blocks, vec![Block::Spacer]);
    }

    #[test]
    fn test_education_line_omits_empty_parts() {
        let full = EducationEntry {
            degree: "BSc".into(),
            institution: "MIT".into(),
            year: "2018".into(),
        };
        assert_eq!(education_line(&full), "BSc, MIT (2018)");
        let no_year = EducationEntry {
            year: String::new(),
            ..full.clone()
        };
        assert_eq!(education_line(&no_year), "BSc, MIT");
        let only_year = EducationEntry {
            year: "2018".into(),
            ..Default::default()
        };
        assert_eq!(education_line(&only_year), "(2018)");
    }

    #[test]
    fn test_flat_lists_become_bullets() {
        let doc = StructuredDocument {
            qualifications: Qualifications {
                skills: vec!["Rust".into(), "".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            outline(&doc)[7].blocks,
            vec![Block::Bullet("Rust".into()), Block::Bullet("".into())]
        );
    }
}
