//! DOCX formatter: the outline as a flat paragraph sequence. Pagination is left to the viewer.

use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, SpecialIndentType, Start,
};

use crate::export::outline::{outline, Block};
use crate::export::ExportError;
use crate::models::StructuredDocument;

const BULLET_NUMBERING_ID: usize = 1;
/// Run sizes are in half-points.
const HEADING_SIZE: usize = 24;

pub fn render(doc: &StructuredDocument) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new()
        .add_abstract_numbering(
            AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(
                Level::new(
                    0,
                    Start::new(1),
                    NumberFormat::new("bullet"),
                    LevelText::new("\u{2022}"),
                    LevelJc::new("left"),
                )
                .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None),
            ),
        )
        .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID));

    let sections = outline(doc);
    let last = sections.len().saturating_sub(1);
    for (i, section) in sections.iter().enumerate() {
        docx = docx.add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(section.title).bold().size(HEADING_SIZE)),
        );
        for block in &section.blocks {
            docx = docx.add_paragraph(block_paragraph(block));
        }
        if i != last {
            docx = docx.add_paragraph(Paragraph::new());
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}

fn block_paragraph(block: &Block) -> Paragraph {
    match block {
        Block::Text(text) => Paragraph::new().add_run(Run::new().add_text(text)),
        Block::Bullet(item) => Paragraph::new()
            .add_run(Run::new().add_text(item))
            .numbering(NumberingId::new(BULLET_NUMBERING_ID), IndentLevel::new(0)),
        Block::EntryHeading(text) => Paragraph::new().add_run(Run::new().add_text(text).bold()),
        Block::DateRange(text) => {
            Paragraph::new().add_run(Run::new().add_text(text).bold().italic())
        }
        Block::Placeholder(text) => Paragraph::new().add_run(Run::new().add_text(*text).italic()),
        Block::Spacer => Paragraph::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::outline::SECTION_TITLES;
    use crate::intake::docx_paragraphs;
    use crate::models::{ExperienceEntry, Qualifications};

    #[test]
    fn test_empty_document_contains_every_heading() {
        let bytes = render(&StructuredDocument::default()).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let paragraphs = docx_paragraphs(&bytes).unwrap();
        for title in SECTION_TITLES {
            assert!(paragraphs.iter().any(|p| p == title), "missing heading {title}");
        }
        assert!(paragraphs.iter().any(|p| p == "No skills provided."));
    }

    #[test]
    fn test_details_become_separate_paragraphs_in_order() {
        let doc = StructuredDocument {
            experience: vec![ExperienceEntry {
                title: "Engineer".into(),
                organization: "Acme".into(),
                date_range: "2019 - 2023".into(),
                details: "one\ntwo\nthree\nfour".into(),
            }],
            ..Default::default()
        };
        let paragraphs = docx_paragraphs(&render(&doc).unwrap()).unwrap();
        let start = paragraphs.iter().position(|p| p == "Engineer - Acme").unwrap();
        assert_eq!(
            &paragraphs[start..start + 6],
            &["Engineer - Acme", "2019 - 2023", "one", "two", "three", "four"]
        );
    }

    #[test]
    fn test_section_order_matches_outline() {
        let doc = StructuredDocument {
            summary: "s".into(),
            qualifications: Qualifications {
                skills: vec!["Rust".into()],
                ..Default::default()
            },
            ..Default::default()
        };
        let paragraphs = docx_paragraphs(&render(&doc).unwrap()).unwrap();
        let positions: Vec<usize> = SECTION_TITLES
            .iter()
            .map(|t| paragraphs.iter().position(|p| p == t).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(paragraphs.last().map(String::as_str), Some("Rust"));
    }
}
