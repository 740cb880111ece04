use super::{Emitter, Logo};
use crate::core::Letter;
use crate::domain::model::OutputFormat;
use crate::utils::error::{DocGenError, Result};
use docx_rs::*;
use std::io::Cursor;

const EMU_PER_INCH: f32 = 914_400.0;
const HEADING_STYLE: &str = "Heading1";

/// Renders a letter as a `.docx` document.
#[derive(Debug, Clone)]
pub struct WordEmitter {
    logo_width_inches: f32,
}

impl WordEmitter {
    pub fn new(logo_width_inches: f32) -> Self {
        Self { logo_width_inches }
    }

    fn picture(&self, logo: &Logo) -> Pic {
        let width_emu = (self.logo_width_inches * EMU_PER_INCH) as u32;
        let height_emu = (width_emu as f32 * logo.height() as f32 / logo.width().max(1) as f32) as u32;

        Pic::new_with_dimensions(logo.png_bytes().to_vec(), logo.width(), logo.height())
            .size(width_emu, height_emu)
    }
}

impl Default for WordEmitter {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl Emitter for WordEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Word
    }

    fn render(&self, letter: &Letter, logo: Option<&Logo>) -> Result<Vec<u8>> {
        let heading_style = Style::new(HEADING_STYLE, StyleType::Paragraph)
            .name("Heading 1")
            .bold()
            .size(32); // half-points, 16pt
        let mut docx = Docx::new().add_style(heading_style);

        if let Some(logo) = logo {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_image(self.picture(logo))));
        }

        let heading_run = Run::new().add_text(&letter.heading).bold().size(32);
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(heading_run)
                .style(HEADING_STYLE),
        );

        let lines = std::iter::once(&letter.salutation)
            .chain(letter.body.iter())
            .chain(letter.closing.iter());
        for line in lines {
            let run = Run::new().add_text(line).size(22); // 11pt
            docx = docx.add_paragraph(Paragraph::new().add_run(run));
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| DocGenError::DocxError {
                message: format!("Failed to pack DOCX: {}", e),
            })?;

        Ok(buf.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emitter::test_support;
    use crate::core::template::WELCOME_LETTER;
    use crate::domain::model::{Record, RecordFields};
    use std::io::Read;

    fn document_xml(bytes: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name("word/document.xml").unwrap();
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();
        xml
    }

    fn letter_for(fields: RecordFields) -> Letter {
        WELCOME_LETTER.render(&Record::from_fields(fields))
    }

    #[test]
    fn test_render_contains_letter_text() {
        let letter = letter_for(RecordFields {
            name: Some("Jane Doe".to_string()),
            company: Some("Acme".to_string()),
            position: Some("Engineer".to_string()),
            joining_date: Some("2024-01-10".to_string()),
            ..Default::default()
        });

        let bytes = WordEmitter::default().render(&letter, None).unwrap();

        // DOCX 是 zip，以 PK 開頭
        assert_eq!(&bytes[0..2], b"PK");
        let xml = document_xml(&bytes);
        assert!(xml.contains("Welcome to Your New Role!"));
        assert!(xml.contains("Dear Jane Doe,"));
        assert!(xml.contains("new Engineer at Acme"));
        assert!(xml.contains("Your joining date is 2024-01-10."));
        assert!(xml.contains("Human Resources"));
    }

    #[test]
    fn test_render_uses_placeholders_for_missing_fields() {
        let letter = letter_for(RecordFields {
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        });

        let xml = document_xml(&WordEmitter::default().render(&letter, None).unwrap());

        assert!(xml.contains("your position"));
        assert!(xml.contains("our company"));
        assert!(xml.contains("Your joining date is TBA."));
    }

    #[test]
    fn test_render_with_logo_embeds_media() {
        let letter = letter_for(RecordFields::default());
        let logo = test_support::logo(40, 20);

        let bytes = WordEmitter::new(2.0).render(&letter, Some(&logo)).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let has_media = (0..archive.len())
            .any(|i| archive.by_index(i).unwrap().name().starts_with("word/media/"));
        assert!(has_media);
    }
}
