use super::{Emitter, Logo};
use crate::core::Letter;
use crate::domain::model::OutputFormat;
use crate::utils::error::{DocGenError, Result};
use image::{DynamicImage, Rgb, RgbImage};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};

// US Letter, in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;

const LEFT_MARGIN: f32 = 50.0;
const TOP_MARGIN: f32 = 50.0;
const LOGO_GAP: f32 = 20.0;

const HEADING_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 12.0;
const BODY_LEADING: f32 = BODY_SIZE * 1.2;
const BODY_BLOCK_MIN: f32 = 80.0;
const CLOSING_LEADING: f32 = 20.0;

/// Rough Helvetica line capacity at 12pt between the side margins.
const MAX_LINE_CHARS: usize = 85;

fn pt(value: f32) -> Mm {
    Mm(value * 25.4 / 72.0)
}

fn pdf_error(e: impl std::fmt::Debug) -> DocGenError {
    DocGenError::PdfError {
        message: format!("{:?}", e),
    }
}

/// Renders a letter onto a single US Letter page.
#[derive(Debug, Clone)]
pub struct PdfEmitter {
    logo_max_width: f32,
    logo_max_height: f32,
}

impl PdfEmitter {
    pub fn new(logo_max_width: f32, logo_max_height: f32) -> Self {
        Self {
            logo_max_width,
            logo_max_height,
        }
    }
}

impl Default for PdfEmitter {
    fn default() -> Self {
        Self::new(150.0, 100.0)
    }
}

impl Emitter for PdfEmitter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }

    fn render(&self, letter: &Letter, logo: Option<&Logo>) -> Result<Vec<u8>> {
        let (doc, page, layer) =
            PdfDocument::new(&letter.heading, pt(PAGE_WIDTH), pt(PAGE_HEIGHT), "Letter");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let mut y = PAGE_HEIGHT - TOP_MARGIN;

        if let Some(logo) = logo {
            let (width, height) = logo.fit_within(self.logo_max_width, self.logo_max_height);
            if width > 0.0 && height > 0.0 {
                let x = ((PAGE_WIDTH - width) / 2.0).floor();
                // dpi 72 makes one pixel one point before scaling
                Image::from_dynamic_image(&flatten(logo.image())).add_to_layer(
                    layer.clone(),
                    ImageTransform {
                        translate_x: Some(pt(x)),
                        translate_y: Some(pt(y - height)),
                        scale_x: Some(width / logo.width() as f32),
                        scale_y: Some(height / logo.height() as f32),
                        dpi: Some(72.0),
                        ..Default::default()
                    },
                );
                y -= height + LOGO_GAP;
            }
        }

        layer.use_text(&letter.heading, HEADING_SIZE, pt(LEFT_MARGIN), pt(y), &bold);
        y -= 40.0;

        layer.use_text(&letter.salutation, BODY_SIZE, pt(LEFT_MARGIN), pt(y), &regular);
        y -= 25.0;

        let body = body_lines(&letter.body);
        for (i, line) in body.iter().enumerate() {
            let line_y = y - i as f32 * BODY_LEADING;
            layer.use_text(line, BODY_SIZE, pt(LEFT_MARGIN), pt(line_y), &regular);
        }
        y -= (body.len() as f32 * BODY_LEADING + 20.0).max(BODY_BLOCK_MIN);

        for line in &letter.closing {
            layer.use_text(line, BODY_SIZE, pt(LEFT_MARGIN), pt(y), &regular);
            y -= CLOSING_LEADING;
        }

        doc.save_to_bytes().map_err(pdf_error)
    }
}

/// One line per sentence, each ending in a period, wrapped to the page width.
fn body_lines(body: &[String]) -> Vec<String> {
    let text = body.join(" ");
    text.split(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.ends_with('.') {
                s.to_string()
            } else {
                format!("{}.", s)
            }
        })
        .flat_map(|sentence| wrap(&sentence, MAX_LINE_CHARS))
        .collect()
}

fn wrap(line: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if !current.is_empty() && needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// PDF images carry no alpha here, so transparent pixels are composited onto white.
fn flatten(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let p = rgba.get_pixel(x, y);
        let alpha = p[3] as u16;
        let blend = |c: u8| ((c as u16 * alpha + 255 * (255 - alpha)) / 255) as u8;
        Rgb([blend(p[0]), blend(p[1]), blend(p[2])])
    });
    DynamicImage::ImageRgb8(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emitter::test_support;
    use crate::core::template::WELCOME_LETTER;
    use crate::domain::model::{Record, RecordFields};
    use image::{GenericImageView, Rgba, RgbaImage};

    fn letter() -> Letter {
        WELCOME_LETTER.render(&Record::from_fields(RecordFields {
            name: Some("Jane Doe".to_string()),
            company: Some("Acme".to_string()),
            position: Some("Engineer".to_string()),
            joining_date: Some("2024-01-10".to_string()),
            ..Default::default()
        }))
    }

    #[test]
    fn test_render_produces_pdf() {
        let bytes = PdfEmitter::default().render(&letter(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 200);
    }

    /// Text of every show-text operation on the first page, in drawing order.
    fn shown_text(bytes: &[u8]) -> Vec<String> {
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = lopdf::content::Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

        let mut lines = Vec::new();
        for op in &content.operations {
            let strings: Vec<&lopdf::Object> = match op.operator.as_str() {
                "Tj" => op.operands.iter().collect(),
                "TJ" => op
                    .operands
                    .iter()
                    .filter_map(|o| o.as_array().ok())
                    .flatten()
                    .collect(),
                _ => continue,
            };
            let text: String = strings
                .into_iter()
                .filter_map(|o| o.as_str().ok())
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .collect();
            lines.push(text);
        }
        lines
    }

    #[test]
    fn test_rendered_text_follows_letter() {
        let bytes = PdfEmitter::default().render(&letter(), None).unwrap();
        let lines = shown_text(&bytes);

        assert_eq!(lines[0], "Welcome to Your New Role!");
        assert_eq!(lines[1], "Dear Jane Doe,");
        assert!(lines.contains(&"We are delighted to welcome you as our new Engineer at Acme.".to_string()));
        assert!(lines.contains(&"Your joining date is 2024-01-10.".to_string()));
        assert!(lines.iter().any(|l| l.contains("Human Resources")));
    }

    #[test]
    fn test_rendered_text_uses_placeholders() {
        let letter = WELCOME_LETTER.render(&Record::from_fields(RecordFields {
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        }));
        let bytes = PdfEmitter::default().render(&letter, None).unwrap();
        let lines = shown_text(&bytes);

        assert!(lines.contains(&"We are delighted to welcome you as our new your position at our company.".to_string()));
        assert!(lines.contains(&"Your joining date is TBA.".to_string()));
    }

    #[test]
    fn test_render_with_logo() {
        let logo = test_support::logo(300, 120);
        let without = PdfEmitter::default().render(&letter(), None).unwrap();
        let with = PdfEmitter::default().render(&letter(), Some(&logo)).unwrap();
        assert!(with.starts_with(b"%PDF"));
        assert!(with.len() > without.len());
    }

    #[test]
    fn test_body_is_split_into_sentences() {
        let lines = body_lines(&letter().body);
        assert_eq!(
            lines,
            vec![
                "We are delighted to welcome you as our new Engineer at Acme.",
                "Your joining date is 2024-01-10.",
                "We are confident that you will make a significant contribution to our team.",
            ]
        );
    }

    #[test]
    fn test_long_sentences_are_wrapped() {
        let long = "word ".repeat(40);
        let lines = wrap(long.trim(), 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), long.trim());
    }

    #[test]
    fn test_flatten_blends_transparency_onto_white() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])));
        let flat = flatten(&image);
        assert_eq!(flat.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }
}
