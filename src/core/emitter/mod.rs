//! Document emitters.
//!
//! Both variants take an already interpolated [`Letter`] and return the bytes
//! of one finished document; writing them out is the engine's job.

pub mod pdf;
pub mod word;

pub use pdf::PdfEmitter;
pub use word::WordEmitter;

use crate::core::{Letter, Record};
use crate::domain::model::{LogoSettings, OutputFormat};
use crate::utils::error::Result;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use std::io::Cursor;
use std::path::Path;

pub trait Emitter: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn render(&self, letter: &Letter, logo: Option<&Logo>) -> Result<Vec<u8>>;
}

pub fn emitter_for(format: OutputFormat, logo: &LogoSettings) -> Box<dyn Emitter> {
    match format {
        OutputFormat::Word => Box::new(WordEmitter::new(logo.word_width_inches)),
        OutputFormat::Pdf => Box::new(PdfEmitter::new(logo.pdf_max_width, logo.pdf_max_height)),
    }
}

/// `<Name>_<Company>.<ext>`, with spaces and path separators turned into underscores.
pub fn output_file_name(record: &Record, format: OutputFormat) -> String {
    format!(
        "{}_{}.{}",
        file_component(&record.name),
        file_component(&record.company),
        format.extension()
    )
}

fn file_component(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

/// A decoded company logo, ready to be embedded by either emitter.
#[derive(Debug, Clone)]
pub struct Logo {
    image: DynamicImage,
    png: Vec<u8>,
}

impl Logo {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
        Ok(Self { image, png })
    }

    /// `Ok(None)` when there is no file at `path`.
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(None);
        }
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(&bytes).map(Some)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// PNG re-encoding of the logo, whatever format it was loaded from.
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Largest size that fits in `max_width` x `max_height` with the same aspect ratio.
    pub fn fit_within(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return (0.0, 0.0);
        }
        let ratio = (max_width / width as f32).min(max_height / height as f32);
        (
            (width as f32 * ratio).floor(),
            (height as f32 * ratio).floor(),
        )
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Logo;
    use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    pub fn logo(width: u32, height: u32) -> Logo {
        Logo::from_bytes(&png_bytes(width, height)).unwrap()
    }
}
