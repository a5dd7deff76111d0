use std::io::Cursor;

use ::image::codecs::jpeg::JpegEncoder;
use ::image::imageops::{self, FilterType};
use ::image::{DynamicImage, ImageDecoder, ImageReader, Rgba, RgbaImage};
use async_trait::async_trait;

use crate::error::{ThumbError, ThumbErrorKind, ThumbResult};
use crate::generator::{Generator, GeneratorContext, Thumbnail};
use crate::media::MediaDescriptor;
use crate::metadata::MediaKind;

/// Decodes `data`, applying its EXIF orientation.
fn decode_oriented(data: &[u8]) -> ThumbResult<DynamicImage> {
    let mut decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Renders a JPEG thumbnail fitting within `width`x`height`.
///
/// The aspect ratio is kept and small images are not enlarged. Transparency is
/// flattened onto white since JPEG has no alpha channel.
pub fn render_jpeg_thumbnail(
    data: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> ThumbResult<Vec<u8>> {
    let img = decode_oriented(data)?;
    let img = if img.width() > width || img.height() > height {
        img.resize(width, height, FilterType::CatmullRom)
    } else {
        img
    };

    let top = img.to_rgba8();
    let mut canvas = RgbaImage::from_pixel(top.width(), top.height(), Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &top, 0, 0);
    let flat = DynamicImage::ImageRgba8(canvas).to_rgb8();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality).encode_image(&flat)?;
    Ok(out)
}

/// Raster images, resized in-process.
pub struct ImageGenerator {
    context: GeneratorContext,
}

impl ImageGenerator {
    pub fn new(context: GeneratorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Generator for ImageGenerator {
    fn kind(&self) -> MediaKind {
        MediaKind::Image
    }

    async fn exists(&self, media: &mut MediaDescriptor) -> bool {
        self.context.cache.exists(media).await
    }

    async fn generate(&self, media: &mut MediaDescriptor) -> ThumbResult<()> {
        let data = self
            .context
            .read_source(media)
            .await
            .map_err(|e| e.into_generation(format!("cannot read {}", media.source_path())))?;

        let config = &self.context.config;
        let (width, height) = (config.thumb_width, config.thumb_height);
        let quality = config.jpeg_quality;
        let jpeg = tokio::task::spawn_blocking(move || {
            render_jpeg_thumbnail(&data, width, height, quality)
        })
        .await
        .map_err(|e| {
            ThumbError::new(ThumbErrorKind::GenerationFailed, format!("Join error: {}", e))
        })?
        .map_err(|e| e.into_generation(format!("cannot thumbnail {}", media.source_path())))?;

        self.context.cache.write(media, &jpeg).await
    }

    async fn retrieve(&self, media: &MediaDescriptor) -> ThumbResult<Thumbnail> {
        self.context.open_cached(media).await
    }
}
