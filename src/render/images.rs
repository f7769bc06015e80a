use std::time::Duration;

use image::imageops::FilterType;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use resvg::tiny_skia::{self, ColorU8, Pixmap, Transform};
use resvg::usvg;
use tracing::{debug, instrument, warn};

use crate::error::ImageLoadError;

const IMAGE_TIMEOUT: Duration = Duration::from_secs(10);
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Where an auxiliary image goes on the card and what replaces it when it
/// cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Avatar,
    Flag,
    Level,
}

impl ImageSlot {
    /// Pixel size the image is rasterized or resized to.
    pub fn size(self) -> (u32, u32) {
        match self {
            ImageSlot::Avatar => (150, 150),
            ImageSlot::Flag => (60, 45),
            ImageSlot::Level => (70, 70),
        }
    }

    /// Top-left corner on the card.
    pub fn position(self) -> (i32, i32) {
        match self {
            ImageSlot::Avatar => (50, 50),
            ImageSlot::Flag => (220, 55),
            ImageSlot::Level => (220, 110),
        }
    }

    pub fn placeholder_size(self) -> (u32, u32) {
        match self {
            ImageSlot::Level => (45, 45),
            slot => slot.size(),
        }
    }

    pub fn placeholder_color(self) -> tiny_skia::Color {
        match self {
            ImageSlot::Avatar => tiny_skia::Color::from_rgba8(100, 100, 100, 255),
            ImageSlot::Flag => tiny_skia::Color::from_rgba8(200, 100, 100, 255),
            ImageSlot::Level => tiny_skia::Color::from_rgba8(100, 200, 100, 255),
        }
    }
}

/// Outcome of loading one auxiliary image.
#[derive(Debug)]
pub enum AuxImage {
    Loaded(Pixmap),
    Placeholder(ImageLoadError),
}

impl AuxImage {
    pub fn is_loaded(&self) -> bool {
        matches!(self, AuxImage::Loaded(_))
    }
}

/// Load the image for `slot`, falling back to a placeholder on any failure.
pub(crate) async fn load_aux(client: &reqwest::Client, slot: ImageSlot, url: Option<&str>) -> AuxImage {
    let Some(url) = url else {
        debug!(?slot, "no image url, using placeholder");
        return AuxImage::Placeholder(ImageLoadError::MissingUrl);
    };

    let (width, height) = slot.size();
    match load_image(client, url, width, height).await {
        Ok(pixmap) => AuxImage::Loaded(pixmap),
        Err(e) => {
            warn!(?slot, error = %e, "image load failed, using placeholder");
            AuxImage::Placeholder(e)
        }
    }
}

/// Download an image and bring it to exactly `width`×`height` pixels.
///
/// SVG content (by content type or `.svg` suffix) is rasterized at that
/// size, anything else is decoded and resized.
#[instrument(skip(client))]
pub async fn load_image(
    client: &reqwest::Client,
    url: &str,
    width: u32,
    height: u32,
) -> Result<Pixmap, ImageLoadError> {
    let response = client
        .get(url)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .timeout(IMAGE_TIMEOUT)
        .send()
        .await
        .map_err(|e| ImageLoadError::Http {
            url: url.to_owned(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImageLoadError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let is_svg = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("svg"))
        || url.ends_with(".svg");

    let body = response.bytes().await.map_err(|e| ImageLoadError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    if is_svg {
        rasterize_svg(url, &body, width, height)
    } else {
        decode_raster(url, &body, width, height)
    }
}

fn rasterize_svg(url: &str, data: &[u8], width: u32, height: u32) -> Result<Pixmap, ImageLoadError> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default()).map_err(|e| {
        ImageLoadError::Svg {
            url: url.to_owned(),
            source: e,
        }
    })?;

    let mut pixmap = Pixmap::new(width, height).ok_or(ImageLoadError::Pixmap { width, height })?;
    let size = tree.size();
    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

fn decode_raster(url: &str, data: &[u8], width: u32, height: u32) -> Result<Pixmap, ImageLoadError> {
    let image = image::load_from_memory(data)
        .map_err(|e| ImageLoadError::Decode {
            url: url.to_owned(),
            source: e,
        })?
        .resize_exact(width, height, FilterType::CatmullRom)
        .to_rgba8();

    let mut pixmap = Pixmap::new(width, height).ok_or(ImageLoadError::Pixmap { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
