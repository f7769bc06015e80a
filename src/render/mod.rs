//! Player card rendering.
//!
//! Texts and stat tables are laid out as an SVG document and rasterized with
//! resvg; avatar, flag and level images are then composited onto the pixmap.

pub mod images;
pub mod layout;

use std::path::Path;
use std::sync::Arc;

use resvg::tiny_skia::{FillRule, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform};
use resvg::usvg::{self, fontdb};
use tracing::{debug, error, info, instrument, warn};

use crate::error::RenderError;
use crate::model::PlayerStats;

pub use images::{load_image, AuxImage, ImageSlot};
pub use layout::{main_value_tint, Tint, CARD_HEIGHT, CARD_WIDTH};

/// Renders [`PlayerStats`] into a 1600×820 player card.
#[derive(Clone)]
pub struct CardRenderer {
    http: reqwest::Client,
    fontdb: Arc<fontdb::Database>,
}

impl CardRenderer {
    /// Create a renderer that downloads images with `http` and loads fonts
    /// from `fonts_dir` in addition to the system fonts.
    pub fn new(http: reqwest::Client, fonts_dir: impl AsRef<Path>) -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_fonts_dir(fonts_dir.as_ref());
        let bundled = fontdb.len();
        fontdb.load_system_fonts();
        debug!(
            bundled,
            total = fontdb.len(),
            dir = %fonts_dir.as_ref().display(),
            "loaded font faces"
        );
        if !has_family(&fontdb, layout::FONT_FAMILY) {
            match fallback_family(&mut fontdb) {
                Some(family) => warn!(
                    dir = %fonts_dir.as_ref().display(),
                    fallback = %family,
                    "{} fonts not found, card text uses the fallback family",
                    layout::FONT_FAMILY
                ),
                None => error!(
                    dir = %fonts_dir.as_ref().display(),
                    "no fonts available, card text cannot be drawn"
                ),
            }
        }

        Self {
            http,
            fontdb: Arc::new(fontdb),
        }
    }

    /// Compose the card for `stats`.
    ///
    /// Missing or broken avatar, flag and level images are replaced by
    /// placeholders and never fail the call.
    #[instrument(skip_all, fields(name = %stats.name))]
    pub async fn render(&self, stats: &PlayerStats) -> Result<Pixmap, RenderError> {
        let svg = layout::card_svg(stats)?;

        let (avatar, flag, level) = tokio::join!(
            images::load_aux(&self.http, ImageSlot::Avatar, stats.avatar_url.as_deref()),
            images::load_aux(&self.http, ImageSlot::Flag, stats.flag_url.as_deref()),
            images::load_aux(&self.http, ImageSlot::Level, stats.level_url.as_deref()),
        );
        let images = vec![
            (ImageSlot::Avatar, avatar),
            (ImageSlot::Flag, flag),
            (ImageSlot::Level, level),
        ];

        let fontdb = self.fontdb.clone();
        let pixmap = tokio::task::spawn_blocking(move || compose(&svg, fontdb, &images)).await??;
        info!("player card rendered");
        Ok(pixmap)
    }

    /// Compose the card for `stats` and encode it as PNG.
    pub async fn render_png(&self, stats: &PlayerStats) -> Result<Vec<u8>, RenderError> {
        let pixmap = self.render(stats).await?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }

    /// Number of font faces available for card text.
    pub fn font_faces(&self) -> usize {
        self.fontdb.len()
    }
}

fn has_family(fontdb: &fontdb::Database, family: &str) -> bool {
    fontdb
        .query(&fontdb::Query {
            families: &[fontdb::Family::Name(family)],
            ..Default::default()
        })
        .is_some()
}

/// Point the generic `sans-serif` family at a family that is installed and
/// return it. `None` when the database holds no faces at all.
fn fallback_family(fontdb: &mut fontdb::Database) -> Option<String> {
    let installed: &fontdb::Database = fontdb;
    let current = installed.family_name(&fontdb::Family::SansSerif);
    let family = [current, "DejaVu Sans", "Liberation Sans", "Noto Sans"]
        .into_iter()
        .find(|family| has_family(installed, family))
        .map(str::to_string)
        .or_else(|| {
            installed
                .faces()
                .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
        })?;
    fontdb.set_sans_serif_family(family.clone());
    Some(family)
}

fn compose(
    svg: &str,
    fontdb: Arc<fontdb::Database>,
    images: &[(ImageSlot, AuxImage)],
) -> Result<Pixmap, RenderError> {
    let mut options = usvg::Options::default();
    options.font_family = layout::FONT_FAMILY.to_string();
    options.fontdb = fontdb;

    let tree = usvg::Tree::from_str(svg, &options)?;
    let mut canvas = Pixmap::new(CARD_WIDTH, CARD_HEIGHT).ok_or(RenderError::Canvas)?;
    resvg::render(&tree, Transform::default(), &mut canvas.as_mut());

    for (slot, image) in images {
        draw_image(&mut canvas, *slot, image)?;
    }
    Ok(canvas)
}

fn draw_image(canvas: &mut Pixmap, slot: ImageSlot, image: &AuxImage) -> Result<(), RenderError> {
    let (x, y) = slot.position();
    match image {
        AuxImage::Loaded(pixmap) => {
            let mask = match slot {
                ImageSlot::Avatar => Some(circle_mask(canvas, x, y, pixmap.width())?),
                _ => None,
            };
            canvas.draw_pixmap(
                x,
                y,
                pixmap.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                mask.as_ref(),
            );
        }
        AuxImage::Placeholder(_) => {
            let (width, height) = slot.placeholder_size();
            let rect = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32)
                .ok_or(RenderError::Canvas)?;
            let mut paint = Paint::default();
            paint.set_color(slot.placeholder_color());
            canvas.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
    Ok(())
}

/// Canvas-sized mask with a filled circle inscribed in the `size`² square at (`x`, `y`).
fn circle_mask(canvas: &Pixmap, x: i32, y: i32, size: u32) -> Result<Mask, RenderError> {
    let mut mask = Mask::new(canvas.width(), canvas.height()).ok_or(RenderError::Canvas)?;
    let radius = size as f32 / 2.0;
    let circle = PathBuilder::from_circle(x as f32 + radius, y as f32 + radius, radius)
        .ok_or(RenderError::Canvas)?;
    mask.fill_path(&circle, FillRule::Winding, true, Transform::identity());
    Ok(mask)
}
