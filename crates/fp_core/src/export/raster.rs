//! Software rasterizer for export scenes
//!
//! Draws the poster with plain rectangle, line and circle primitives on an
//! RGBA buffer, then composites the card artwork on top.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::warn;

use super::layout::{
    ExportCanvas, ExportScene, PixelRect, STANDARD_FIELD_CONTAINER, STANDARD_FOOTER,
    STANDARD_HEADER, STANDARD_PITCH,
};
use super::{ExportError, MAX_EXPORT_SCALE};
use crate::board::CardImage;
use crate::data_uri::DataUri;
use crate::formation::FIELD_CAPACITY;

const BACKGROUND: [[u8; 3]; 3] = [[0x1a, 0x1a, 0x2e], [0x16, 0x21, 0x3e], [0x0f, 0x34, 0x60]];
const HEADER: [[u8; 3]; 3] = [[0x1a, 0x20, 0x2c], [0x2d, 0x37, 0x48], [0x4a, 0x55, 0x68]];
const FIELD_CONTAINER: [[u8; 3]; 3] = [[0x0f, 0x17, 0x2a], [0x1e, 0x29, 0x3b], [0x33, 0x41, 0x55]];
const FOOTER: [[u8; 3]; 2] = [[0x0d, 0x0d, 0x0d], [0x1e, 0x1e, 0x1e]];
const COMPACT_PITCH: [[u8; 3]; 3] = [[0x0a, 0x5f, 0x38], [0x0d, 0x84, 0x42], [0x0a, 0x5f, 0x38]];

const PITCH_GREEN: Rgba<u8> = Rgba([0x1a, 0x47, 0x2a, 255]);
const PITCH_LINE: Rgba<u8> = Rgba([0x4c, 0xaf, 0x50, 255]);
const FAINT_WHITE: Rgba<u8> = Rgba([255, 255, 255, 26]);
const HALF_LINE: Rgba<u8> = Rgba([255, 255, 255, 77]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PLAYERS_GREEN: Rgba<u8> = Rgba([0x22, 0xc5, 0x5e, 255]);
const OVERALL_BLUE: Rgba<u8> = Rgba([0x3b, 0x82, 0xf6, 255]);

/// How the final image was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    Styled,
    /// Plain pitch and cards, used when the styled render came out blank
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GradientDirection {
    Vertical,
    /// 135 degrees: top-left to bottom-right
    Diagonal,
}

/// Decode card artwork from a data URI or a local file.
///
/// Remote URLs are not fetched; they come back as `None` like any other
/// image that fails to load.
pub fn load_card_image(image: &CardImage) -> Option<DynamicImage> {
    let source = image.as_str();
    let decoded = if image.is_data_uri() {
        DataUri::parse(source)
            .map_err(|e| e.to_string())
            .and_then(|uri| image::load_from_memory(&uri.bytes).map_err(|e| e.to_string()))
    } else if !source.is_empty() && Path::new(source).is_file() {
        image::open(source).map_err(|e| e.to_string())
    } else {
        Err("not a data URI or local file".to_string())
    };

    match decoded {
        Ok(img) => Some(img),
        Err(err) => {
            let preview: String = source.chars().take(48).collect();
            warn!(source = %preview, %err, "skipping card image");
            None
        }
    }
}

/// True when every pixel has all colour channels at zero.
pub fn is_blank(image: &RgbaImage) -> bool {
    image.pixels().all(|p| p[0] == 0 && p[1] == 0 && p[2] == 0)
}

/// Drawing surface in unscaled canvas units.
pub struct Raster {
    image: RgbaImage,
    scale: f64,
}

impl Raster {
    pub fn new(canvas: ExportCanvas, scale: u32) -> Result<Self, ExportError> {
        if !(1..=MAX_EXPORT_SCALE).contains(&scale) {
            return Err(ExportError::Scale(scale));
        }
        let (w, h) = canvas.size();
        let (Some(width), Some(height)) = (w.checked_mul(scale), h.checked_mul(scale)) else {
            return Err(ExportError::Scale(scale));
        };
        Ok(Self { image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])), scale: scale as f64 })
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn px(&self, v: f64) -> i64 {
        (v * self.scale).round() as i64
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let a = color[3] as u32;
        for c in 0..3 {
            dst[c] = ((color[c] as u32 * a + dst[c] as u32 * (255 - a)) / 255) as u8;
        }
        dst[3] = 255;
    }

    fn pixel_span(&self, rect: PixelRect) -> (i64, i64, i64, i64) {
        (
            self.px(rect.x),
            self.px(rect.y),
            self.px(rect.x + rect.width),
            self.px(rect.y + rect.height),
        )
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        let (x0, y0, x1, y1) = self.pixel_span(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    fn gradient_rect(&mut self, rect: PixelRect, stops: &[[u8; 3]], direction: GradientDirection) {
        let (x0, y0, x1, y1) = self.pixel_span(rect);
        let w = (x1 - x0).max(1) as f64;
        let h = (y1 - y0).max(1) as f64;
        for y in y0..y1 {
            for x in x0..x1 {
                let t = match direction {
                    GradientDirection::Vertical => (y - y0) as f64 / h,
                    GradientDirection::Diagonal => ((x - x0) as f64 / w + (y - y0) as f64 / h) / 2.0,
                };
                let [r, g, b] = sample_gradient(stops, t);
                self.blend(x, y, Rgba([r, g, b, 255]));
            }
        }
    }

    pub fn stroke_rect(&mut self, rect: PixelRect, width: f64, color: Rgba<u8>) {
        let PixelRect { x, y, width: w, height: h } = rect;
        self.fill_rect(PixelRect::new(x, y, w, width), color);
        self.fill_rect(PixelRect::new(x, y + h - width, w, width), color);
        self.fill_rect(PixelRect::new(x, y + width, width, h - 2.0 * width), color);
        self.fill_rect(PixelRect::new(x + w - width, y + width, width, h - 2.0 * width), color);
    }

    pub fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, width: f64, color: Rgba<u8>) {
        let (cx, cy) = (cx * self.scale, cy * self.scale);
        let outer = (radius + width / 2.0) * self.scale;
        let inner = (radius - width / 2.0).max(0.0) * self.scale;
        let (x0, x1) = ((cx - outer).floor() as i64, (cx + outer).ceil() as i64);
        let (y0, y1) = ((cy - outer).floor() as i64, (cy + outer).ceil() as i64);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = ((x as f64 + 0.5 - cx).powi(2) + (y as f64 + 0.5 - cy).powi(2)).sqrt();
                if d >= inner && d <= outer {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Composite card artwork scaled to `width`, keeping its aspect ratio.
    pub fn draw_card(&mut self, art: &DynamicImage, x: f64, y: f64, width: f64) {
        let target_w = (width * self.scale).round().max(1.0) as u32;
        let target_h =
            ((art.height() as f64 * target_w as f64 / art.width().max(1) as f64).round() as u32).max(1);
        let resized = imageops::resize(&art.to_rgba8(), target_w, target_h, FilterType::Triangle);
        let (px, py) = (self.px(x), self.px(y));
        imageops::overlay(&mut self.image, &resized, px, py);
    }

    fn draw_cards(&mut self, scene: &ExportScene, art: &[Option<DynamicImage>]) {
        for (card, art) in scene.cards.iter().zip(art) {
            if let Some(art) = art {
                self.draw_card(art, card.x, card.y, card.width);
            }
        }
    }
}

fn sample_gradient(stops: &[[u8; 3]], t: f64) -> [u8; 3] {
    match stops {
        [] => [0, 0, 0],
        [only] => *only,
        _ => {
            let t = t.clamp(0.0, 1.0) * (stops.len() - 1) as f64;
            let i = (t.floor() as usize).min(stops.len() - 2);
            let f = t - i as f64;
            let (a, b) = (stops[i], stops[i + 1]);
            std::array::from_fn(|c| (a[c] as f64 + (b[c] as f64 - a[c] as f64) * f).round() as u8)
        }
    }
}

/// Full poster: backgrounds, pitch markings, cards and footer.
pub fn render_styled(
    scene: &ExportScene,
    scale: u32,
    art: &[Option<DynamicImage>],
) -> Result<RgbaImage, ExportError> {
    let mut raster = Raster::new(scene.canvas, scale)?;
    match scene.canvas {
        ExportCanvas::Standard => draw_standard(&mut raster, scene, art),
        ExportCanvas::Compact => draw_compact(&mut raster, scene, art),
    }
    Ok(raster.into_image())
}

/// Opaque pitch and cards, nothing else.
pub fn render_direct(
    scene: &ExportScene,
    scale: u32,
    art: &[Option<DynamicImage>],
) -> Result<RgbaImage, ExportError> {
    let mut raster = Raster::new(scene.canvas, scale)?;
    let (w, h) = scene.canvas.size();
    raster.fill_rect(PixelRect::new(0.0, 0.0, w as f64, h as f64), PITCH_GREEN);
    raster.draw_cards(scene, art);
    Ok(raster.into_image())
}

fn draw_standard(raster: &mut Raster, scene: &ExportScene, art: &[Option<DynamicImage>]) {
    let (w, h) = scene.canvas.size();
    raster.gradient_rect(
        PixelRect::new(0.0, 0.0, w as f64, h as f64),
        &BACKGROUND,
        GradientDirection::Diagonal,
    );

    let header = STANDARD_HEADER;
    raster.gradient_rect(header, &HEADER, GradientDirection::Diagonal);
    raster.fill_rect(PixelRect::new(0.0, header.height - 4.0, header.width, 4.0), FAINT_WHITE);

    raster.gradient_rect(STANDARD_FIELD_CONTAINER, &FIELD_CONTAINER, GradientDirection::Diagonal);
    raster.stroke_rect(STANDARD_FIELD_CONTAINER, 4.0, FAINT_WHITE);

    draw_pitch_markings(raster, STANDARD_PITCH);
    raster.draw_cards(scene, art);

    let footer = STANDARD_FOOTER;
    raster.gradient_rect(footer, &FOOTER, GradientDirection::Diagonal);
    raster.stroke_rect(footer, 3.0, FAINT_WHITE);

    // Footer gauges: players on field and team overall.
    let gauge_w = 200.0;
    let players = scene.cards.len().min(FIELD_CAPACITY) as f64 / FIELD_CAPACITY as f64;
    raster.fill_rect(
        PixelRect::new(footer.x + 40.0, footer.y + 22.0, gauge_w * players, 16.0),
        PLAYERS_GREEN,
    );
    if let Some(overall) = scene.overall {
        let ratio = overall.min(100) as f64 / 100.0;
        raster.fill_rect(
            PixelRect::new(footer.x + 80.0 + gauge_w, footer.y + 22.0, gauge_w * ratio, 16.0),
            OVERALL_BLUE,
        );
    }
}

fn draw_pitch_markings(raster: &mut Raster, pitch: PixelRect) {
    raster.fill_rect(pitch, PITCH_GREEN);
    let line = 2.0;
    let at = |fx: f64, fy: f64, fw: f64, fh: f64| {
        PixelRect::new(
            pitch.x + fx * pitch.width,
            pitch.y + fy * pitch.height,
            fw * pitch.width,
            fh * pitch.height,
        )
    };

    raster.stroke_rect(pitch, line, PITCH_LINE);
    // Halfway line and centre circle sit above the middle, as on the board.
    let halfway = 0.423;
    raster.fill_rect(at(0.0, halfway, 1.0, 0.0).with_height(line), PITCH_LINE);
    raster.stroke_circle(
        pitch.x + pitch.width / 2.0,
        pitch.y + halfway * pitch.height,
        85.0,
        line,
        PITCH_LINE,
    );

    // Penalty and goal areas at both ends.
    raster.stroke_rect(at(0.298, 0.0, 0.41, 0.148), line, PITCH_LINE);
    raster.stroke_rect(at(0.411, 0.0, 0.178, 0.083), line, PITCH_LINE);
    raster.stroke_rect(at(0.251, 0.758, 0.514, 0.242), line, PITCH_LINE);
    raster.stroke_rect(at(0.389, 0.857, 0.231, 0.143), line, PITCH_LINE);
}

fn draw_compact(raster: &mut Raster, scene: &ExportScene, art: &[Option<DynamicImage>]) {
    let (w, h) = scene.canvas.size();
    let (w, h) = (w as f64, h as f64);
    let whole = PixelRect::new(0.0, 0.0, w, h);

    raster.gradient_rect(whole, &COMPACT_PITCH, GradientDirection::Vertical);
    raster.fill_rect(PixelRect::new(0.0, h / 2.0 - 1.0, w, 2.0), HALF_LINE);
    raster.fill_rect(PixelRect::new(w / 2.0 - 1.0, 0.0, 2.0, h), HALF_LINE);
    raster.stroke_circle(w / 2.0, h / 2.0, 50.0, 2.0, HALF_LINE);
    raster.stroke_rect(whole, 4.0, WHITE);

    raster.draw_cards(scene, art);
}
