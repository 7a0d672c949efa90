//! Formation image export
//!
//! Lays the field out on a fixed canvas, rasterizes it and encodes a PNG.
//! When the styled render comes back blank the cards are drawn again on a
//! plain pitch; there is no further retry.

pub mod layout;
pub mod raster;

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat, RgbaImage};
use thiserror::Error;
use tracing::{info, warn};

use crate::board::{FormationBoard, PlacedCard};
use crate::formation::FormationName;

pub use layout::{ExportCanvas, ExportScene, PixelRect, SceneCard};
pub use raster::RenderStrategy;

/// Largest supported pixel-density multiplier.
pub const MAX_EXPORT_SCALE: u32 = 4;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No players on field to export! Add some players first.")]
    NothingToExport,

    #[error("Export scale {0} is outside 1..={max}", max = MAX_EXPORT_SCALE)]
    Scale(u32),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished export, ready to write out.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub strategy: RenderStrategy,
    pub png: Vec<u8>,
}

impl ExportedImage {
    /// Write into `dir` under the generated file name.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.png)?;
        info!(path = %path.display(), bytes = self.png.len(), "formation image written");
        Ok(path)
    }
}

/// `FIFA-Formation-{formation}-{YYYY-MM-DDTHH-MM-SS}.png`
pub fn export_filename(formation: FormationName, at: DateTime<Utc>) -> String {
    format!("FIFA-Formation-{}-{}.png", formation, at.format("%Y-%m-%dT%H-%M-%S"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormationExporter {
    pub canvas: ExportCanvas,
    pub scale: u32,
}

impl Default for FormationExporter {
    fn default() -> Self {
        Self { canvas: ExportCanvas::Standard, scale: 2 }
    }
}

impl FormationExporter {
    /// `scale` is clamped to `1..=MAX_EXPORT_SCALE`.
    pub fn new(canvas: ExportCanvas, scale: u32) -> Self {
        Self { canvas, scale: scale.clamp(1, MAX_EXPORT_SCALE) }
    }

    pub fn export_board(&self, board: &FormationBoard) -> Result<ExportedImage, ExportError> {
        self.export_cards(board.formation(), board.cards(), Utc::now())
    }

    pub fn export_cards(
        &self,
        formation: FormationName,
        cards: &[PlacedCard],
        at: DateTime<Utc>,
    ) -> Result<ExportedImage, ExportError> {
        if cards.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let scene = ExportScene::build(self.canvas, formation, cards);
        let art: Vec<Option<DynamicImage>> =
            scene.cards.iter().map(|card| raster::load_card_image(&card.image)).collect();

        let styled = raster::render_styled(&scene, self.scale, &art)?;
        let (image, strategy) =
            with_blank_fallback(styled, || raster::render_direct(&scene, self.scale, &art))?;

        let (width, height) = image.dimensions();
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        info!(
            formation = %formation,
            cards = cards.len(),
            width,
            height,
            ?strategy,
            "formation exported"
        );
        Ok(ExportedImage { filename: export_filename(formation, at), width, height, strategy, png })
    }
}

/// Keep `styled` unless it is blank, in which case render once more with `direct`.
fn with_blank_fallback(
    styled: RgbaImage,
    direct: impl FnOnce() -> Result<RgbaImage, ExportError>,
) -> Result<(RgbaImage, RenderStrategy), ExportError> {
    if raster::is_blank(&styled) {
        warn!("styled export came out blank, using direct render");
        Ok((direct()?, RenderStrategy::Direct))
    } else {
        Ok((styled, RenderStrategy::Styled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{CardImage, FieldPosition};
    use chrono::TimeZone;
    use image::Rgba;
    use tempfile::TempDir;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_filename_format() {
        assert_eq!(
            export_filename(FormationName::OneThreeOneOne, at()),
            "FIFA-Formation-1-3-1-1-2024-03-09T14-05-07.png"
        );
    }

    #[test]
    fn test_empty_board_refused() {
        let err = FormationExporter::default().export_board(&FormationBoard::default()).unwrap_err();
        assert!(matches!(err, ExportError::NothingToExport));
        assert_eq!(err.to_string(), "No players on field to export! Add some players first.");
    }

    #[test]
    fn test_export_writes_png() {
        let card = PlacedCard::new(CardImage::new("unloadable"), None, FieldPosition::new(50.0, 72.0));
        let exporter = FormationExporter::new(ExportCanvas::Compact, 1);
        let out = exporter.export_cards(FormationName::default(), &[card], at()).unwrap();

        assert_eq!((out.width, out.height), (800, 600));
        assert_eq!(out.strategy, RenderStrategy::Styled);
        assert_eq!(&out.png[1..4], b"PNG");

        let dir = TempDir::new().unwrap();
        let path = out.write_to_dir(dir.path()).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 800);
    }

    #[test]
    fn test_exporter_clamps_scale() {
        assert_eq!(FormationExporter::new(ExportCanvas::Compact, 0).scale, 1);
        assert_eq!(FormationExporter::new(ExportCanvas::Compact, 4_000_000).scale, MAX_EXPORT_SCALE);
    }

    #[test]
    fn test_oversized_scale_is_an_error() {
        let card = PlacedCard::new(CardImage::new("unloadable"), None, FieldPosition::new(50.0, 72.0));
        let exporter = FormationExporter { canvas: ExportCanvas::Standard, scale: u32::MAX };
        let err = exporter.export_cards(FormationName::default(), &[card], at()).unwrap_err();
        assert!(matches!(err, ExportError::Scale(u32::MAX)));
    }

    #[test]
    fn test_blank_render_falls_back_once() {
        let blank = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let mut calls = 0;
        let (img, strategy) = with_blank_fallback(blank, || {
            calls += 1;
            Ok(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])))
        })
        .unwrap();
        assert_eq!(strategy, RenderStrategy::Direct);
        assert_eq!(calls, 1);
        assert_eq!(*img.get_pixel(0, 0), Rgba([1, 2, 3, 255]));

        let lit = RgbaImage::from_pixel(2, 2, Rgba([9, 0, 0, 255]));
        let (_, strategy) = with_blank_fallback(lit, || unreachable!()).unwrap();
        assert_eq!(strategy, RenderStrategy::Styled);
    }
}
