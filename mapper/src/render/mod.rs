//! Map drawing: the [`GlyphSink`] seam, beachball rasterization, legends,
//! and the `plotters` PNG backend.

pub mod beachball;
pub mod canvas;
pub mod legend;

use cmtcore::math::FocalMechanism;

pub use canvas::PlotterCanvas;

/// RGB fill for each depth class, shallow to deep.
pub const DEPTH_COLORS: [(u8, u8, u8); 6] = [
    (220, 20, 60),  // crimson
    (255, 140, 0),  // dark orange
    (255, 215, 0),  // gold
    (0, 128, 0),    // green
    (0, 0, 255),    // blue
    (138, 43, 226), // blue violet
];

pub fn depth_color(class: usize) -> (u8, u8, u8) {
    DEPTH_COLORS[class.min(DEPTH_COLORS.len() - 1)]
}

/// A focal-mechanism glyph placed in map coordinates.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub mechanism: FocalMechanism,
    pub longitude: f64,
    pub latitude: f64,
    /// Diameter in degrees of longitude.
    pub diameter: f64,
    pub color: (u8, u8, u8),
}

/// Left-aligned, vertically centered legend text in map coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub longitude: f64,
    pub latitude: f64,
    pub bold: bool,
}

impl Label {
    pub fn new(text: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            text: text.into(),
            longitude,
            latitude,
            bold: false,
        }
    }

    pub fn heading(text: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            bold: true,
            ..Self::new(text, longitude, latitude)
        }
    }
}

/// Destination for everything the runner draws.
pub trait GlyphSink {
    fn draw_glyph(&mut self, glyph: &Glyph) -> anyhow::Result<()>;
    fn draw_label(&mut self, label: &Label) -> anyhow::Result<()>;
    fn finish(&mut self) -> anyhow::Result<()>;
}

/// In-memory sink used to inspect a pass without producing an image.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub glyphs: Vec<Glyph>,
    pub labels: Vec<Label>,
    pub finished: bool,
}

impl GlyphSink for RecordingSink {
    fn draw_glyph(&mut self, glyph: &Glyph) -> anyhow::Result<()> {
        self.glyphs.push(glyph.clone());
        Ok(())
    }

    fn draw_label(&mut self, label: &Label) -> anyhow::Result<()> {
        self.labels.push(label.clone());
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.finished = true;
        Ok(())
    }
}
