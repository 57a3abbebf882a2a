use crate::render::beachball::{rasterize, Fill};
use crate::render::{Glyph, GlyphSink, Label};
use anyhow::anyhow;
use plotters::coord::Shift;
use plotters::prelude::*;
#[cfg(feature = "labels")]
use plotters::style::text_anchor::{HPos, Pos, VPos};
#[cfg(feature = "labels")]
use plotters::style::FontStyle;
use std::path::Path;

const OCEAN: RGBColor = RGBColor(170, 211, 223);
const GRATICULE: RGBColor = RGBColor(128, 160, 176);
const GRATICULE_STEP: usize = 30;
// Label height as a fraction of the image height.
#[cfg(feature = "labels")]
const LABEL_SCALE: f64 = 1.0 / 90.0;

/// Equirectangular world map rendered to a PNG through `plotters`.
pub struct PlotterCanvas<'a> {
    area: DrawingArea<BitMapBackend<'a>, Shift>,
    width: u32,
    height: u32,
}

impl<'a> PlotterCanvas<'a> {
    pub fn new(path: &'a Path, (width, height): (u32, u32)) -> anyhow::Result<Self> {
        let area = BitMapBackend::new(path, (width, height)).into_drawing_area();
        area.fill(&OCEAN)
            .map_err(|err| anyhow!("filling map background: {err}"))?;
        let canvas = Self {
            area,
            width,
            height,
        };
        canvas.draw_graticule()?;
        Ok(canvas)
    }

    /// Pixel position of a longitude/latitude pair.
    pub fn project(&self, longitude: f64, latitude: f64) -> (i32, i32) {
        let x = (longitude + 180.0) / 360.0 * f64::from(self.width);
        let y = (90.0 - latitude) / 180.0 * f64::from(self.height);
        (x.round() as i32, y.round() as i32)
    }

    fn pixels_per_degree(&self) -> f64 {
        f64::from(self.width) / 360.0
    }

    fn contains(&self, (x, y): (i32, i32)) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn draw_graticule(&self) -> anyhow::Result<()> {
        let style = ShapeStyle::from(&GRATICULE).stroke_width(1);
        let mut lines = Vec::new();
        for longitude in (-180..=180).step_by(GRATICULE_STEP) {
            let longitude = f64::from(longitude);
            lines.push([self.project(longitude, 90.0), self.project(longitude, -90.0)]);
        }
        for latitude in (-90..=90).step_by(GRATICULE_STEP) {
            let latitude = f64::from(latitude);
            lines.push([self.project(-180.0, latitude), self.project(180.0, latitude)]);
        }
        for [from, to] in lines {
            self.area
                .draw(&PathElement::new(vec![from, to], style))
                .map_err(|err| anyhow!("drawing graticule: {err}"))?;
        }
        Ok(())
    }
}

impl GlyphSink for PlotterCanvas<'_> {
    fn draw_glyph(&mut self, glyph: &Glyph) -> anyhow::Result<()> {
        let (cx, cy) = self.project(glyph.longitude, glyph.latitude);
        let radius = (glyph.diameter / 2.0 * self.pixels_per_degree()).round() as i32;
        let (r, g, b) = glyph.color;
        let face = RGBColor(r, g, b);

        for cell in rasterize(&glyph.mechanism, radius) {
            let point = (cx + cell.dx, cy + cell.dy);
            if !self.contains(point) {
                continue;
            }
            let color = match cell.fill {
                Fill::Compressional => face,
                Fill::Dilatational => WHITE,
                Fill::Outline => BLACK,
            };
            self.area
                .draw_pixel(point, &color)
                .map_err(|err| anyhow!("drawing glyph pixel: {err}"))?;
        }
        Ok(())
    }

    #[cfg(feature = "labels")]
    fn draw_label(&mut self, label: &Label) -> anyhow::Result<()> {
        let position = self.project(label.longitude, label.latitude);
        let size = (f64::from(self.height) * LABEL_SCALE).max(8.0);
        let weight = if label.bold {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        };
        let style = ("sans-serif", size, weight)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));

        // A font that fails to load only costs the label.
        if let Err(err) = self
            .area
            .draw(&Text::new(label.text.clone(), position, style))
        {
            log::warn!("skipping label {:?}: {}", label.text, err);
        }
        Ok(())
    }

    // Without a font backend plotters panics on text, so labels are dropped.
    #[cfg(not(feature = "labels"))]
    fn draw_label(&mut self, label: &Label) -> anyhow::Result<()> {
        log::debug!("built without labels, dropping {:?}", label.text);
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.area
            .present()
            .map_err(|err| anyhow!("writing map image: {err}"))
    }
}
