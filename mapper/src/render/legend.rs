use crate::render::{depth_color, Glyph, Label};
use cmtcore::math::{FaultStyle, FocalMechanism};
use cmtcore::selection::{DepthBands, MarkerScale};
use cmtcore::MechanismError;

// Legend rows start at this latitude and step southward.
const TOP: f64 = -68.0;
const STEP: f64 = 6.0;
// Sample glyphs sit this many degrees west of their text.
const GLYPH_OFFSET: f64 = 4.0;

const CATALOG_X: f64 = -170.0;
const MECHANISM_X: f64 = -20.0;
const DEPTH_X: f64 = 50.0;
const DEPTH_COLUMN_WIDTH: f64 = 40.0;
const MAGNITUDE_X: f64 = 150.0;

#[derive(Debug, Clone)]
pub enum LegendItem {
    Label(Label),
    Glyph(Glyph),
}

pub struct LegendContext<'a> {
    pub title: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub plotted: usize,
    pub scale: &'a MarkerScale,
    pub bands: &'a DepthBands,
}

fn row(index: usize) -> f64 {
    TOP - index as f64 * STEP
}

fn sample(
    style: FaultStyle,
    x: f64,
    y: f64,
    diameter: f64,
    class: usize,
) -> Result<LegendItem, MechanismError> {
    Ok(LegendItem::Glyph(Glyph {
        mechanism: FocalMechanism::from_tensor(&style.reference_tensor())?,
        longitude: x - GLYPH_OFFSET,
        latitude: y,
        diameter,
        color: depth_color(class),
    }))
}

/// Catalog, focal mechanism, depth and magnitude blocks along the bottom of the map.
pub fn build(ctx: &LegendContext<'_>) -> Result<Vec<LegendItem>, MechanismError> {
    let mut items = vec![
        LegendItem::Label(Label::heading(ctx.title, CATALOG_X, row(0))),
        LegendItem::Label(Label::new(ctx.start, CATALOG_X, row(1))),
        LegendItem::Label(Label::new(ctx.end, CATALOG_X, row(2))),
        LegendItem::Label(Label::new(
            format!("{} events", ctx.plotted),
            CATALOG_X,
            row(3),
        )),
        LegendItem::Label(Label::heading("Focal mechanism", MECHANISM_X, row(0))),
    ];

    let styles = [FaultStyle::StrikeSlip, FaultStyle::Thrust, FaultStyle::Normal];
    for (index, style) in styles.into_iter().enumerate() {
        let y = row(index + 1);
        items.push(LegendItem::Label(Label::new(style.label(), MECHANISM_X, y)));
        items.push(sample(style, MECHANISM_X, y, ctx.scale.max_size, 0)?);
    }

    items.push(LegendItem::Label(Label::heading(
        "magnitude",
        MAGNITUDE_X,
        row(0),
    )));
    let magnitudes = [
        ctx.scale.max_magnitude,
        ctx.scale.mid_magnitude(),
        ctx.scale.min_magnitude,
    ];
    for (index, magnitude) in magnitudes.into_iter().enumerate() {
        let y = row(index + 1);
        items.push(LegendItem::Label(Label::new(
            format!("{magnitude:.1}"),
            MAGNITUDE_X,
            y,
        )));
        items.push(sample(
            FaultStyle::StrikeSlip,
            MAGNITUDE_X,
            y,
            ctx.scale.size(magnitude),
            0,
        )?);
    }

    items.push(LegendItem::Label(Label::heading("depth [km]", DEPTH_X, row(0))));
    for class in 0..ctx.bands.class_count() {
        let x = DEPTH_X + (class / 3) as f64 * DEPTH_COLUMN_WIDTH;
        let y = row(class % 3 + 1);
        items.push(LegendItem::Label(Label::new(ctx.bands.label(class), x, y)));
        items.push(sample(
            FaultStyle::StrikeSlip,
            x,
            y,
            ctx.scale.max_size,
            class,
        )?);
    }

    Ok(items)
}
