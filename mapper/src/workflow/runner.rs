use crate::render::legend::{self, LegendContext, LegendItem};
use crate::render::{depth_color, Glyph, GlyphSink};
use crate::workflow::config::{MapConfig, TimestampPolicy};
use anyhow::Context;
use cmtcore::catalog::EventRecord;
use cmtcore::math::FocalMechanism;
use cmtcore::selection::{DepthBands, EventFilter, MarkerScale, Verdict};
use cmtcore::telemetry::{LogManager, PassTally};

pub struct MapResult {
    pub tally: PassTally,
    /// Records that passed the filter, in catalog order, drawable or not.
    pub selected: Vec<EventRecord>,
}

pub struct Runner {
    config: MapConfig,
    filter: EventFilter,
    scale: MarkerScale,
    bands: DepthBands,
    logger: LogManager,
}

impl Runner {
    pub fn new(config: MapConfig) -> anyhow::Result<Self> {
        let filter = config
            .to_event_filter()
            .context("building event filter")?;
        let scale = config.to_marker_scale();
        let bands = config.to_depth_bands();
        Ok(Self {
            config,
            filter,
            scale,
            bands,
            logger: LogManager::scoped("runner"),
        })
    }

    /// Filters `records`, draws one glyph per drawable event, then the legends.
    pub fn execute(
        &self,
        records: &[EventRecord],
        sink: &mut dyn GlyphSink,
    ) -> anyhow::Result<MapResult> {
        let mut tally = PassTally::new();
        let mut selected = Vec::new();

        for record in records {
            let verdict = match self.filter.evaluate(record) {
                Ok(verdict) => verdict,
                Err(err) => match self.config.on_invalid_timestamp {
                    TimestampPolicy::Skip => {
                        self.logger.warn(&format!("skipping record: {err}"));
                        tally.record_invalid_timestamp();
                        continue;
                    }
                    TimestampPolicy::Abort => {
                        return Err(err).with_context(|| {
                            format!("record {} {}", record.date, record.time)
                        });
                    }
                },
            };
            if verdict != Verdict::Accepted {
                tally.record_verdict(verdict);
                continue;
            }
            selected.push(record.clone());

            match FocalMechanism::from_tensor(&record.moment_tensor()) {
                Ok(mechanism) => {
                    let glyph = Glyph {
                        mechanism,
                        longitude: record.longitude,
                        latitude: record.latitude,
                        diameter: self.scale.size(record.magnitude()),
                        color: depth_color(self.bands.classify(record.depth)),
                    };
                    sink.draw_glyph(&glyph)
                        .with_context(|| format!("drawing event {} {}", record.date, record.time))?;
                    tally.record_plotted();
                }
                Err(err) => {
                    self.logger.detail(&format!(
                        "cannot plot event {} {}: {err}",
                        record.date, record.time
                    ));
                    tally.record_skipped();
                }
            }
        }

        let ctx = LegendContext {
            title: &self.config.title,
            start: &self.config.start,
            end: &self.config.end,
            plotted: tally.plotted,
            scale: &self.scale,
            bands: &self.bands,
        };
        for item in legend::build(&ctx).context("building legend")? {
            match item {
                LegendItem::Label(label) => sink.draw_label(&label)?,
                LegendItem::Glyph(glyph) => sink.draw_glyph(&glyph)?,
            }
        }
        sink.finish()?;

        self.logger.record(&format!(
            "plotted {} events, skipped {}, rejected {}, bad timestamps {}",
            tally.plotted,
            tally.skipped,
            tally.rejected(),
            tally.invalid_timestamps
        ));

        Ok(MapResult { tally, selected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSink;
    use cmtcore::parse_str;

    const CATALOG: &str = "\
PDE  2011/03/11 05:46:23.0  38.10  142.86  23.0 6.9 8.9 NEAR EAST COAST OF HONSHU, JAP
C201103110546A
CENTROID:
29   1.730 0.003 -0.281 0.003 -1.450 0.003  2.120 0.004  4.550 0.005 -0.657 0.003
V10
PDE  2012/04/11 08:38:36.7   2.33   93.06  20.0 6.7 8.6 OFF W COAST OF NORTHERN SUMATR
C201204110838A
CENTROID:
29   0.000 0.000  0.000 0.000  0.000 0.000  0.000 0.000  0.000 0.000  0.000 0.000
V10
PDE  2015/05/30 11:23:02.0  27.84  140.49 664.0 6.2 7.8 BONIN ISLANDS, JAPAN REGION
C201505301123A
CENTROID:
27  -0.920 0.010  0.330 0.010  0.590 0.010 -0.980 0.020  0.550 0.010  0.590 0.010
V10
PDE  2015/06/01 00:00:00.0  10.00   10.00  10.0 4.0 4.5 SMALL EVENT
C201506010000A
CENTROID:
24   1.000 0.010  0.000 0.010 -1.000 0.010  0.000 0.010  0.000 0.010  0.000 0.010
V10
PDE  2004/12/26 00:58:53.4   3.30   95.98  30.0 6.2 8.8 OFF W COAST OF NORTHERN SUMATR
C200412260058A
CENTROID:
29   1.300 0.005 -0.100 0.005 -1.200 0.005  2.100 0.005  3.800 0.005 -0.500 0.005
V10
";

    fn runner(policy: TimestampPolicy) -> Runner {
        let config = MapConfig {
            on_invalid_timestamp: policy,
            ..Default::default()
        };
        Runner::new(config).unwrap()
    }

    #[test]
    fn runner_plots_selected_events_and_counts_skips() {
        let records = parse_str(CATALOG).unwrap();
        let mut sink = RecordingSink::default();
        let result = runner(TimestampPolicy::Skip)
            .execute(&records, &mut sink)
            .unwrap();

        assert_eq!(result.tally.plotted, 2);
        assert_eq!(result.tally.skipped, 1);
        assert_eq!(result.tally.below_magnitude, 1);
        assert_eq!(result.tally.outside_window, 1);
        assert_eq!(result.selected.len(), 3);
        assert!(sink.finished);
        assert!(sink.labels.iter().any(|label| label.text == "2 events"));

        let deep = &sink.glyphs[1];
        assert_eq!(deep.color, (138, 43, 226));
        assert!((deep.diameter - (2.0 + 2.8)).abs() < 1e-9);
    }

    #[test]
    fn glyphs_precede_legend_in_catalog_order() {
        let records = parse_str(CATALOG).unwrap();
        let mut sink = RecordingSink::default();
        runner(TimestampPolicy::Skip)
            .execute(&records, &mut sink)
            .unwrap();
        assert_eq!(sink.glyphs[0].longitude, 142.86);
        assert_eq!(sink.glyphs[1].longitude, 140.49);
    }

    #[test]
    fn invalid_timestamp_follows_policy() {
        let mut records = parse_str(CATALOG).unwrap();
        records[0].date = "11-03-2011".into();

        let mut sink = RecordingSink::default();
        let result = runner(TimestampPolicy::Skip)
            .execute(&records, &mut sink)
            .unwrap();
        assert_eq!(result.tally.invalid_timestamps, 1);
        assert_eq!(result.tally.plotted, 1);

        let mut sink = RecordingSink::default();
        assert!(runner(TimestampPolicy::Abort)
            .execute(&records, &mut sink)
            .is_err());
        assert!(!sink.finished);
    }
}
