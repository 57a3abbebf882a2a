use anyhow::Context;
use cmtcore::selection::{DepthBands, EventFilter, MarkerScale, Region, TimeWindow};
use cmtcore::timestamp::parse_bound;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do with a record whose origin time cannot be normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    #[default]
    Skip,
    Abort,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub catalog: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub start: String,
    pub end: String,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub min_marker_size: f64,
    pub max_marker_size: f64,
    pub region: Option<Region>,
    pub depth_limits: Vec<f64>,
    pub width: u32,
    pub height: u32,
    pub on_invalid_timestamp: TimestampPolicy,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("jan76_dec20.ndk"),
            output: PathBuf::from("Global_CMT_Map.png"),
            title: "Harvard CMT Catalog".into(),
            start: "2010-01-01T00:00:00.0".into(),
            end: "2020-01-01T00:00:00.0".into(),
            min_magnitude: 5.0,
            max_magnitude: 8.0,
            min_marker_size: 2.0,
            max_marker_size: 5.0,
            region: None,
            depth_limits: DepthBands::default().limits,
            width: 3600,
            height: 1800,
            on_invalid_timestamp: TimestampPolicy::Skip,
        }
    }
}

impl MapConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading map config {}", path_ref.display()))?;
        let config: MapConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing map config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let window = self.time_window()?;
        anyhow::ensure!(
            window.start <= window.end,
            "map window starts after it ends ({} > {})",
            self.start,
            self.end
        );
        anyhow::ensure!(
            self.max_magnitude > self.min_magnitude,
            "max_magnitude {} must exceed min_magnitude {}",
            self.max_magnitude,
            self.min_magnitude
        );
        anyhow::ensure!(
            self.width > 0 && self.height > 0,
            "image size must be non-zero"
        );
        anyhow::ensure!(
            self.depth_limits.windows(2).all(|pair| pair[0] < pair[1]),
            "depth_limits must be strictly increasing"
        );
        if let Some(region) = &self.region {
            anyhow::ensure!(
                region.min_latitude <= region.max_latitude,
                "region min_latitude {} exceeds max_latitude {}",
                region.min_latitude,
                region.max_latitude
            );
            anyhow::ensure!(
                region.min_longitude <= region.max_longitude,
                "region min_longitude {} exceeds max_longitude {}",
                region.min_longitude,
                region.max_longitude
            );
        }
        Ok(())
    }

    pub fn time_window(&self) -> anyhow::Result<TimeWindow> {
        let start = parse_bound(&self.start)
            .with_context(|| format!("window start {:?}", self.start))?;
        let end =
            parse_bound(&self.end).with_context(|| format!("window end {:?}", self.end))?;
        Ok(TimeWindow::new(start, end))
    }

    pub fn to_event_filter(&self) -> anyhow::Result<EventFilter> {
        let filter = EventFilter::new(self.time_window()?, self.min_magnitude);
        Ok(match self.region {
            Some(region) => filter.with_region(region),
            None => filter,
        })
    }

    pub fn to_marker_scale(&self) -> MarkerScale {
        MarkerScale {
            min_magnitude: self.min_magnitude,
            max_magnitude: self.max_magnitude,
            min_size: self.min_marker_size,
            max_size: self.max_marker_size,
        }
    }

    pub fn to_depth_bands(&self) -> DepthBands {
        DepthBands {
            limits: self.depth_limits.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_overrides_produce_filter() {
        let cfg = MapConfig {
            start: "2000-01-01".into(),
            end: "2001-01-01".into(),
            min_magnitude: 6.0,
            max_magnitude: 9.0,
            ..Default::default()
        };
        let filter = cfg.to_event_filter().unwrap();
        assert_eq!(filter.min_magnitude, 6.0);
        assert!(filter.region.is_none());
        assert_eq!(cfg.to_marker_scale().max_magnitude, 9.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"catalog: data/jan76_dec20.ndk\nstart: 2005/01/01 00:00:00.0\nmin_magnitude: 6.0\non_invalid_timestamp: abort\nregion:\n  min_latitude: 23.0\n  max_latitude: 48.0\n  min_longitude: 125.0\n  max_longitude: 150.0\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = MapConfig::load(&path).unwrap();
        assert_eq!(cfg.catalog, PathBuf::from("data/jan76_dec20.ndk"));
        assert_eq!(cfg.min_magnitude, 6.0);
        assert_eq!(cfg.max_magnitude, 8.0);
        assert_eq!(cfg.on_invalid_timestamp, TimestampPolicy::Abort);
        assert_eq!(cfg.region.unwrap().max_longitude, 150.0);
    }

    #[test]
    fn bundled_japan_workflow_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("workflows/japan.yaml");
        let cfg = MapConfig::load(path).unwrap();
        let filter = cfg.to_event_filter().unwrap();
        assert!(filter.region.unwrap().contains(35.0, 140.0));
        assert_eq!(cfg.output, PathBuf::from("Japan_CMT_Map.png"));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let cfg = MapConfig {
            start: "2020-01-01".into(),
            end: "2010-01-01".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unsorted_depth_limits_are_rejected() {
        let cfg = MapConfig {
            depth_limits: vec![70.0, 35.0],
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_region_is_rejected() {
        let japan = Region {
            min_latitude: 23.0,
            max_latitude: 48.0,
            min_longitude: 125.0,
            max_longitude: 150.0,
        };
        let flipped_latitude = MapConfig {
            region: Some(Region {
                min_latitude: 48.0,
                max_latitude: 23.0,
                ..japan
            }),
            ..Default::default()
        };
        assert!(flipped_latitude.validate().is_err());
        let flipped_longitude = MapConfig {
            region: Some(Region {
                min_longitude: 150.0,
                max_longitude: 125.0,
                ..japan
            }),
            ..Default::default()
        };
        assert!(flipped_longitude.validate().is_err());
        let ok = MapConfig {
            region: Some(japan),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }
}
