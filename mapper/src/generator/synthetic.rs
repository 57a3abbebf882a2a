use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::Path;

/// Configuration for generating a synthetic ndk catalog.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub events: usize,
    pub seed: u64,
    pub first_year: i32,
    pub last_year: i32,
    /// Probability that an origin time carries a `60.x` seconds value.
    pub anomaly_rate: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            events: 500,
            seed: 0,
            first_year: 2005,
            last_year: 2020,
            anomaly_rate: 0.02,
        }
    }
}

fn origin_time(rng: &mut StdRng, config: &SyntheticConfig) -> (String, String) {
    let year = rng.gen_range(config.first_year..=config.last_year.max(config.first_year));
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    let hour = rng.gen_range(0..24);
    let minute = rng.gen_range(0..60);
    let tenths = if rng.gen_bool(config.anomaly_rate.clamp(0.0, 1.0)) {
        rng.gen_range(600..610)
    } else {
        rng.gen_range(0..600)
    };
    (
        format!("{year:04}/{month:02}/{day:02}"),
        format!("{hour:02}:{minute:02}:{:02}.{}", tenths / 10, tenths % 10),
    )
}

fn write_group(rng: &mut StdRng, config: &SyntheticConfig, index: usize, out: &mut String) {
    let (date, time) = origin_time(rng, config);
    let latitude: f64 = rng.gen_range(-80.0..80.0);
    let longitude: f64 = rng.gen_range(-180.0..180.0);
    let depth: f64 = rng.gen_range(5.0..700.0);
    let mb: f64 = rng.gen_range(4.5..7.0);
    let ms: f64 = if rng.gen_bool(0.3) { 0.0 } else { rng.gen_range(4.0..8.5) };
    let exponent = rng.gen_range(23..=28);

    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "PDE  {date} {time} {latitude:6.2} {longitude:7.2} {depth:5.1} {mb:.1} {ms:.1} SYNTHETIC REGION {index}"
    );
    let _ = writeln!(out, "S{index:013}A   B:  0    0   0 S:  0    0   0 M:  0    0   0 CMT: 1 TRIHD:  1.0");
    let _ = writeln!(
        out,
        "CENTROID:      0.0 0.1 {latitude:6.2} 0.01 {longitude:7.2} 0.01 {depth:5.1}  0.5 FREE S-00000000000000"
    );
    let _ = write!(out, "{exponent:2}");
    for _ in 0..6 {
        let component: f64 = rng.gen_range(-5.0..5.0);
        let uncertainty: f64 = rng.gen_range(0.001..0.2);
        let _ = write!(out, " {component:6.3} {uncertainty:5.3}");
    }
    out.push('\n');
    let _ = writeln!(out, "V10   1.000 45  90   0.000  0   0  -1.000 45 270   1.000   0 45   90  180 45   90");
}

/// Builds catalog text with `config.events` well-formed record groups.
pub fn build_catalog(config: &SyntheticConfig) -> String {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut out = String::new();
    for index in 0..config.events {
        write_group(&mut rng, config, index, &mut out);
    }
    out
}

pub fn write_catalog<P: AsRef<Path>>(path: P, config: &SyntheticConfig) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    // Never replace an existing catalog.
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path_ref)
        .with_context(|| format!("creating synthetic catalog {}", path_ref.display()))?;
    file.write_all(build_catalog(config).as_bytes())
        .with_context(|| format!("writing synthetic catalog {}", path_ref.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmtcore::{parse_file, parse_str};

    #[test]
    fn generator_builds_parseable_groups() {
        let config = SyntheticConfig {
            events: 64,
            seed: 13,
            ..Default::default()
        };
        let records = parse_str(&build_catalog(&config)).unwrap();
        assert_eq!(records.len(), 64);
        assert_eq!(records[5].region.as_deref(), Some("SYNTHETIC REGION 5"));
        assert!(records.iter().all(|record| record.timestamp().is_ok()));
    }

    #[test]
    fn same_seed_repeats_catalog() {
        let config = SyntheticConfig {
            events: 8,
            seed: 7,
            ..Default::default()
        };
        assert_eq!(build_catalog(&config), build_catalog(&config));
    }

    #[test]
    fn anomalous_seconds_are_generated_and_normalized() {
        let config = SyntheticConfig {
            events: 20,
            anomaly_rate: 1.0,
            ..Default::default()
        };
        let records = parse_str(&build_catalog(&config)).unwrap();
        for record in &records {
            assert!(record.time[6..].starts_with('6'));
            assert_eq!(&record.normalized_timestamp().unwrap()[17..18], "0");
        }
    }

    #[test]
    fn write_catalog_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("synthetic.ndk");
        let config = SyntheticConfig {
            events: 3,
            ..Default::default()
        };
        write_catalog(&path, &config).unwrap();
        assert_eq!(parse_file(&path).unwrap().len(), 3);
    }

    #[test]
    fn write_catalog_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jan76_dec20.ndk");
        fs::write(&path, "REAL CATALOG DATA\n").unwrap();
        let config = SyntheticConfig {
            events: 2,
            ..Default::default()
        };
        assert!(write_catalog(&path, &config).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "REAL CATALOG DATA\n");
    }
}
