use anyhow::Context;
use clap::Parser;
use generator::synthetic::{write_catalog, SyntheticConfig};
use render::{PlotterCanvas, RecordingSink};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use workflow::config::{MapConfig, TimestampPolicy};
use workflow::runner::Runner;

mod generator;
mod render;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Global CMT focal mechanism map")]
struct Args {
    /// ndk catalog to read (or write, with --generate)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Load a map config from YAML; flags below override it
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// PNG to write
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    start: Option<String>,
    #[arg(long)]
    end: Option<String>,
    #[arg(long)]
    min_mag: Option<f64>,
    #[arg(long)]
    max_mag: Option<f64>,
    #[arg(long, value_enum)]
    on_invalid_timestamp: Option<TimestampPolicy>,
    /// Write the records that pass the filter as JSON
    #[arg(long)]
    export_json: Option<PathBuf>,
    /// Append a one-line summary of the pass to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Filter and count without drawing an image
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Write a synthetic catalog with this many events to a new --catalog file and exit
    #[arg(long, requires = "catalog")]
    generate: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl Args {
    fn map_config(&self) -> anyhow::Result<MapConfig> {
        let mut config = match &self.workflow {
            Some(path) => MapConfig::load(path)?,
            None => MapConfig::default(),
        };
        if let Some(catalog) = &self.catalog {
            config.catalog = catalog.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(start) = &self.start {
            config.start = start.clone();
        }
        if let Some(end) = &self.end {
            config.end = end.clone();
        }
        if let Some(min_mag) = self.min_mag {
            config.min_magnitude = min_mag;
        }
        if let Some(max_mag) = self.max_mag {
            config.max_magnitude = max_mag;
        }
        if let Some(policy) = self.on_invalid_timestamp {
            config.on_invalid_timestamp = policy;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.map_config()?;

    if let Some(events) = args.generate {
        let synthetic = SyntheticConfig {
            events,
            seed: args.seed,
            ..Default::default()
        };
        write_catalog(&config.catalog, &synthetic)?;
        println!(
            "Wrote {} synthetic events to {}",
            events,
            config.catalog.display()
        );
        return Ok(());
    }

    let records = cmtcore::parse_file(&config.catalog)
        .with_context(|| format!("parsing catalog {}", config.catalog.display()))?;
    log::info!(
        "read {} records from {}",
        records.len(),
        config.catalog.display()
    );

    let runner = Runner::new(config.clone())?;
    let result = if args.dry_run {
        let mut sink = RecordingSink::default();
        let result = runner.execute(&records, &mut sink)?;
        log::debug!(
            "dry run drew {} glyphs and {} labels (finished: {})",
            sink.glyphs.len(),
            sink.labels.len(),
            sink.finished
        );
        result
    } else {
        let mut canvas = PlotterCanvas::new(&config.output, (config.width, config.height))?;
        let result = runner.execute(&records, &mut canvas)?;
        println!("Map written to {}", config.output.display());
        result
    };

    let tally = result.tally;
    println!("{} events plotted", tally.plotted);
    println!("{} events could not be plotted", tally.skipped);
    if tally.invalid_timestamps > 0 {
        println!(
            "{} records had unreadable origin times",
            tally.invalid_timestamps
        );
    }

    if let Some(path) = &args.export_json {
        let file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &result.selected)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if let Some(report_path) = &args.report {
        let report = format!(
            "catalog={} window={}..{} plotted={} skipped={} rejected={} invalid_timestamps={}\n",
            config.catalog.display(),
            config.start,
            config.end,
            tally.plotted,
            tally.skipped,
            tally.rejected(),
            tally.invalid_timestamps
        );
        if let Some(parent) = report_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }

    Ok(())
}
