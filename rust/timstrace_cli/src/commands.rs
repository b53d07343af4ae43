use indicatif::{
    MultiProgress,
    ProgressBar,
    ProgressStyle,
};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{
    Path,
    PathBuf,
};
use std::time::{
    Duration,
    Instant,
};
use timstrace::{
    BuildMonitor,
    BuildOutcome,
    Frame,
    TraceBuilder,
    TraceBuilderConfig,
    TraceSummary,
};
use tracing::{
    error,
    info,
    instrument,
    warn,
};

use crate::cli::{
    BuildArgs,
    SerializationFormat,
    WriteTemplateArgs,
};
use crate::error::CliError;
use crate::output::TraceWriter;

const PROGRESS_TICKS: u64 = 1000;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main function for the 'build' subcommand.
#[instrument(skip_all)]
pub fn main_build(args: BuildArgs) -> Result<(), CliError> {
    let config: TraceBuilderConfig =
        serde_json::from_str(&std::fs::read_to_string(&args.config)?)?;
    info!("Using trace building config: {:#?}", config);
    let builder = TraceBuilder::new(config)?;

    std::fs::create_dir_all(&args.output_dir)?;

    let monitors: Vec<BuildMonitor> = args.input.iter().map(|_| BuildMonitor::new()).collect();
    let multi = MultiProgress::new();
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent}% {msg}",
    )
    .expect("Progress bar template is valid");
    let bars: Vec<ProgressBar> = args
        .input
        .iter()
        .map(|path| {
            let pb = multi.add(ProgressBar::new(PROGRESS_TICKS));
            pb.set_style(style.clone());
            pb.set_message(path.display().to_string());
            pb
        })
        .collect();

    let st = Instant::now();
    let results: Vec<Result<Option<PathBuf>, CliError>> = (0..args.input.len())
        .into_par_iter()
        .map(|i| {
            let res = process_input(
                &builder,
                &args.input[i],
                &args.output_dir,
                args.format,
                &monitors[i],
                &bars[i],
            );
            if let Err(e) = &res {
                bars[i].abandon_with_message(format!("{} failed", args.input[i].display()));
                error!("Failed to process {}: {}", args.input[i].display(), e);
                if args.fail_fast {
                    warn!("Cancelling the remaining builds");
                    monitors.iter().for_each(|m| m.cancel());
                }
            }
            res
        })
        .collect();
    info!(
        "Processed {} inputs in {:#?}",
        args.input.len(),
        st.elapsed()
    );

    let failed: Vec<PathBuf> = results
        .iter()
        .zip(args.input.iter())
        .filter(|(res, _)| res.is_err())
        .map(|(_, path)| path.clone())
        .collect();
    if !failed.is_empty() {
        return Err(CliError::InputsFailed {
            failed,
            total: args.input.len(),
        });
    }
    Ok(())
}

/// Builds and writes the traces of one input file.
///
/// Returns the path of the written file, `None` if the build was cancelled.
#[instrument(skip(builder, monitor, bar))]
fn process_input(
    builder: &TraceBuilder,
    input: &Path,
    output_dir: &Path,
    format: SerializationFormat,
    monitor: &BuildMonitor,
    bar: &ProgressBar,
) -> Result<Option<PathBuf>, CliError> {
    let frames = read_frames(input)?;
    info!("Loaded {} frames from {}", frames.len(), input.display());

    let outcome = std::thread::scope(|s| {
        s.spawn(|| report_progress(monitor, bar));
        builder.build(&frames, monitor)
    })?;

    match outcome {
        BuildOutcome::Completed { traces, stats } => {
            let out_path = output_path(input, output_dir, format)?;
            let written = write_traces(&traces, &out_path, format)?;
            info!("{}: {}", input.display(), stats);
            info!("Wrote {} traces to {}", written, out_path.display());
            bar.finish_with_message(format!("{} ({} traces)", input.display(), traces.len()));
            Ok(Some(out_path))
        }
        BuildOutcome::Cancelled => {
            warn!("Build of {} was cancelled", input.display());
            bar.abandon_with_message(format!("{} cancelled", input.display()));
            Ok(None)
        }
    }
}

/// Mirrors the monitor on the bar until the build reaches a terminal phase.
fn report_progress(monitor: &BuildMonitor, bar: &ProgressBar) {
    loop {
        bar.set_position((monitor.progress() * PROGRESS_TICKS as f64) as u64);
        if monitor.is_finished() {
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

pub fn read_frames(path: &Path) -> Result<Vec<Frame>, CliError> {
    let file = File::open(path).map_err(|e| {
        CliError::DataReading(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let frames: Vec<Frame> = serde_json::from_reader(BufReader::new(file))?;
    Ok(frames)
}

/// `<output_dir>/<input stem>.traces.<ext>`
fn output_path(
    input: &Path,
    output_dir: &Path,
    format: SerializationFormat,
) -> Result<PathBuf, CliError> {
    let stem = input.file_stem().ok_or_else(|| {
        CliError::DataReading(format!("Input path has no file name: {}", input.display()))
    })?;
    Ok(output_dir.join(format!(
        "{}.traces.{}",
        stem.to_string_lossy(),
        format.extension()
    )))
}

fn write_traces(
    traces: &[TraceSummary],
    path: &Path,
    format: SerializationFormat,
) -> Result<usize, CliError> {
    let mut writer = TraceWriter::create(path, format)?;
    for trace in traces {
        writer.write(trace)?;
    }
    Ok(writer.finish()?)
}

const FRAMES_TEMPLATE: &str = r#"[
    {
        "frame_id": 1,
        "ms_level": 1,
        "rt_minutes": 0.52,
        "polarity": "positive",
        "mobility_scans": [
            {
                "scan_id": 101,
                "mobility": 1.21,
                "centroids": [
                    { "mz": 445.1200, "intensity": 1520.0 },
                    { "mz": 524.2651, "intensity": 380.0 }
                ]
            },
            {
                "scan_id": 102,
                "mobility": 1.20,
                "centroids": [
                    { "mz": 445.1203, "intensity": 1710.0 }
                ]
            }
        ]
    }
]"#;

/// Main function for the 'write-template' subcommand.
pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    let target_dir = args.output_path;
    std::fs::create_dir_all(&target_dir)?;

    let config_path = target_dir.join("trace_config_template.json");
    std::fs::write(
        &config_path,
        serde_json::to_string_pretty(&TraceBuilderConfig::default())?,
    )?;
    println!("Wrote config template to: {}", config_path.display());

    let frames_path = target_dir.join("frames_template.json");
    std::fs::write(&frames_path, FRAMES_TEMPLATE)?;
    println!("Wrote frames template to: {}", frames_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let out = output_path(
            Path::new("/data/run_01.json"),
            Path::new("/results"),
            SerializationFormat::Ndjson,
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("/results/run_01.traces.ndjson"));
    }

    #[test]
    fn test_frames_template_parses() {
        let frames: Vec<Frame> = serde_json::from_str(FRAMES_TEMPLATE).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].mobility_scans.len(), 2);
    }

    #[test]
    fn test_config_template_round_trips() {
        let text = serde_json::to_string_pretty(&TraceBuilderConfig::default()).unwrap();
        let config: TraceBuilderConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(config, TraceBuilderConfig::default());
    }
}
