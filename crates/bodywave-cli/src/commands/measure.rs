//! Amplitude/period measurement command.

use anyhow::Context;
use bodywave_config::{Profile, load_profile};
use bodywave_core::{AmpPeriodMeasurer, AmplitudeRecord, MeasurementResult, SampleWindow};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::trace::read_trace;

/// Measure the dominant swing in a filtered, tapered trace.
#[derive(Args)]
pub struct MeasureArgs {
    /// Trace to measure: WAV (first channel) or text with one sample per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Arrival time in seconds; the window is cut around it using the profile's
    /// lead and length. Without it the whole trace is the window.
    #[arg(long)]
    arrival: Option<f64>,

    /// Factory profile name or profile file
    #[arg(long, default_value = "mb")]
    profile: String,

    /// Profile TOML file (takes precedence over --profile)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Absolute time of the first sample, in seconds
    #[arg(long, default_value = "0.0")]
    start_time: f64,

    /// Sample rate in Hz (required for text input, overrides the WAV header)
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Details {
    frequency: f64,
    bandwidth: f64,
    half_period_samples: f64,
    readings_used: usize,
    filter_correction: f64,
    raw_amplitude: f64,
}

impl From<&MeasurementResult> for Details {
    fn from(m: &MeasurementResult) -> Self {
        Self {
            frequency: m.frequency(),
            bandwidth: m.bandwidth,
            half_period_samples: m.half_period_samples,
            readings_used: m.readings_used,
            filter_correction: m.filter_correction,
            raw_amplitude: m.raw_amplitude,
        }
    }
}

/// JSON form of one measurement, sentinels included on failure.
#[derive(Serialize)]
struct Report<'a> {
    profile: &'a str,
    amplitude: f64,
    period: f64,
    amptime: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Details>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn resolve_profile(args: &MeasureArgs) -> anyhow::Result<Profile> {
    match &args.config {
        Some(path) => Profile::load(path).map_err(|e| anyhow::anyhow!("{}", e)),
        None => load_profile(&args.profile).map_err(|e| {
            anyhow::anyhow!(
                "{}. Use 'bodywave profiles' to see available profiles.",
                e
            )
        }),
    }
}

/// Run the measure command.
pub fn run(args: MeasureArgs) -> anyhow::Result<()> {
    let profile = resolve_profile(&args)?;
    let config = profile
        .to_measure_config()
        .with_context(|| format!("profile '{}' is invalid", profile.name))?;

    // Out-of-range options are clamped and logged by the measurer.
    let measurer = AmpPeriodMeasurer::new(config);

    let trace = read_trace(&args.input, args.sample_rate)?;
    let cfg = measurer.config();
    let window = match args.arrival {
        Some(arrival) => SampleWindow::around_arrival(
            &trace.samples,
            trace.sample_rate,
            args.start_time,
            arrival,
            cfg.lead_seconds,
            cfg.length_seconds,
        ),
        None => SampleWindow::from_slice(&trace.samples, trace.sample_rate, args.start_time),
    }
    .with_context(|| format!("cannot cut a window from '{}'", args.input.display()))?;

    tracing::info!(
        profile = %profile.name,
        samples = window.len(),
        sample_rate = window.sample_rate(),
        start_time = window.start_time(),
        "measuring"
    );

    let result = measurer.measure(&window);
    let record = AmplitudeRecord::from(&result);

    if args.json {
        let report = Report {
            profile: &profile.name,
            amplitude: record.amplitude,
            period: record.period,
            amptime: record.amptime,
            details: result.as_ref().ok().map(Details::from),
            error: result.as_ref().err().map(|e| e.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if let Ok(m) = &result {
        println!("Profile:      {}", profile.name);
        println!(
            "Window:       {} samples @ {} Hz from {:.3} s",
            window.len(),
            window.sample_rate(),
            window.start_time()
        );
        println!(
            "Amplitude:    {:.6} (raw {:.6}, correction x{:.4})",
            m.amplitude, m.raw_amplitude, m.filter_correction
        );
        println!(
            "Period:       {:.4} s ({:.3} Hz, {} readings)",
            m.period,
            m.frequency(),
            m.readings_used
        );
        println!("Time of max:  {:.4} s", m.time_of_max);
        println!("Bandwidth:    {:.3} Hz", m.bandwidth);
    }

    result
        .map(|_| ())
        .with_context(|| format!("measurement failed for '{}'", args.input.display()))
}
