//! Reading and writing single-channel traces.
//!
//! Two formats are understood: WAV (first channel only, integer samples
//! scaled to [-1, 1)) and plain text with one sample per line. Blank lines
//! and lines starting with `#` are skipped in text files.

use anyhow::{Context, bail};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Samples of one trace with their sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Sample values.
    pub samples: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: f64,
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

/// Read a trace. `sample_rate` is required for text files and overrides the
/// WAV header when given.
pub fn read_trace(path: &Path, sample_rate: Option<f64>) -> anyhow::Result<Trace> {
    if is_wav(path) {
        let (samples, header_rate) = read_wav_first_channel(path)?;
        return Ok(Trace {
            samples,
            sample_rate: sample_rate.unwrap_or(header_rate),
        });
    }

    let Some(sample_rate) = sample_rate else {
        bail!(
            "--sample-rate is required for text input '{}'",
            path.display()
        );
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let samples = parse_text_samples(&content)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;
    Ok(Trace {
        samples,
        sample_rate,
    })
}

/// Parse one sample per line.
pub fn parse_text_samples(content: &str) -> anyhow::Result<Vec<f64>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(lineno, line)| {
            line.parse::<f64>()
                .with_context(|| format!("line {lineno}: '{line}' is not a number"))
        })
        .collect()
}

fn read_wav_first_channel(path: &Path) -> anyhow::Result<(Vec<f64>, f64)> {
    let reader = WavReader::open(path)
        .with_context(|| format!("failed to open WAV '{}'", path.display()))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let samples: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .step_by(channels)
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let max_val = f64::from(1u32 << (spec.bits_per_sample - 1));
            reader
                .into_samples::<i32>()
                .step_by(channels)
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<Result<_, _>>()?
        }
    };

    Ok((samples, f64::from(spec.sample_rate)))
}

/// Write a trace as 32-bit float mono WAV, or as text for a `.txt` path.
pub fn write_trace(path: &Path, samples: &[f64], sample_rate: u32) -> anyhow::Result<()> {
    if !is_wav(path) {
        let mut content = String::with_capacity(samples.len() * 12);
        for s in samples {
            content.push_str(&format!("{s}\n"));
        }
        std::fs::write(path, content)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        return Ok(());
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create WAV '{}'", path.display()))?;
    for &s in samples {
        writer.write_sample(s as f32)?;
    }
    writer.finalize()?;
    Ok(())
}
