//! Synthetic trace generation command.

use clap::Args;
use std::f64::consts::TAU;
use std::path::PathBuf;

use crate::trace::write_trace;

/// Write a sinusoid, optionally preceded by a quiet lead-in.
#[derive(Args)]
pub struct GenerateArgs {
    /// Output file: `.wav` (32-bit float) or text for any other extension
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Frequency in Hz
    #[arg(long, default_value = "1.0")]
    freq: f64,

    /// Peak amplitude
    #[arg(long, default_value = "1.0")]
    amplitude: f64,

    /// Duration in seconds
    #[arg(long, default_value = "10.0")]
    duration: f64,

    /// Sample rate in Hz
    #[arg(long, default_value = "40")]
    sample_rate: u32,

    /// Seconds of zeros before the sinusoid starts
    #[arg(long, default_value = "0.0")]
    onset: f64,
}

/// `amplitude * sin(2π f (t - onset))` for `t >= onset`, zero before.
fn sinusoid(args: &GenerateArgs) -> Vec<f64> {
    let sr = f64::from(args.sample_rate);
    let len = (args.duration * sr).round() as usize;
    (0..len)
        .map(|k| {
            let t = k as f64 / sr - args.onset;
            if t < 0.0 {
                0.0
            } else {
                args.amplitude * (TAU * args.freq * t).sin()
            }
        })
        .collect()
}

/// Run the generate command.
pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if args.sample_rate == 0 {
        anyhow::bail!("sample rate must be positive");
    }
    let nyquist = 0.5 * f64::from(args.sample_rate);
    if !(args.freq > 0.0 && args.freq < nyquist) {
        anyhow::bail!(
            "frequency {} Hz must lie in (0, {}) Hz",
            args.freq,
            nyquist
        );
    }

    let samples = sinusoid(&args);
    write_trace(&args.output, &samples, args.sample_rate)?;

    println!(
        "Wrote {} samples ({:.2} s at {} Hz) of a {} Hz sinusoid to {}",
        samples.len(),
        args.duration,
        args.sample_rate,
        args.freq,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(onset: f64) -> GenerateArgs {
        GenerateArgs {
            output: PathBuf::from("unused.wav"),
            freq: 2.0,
            amplitude: 3.0,
            duration: 1.0,
            sample_rate: 40,
            onset,
        }
    }

    #[test]
    fn length_follows_duration() {
        assert_eq!(sinusoid(&args(0.0)).len(), 40);
    }

    #[test]
    fn onset_is_silent() {
        let samples = sinusoid(&args(0.5));
        assert!(samples[..20].iter().all(|&s| s == 0.0));
        assert!((samples[25] - 3.0).abs() < 1e-12);
    }
}
