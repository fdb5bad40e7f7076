//! Offline renderer: runs a WAV file through bitcrush and sample-rate reduction.
//!
//! Usage: lofi_render <input.wav> <output.wav> [preset.json]
//!
//! The preset may set either effect; missing fields keep their defaults:
//! `{"bitcrush": {"depth": 6.0, "rate": 8000, "dry": 0.0, "wet": 1.0},
//!   "sample_rate": {"rate": 11025.0, "noise": 30.0, "noise_width": 50.0, "mix": 100.0}}`

use anyhow::{bail, Context, Result};
use infinitedsp_lofi::core::parameter::Parameter;
use infinitedsp_lofi::effects::lofi::{Bitcrush, BitcrushSettings, SampleRate, SampleRateSettings};
use infinitedsp_lofi::{AudioEffect, EffectInstance};
use serde::Deserialize;
use std::sync::Arc;

const BLOCK_FRAMES: usize = 512;

#[derive(Deserialize, Default)]
#[serde(default)]
struct Preset {
    bitcrush: Option<BitcrushSettings>,
    sample_rate: Option<SampleRateSettings>,
}

fn load_preset(path: Option<&String>) -> Result<Preset> {
    let Some(path) = path else {
        return Ok(Preset {
            bitcrush: Some(BitcrushSettings {
                depth: 6.0,
                rate: 8000,
                ..Default::default()
            }),
            sample_rate: None,
        });
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading preset {}", path))?;
    serde_json::from_str(&json).with_context(|| format!("parsing preset {}", path))
}

/// Reads any PCM or float WAV as interleaved stereo in [-1, 1].
fn read_stereo(path: &str) -> Result<(Vec<f32>, u32)> {
    let reader = hound::WavReader::open(path).with_context(|| format!("opening {}", path))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
    };

    let stereo: Vec<f32> = match channels {
        1 => samples.iter().flat_map(|&s| [s, s]).collect(),
        2 => samples,
        n if n > 2 => samples
            .chunks_exact(n)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect(),
        _ => bail!("{} has no channels", path),
    };

    eprintln!(
        "Input: {} ch, {} Hz, {}-bit, {} frames",
        channels,
        spec.sample_rate,
        spec.bits_per_sample,
        stereo.len() / 2
    );

    Ok((stereo, spec.sample_rate))
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        bail!("Usage: lofi_render <input.wav> <output.wav> [preset.json]");
    }
    let preset = load_preset(args.get(3))?;
    let (mut output, wav_rate) = read_stereo(&args[1])?;

    let host_rate = Arc::new(Parameter::new(wav_rate as f32));
    let mut stages: Vec<Box<dyn EffectInstance>> = Vec::new();
    if let Some(settings) = preset.bitcrush {
        eprintln!("Bitcrush: {:?}", settings);
        stages.push(Box::new(Bitcrush::new(settings).instantiate(host_rate.clone())));
    }
    if let Some(settings) = preset.sample_rate {
        eprintln!("Sample rate: {:?}", settings);
        stages.push(Box::new(SampleRate::new(settings).instantiate(host_rate.clone())));
    }

    let mut scratch = vec![0.0; BLOCK_FRAMES * 2];
    for block in output.chunks_mut(BLOCK_FRAMES * 2) {
        for stage in stages.iter_mut() {
            let dry = &mut scratch[0..block.len()];
            dry.copy_from_slice(block);
            stage.process(dry, block);
        }
    }

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: wav_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&args[2], spec).with_context(|| format!("creating {}", args[2]))?;
    for &sample in &output {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    let peak = output.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
    eprintln!("Wrote {} frames to {} (peak {:.3})", output.len() / 2, args[2], peak);

    Ok(())
}
