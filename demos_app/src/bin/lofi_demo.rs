use anyhow::Result;
use cpal::traits::StreamTrait;
use infinitedsp_lofi::core::effect_chain::EffectChain;
use infinitedsp_lofi::core::mix_rate::FixedMixRate;
use infinitedsp_lofi::effects::lofi::{Bitcrush, BitcrushSettings, SampleRate, SampleRateSettings};
use infinitedsp_lofi::{AudioEffect, EffectInstance};
use infinitedsp_lofi_demos::audio_backend::init_audio_stereo;
use infinitedsp_lofi_demos::tone::ChordSource;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    let bitcrush = Bitcrush::new(BitcrushSettings {
        depth: 16.0,
        rate: 22050,
        dry: 0.0,
        wet: 1.0,
    });
    let sample_rate = SampleRate::new(SampleRateSettings {
        rate: 48000.0,
        noise: 20.0,
        noise_width: 50.0,
        mix: 100.0,
    });

    // The chain owns the instances; these handles stay with the control thread.
    let crush_params = bitcrush.clone();
    let rate_params = sample_rate.clone();

    let (stream, mix_rate) = init_audio_stereo(|sr| {
        let provider = Arc::new(FixedMixRate(sr));
        let chain = EffectChain::new(ChordSource::new(&[220.0, 277.18, 329.63], 0.5), sr)
            .and(bitcrush.instantiate(provider.clone()).into_processor().with_max_block(4096))
            .and(sample_rate.instantiate(provider).into_processor().with_max_block(4096));
        println!("{}", chain.get_graph());
        chain
    })?;

    println!("Playing lo-fi demo at {}Hz...", mix_rate);
    stream.play()?;

    println!("Sweeping bit depth 16 -> 3");
    for step in 0..=26 {
        crush_params.set_depth(16.0 - step as f32 * 0.5);
        thread::sleep(Duration::from_millis(150));
    }

    println!("Sweeping bitcrush rate 22050 -> 2000 Hz");
    for step in 0..=20 {
        crush_params.set_rate(22050 - step * 1002);
        thread::sleep(Duration::from_millis(150));
    }

    crush_params.apply(&BitcrushSettings::default());
    println!("Sweeping sample rate 48000 -> 1500 Hz with 60% noise");
    rate_params.set_noise(60.0);
    for step in 0..=30 {
        rate_params.set_rate(48000.0 - step as f32 * 1550.0);
        thread::sleep(Duration::from_millis(150));
    }

    println!("Narrowing noise to mono");
    for step in 0..=10 {
        rate_params.set_noise_width(100.0 - step as f32 * 10.0);
        thread::sleep(Duration::from_millis(200));
    }

    Ok(())
}
