use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait};
use infinitedsp_lofi::core::channels::Stereo;
use infinitedsp_lofi::core::effect_chain::EffectChain;
use infinitedsp_lofi::FrameProcessor;
use std::sync::{Arc, Mutex};

/// Opens the default output device and plays an interleaved stereo chain.
///
/// `create_chain` receives the device sample rate. Returns the stream (not yet
/// playing) and that rate.
pub fn init_audio_stereo<F>(create_chain: F) -> Result<(cpal::Stream, f32)>
where
    F: FnOnce(f32) -> EffectChain,
{
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No output device available"))?;
    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate() as f32;

    let chain = create_chain(sample_rate);
    let processor = Arc::new(Mutex::new(chain));

    let err_fn = |err| eprintln!("an error occurred on stream: {}", err);

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => run_stereo::<f32>(&device, &config.into(), processor, err_fn)?,
        cpal::SampleFormat::I16 => run_stereo::<i16>(&device, &config.into(), processor, err_fn)?,
        cpal::SampleFormat::U16 => run_stereo::<u16>(&device, &config.into(), processor, err_fn)?,
        _ => return Err(anyhow::anyhow!("Unsupported sample format")),
    };

    Ok((stream, sample_rate))
}

fn run_stereo<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    processor: Arc<Mutex<EffectChain>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut process_buffer = vec![0.0; 1024];
    let mut sample_clock = 0u64;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let Ok(mut chain) = processor.lock() else {
                return;
            };

            let frames = data.len() / channels;
            if process_buffer.len() < frames * 2 {
                process_buffer.resize(frames * 2, 0.0);
            }

            let stereo = &mut process_buffer[0..frames * 2];
            FrameProcessor::<Stereo>::process(&mut *chain, stereo, sample_clock);
            sample_clock += frames as u64;

            for (frame, pair) in data.chunks_mut(channels).zip(stereo.chunks(2)) {
                if channels >= 2 {
                    frame[0] = T::from_sample(pair[0]);
                    frame[1] = T::from_sample(pair[1]);
                    for extra in frame.iter_mut().skip(2) {
                        *extra = T::from_sample(0.0f32);
                    }
                } else {
                    frame[0] = T::from_sample((pair[0] + pair[1]) * 0.5);
                }
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
