use crate::core::audio_frame::{db_to_linear, lerp, AudioFrame};
use crate::core::effect::{AudioEffect, EffectInstance};
use crate::core::mix_rate::MixRateProvider;
use crate::core::noise::{Lcg, NoiseSource};
use crate::core::param_info::{self, ParamError, ParamInfo};
use crate::core::parameter::Parameter;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};
use wide::f32x4;

const PARAMS: [ParamInfo; 4] = [
    ParamInfo::float("rate", 20.0, 48000.0, 10.0, 48000.0).with_suffix("Hz"),
    ParamInfo::percent("noise", 0.0),
    ParamInfo::percent("noise_width", 100.0),
    ParamInfo::percent("mix", 100.0),
];

/// Loudness boost applied when the noise is half correlated, in dB.
const WIDTH_MAKEUP_DB: f32 = 1.5;

/// Plain-value snapshot of a [`SampleRate`] parameter set, in user units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SampleRateSettings {
    /// Target sample rate in Hz (20 - 48000).
    pub rate: f32,
    /// Noise amount in percent.
    pub noise: f32,
    /// Stereo decorrelation of the noise in percent (0 = mono).
    pub noise_width: f32,
    /// Wet amount in percent.
    pub mix: f32,
}

impl Default for SampleRateSettings {
    fn default() -> Self {
        SampleRateSettings {
            rate: 48000.0,
            noise: 0.0,
            noise_width: 100.0,
            mix: 100.0,
        }
    }
}

/// Sample-and-hold rate reducer with noise on every held value.
///
/// Percentage parameters are exposed as 0 - 100 and stored as fractions.
/// Clones share the same parameter cells.
#[derive(Clone, Debug)]
pub struct SampleRate {
    rate: Parameter,
    noise: Parameter,
    noise_width: Parameter,
    mix: Parameter,
    instances: Arc<AtomicU32>,
}

impl SampleRate {
    /// Creates a new SampleRate parameter set.
    pub fn new(settings: SampleRateSettings) -> Self {
        let effect = SampleRate {
            rate: Parameter::new(settings.rate),
            noise: Parameter::new(0.0),
            noise_width: Parameter::new(0.0),
            mix: Parameter::new(0.0),
            instances: Arc::new(AtomicU32::new(0)),
        };
        effect.apply(&settings);
        effect
    }

    pub fn set_rate(&self, rate: f32) {
        self.rate.set(rate);
    }

    pub fn rate(&self) -> f32 {
        self.rate.get()
    }

    /// Sets the noise amount in percent.
    pub fn set_noise(&self, noise: f32) {
        self.noise.set(noise / 100.0);
    }

    pub fn noise(&self) -> f32 {
        self.noise.get() * 100.0
    }

    /// Sets the noise stereo width in percent.
    pub fn set_noise_width(&self, noise_width: f32) {
        self.noise_width.set(noise_width / 100.0);
    }

    pub fn noise_width(&self) -> f32 {
        self.noise_width.get() * 100.0
    }

    /// Sets the wet amount in percent.
    pub fn set_mix(&self, mix: f32) {
        self.mix.set(mix / 100.0);
    }

    pub fn mix(&self) -> f32 {
        self.mix.get() * 100.0
    }

    pub fn settings(&self) -> SampleRateSettings {
        SampleRateSettings {
            rate: self.rate(),
            noise: self.noise(),
            noise_width: self.noise_width(),
            mix: self.mix(),
        }
    }

    /// Stores every field of `settings`. Fields land one at a time.
    pub fn apply(&self, settings: &SampleRateSettings) {
        self.set_rate(settings.rate);
        self.set_noise(settings.noise);
        self.set_noise_width(settings.noise_width);
        self.set_mix(settings.mix);
    }

    /// Creates an instance drawing its noise from `noise`.
    pub fn instantiate_with_noise<R: NoiseSource>(
        &self,
        mix_rate: Arc<dyn MixRateProvider>,
        noise: R,
    ) -> SampleRateInstance<R> {
        log::debug!(
            "sample rate instance: {} Hz, noise {}%, width {}% at mix rate {} Hz",
            self.rate(),
            self.noise(),
            self.noise_width(),
            mix_rate.mix_rate()
        );
        SampleRateInstance {
            params: self.clone(),
            mix_rate,
            noise,
            processed_frames: 0.0,
            held_frame: AudioFrame::SILENCE,
        }
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        SampleRate::new(SampleRateSettings::default())
    }
}

impl AudioEffect for SampleRate {
    type Instance = SampleRateInstance<Lcg>;

    /// Every instance gets its own seed so streams sharing the effect do not
    /// share the same noise.
    fn instantiate(&self, mix_rate: Arc<dyn MixRateProvider>) -> SampleRateInstance<Lcg> {
        let n = self.instances.fetch_add(1, Ordering::Relaxed);
        let seed = Lcg::DEFAULT_SEED.wrapping_add(n.wrapping_mul(0x9E37_79B9));
        self.instantiate_with_noise(mix_rate, Lcg::new(seed))
    }

    fn param_info(&self) -> &'static [ParamInfo] {
        &PARAMS
    }

    fn param(&self, name: &str) -> Result<f32, ParamError> {
        match name {
            "rate" => Ok(self.rate()),
            "noise" => Ok(self.noise()),
            "noise_width" => Ok(self.noise_width()),
            "mix" => Ok(self.mix()),
            _ => Err(ParamError::UnknownParameter { name: name.into() }),
        }
    }

    fn set_param(&self, name: &str, value: f32) -> Result<(), ParamError> {
        let info = param_info::find(&PARAMS, name)?;
        let value = info.validate(value)?;
        match info.name {
            "rate" => self.set_rate(value),
            "noise" => self.set_noise(value),
            "noise_width" => self.set_noise_width(value),
            _ => self.set_mix(value),
        }
        Ok(())
    }
}

/// Per-stream sample-rate reducer state.
pub struct SampleRateInstance<R = Lcg> {
    params: SampleRate,
    mix_rate: Arc<dyn MixRateProvider>,
    noise: R,
    /// Host frames since the last hold point.
    processed_frames: f32,
    held_frame: AudioFrame,
}

impl<R: NoiseSource> SampleRateInstance<R> {
    pub fn params(&self) -> &SampleRate {
        &self.params
    }

    #[inline]
    fn noise_gain(&mut self, noise: f32, makeup_gain: f32) -> f32 {
        1.0 + noise * (self.noise.next_unit() - 0.5) * makeup_gain
    }
}

impl<R: NoiseSource> EffectInstance for SampleRateInstance<R> {
    fn process(&mut self, src: &[f32], dst: &mut [f32]) {
        let frames = src.len().min(dst.len()) / 2;
        let len = frames * 2;
        let src = &src[0..len];
        let dst = &mut dst[0..len];

        let frames_until_next_sample = self.mix_rate.mix_rate() / self.params.rate.get();
        let noise = self.params.noise.get();
        let width = self.params.noise_width.get();
        let mix = self.params.mix.get();

        // Peaks at width 0.5, where the mono and per-channel draws blend.
        let makeup_gain = 1.0 + (0.5 - libm::fabsf(0.5 - width)) * db_to_linear(WIDTH_MAKEUP_DB);

        let (src_frames, _) = src.as_chunks::<2>();
        let (dst_frames, _) = dst.as_chunks_mut::<2>();
        for (out, input) in dst_frames.iter_mut().zip(src_frames) {
            if self.processed_frames >= frames_until_next_sample {
                let noise_m = self.noise_gain(noise, makeup_gain);
                let noise_l = self.noise_gain(noise, makeup_gain);
                let noise_r = self.noise_gain(noise, makeup_gain);

                let frame = AudioFrame::from(*input);
                self.held_frame = AudioFrame::new(
                    frame.l * lerp(noise_m, noise_l, width),
                    frame.r * lerp(noise_m, noise_r, width),
                );
                self.processed_frames -= frames_until_next_sample;
            }
            self.processed_frames += 1.0;
            *out = self.held_frame.to_array();
        }

        let (out_chunks, out_rem) = dst.as_chunks_mut::<4>();
        let (in_chunks, in_rem) = src.as_chunks::<4>();

        let wet_vec = f32x4::splat(mix);
        let dry_vec = f32x4::splat(1.0 - mix);

        for (out, input) in out_chunks.iter_mut().zip(in_chunks) {
            let result = f32x4::from(*out) * wet_vec + f32x4::from(*input) * dry_vec;
            *out = result.to_array();
        }

        for (out, &input) in out_rem.iter_mut().zip(in_rem) {
            *out = *out * mix + input * (1.0 - mix);
        }
    }

    fn set_mix_rate(&mut self, mix_rate: Arc<dyn MixRateProvider>) {
        self.mix_rate = mix_rate;
    }

    fn name(&self) -> &str {
        "SampleRate"
    }
}
