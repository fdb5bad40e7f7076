use crate::core::audio_frame::AudioFrame;
use crate::core::effect::{AudioEffect, EffectInstance};
use crate::core::mix_rate::MixRateProvider;
use crate::core::param_info::{self, ParamError, ParamInfo};
use crate::core::parameter::Parameter;
use alloc::sync::Arc;
use wide::f32x4;

const PARAMS: [ParamInfo; 4] = [
    ParamInfo::float("depth", 1.0, 16.0, 0.01, 16.0),
    ParamInfo::int("rate", 20, 22050, 22050)
        .with_suffix("Hz")
        .with_exp_easing(),
    ParamInfo::float("dry", 0.0, 1.0, 0.01, 0.0),
    ParamInfo::float("wet", 0.0, 1.0, 0.01, 1.0),
];

/// Plain-value snapshot of a [`Bitcrush`] parameter set.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BitcrushSettings {
    /// Bit depth (1.0 - 16.0).
    pub depth: f32,
    /// Target sample rate in Hz (20 - 22050).
    pub rate: i32,
    /// Unprocessed signal level (0.0 - 1.0).
    pub dry: f32,
    /// Crushed signal level (0.0 - 1.0).
    pub wet: f32,
}

impl Default for BitcrushSettings {
    fn default() -> Self {
        BitcrushSettings {
            depth: 16.0,
            rate: 22050,
            dry: 0.0,
            wet: 1.0,
        }
    }
}

/// Bit depth and sample rate reducer.
///
/// This is the shared parameter set. Clones share the same cells, so editing
/// one clone is seen by every instance created from any of them.
#[derive(Clone, Debug)]
pub struct Bitcrush {
    depth: Parameter,
    rate: Parameter,
    dry: Parameter,
    wet: Parameter,
}

impl Bitcrush {
    /// Creates a new Bitcrush parameter set.
    pub fn new(settings: BitcrushSettings) -> Self {
        Bitcrush {
            depth: Parameter::new(settings.depth),
            rate: Parameter::new(settings.rate as f32),
            dry: Parameter::new(settings.dry),
            wet: Parameter::new(settings.wet),
        }
    }

    pub fn set_depth(&self, depth: f32) {
        self.depth.set(depth);
    }

    pub fn depth(&self) -> f32 {
        self.depth.get()
    }

    pub fn set_rate(&self, rate: i32) {
        self.rate.set(rate as f32);
    }

    pub fn rate(&self) -> i32 {
        self.rate.get() as i32
    }

    pub fn set_dry(&self, dry: f32) {
        self.dry.set(dry);
    }

    pub fn dry(&self) -> f32 {
        self.dry.get()
    }

    pub fn set_wet(&self, wet: f32) {
        self.wet.set(wet);
    }

    pub fn wet(&self) -> f32 {
        self.wet.get()
    }

    pub fn settings(&self) -> BitcrushSettings {
        BitcrushSettings {
            depth: self.depth(),
            rate: self.rate(),
            dry: self.dry(),
            wet: self.wet(),
        }
    }

    /// Stores every field of `settings`. Fields land one at a time.
    pub fn apply(&self, settings: &BitcrushSettings) {
        self.set_depth(settings.depth);
        self.set_rate(settings.rate);
        self.set_dry(settings.dry);
        self.set_wet(settings.wet);
    }
}

impl Default for Bitcrush {
    fn default() -> Self {
        Bitcrush::new(BitcrushSettings::default())
    }
}

impl AudioEffect for Bitcrush {
    type Instance = BitcrushInstance;

    fn instantiate(&self, mix_rate: Arc<dyn MixRateProvider>) -> BitcrushInstance {
        log::debug!(
            "bitcrush instance: depth {} rate {} Hz at mix rate {} Hz",
            self.depth(),
            self.rate(),
            mix_rate.mix_rate()
        );
        BitcrushInstance {
            params: self.clone(),
            mix_rate,
            remaining_samples: 0.0,
            held_frame: AudioFrame::SILENCE,
        }
    }

    fn param_info(&self) -> &'static [ParamInfo] {
        &PARAMS
    }

    fn param(&self, name: &str) -> Result<f32, ParamError> {
        match name {
            "depth" => Ok(self.depth()),
            "rate" => Ok(self.rate() as f32),
            "dry" => Ok(self.dry()),
            "wet" => Ok(self.wet()),
            _ => Err(ParamError::UnknownParameter { name: name.into() }),
        }
    }

    fn set_param(&self, name: &str, value: f32) -> Result<(), ParamError> {
        let info = param_info::find(&PARAMS, name)?;
        let value = info.validate(value)?;
        match info.name {
            "depth" => self.set_depth(value),
            "rate" => self.set_rate(value as i32),
            "dry" => self.set_dry(value),
            _ => self.set_wet(value),
        }
        Ok(())
    }
}

/// Per-stream bitcrush state.
///
/// Holds an interpolated input value for `mix_rate / rate` frames, then
/// quantizes it to `2^depth` levels per unit.
pub struct BitcrushInstance {
    params: Bitcrush,
    mix_rate: Arc<dyn MixRateProvider>,
    /// Frames left until the next hold point, with sub-frame phase.
    remaining_samples: f32,
    held_frame: AudioFrame,
}

impl BitcrushInstance {
    pub fn params(&self) -> &Bitcrush {
        &self.params
    }
}

impl EffectInstance for BitcrushInstance {
    fn process(&mut self, src: &[f32], dst: &mut [f32]) {
        let frames = src.len().min(dst.len()) / 2;
        if frames == 0 {
            return;
        }
        let len = frames * 2;
        let src = &src[0..len];
        let dst = &mut dst[0..len];

        // A crush rate above the host rate holds every frame.
        let sample_count = (self.mix_rate.mix_rate() / self.params.rate.get()).max(1.0);
        let depth_mul = libm::powf(2.0, self.params.depth.get());
        let dry = self.params.dry.get();
        let wet = self.params.wet.get();

        // Sample and hold. The hold point is placed between frame i and i + 1
        // by the leftover phase; the last frame of a block has no successor
        // here and interpolates against itself.
        let (src_frames, _) = src.as_chunks::<2>();
        let (dst_frames, _) = dst.as_chunks_mut::<2>();
        let last = frames - 1;
        for (i, out) in dst_frames.iter_mut().enumerate() {
            if self.remaining_samples <= 1.0 {
                let next = if i == last { i } else { i + 1 };
                let current = AudioFrame::from(src_frames[i]);
                self.held_frame = current.lerp(src_frames[next].into(), self.remaining_samples);
                self.remaining_samples += sample_count;
            }
            self.remaining_samples -= 1.0;
            *out = self.held_frame.to_array();
        }

        // Quantize and mix.
        let (out_chunks, out_rem) = dst.as_chunks_mut::<4>();
        let (in_chunks, in_rem) = src.as_chunks::<4>();

        let mul_vec = f32x4::splat(depth_mul);
        let half_vec = f32x4::splat(0.5);
        let dry_vec = f32x4::splat(dry);
        let wet_vec = f32x4::splat(wet);

        for (out, input) in out_chunks.iter_mut().zip(in_chunks) {
            let held = f32x4::from(*out);
            let quantized = (held * mul_vec + half_vec).floor() / mul_vec;
            let result = quantized * wet_vec + f32x4::from(*input) * dry_vec;
            *out = result.to_array();
        }

        for (out, &input) in out_rem.iter_mut().zip(in_rem) {
            let quantized = libm::floorf(*out * depth_mul + 0.5) / depth_mul;
            *out = quantized * wet + input * dry;
        }
    }

    fn set_mix_rate(&mut self, mix_rate: Arc<dyn MixRateProvider>) {
        self.mix_rate = mix_rate;
    }

    fn name(&self) -> &str {
        "Bitcrush"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::channels::Stereo;
    use crate::core::mix_rate::FixedMixRate;
    use crate::FrameProcessor;
    use alloc::vec;
    use alloc::vec::Vec;

    fn crusher(depth: f32, rate: i32, dry: f32, wet: f32, mix_rate: f32) -> BitcrushInstance {
        let effect = Bitcrush::new(BitcrushSettings {
            depth,
            rate,
            dry,
            wet,
        });
        effect.instantiate(Arc::new(FixedMixRate(mix_rate)))
    }

    fn left(buffer: &[f32]) -> Vec<f32> {
        buffer.iter().step_by(2).copied().collect()
    }

    #[test]
    fn test_constant_input_half_rate() {
        let mut fx = crusher(16.0, 22050, 0.0, 1.0, 44100.0);
        let src = [0.5, -0.5, 0.5, -0.5, 0.5, -0.5, 0.5, -0.5];
        let mut dst = [0.0; 8];
        fx.process(&src, &mut dst);

        for frame in dst.chunks(2) {
            assert!((frame[0] - 0.5).abs() < 1e-6);
            assert!((frame[1] + 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_hold_points_and_block_end() {
        let mut fx = crusher(16.0, 22050, 0.0, 1.0, 44100.0);
        let src: Vec<f32> = (0..8).flat_map(|i| [i as f32, -(i as f32)]).collect();
        let mut dst = vec![0.0; 16];
        fx.process(&src, &mut dst);

        // The hold at frame 7 has no successor and keeps frame 7 itself.
        assert_eq!(left(&dst), [0.0, 2.0, 2.0, 4.0, 4.0, 6.0, 6.0, 7.0]);
        assert_eq!(dst[15], -7.0);
    }

    #[test]
    fn test_runs_follow_fractional_rate() {
        // 44100 / 17640 = 2.5 host frames per held value.
        let mut fx = crusher(16.0, 17640, 0.0, 1.0, 44100.0);
        let src: Vec<f32> = (0..1000)
            .flat_map(|i| {
                let v = i as f32 * 0.001 - 0.5;
                [v, v]
            })
            .collect();
        let mut dst = vec![0.0; src.len()];
        for (s, d) in src.chunks(128).zip(dst.chunks_mut(128)) {
            fx.process(s, d);
        }

        let out = left(&dst);
        let changes = out.windows(2).filter(|w| w[0] != w[1]).count();
        assert!((398..=401).contains(&changes), "changes {}", changes);

        let mut run = 1;
        for w in out.windows(2) {
            if w[0] == w[1] {
                run += 1;
            } else {
                assert!((1..=3).contains(&run), "run {}", run);
                run = 1;
            }
        }
    }

    #[test]
    fn test_single_frame_blocks() {
        let mut fx = crusher(16.0, 11025, 0.0, 1.0, 44100.0);
        let src: Vec<f32> = (0..12).flat_map(|i| [i as f32, i as f32]).collect();
        let mut dst = vec![0.0; src.len()];
        for (s, d) in src.chunks(2).zip(dst.chunks_mut(2)) {
            fx.process(s, d);
        }

        // Every hold lands on the last frame of its block and keeps it.
        assert_eq!(
            left(&dst),
            [0.0, 0.0, 0.0, 3.0, 3.0, 3.0, 3.0, 7.0, 7.0, 7.0, 7.0, 11.0]
        );
    }

    #[test]
    fn test_crush_rate_above_host_rate() {
        let mut fx = crusher(16.0, 22050, 0.0, 1.0, 16000.0);
        let src: Vec<f32> = (0..4096)
            .flat_map(|i| {
                let v = libm::sinf(i as f32 * 0.05) * 0.5;
                [v, -v]
            })
            .collect();
        let mut dst = vec![0.0; src.len()];
        for (s, d) in src.chunks(512).zip(dst.chunks_mut(512)) {
            fx.process(s, d);
            assert!((0.0..=1.0).contains(&fx.remaining_samples));
        }

        for (out, input) in dst.iter().zip(&src) {
            assert!((out - input).abs() <= 1.0 / 65536.0);
        }
        let peak = dst.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!(peak <= 0.5 + 1e-4, "peak {}", peak);
    }

    #[test]
    fn test_full_depth_error_bound() {
        let mut fx = crusher(16.0, 22050, 0.0, 1.0, 22050.0);
        let src: Vec<f32> = (0..256)
            .map(|i| libm::sinf(i as f32 * 0.37) * 0.999)
            .collect();
        let mut dst = vec![0.0; src.len()];
        fx.process(&src, &mut dst);

        for (out, input) in dst.iter().zip(&src) {
            assert!((out - input).abs() <= 1.0 / 65536.0);
        }
    }

    #[test]
    fn test_dry_only_is_transparent() {
        let mut fx = crusher(3.0, 900, 1.0, 0.0, 44100.0);
        let src: Vec<f32> = (0..64).map(|i| libm::cosf(i as f32 * 0.2) * 1.3).collect();
        let mut dst = vec![0.0; src.len()];
        fx.process(&src, &mut dst);

        assert_eq!(dst, src);
    }

    #[test]
    fn test_low_depth_quantizes() {
        let mut fx = crusher(2.0, 22050, 0.0, 1.0, 22050.0);
        let src = [0.3, -0.3, 0.9, 0.1, 0.12, -0.12];
        let mut dst = [0.0; 6];
        fx.process(&src, &mut dst);

        assert_eq!(dst, [0.25, -0.25, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_split_blocks_match_single_block() {
        let src: Vec<f32> = (0..9).flat_map(|i| [i as f32 * 0.1, i as f32 * -0.05]).collect();

        let mut whole = crusher(12.0, 22050, 0.25, 0.75, 44100.0);
        let mut expected = vec![0.0; src.len()];
        whole.process(&src, &mut expected);

        // Every block ends on a frame without a hold point.
        let mut split = crusher(12.0, 22050, 0.25, 0.75, 44100.0);
        let mut actual = vec![0.0; src.len()];
        for (start, end) in [(0, 3), (3, 5), (5, 9)] {
            split.process(&src[start * 2..end * 2], &mut actual[start * 2..end * 2]);
        }

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_live_edits_apply_next_block() {
        let effect = Bitcrush::default();
        let host_rate = Parameter::new(44100.0);
        let mut fx = effect.instantiate(Arc::new(host_rate.clone()));

        let src = [0.3, 0.3, 0.6, 0.6];
        let mut dst = [0.0; 4];

        effect.set_dry(1.0);
        effect.set_wet(0.0);
        fx.process(&src, &mut dst);
        assert_eq!(dst, src);

        fx.params().set_dry(0.0);
        fx.params().set_wet(1.0);
        host_rate.set(22050.0);
        fx.process(&src, &mut dst);
        assert!((dst[2] - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_schema_access() {
        let effect = Bitcrush::default();
        assert_eq!(effect.param_info().len(), 4);
        assert_eq!(effect.settings(), BitcrushSettings::default());

        effect.set_param("depth", 8.0).unwrap();
        effect.set_param("rate", 4000.4).unwrap();
        assert_eq!(effect.param("depth"), Ok(8.0));
        assert_eq!(effect.param("rate"), Ok(4000.0));

        assert!(matches!(
            effect.set_param("depth", 0.0),
            Err(ParamError::OutOfRange { .. })
        ));
        assert!(matches!(
            effect.set_param("bits", 8.0),
            Err(ParamError::UnknownParameter { .. })
        ));
        assert_eq!(effect.depth(), 8.0);

        let copy = effect.clone();
        copy.apply(&BitcrushSettings::default());
        assert_eq!(effect.rate(), 22050);
    }

    #[test]
    fn test_in_place_matches_src_dst() {
        let src: Vec<f32> = (0..32).map(|i| libm::sinf(i as f32 * 0.5)).collect();

        let effect = Bitcrush::new(BitcrushSettings {
            depth: 4.0,
            rate: 11025,
            dry: 0.5,
            wet: 0.5,
        });
        let mut reference = effect.instantiate(Arc::new(FixedMixRate(44100.0)));
        let mut expected = vec![0.0; src.len()];
        reference.process(&src, &mut expected);

        let mut in_place = effect.instantiate(Arc::new(FixedMixRate(1.0))).into_processor();
        FrameProcessor::<Stereo>::set_sample_rate(&mut in_place, 44100.0);
        let mut buffer = src.clone();
        in_place.process(&mut buffer, 0);

        assert_eq!(buffer, expected);
        assert_eq!(in_place.inner().params().settings(), effect.settings());
    }
}
