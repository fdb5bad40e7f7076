//! The stream effect protocol.
//!
//! An [`AudioEffect`] is the shared, host-editable parameter set. For every
//! stream that plays through it the host calls [`AudioEffect::instantiate`]
//! once and then feeds the returned [`EffectInstance`] consecutive blocks
//! until the stream ends.

use crate::core::channels::Stereo;
use crate::core::frame_processor::FrameProcessor;
use crate::core::mix_rate::{FixedMixRate, MixRateProvider};
use crate::core::param_info::{ParamError, ParamInfo};
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Per-stream processing state bound to an effect's parameters.
pub trait EffectInstance: Send {
    /// Processes `min(src.len(), dst.len()) / 2` interleaved stereo frames.
    ///
    /// Must be called with contiguous blocks of one stream. Never allocates.
    fn process(&mut self, src: &[f32], dst: &mut [f32]);

    /// Replaces the source of the host mix rate.
    fn set_mix_rate(&mut self, mix_rate: Arc<dyn MixRateProvider>);

    fn name(&self) -> &str {
        ""
    }

    /// Wraps the instance so it can run in place inside an effect chain.
    fn into_processor(self) -> InPlaceEffect<Self>
    where
        Self: Sized,
    {
        InPlaceEffect::new(self)
    }
}

/// A host-editable effect whose parameters are shared by all its instances.
pub trait AudioEffect {
    type Instance: EffectInstance;

    /// Creates fresh per-stream state bound to this parameter set.
    fn instantiate(&self, mix_rate: Arc<dyn MixRateProvider>) -> Self::Instance;

    /// The parameter schema, in user units.
    fn param_info(&self) -> &'static [ParamInfo];

    /// Reads a parameter in user units.
    fn param(&self, name: &str) -> Result<f32, ParamError>;

    /// Validates `value` against the schema and stores it.
    fn set_param(&self, name: &str, value: f32) -> Result<(), ParamError>;
}

/// Runs an [`EffectInstance`] on a single interleaved buffer.
///
/// The dry input is copied into a scratch buffer first. The scratch only grows
/// when a block larger than any previous one arrives.
pub struct InPlaceEffect<E> {
    inner: E,
    dry_buffer: Vec<f32>,
}

impl<E: EffectInstance> InPlaceEffect<E> {
    pub fn new(inner: E) -> Self {
        InPlaceEffect {
            inner,
            dry_buffer: Vec::new(),
        }
    }

    /// Pre-sizes the scratch buffer so `process` never allocates.
    pub fn with_max_block(mut self, frames: usize) -> Self {
        self.dry_buffer.resize(frames * 2, 0.0);
        self
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }
}

impl<E: EffectInstance> FrameProcessor<Stereo> for InPlaceEffect<E> {
    fn process(&mut self, buffer: &mut [f32], _sample_index: u64) {
        let len = buffer.len();
        if self.dry_buffer.len() < len {
            self.dry_buffer.resize(len, 0.0);
        }
        let dry = &mut self.dry_buffer[0..len];
        dry.copy_from_slice(buffer);

        self.inner.process(dry, buffer);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        log::debug!("{}: mix rate fixed at {} Hz", self.inner.name(), sample_rate);
        self.inner.set_mix_rate(Arc::new(FixedMixRate(sample_rate)));
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
