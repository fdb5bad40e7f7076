//! Lo-fi digital degradation effects.
//!
//! Both effects degrade the signal by holding samples for longer than one
//! host frame. [`bitcrush::Bitcrush`] additionally quantizes the held value to
//! a reduced bit depth, while [`sample_rate::SampleRate`] modulates every held
//! value with per-channel noise.

pub mod bitcrush;
pub mod sample_rate;

pub use bitcrush::{Bitcrush, BitcrushInstance, BitcrushSettings};
pub use sample_rate::{SampleRate, SampleRateInstance, SampleRateSettings};
