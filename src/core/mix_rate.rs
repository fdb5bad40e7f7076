use crate::core::parameter::Parameter;

/// Supplies the host engine's playback sample rate.
///
/// Effects query the provider once at the start of every block, so a device
/// switch from 44.1 kHz to 48 kHz is picked up on the next call without
/// re-instantiating anything.
pub trait MixRateProvider: Send + Sync {
    /// Returns the current mix rate in Hz.
    fn mix_rate(&self) -> f32;
}

/// A mix rate that never changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedMixRate(pub f32);

impl MixRateProvider for FixedMixRate {
    #[inline]
    fn mix_rate(&self) -> f32 {
        self.0
    }
}

/// A host-owned rate cell; the engine calls `set` when the device changes.
impl MixRateProvider for Parameter {
    #[inline]
    fn mix_rate(&self) -> f32 {
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_tracks_host_rate() {
        let host = Parameter::new(44100.0);
        let provider: &dyn MixRateProvider = &host;
        assert_eq!(provider.mix_rate(), 44100.0);

        host.set(48000.0);
        assert_eq!(provider.mix_rate(), 48000.0);
        assert_eq!(FixedMixRate(22050.0).mix_rate(), 22050.0);
    }
}
