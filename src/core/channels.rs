/// Marker type representing a Stereo signal configuration (2 channels, interleaved).
pub struct Stereo;

/// Trait implemented by channel configurations.
pub trait ChannelConfig: Send + Sync {
    fn num_channels() -> usize;
}

impl ChannelConfig for Stereo {
    #[inline(always)]
    fn num_channels() -> usize {
        2
    }
}
