use crate::core::channels::ChannelConfig;
use alloc::boxed::Box;
#[cfg(feature = "debug_visualize")]
use alloc::format;
use alloc::string::String;

/// In-place block processor over an interleaved buffer.
///
/// The generic parameter `C` defines the channel configuration.
pub trait FrameProcessor<C: ChannelConfig> {
    /// Processes a block of audio samples.
    ///
    /// # Arguments
    /// * `buffer` - The interleaved audio buffer to process (in-place).
    /// * `sample_index` - The global frame index of the start of the block.
    fn process(&mut self, buffer: &mut [f32], sample_index: u64);

    /// Sets the sample rate.
    ///
    /// Should be called before processing starts or when sample rate changes.
    fn set_sample_rate(&mut self, _sample_rate: f32) {}

    /// Returns the name of the processor.
    fn name(&self) -> &str {
        #[cfg(feature = "debug_visualize")]
        {
            "Node"
        }
        #[cfg(not(feature = "debug_visualize"))]
        {
            ""
        }
    }

    /// Returns an ASCII visualization of the processor structure.
    fn visualize(&self, indent: usize) -> String {
        #[cfg(feature = "debug_visualize")]
        {
            let spaces = " ".repeat(indent);
            format!("{}{}\n", spaces, self.name())
        }
        #[cfg(not(feature = "debug_visualize"))]
        {
            let _ = indent;
            String::new()
        }
    }
}

impl<C: ChannelConfig, T: FrameProcessor<C> + ?Sized> FrameProcessor<C> for Box<T> {
    fn process(&mut self, buffer: &mut [f32], sample_index: u64) {
        (**self).process(buffer, sample_index);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        (**self).set_sample_rate(sample_rate);
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn visualize(&self, indent: usize) -> String {
        (**self).visualize(indent)
    }
}
