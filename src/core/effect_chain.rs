use crate::core::channels::Stereo;
use crate::core::frame_processor::FrameProcessor;
use alloc::boxed::Box;
#[cfg(feature = "debug_visualize")]
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// A chain of stereo effects.
///
/// Processes one interleaved buffer sequentially through every stage.
pub struct EffectChain {
    stages: Vec<Box<dyn FrameProcessor<Stereo> + Send>>,
    sample_rate: f32,
}

impl EffectChain {
    /// Creates a new EffectChain starting with the given stage.
    pub fn new(mut first: impl FrameProcessor<Stereo> + Send + 'static, sample_rate: f32) -> Self {
        first.set_sample_rate(sample_rate);
        EffectChain {
            stages: vec![Box::new(first)],
            sample_rate,
        }
    }

    /// Appends a stage to the chain.
    pub fn and(mut self, mut stage: impl FrameProcessor<Stereo> + Send + 'static) -> Self {
        stage.set_sample_rate(self.sample_rate);
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns a graph visualization of the entire chain.
    pub fn get_graph(&self) -> String {
        self.visualize(0)
    }
}

impl FrameProcessor<Stereo> for EffectChain {
    fn process(&mut self, buffer: &mut [f32], sample_index: u64) {
        for stage in &mut self.stages {
            stage.process(buffer, sample_index);
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for stage in &mut self.stages {
            stage.set_sample_rate(sample_rate);
        }
    }

    #[cfg(feature = "debug_visualize")]
    fn name(&self) -> &str {
        "EffectChain"
    }

    #[cfg(feature = "debug_visualize")]
    fn visualize(&self, indent: usize) -> String {
        let mut output = String::new();
        let spaces = " ".repeat(indent);
        let arrow_spaces = " ".repeat(indent + 2);

        output.push_str(&format!("{}EffectChain Start\n", spaces));
        for stage in &self.stages {
            output.push_str(&format!("{}|\n", arrow_spaces));
            output.push_str(&format!("{}v\n", arrow_spaces));
            output.push_str(&stage.visualize(indent));
        }
        output.push_str(&format!("{}|\n", arrow_spaces));
        output.push_str(&format!("{}v\n", arrow_spaces));
        output.push_str(&format!("{}Output\n", spaces));

        output
    }
}
