use infinitedsp_lofi::core::channels::Stereo;
use infinitedsp_lofi::FrameProcessor;
use std::f32::consts::PI;

/// A slowly beating stereo chord used as demo input.
///
/// Overwrites the buffer, so it belongs at the start of a chain.
pub struct ChordSource {
    freqs: Vec<f32>,
    phases: Vec<f32>,
    sample_rate: f32,
    gain: f32,
}

impl ChordSource {
    pub fn new(freqs: &[f32], gain: f32) -> Self {
        ChordSource {
            freqs: freqs.to_vec(),
            phases: vec![0.0; freqs.len() * 2],
            sample_rate: 44100.0,
            gain,
        }
    }
}

impl FrameProcessor<Stereo> for ChordSource {
    fn process(&mut self, buffer: &mut [f32], _sample_index: u64) {
        let voices = self.freqs.len().max(1) as f32;
        for frame in buffer.chunks_mut(2) {
            let mut l = 0.0;
            let mut r = 0.0;
            for (v, &freq) in self.freqs.iter().enumerate() {
                // Right voices are detuned slightly so the channels differ.
                let incs = [freq / self.sample_rate, freq * 1.003 / self.sample_rate];
                for (side, inc) in incs.into_iter().enumerate() {
                    let phase = &mut self.phases[v * 2 + side];
                    let value = (*phase * 2.0 * PI).sin();
                    *phase = (*phase + inc).fract();
                    if side == 0 {
                        l += value;
                    } else {
                        r += value;
                    }
                }
            }
            frame[0] = l / voices * self.gain;
            if frame.len() > 1 {
                frame[1] = r / voices * self.gain;
            }
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    fn name(&self) -> &str {
        "ChordSource"
    }
}
