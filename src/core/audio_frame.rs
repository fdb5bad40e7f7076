use core::ops::{Add, Mul};

/// A single stereo sample pair.
///
/// Values are not clamped; effects may push a frame outside [-1.0, 1.0] and
/// the host is expected to limit the final mix.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioFrame {
    pub l: f32,
    pub r: f32,
}

impl AudioFrame {
    pub const SILENCE: AudioFrame = AudioFrame { l: 0.0, r: 0.0 };

    pub const fn new(l: f32, r: f32) -> Self {
        AudioFrame { l, r }
    }

    /// Linear interpolation towards `other`. `t = 0.0` returns `self`.
    #[inline(always)]
    pub fn lerp(self, other: AudioFrame, t: f32) -> Self {
        AudioFrame {
            l: lerp(self.l, other.l, t),
            r: lerp(self.r, other.r, t),
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; 2] {
        [self.l, self.r]
    }
}

impl From<[f32; 2]> for AudioFrame {
    #[inline(always)]
    fn from(frame: [f32; 2]) -> Self {
        AudioFrame {
            l: frame[0],
            r: frame[1],
        }
    }
}

impl From<AudioFrame> for [f32; 2] {
    #[inline(always)]
    fn from(frame: AudioFrame) -> Self {
        frame.to_array()
    }
}

impl Add for AudioFrame {
    type Output = AudioFrame;

    #[inline(always)]
    fn add(self, rhs: AudioFrame) -> AudioFrame {
        AudioFrame {
            l: self.l + rhs.l,
            r: self.r + rhs.r,
        }
    }
}

impl Mul<f32> for AudioFrame {
    type Output = AudioFrame;

    #[inline(always)]
    fn mul(self, rhs: f32) -> AudioFrame {
        AudioFrame {
            l: self.l * rhs,
            r: self.r * rhs,
        }
    }
}

/// Scalar linear interpolation.
#[inline(always)]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Converts decibels to a linear amplitude factor.
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    libm::expf(db * 0.115_129_255)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = AudioFrame::new(0.0, 1.0);
        let b = AudioFrame::new(1.0, -1.0);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), AudioFrame::new(0.5, 0.0));
    }

    #[test]
    fn test_frame_arithmetic() {
        let f = AudioFrame::new(0.5, -0.25) * 2.0 + AudioFrame::new(0.25, 0.25);
        assert_eq!(f.to_array(), [1.25, -0.25]);
        assert_eq!(AudioFrame::from([0.1, 0.2]), AudioFrame::new(0.1, 0.2));
    }

    #[test]
    fn test_db_to_linear() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0) - 0.501187).abs() < 1e-4);
        assert!((db_to_linear(1.5) - 1.188502).abs() < 1e-4);
    }
}
