//! Declarative parameter schema consumed by hosts and editors.
//!
//! Processors never validate their inputs. Everything a host needs to build a
//! UI, clamp automation or reject bad script input lives here instead.

use alloc::string::String;
use thiserror::Error;

/// Value type of a parameter as presented to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Float,
    Int,
}

/// Static description of one effect parameter.
///
/// All numbers are in user units, i.e. percentages for `percent` parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamInfo {
    pub name: &'static str,
    pub kind: ParamKind,
    pub min: f32,
    pub max: f32,
    /// Editor step size; 0.0 means continuous.
    pub step: f32,
    pub suffix: &'static str,
    /// Stored internally as `value / 100`.
    pub percent: bool,
    /// Editor hint: map the slider exponentially.
    pub exp_easing: bool,
    pub default: f32,
}

/// Errors produced when a host writes a parameter through the schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("unknown parameter `{name}`")]
    UnknownParameter { name: String },
    #[error("parameter `{name}` must be finite")]
    NotFinite { name: &'static str },
    #[error("parameter `{name}` value {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl ParamInfo {
    pub const fn float(name: &'static str, min: f32, max: f32, step: f32, default: f32) -> Self {
        ParamInfo {
            name,
            kind: ParamKind::Float,
            min,
            max,
            step,
            suffix: "",
            percent: false,
            exp_easing: false,
            default,
        }
    }

    pub const fn int(name: &'static str, min: i32, max: i32, default: i32) -> Self {
        ParamInfo {
            name,
            kind: ParamKind::Int,
            min: min as f32,
            max: max as f32,
            step: 1.0,
            suffix: "",
            percent: false,
            exp_easing: false,
            default: default as f32,
        }
    }

    /// A 0-100 % parameter with 0.01 resolution.
    pub const fn percent(name: &'static str, default: f32) -> Self {
        ParamInfo {
            name,
            kind: ParamKind::Float,
            min: 0.0,
            max: 100.0,
            step: 0.01,
            suffix: "%",
            percent: true,
            exp_easing: false,
            default,
        }
    }

    pub const fn with_suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }

    pub const fn with_exp_easing(mut self) -> Self {
        self.exp_easing = true;
        self
    }

    /// Checks a user-unit value against the published range.
    ///
    /// Integer parameters are rounded to the nearest whole number first.
    pub fn validate(&self, value: f32) -> Result<f32, ParamError> {
        if !value.is_finite() {
            log::trace!("rejecting non-finite value for {}", self.name);
            return Err(ParamError::NotFinite { name: self.name });
        }
        let value = self.snap(value);
        if value < self.min || value > self.max {
            log::trace!("rejecting {} = {}", self.name, value);
            return Err(ParamError::OutOfRange {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }

    /// Forces a user-unit value into range. NaN maps to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        self.snap(value).clamp(self.min, self.max)
    }

    fn snap(&self, value: f32) -> f32 {
        match self.kind {
            ParamKind::Float => value,
            ParamKind::Int => libm::roundf(value),
        }
    }
}

/// Finds a parameter by name in an effect's schema.
pub fn find<'a>(params: &'a [ParamInfo], name: &str) -> Result<&'a ParamInfo, ParamError> {
    params
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| ParamError::UnknownParameter { name: name.into() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPTH: ParamInfo = ParamInfo::float("depth", 1.0, 16.0, 0.01, 16.0);
    const RATE: ParamInfo = ParamInfo::int("rate", 20, 22050, 22050).with_exp_easing();

    #[test]
    fn test_validate_accepts_range() {
        assert_eq!(DEPTH.validate(1.0), Ok(1.0));
        assert_eq!(DEPTH.validate(16.0), Ok(16.0));
        assert_eq!(RATE.validate(440.4), Ok(440.0));
    }

    #[test]
    fn test_validate_rejects() {
        assert_eq!(
            DEPTH.validate(0.5),
            Err(ParamError::OutOfRange {
                name: "depth",
                value: 0.5,
                min: 1.0,
                max: 16.0
            })
        );
        assert_eq!(
            DEPTH.validate(f32::NAN),
            Err(ParamError::NotFinite { name: "depth" })
        );
        assert!(RATE.validate(f32::INFINITY).is_err());
    }

    #[test]
    fn test_clamp() {
        assert_eq!(RATE.clamp(5.0), 20.0);
        assert_eq!(RATE.clamp(1e9), 22050.0);
        assert_eq!(DEPTH.clamp(f32::NAN), 16.0);
        assert_eq!(ParamInfo::percent("mix", 100.0).clamp(-3.0), 0.0);
    }

    #[test]
    fn test_find() {
        let schema = [DEPTH, RATE];
        assert_eq!(find(&schema, "rate").map(|p| p.kind), Ok(ParamKind::Int));
        assert!(matches!(
            find(&schema, "wobble"),
            Err(ParamError::UnknownParameter { .. })
        ));
    }
}
