#![no_std]

extern crate alloc;

pub mod core;
pub mod effects;

pub use crate::core::effect::{AudioEffect, EffectInstance};
pub use crate::core::frame_processor::FrameProcessor;
