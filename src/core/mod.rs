pub mod audio_frame;
pub mod channels;
pub mod effect;
pub mod effect_chain;
pub mod frame_processor;
pub mod mix_rate;
pub mod noise;
pub mod param_info;
pub mod parameter;
