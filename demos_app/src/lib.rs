pub mod audio_backend;
pub mod tone;
