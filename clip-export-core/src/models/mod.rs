pub mod audio_buffer;
pub mod config;
pub mod error;
pub mod export_result;
pub mod region;
pub mod state;
