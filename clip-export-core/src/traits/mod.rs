pub mod audio_source;
pub mod export_delegate;
pub mod export_sink;
pub mod offline_renderer;
