pub mod offline_renderer;
pub mod sample_clipper;
pub mod wav_encoder;
pub mod wav_format;
