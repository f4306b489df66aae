//! # clip-export-core
//!
//! Audio clip export core library.
//!
//! Takes a decoded multichannel buffer and a selected time region, re-renders
//! the buffer offline, cuts the exact sample range, and encodes it as a
//! 16-bit PCM WAV image for an export sink. Decoding, region editing and
//! delivery UI live outside this crate and plug in through the traits.
//!
//! ## Architecture
//!
//! ```text
//! clip-export-core (this crate)
//! ├── traits/       ← OfflineRenderer, ExportSink, ExportDelegate, AudioSource, RegionSelector
//! ├── models/       ← ExportError, ExportState, ExportConfiguration, AudioBuffer, Region, etc.
//! ├── processing/   ← ThreadedOfflineRenderer, SampleClipper, PcmWavEncoder, WAV header
//! ├── session/      ← ExportSession (pipeline orchestrator), CancellationToken
//! └── storage/      ← FileExportSink, MemoryExportSink, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_buffer::AudioBuffer;
pub use models::config::{ChannelLayout, ExportConfiguration};
pub use models::error::ExportError;
pub use models::export_result::{ExportMetadata, ExportResult};
pub use models::region::Region;
pub use models::state::ExportState;
pub use processing::offline_renderer::ThreadedOfflineRenderer;
pub use processing::sample_clipper::SampleClipper;
pub use processing::wav_encoder::{PcmWavEncoder, WavBytes};
pub use processing::wav_format::{parse_wav_header, WavHeader};
pub use session::cancellation::CancellationToken;
pub use session::export_session::ExportSession;
pub use storage::file_sink::FileExportSink;
pub use storage::memory_sink::{DeliveredClip, MemoryExportSink};
pub use traits::audio_source::{AudioSource, RegionSelector};
pub use traits::export_delegate::ExportDelegate;
pub use traits::export_sink::ExportSink;
pub use traits::offline_renderer::{OfflineRenderer, RenderCompletion, RenderJob};
