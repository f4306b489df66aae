use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::models::audio_buffer::AudioBuffer;
use crate::models::config::ExportConfiguration;
use crate::models::error::ExportError;
use crate::models::export_result::{ExportMetadata, ExportResult};
use crate::models::region::Region;
use crate::models::state::ExportState;
use crate::processing::offline_renderer::ensure_same_shape;
use crate::processing::sample_clipper::SampleClipper;
use crate::processing::wav_encoder::PcmWavEncoder;
use crate::session::cancellation::CancellationToken;
use crate::storage::metadata;
use crate::traits::audio_source::{AudioSource, RegionSelector};
use crate::traits::export_delegate::ExportDelegate;
use crate::traits::export_sink::ExportSink;
use crate::traits::offline_renderer::OfflineRenderer;

/// Clip export orchestrator for one loaded source.
///
/// Generic over the render backend via the `OfflineRenderer` trait.
/// Data flow of one export action:
/// ```text
/// [AudioBuffer] → [OfflineRenderer] → [SampleClipper] → [PcmWavEncoder] → [ExportSink]
///                                           ↑
///                                       [Region]
/// ```
/// Only the render step suspends. At most one export runs per session;
/// a concurrent request is rejected with `ExportInProgress`.
pub struct ExportSession<R: OfflineRenderer> {
    renderer: R,
    config: ExportConfiguration,
    clipper: SampleClipper,
    encoder: PcmWavEncoder,
    source: RwLock<Option<Arc<AudioBuffer>>>,
    state: Mutex<ExportState>,
    delegate: Option<Arc<dyn ExportDelegate>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when an export action ends, however it ends.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ExportError::ExportInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl<R: OfflineRenderer> ExportSession<R> {
    pub fn new(renderer: R, config: ExportConfiguration) -> Result<Self, ExportError> {
        config.validate().map_err(ExportError::ConfigurationFailed)?;
        Ok(Self {
            renderer,
            encoder: PcmWavEncoder::new(config.channel_layout),
            clipper: SampleClipper::new(),
            config,
            source: RwLock::new(None),
            state: Mutex::new(ExportState::Idle),
            delegate: None,
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn ExportDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> ExportState {
        self.state.lock().clone()
    }

    pub fn config(&self) -> &ExportConfiguration {
        &self.config
    }

    /// The currently loaded source, if any.
    pub fn source(&self) -> Option<Arc<AudioBuffer>> {
        self.source.read().clone()
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Replace the loaded source. Transitions: * → source_loaded.
    ///
    /// Rejected while an export is in flight.
    pub fn load_source(&self, buffer: AudioBuffer) -> Result<(), ExportError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).inspect_err(|_| {
            log::warn!("refusing to replace source while an export is in flight");
        })?;

        log::info!(
            "loaded source: {} ch, {} frames @ {} Hz ({:.3}s)",
            buffer.channel_count(),
            buffer.length(),
            buffer.sample_rate(),
            buffer.duration_secs()
        );
        *self.source.write() = Some(Arc::new(buffer));
        self.set_state(ExportState::SourceLoaded);
        Ok(())
    }

    /// Decode `source` and load the result.
    pub fn load_from(&self, source: &dyn AudioSource) -> Result<(), ExportError> {
        let buffer = source.decode()?;
        self.load_source(buffer)
    }

    /// Run one export action for `region`.
    ///
    /// On success the clip has been handed to `sink` and the session is in
    /// `Delivered`. On failure nothing reached the sink and the session is in
    /// `Failed`, except for `ExportInProgress`, which leaves the running
    /// action's state untouched.
    pub fn export(
        &self,
        region: Region,
        sink: &mut dyn ExportSink,
        cancel: &CancellationToken,
    ) -> Result<ExportResult, ExportError> {
        self.execute(|| Ok(region), sink, cancel)
    }

    /// Like [`export`](Self::export), reading the region from `selector`
    /// exactly once when the action starts.
    pub fn export_selection(
        &self,
        selector: &dyn RegionSelector,
        sink: &mut dyn ExportSink,
        cancel: &CancellationToken,
    ) -> Result<ExportResult, ExportError> {
        self.execute(|| selector.current_region(), sink, cancel)
    }

    // --- Internal helpers ---

    fn execute(
        &self,
        region: impl FnOnce() -> Result<Region, ExportError>,
        sink: &mut dyn ExportSink,
        cancel: &CancellationToken,
    ) -> Result<ExportResult, ExportError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).inspect_err(|_| {
            log::warn!("export requested while another export is in flight");
        })?;

        let outcome = region().and_then(|region| self.run_pipeline(region, sink, cancel));

        match &outcome {
            Ok(result) => {
                log::info!(
                    "export delivered: {} ({} bytes, sha256 {})",
                    result.file_name,
                    result.byte_len,
                    result.checksum
                );
                self.set_state(ExportState::Delivered(Box::new(result.clone())));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_export_finished(result);
                }
            }
            Err(e) => {
                log::error!("export failed: {}", e);
                self.set_state(ExportState::Failed(e.clone()));
                if let Some(ref delegate) = self.delegate {
                    delegate.on_error(e);
                }
            }
        }
        outcome
    }

    /// render → clip → encode → deliver, strictly in order.
    fn run_pipeline(
        &self,
        region: Region,
        sink: &mut dyn ExportSink,
        cancel: &CancellationToken,
    ) -> Result<ExportResult, ExportError> {
        let source = self.source().ok_or(ExportError::NoSourceLoaded)?;
        self.set_state(ExportState::SourceLoaded);

        region.validate_within(source.duration_secs())?;
        self.set_state(ExportState::RegionSelected {
            start_secs: region.start(),
            end_secs: region.end(),
        });
        log::info!(
            "exporting region {:.6}s..{:.6}s of {:.6}s source",
            region.start(),
            region.end(),
            source.duration_secs()
        );

        self.set_state(ExportState::Rendering);
        let rendered = self.renderer.render(Arc::clone(&source)).wait(cancel)?;
        ensure_same_shape(&source, &rendered)?;

        let clipped = self.clipper.clip(&rendered, &region)?;
        self.set_state(ExportState::Clipped {
            frames: clipped.length(),
        });

        let wav = self.encoder.encode(&clipped)?;
        self.set_state(ExportState::Encoded { byte_len: wav.len() });

        let mime_type = ExportConfiguration::MIME_TYPE;
        let location = sink.deliver(&self.config.file_name, mime_type, &wav)?;

        let checksum = wav.checksum();
        let metadata = ExportMetadata::new(
            &self.config.file_name,
            region,
            clipped.sample_rate(),
            self.encoder.output_channels(&clipped),
            self.config.channel_layout,
            clipped.length(),
            &checksum,
        );

        if self.config.write_metadata {
            if let Some(ref path) = location {
                // The clip is already delivered; a missing sidecar does not fail the export.
                if let Err(e) = metadata::write_metadata(&metadata, path) {
                    log::warn!("failed to write metadata sidecar for {}: {}", path.display(), e);
                }
            }
        }

        Ok(ExportResult {
            file_name: self.config.file_name.clone(),
            mime_type: mime_type.to_string(),
            location,
            byte_len: wav.len(),
            checksum,
            metadata,
        })
    }

    fn set_state(&self, new_state: ExportState) {
        log::debug!("export state -> {:?}", StateLabel(&new_state));
        {
            let mut state = self.state.lock();
            *state = new_state.clone();
        }
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&new_state);
        }
    }
}

/// Compact `Debug` for log lines; avoids dumping a full result.
struct StateLabel<'a>(&'a ExportState);

impl std::fmt::Debug for StateLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            ExportState::Delivered(result) => write!(f, "Delivered({})", result.file_name),
            other => write!(f, "{:?}", other),
        }
    }
}
