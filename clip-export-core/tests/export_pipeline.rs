use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use clip_export_core::storage::metadata::read_metadata;
use clip_export_core::{
    AudioBuffer, CancellationToken, ChannelLayout, ExportConfiguration, ExportDelegate, ExportError, ExportResult,
    ExportSession, ExportState, FileExportSink, MemoryExportSink, OfflineRenderer, Region, RenderCompletion,
    RenderJob, ThreadedOfflineRenderer,
};

#[derive(Default)]
struct RecordingDelegate {
    states: Mutex<Vec<ExportState>>,
    errors: Mutex<Vec<ExportError>>,
    finished: Mutex<Vec<ExportResult>>,
}

impl ExportDelegate for RecordingDelegate {
    fn on_state_changed(&self, state: &ExportState) {
        self.states.lock().push(state.clone());
    }

    fn on_error(&self, error: &ExportError) {
        self.errors.lock().push(error.clone());
    }

    fn on_export_finished(&self, result: &ExportResult) {
        self.finished.lock().push(result.clone());
    }
}

/// Holds every render open until the test releases it. Clones share the gate.
#[derive(Clone, Default)]
struct GatedRenderer {
    pending: Arc<Mutex<Vec<(RenderCompletion, Arc<AudioBuffer>)>>>,
}

impl GatedRenderer {
    fn release_all(&self) {
        for (completion, source) in self.pending.lock().drain(..) {
            completion.complete(Ok(source.as_ref().clone()));
        }
    }

    fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl OfflineRenderer for GatedRenderer {
    fn render(&self, source: Arc<AudioBuffer>) -> RenderJob {
        let (completion, job) = RenderJob::pending();
        self.pending.lock().push((completion, source));
        job
    }
}

fn default_session() -> ExportSession<ThreadedOfflineRenderer> {
    ExportSession::new(ThreadedOfflineRenderer::new(), ExportConfiguration::default()).unwrap()
}

fn sine(frames: usize, sample_rate: u32, freq: f32) -> Vec<f32> {
    (0..frames)
        .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("clip_export_it_{}_{}", name, uuid::Uuid::new_v4()))
}

#[test]
fn mono_three_sample_scenario() {
    let session = default_session();
    session
        .load_source(AudioBuffer::mono(vec![1.0, -1.0, 0.5], 8000).unwrap())
        .unwrap();
    let mut sink = MemoryExportSink::new();

    let region = Region::new(0.0, 3.0 / 8000.0).unwrap();
    session.export(region, &mut sink, &CancellationToken::new()).unwrap();

    let bytes = sink.last().unwrap().wav.as_bytes().to_vec();
    assert_eq!(bytes.len(), 50);
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 42);
    assert_eq!(u16::from_le_bytes(bytes[22..24].try_into().unwrap()), 1);
    assert_eq!(u32::from_le_bytes(bytes[24..28].try_into().unwrap()), 8000);
    assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 6);
    assert_eq!(&bytes[44..], &[0xFF, 0x7F, 0x00, 0x80, 0xFF, 0x3F]);
}

#[test]
fn clip_length_and_file_size_follow_offsets() {
    let sample_rate = 44100;
    let source = AudioBuffer::from_channels(
        vec![sine(44100 * 2, sample_rate, 440.0), sine(44100 * 2, sample_rate, 220.0)],
        sample_rate,
    )
    .unwrap();
    let session = default_session();
    session.load_source(source).unwrap();

    for (start, end) in [(0.0, 0.001), (0.1234, 0.5678), (1.0, 2.0), (0.3, 1.9999)] {
        let mut sink = MemoryExportSink::new();
        let region = Region::new(start, end).unwrap();
        let result = session.export(region, &mut sink, &CancellationToken::new()).unwrap();

        let (first, last) = region.sample_offsets(sample_rate, 44100 * 2);
        let frames = last - first;
        assert_eq!(result.metadata.frames, frames, "region {}..{}", start, end);
        assert_eq!(result.byte_len, 44 + frames * 2 * 2);

        let header = sink.last().unwrap().wav.header().unwrap();
        assert_eq!(header.sample_rate, sample_rate);
        assert_eq!(header.data_size as usize, frames * 2 * 2);
        assert_eq!(header.frame_count(), frames);
    }
}

#[test]
fn full_duration_region_exports_whole_buffer() {
    let source = AudioBuffer::mono(sine(441, 44100, 1000.0), 44100).unwrap();
    let duration = source.duration_secs();
    let session = default_session();
    session.load_source(source).unwrap();
    let mut sink = MemoryExportSink::new();

    let result = session
        .export(Region::new(0.0, duration).unwrap(), &mut sink, &CancellationToken::new())
        .unwrap();

    assert_eq!(result.metadata.frames, 441);
}

#[test]
fn mono_layout_halves_payload() {
    let config = ExportConfiguration {
        channel_layout: ChannelLayout::Mono,
        ..Default::default()
    };
    let session = ExportSession::new(ThreadedOfflineRenderer::new(), config).unwrap();
    session
        .load_source(AudioBuffer::from_channels(vec![vec![0.5; 8000], vec![-0.5; 8000]], 8000).unwrap())
        .unwrap();
    let mut sink = MemoryExportSink::new();

    let result = session
        .export(Region::new(0.0, 0.5).unwrap(), &mut sink, &CancellationToken::new())
        .unwrap();

    assert_eq!(result.byte_len, 44 + 4000 * 2);
    assert_eq!(result.metadata.channels, 1);
    let wav = &sink.last().unwrap().wav;
    assert_eq!(wav.header().unwrap().channels, 1);
    assert!(wav.pcm_data().iter().all(|&b| b == 0));
}

#[test]
fn repeated_exports_are_byte_identical() {
    let session = default_session();
    session
        .load_source(AudioBuffer::mono(sine(16000, 16000, 330.0), 16000).unwrap())
        .unwrap();
    let region = Region::new(0.1, 0.6).unwrap();
    let mut sink = MemoryExportSink::new();

    let first = session.export(region, &mut sink, &CancellationToken::new()).unwrap();
    let second = session.export(region, &mut sink, &CancellationToken::new()).unwrap();

    let clips = sink.take();
    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].wav, clips[1].wav);
    assert_eq!(first.checksum, second.checksum);
    assert_ne!(first.metadata.id, second.metadata.id);
}

#[test]
fn delegate_sees_pipeline_order() {
    let delegate = Arc::new(RecordingDelegate::default());
    let mut session = default_session();
    session.set_delegate(delegate.clone());
    session
        .load_source(AudioBuffer::mono(vec![0.0; 800], 8000).unwrap())
        .unwrap();
    delegate.states.lock().clear();

    let mut sink = MemoryExportSink::new();
    session
        .export(Region::new(0.0, 0.05).unwrap(), &mut sink, &CancellationToken::new())
        .unwrap();

    let states = delegate.states.lock().clone();
    assert_eq!(states.len(), 6);
    assert_eq!(states[0], ExportState::SourceLoaded);
    assert_eq!(
        states[1],
        ExportState::RegionSelected {
            start_secs: 0.0,
            end_secs: 0.05
        }
    );
    assert_eq!(states[2], ExportState::Rendering);
    assert_eq!(states[3], ExportState::Clipped { frames: 400 });
    assert_eq!(states[4], ExportState::Encoded { byte_len: 44 + 800 });
    assert!(matches!(states[5], ExportState::Delivered(_)));
    assert_eq!(delegate.finished.lock().len(), 1);
    assert!(delegate.errors.lock().is_empty());
}

#[test]
fn delegate_sees_failure() {
    let delegate = Arc::new(RecordingDelegate::default());
    let mut session = default_session();
    session.set_delegate(delegate.clone());
    session
        .load_source(AudioBuffer::mono(vec![0.0; 800], 8000).unwrap())
        .unwrap();

    let mut sink = MemoryExportSink::new();
    let err = session
        .export(Region::new(0.0, 0.2).unwrap(), &mut sink, &CancellationToken::new())
        .unwrap_err();

    assert!(matches!(err, ExportError::InvalidRegion(_)));
    assert_eq!(delegate.errors.lock().as_slice(), &[err.clone()]);
    assert_eq!(delegate.states.lock().last(), Some(&ExportState::Failed(err)));
    assert!(!delegate.states.lock().contains(&ExportState::Rendering));
}

#[test]
fn file_export_writes_clip_and_sidecar() {
    let dir = temp_dir("file_export");
    let config = ExportConfiguration {
        output_directory: dir.clone(),
        ..Default::default()
    };
    let session = ExportSession::new(ThreadedOfflineRenderer::new(), config.clone()).unwrap();
    session
        .load_source(AudioBuffer::mono(sine(48000, 48000, 440.0), 48000).unwrap())
        .unwrap();
    let mut sink = FileExportSink::from_config(&config);

    let result = session
        .export(Region::new(0.25, 0.75).unwrap(), &mut sink, &CancellationToken::new())
        .unwrap();

    let path = result.location.clone().unwrap();
    assert_eq!(path, dir.join("clipped_audio.wav"));
    let data = fs::read(&path).unwrap();
    assert_eq!(data.len(), 44 + 24000 * 2);

    let metadata = read_metadata(&path).unwrap();
    assert_eq!(metadata, result.metadata);
    assert_eq!(metadata.checksum, result.checksum);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn concurrent_export_is_rejected() {
    let renderer = GatedRenderer::default();
    let session = Arc::new(ExportSession::new(renderer.clone(), ExportConfiguration::default()).unwrap());
    session
        .load_source(AudioBuffer::mono(vec![0.1; 8000], 8000).unwrap())
        .unwrap();

    let worker = {
        let session = Arc::clone(&session);
        thread::spawn(move || {
            let mut sink = MemoryExportSink::new();
            session
                .export(Region::new(0.0, 0.5).unwrap(), &mut sink, &CancellationToken::new())
                .map(|_| sink.len())
        })
    };

    while renderer.pending_count() == 0 {
        thread::sleep(Duration::from_millis(1));
    }
    assert!(session.is_exporting());
    assert_eq!(session.state(), ExportState::Rendering);

    let mut sink = MemoryExportSink::new();
    let err = session
        .export(Region::new(0.0, 0.25).unwrap(), &mut sink, &CancellationToken::new())
        .unwrap_err();
    assert_eq!(err, ExportError::ExportInProgress);
    assert!(sink.is_empty());
    assert_eq!(session.state(), ExportState::Rendering);

    let err = session
        .load_source(AudioBuffer::mono(vec![0.0; 10], 8000).unwrap())
        .unwrap_err();
    assert_eq!(err, ExportError::ExportInProgress);

    renderer.release_all();
    assert_eq!(worker.join().unwrap(), Ok(1));
    assert!(!session.is_exporting());
}

#[test]
fn cancel_while_rendering() {
    let renderer = GatedRenderer::default();
    let session = Arc::new(ExportSession::new(renderer.clone(), ExportConfiguration::default()).unwrap());
    session
        .load_source(AudioBuffer::mono(vec![0.1; 8000], 8000).unwrap())
        .unwrap();
    let cancel = CancellationToken::new();

    let worker = {
        let session = Arc::clone(&session);
        let cancel = cancel.clone();
        thread::spawn(move || {
            let mut sink = MemoryExportSink::new();
            let outcome = session.export(Region::new(0.0, 0.5).unwrap(), &mut sink, &cancel);
            (outcome, sink.len())
        })
    };

    while renderer.pending_count() == 0 {
        thread::sleep(Duration::from_millis(1));
    }
    cancel.cancel();

    let (outcome, delivered) = worker.join().unwrap();
    assert_eq!(outcome.unwrap_err(), ExportError::Cancelled);
    assert_eq!(delivered, 0);
    assert_eq!(session.state(), ExportState::Failed(ExportError::Cancelled));

    // Completing the abandoned render afterwards is harmless.
    renderer.release_all();
}
