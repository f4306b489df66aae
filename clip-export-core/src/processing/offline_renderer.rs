use std::sync::Arc;
use std::thread;

use crate::models::audio_buffer::AudioBuffer;
use crate::models::error::ExportError;
use crate::traits::offline_renderer::{OfflineRenderer, RenderJob};

/// Offline renderer that runs each pass on a dedicated worker thread.
///
/// The pass plays the source into a zeroed destination of identical shape at
/// unity gain, so the output is a full copy that shares nothing with the
/// decode buffer.
#[derive(Debug, Clone, Default)]
pub struct ThreadedOfflineRenderer;

impl ThreadedOfflineRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl OfflineRenderer for ThreadedOfflineRenderer {
    fn render(&self, source: Arc<AudioBuffer>) -> RenderJob {
        let (completion, job) = RenderJob::pending();

        let spawned = thread::Builder::new()
            .name("offline-render".into())
            .spawn(move || {
                completion.complete(render_pass(&source));
            });

        match spawned {
            Ok(_) => job,
            Err(e) => {
                log::error!("failed to spawn render thread: {}", e);
                RenderJob::resolved(Err(ExportError::RenderFailure(format!(
                    "failed to spawn render thread: {}",
                    e
                ))))
            }
        }
    }
}

/// One synchronous render of `source` into a new buffer.
pub fn render_pass(source: &AudioBuffer) -> Result<AudioBuffer, ExportError> {
    let length = source.length();
    if length == 0 {
        return Err(ExportError::RenderFailure("cannot render a zero-length buffer".into()));
    }

    let mut destination = vec![vec![0.0f32; length]; source.channel_count()];
    for (out, input) in destination.iter_mut().zip(source.channels()) {
        for (dst, &sample) in out.iter_mut().zip(input) {
            *dst += sample;
        }
    }

    let rendered = AudioBuffer::from_channels(destination, source.sample_rate())
        .map_err(|e| ExportError::RenderFailure(e.to_string()))?;
    ensure_same_shape(source, &rendered)?;

    log::debug!(
        "rendered {} frames x {} channels @ {} Hz",
        rendered.length(),
        rendered.channel_count(),
        rendered.sample_rate()
    );
    Ok(rendered)
}

/// Fail with `RenderFailure` unless `rendered` matches the shape of `source`.
pub fn ensure_same_shape(source: &AudioBuffer, rendered: &AudioBuffer) -> Result<(), ExportError> {
    if rendered.channel_count() != source.channel_count()
        || rendered.sample_rate() != source.sample_rate()
        || rendered.length() != source.length()
    {
        return Err(ExportError::RenderFailure(format!(
            "rendered buffer is {} ch x {} frames @ {} Hz, expected {} ch x {} frames @ {} Hz",
            rendered.channel_count(),
            rendered.length(),
            rendered.sample_rate(),
            source.channel_count(),
            source.length(),
            source.sample_rate()
        )));
    }
    Ok(())
}
