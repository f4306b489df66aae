use crate::models::error::ExportError;
use crate::models::export_result::ExportResult;
use crate::models::state::ExportState;

/// Event delegate for export session notifications.
///
/// All methods are called on the thread running the export.
/// Implementations should marshal to the UI thread if needed.
pub trait ExportDelegate: Send + Sync {
    /// Called on every pipeline state transition.
    fn on_state_changed(&self, state: &ExportState);

    /// Called when an export action fails.
    fn on_error(&self, error: &ExportError);

    /// Called when a clip has been delivered to the sink.
    fn on_export_finished(&self, result: &ExportResult);
}
