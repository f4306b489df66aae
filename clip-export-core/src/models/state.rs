use super::error::ExportError;
use super::export_result::ExportResult;

/// Export pipeline state machine, one pass per export action.
///
/// State transitions:
/// ```text
/// idle → source_loaded → region_selected → rendering → clipped → encoded → delivered
///                                              ↓           ↓         ↓
///                                                        failed
/// ```
/// `Delivered` and `Failed` are terminal for the action that produced them.
/// The next export restarts from `SourceLoaded`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportState {
    Idle,
    SourceLoaded,
    RegionSelected { start_secs: f64, end_secs: f64 },
    Rendering,
    Clipped { frames: usize },
    Encoded { byte_len: usize },
    Delivered(Box<ExportResult>),
    Failed(ExportError),
}

impl ExportState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_rendering(&self) -> bool {
        matches!(self, Self::Rendering)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered(_) | Self::Failed(_))
    }

    /// Whether an action is between region selection and delivery.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            Self::RegionSelected { .. } | Self::Rendering | Self::Clipped { .. } | Self::Encoded { .. }
        )
    }

    /// The error of a failed action, if any.
    pub fn error(&self) -> Option<&ExportError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(ExportState::Failed(ExportError::EmptyRegion).is_terminal());
        assert!(!ExportState::Rendering.is_terminal());
        assert!(!ExportState::SourceLoaded.is_terminal());
    }

    #[test]
    fn in_progress_states() {
        assert!(ExportState::Rendering.is_in_progress());
        assert!(ExportState::Clipped { frames: 4 }.is_in_progress());
        assert!(!ExportState::Idle.is_in_progress());
        assert!(!ExportState::Failed(ExportError::Cancelled).is_in_progress());
    }

    #[test]
    fn error_accessor() {
        let state = ExportState::Failed(ExportError::EmptyRegion);
        assert_eq!(state.error(), Some(&ExportError::EmptyRegion));
        assert_eq!(ExportState::Idle.error(), None);
    }
}
