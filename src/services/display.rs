use crate::error::DisplayError;
use crate::models::StatusView;

/// Applies a [`StatusView`] to whatever shows it: page elements, a terminal, a test recorder.
pub trait StatusDisplay: Send + Sync {
    fn apply(&self, view: &StatusView) -> Result<(), DisplayError>;
}
