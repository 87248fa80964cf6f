pub mod category;
pub mod poll_status;
pub mod view;

pub use category::EmailCategory;
pub use poll_status::{PollStatus, StatusKind};
pub use view::{Icon, StatusView, Tone};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Unknown email category: {0}")]
    UnknownCategory(String),
    #[error("Unknown email status: {0}")]
    UnknownStatus(String),
}
