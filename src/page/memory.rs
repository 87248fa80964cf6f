use super::{render_status_container, HostPage, MESSAGE_BASE_CLASS, STATUS_ID};
use crate::error::{DisplayError, PageError};
use crate::models::StatusView;
use crate::services::StatusDisplay;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Top-level piece of a [`MemoryPage`] body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBlock {
    /// `<div class="alert-container">`, where flash messages go.
    AlertContainer,
    Form,
    StatusContainer,
    Html(String),
}

/// Current state of the spinner and message slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusElements {
    pub spinner_visible: bool,
    pub message_class: String,
    pub message_html: String,
}

impl Default for StatusElements {
    fn default() -> Self {
        Self {
            spinner_visible: false,
            message_class: MESSAGE_BASE_CLASS.to_string(),
            message_html: String::new(),
        }
    }
}

#[derive(Debug, Default)]
struct PageState {
    styles: Vec<String>,
    blocks: Vec<PageBlock>,
    status: Option<StatusElements>,
}

/// In-memory page used to preview the status display and to drive it in tests.
#[derive(Clone, Default)]
pub struct MemoryPage {
    state: Arc<Mutex<PageState>>,
}

impl MemoryPage {
    pub fn new(blocks: Vec<PageBlock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(PageState {
                blocks,
                ..PageState::default()
            })),
        }
    }

    /// Login page the registration flow redirects to.
    pub fn registration_page() -> Self {
        Self::new(vec![
            PageBlock::Html("<h3>Sign in</h3>".to_string()),
            PageBlock::AlertContainer,
            PageBlock::Form,
        ])
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn blocks(&self) -> Vec<PageBlock> {
        self.lock().blocks.clone()
    }

    pub fn styles(&self) -> Vec<String> {
        self.lock().styles.clone()
    }

    pub fn status_elements(&self) -> Option<StatusElements> {
        self.lock().status.clone()
    }

    pub fn markup(&self) -> Result<String, PageError> {
        let state = self.lock();
        let mut parts = Vec::with_capacity(state.styles.len() + state.blocks.len());

        for css in &state.styles {
            parts.push(format!("<style>\n{}</style>", css));
        }

        for block in &state.blocks {
            let html = match block {
                PageBlock::AlertContainer => r#"<div class="alert-container"></div>"#.to_string(),
                PageBlock::Form => r#"<form method="post"></form>"#.to_string(),
                PageBlock::Html(html) => html.clone(),
                PageBlock::StatusContainer => {
                    let elements = state.status.clone().unwrap_or_default();
                    render_status_container(&elements)?
                }
            };
            parts.push(html);
        }

        Ok(parts.join("\n"))
    }
}

impl HostPage for MemoryPage {
    fn insert_status_container(&self) -> Result<bool, PageError> {
        let mut state = self.lock();

        let anchor = state
            .blocks
            .iter()
            .position(|block| *block == PageBlock::AlertContainer)
            .or_else(|| state.blocks.iter().position(|block| *block == PageBlock::Form));

        let Some(index) = anchor else {
            return Ok(false);
        };

        state.blocks.insert(index, PageBlock::StatusContainer);
        state.status = Some(StatusElements::default());
        Ok(true)
    }

    fn inject_styles(&self, css: &str) -> Result<(), PageError> {
        self.lock().styles.push(css.to_string());
        Ok(())
    }

    fn status_display(&self) -> Arc<dyn StatusDisplay> {
        Arc::new(self.clone())
    }
}

impl StatusDisplay for MemoryPage {
    fn apply(&self, view: &StatusView) -> Result<(), DisplayError> {
        let message_html = view.message_html()?;

        let mut state = self.lock();
        let elements = state
            .status
            .as_mut()
            .ok_or(DisplayError::MissingElement(STATUS_ID))?;

        elements.spinner_visible = view.spinner_visible;
        elements.message_class = view.message_class().to_string();
        elements.message_html = message_html;
        Ok(())
    }
}
