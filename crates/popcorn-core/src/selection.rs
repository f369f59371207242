use crate::search::{QueryChange, QueryObserver};
use tracing::debug;

/// Which movie, if any, is open in the detail view
#[derive(Debug, Default)]
pub struct SelectionController {
    selected: Option<String>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selecting the open movie again closes it
    pub fn select(&mut self, id: &str) -> Option<&str> {
        if self.selected.as_deref() == Some(id) {
            debug!(id = %id, "Toggled selection closed");
            self.selected = None;
        } else {
            debug!(id = %id, "Selected movie");
            self.selected = Some(id.to_string());
        }
        self.selected()
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

impl QueryObserver for SelectionController {
    fn query_changed(&mut self, _change: &QueryChange) {
        if let Some(id) = self.selected.take() {
            debug!(id = %id, "Query changed, closing selected movie");
        }
    }
}
