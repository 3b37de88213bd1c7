//! Pagination primitives exchanged with the sync engine.
//!
//! The engine hands each call a [`PageToken`] and keeps calling while the
//! returned [`Page`] carries a `next_token`.

use serde::{Deserialize, Serialize};

use crate::annotations::Annotations;

/// Default number of items the engine asks for per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Cursor supplied by the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageToken {
    /// Opaque cursor; empty on the first call.
    #[serde(default)]
    pub token: String,
    /// Requested page size hint.
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageToken {
    fn default() -> Self {
        Self::start()
    }
}

impl PageToken {
    /// Token for the first page.
    pub fn start() -> Self {
        Self {
            token: String::new(),
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results returned to the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl<T> Page<T> {
    /// A terminal page holding `items`.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
            annotations: Annotations::new(),
        }
    }

    /// A terminal page with no items.
    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    /// Attach annotations.
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Whether the engine should stop paging.
    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }

    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
