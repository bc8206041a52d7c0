//! Pagination reconciliation: one authoritative page count from partial
//! server signals, plus navigation and page-button windowing.

use serde::Serialize;
use serde_json::Value;

use crate::errors::ClientError;
use crate::models::list_page::{ListPage, PaginationMeta};

/// Above this many pages the button list collapses into ellipses.
const MAX_BUTTONS: u32 = 7;

/// Canonical pagination view handed to UI code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: Option<u64>,
    /// `None` when the server gave no totals and the last page was full.
    pub total_pages: Option<u32>,
    /// Whether the page behind this state came back exactly full.
    pub last_page_full: bool,
}

/// A user navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    First,
    Prev,
    Next,
    Last,
    GoTo(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EllipsisSide {
    Left,
    Right,
}

/// One entry of the page-number control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageButton {
    Page(u32),
    Ellipsis(EllipsisSide),
}

impl PaginationState {
    /// Derive pagination state. Priority: server `total_pages`, then
    /// `ceil(total_items / page_size)` (at least 1), then the size of the last
    /// fetched page.
    pub fn reconcile(
        current_page: u32,
        page_size: u32,
        meta: &PaginationMeta,
        last_page_item_count: Option<usize>,
    ) -> Result<Self, ClientError> {
        if current_page == 0 {
            return Err(ClientError::InvalidArgument(
                "current_page must be at least 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(ClientError::InvalidArgument(
                "page_size must be at least 1".to_string(),
            ));
        }

        let last_page_full = last_page_item_count == Some(page_size as usize);

        let total_pages = if let Some(total_pages) = meta.total_pages {
            Some(total_pages)
        } else if let Some(total_items) = meta.total_items {
            let pages = total_items.div_ceil(u64::from(page_size)).max(1);
            Some(u32::try_from(pages).unwrap_or(u32::MAX))
        } else {
            match last_page_item_count {
                None => None,
                Some(0) => Some(0),
                Some(_) if last_page_full => None,
                Some(_) => Some(current_page),
            }
        };

        Ok(Self {
            current_page,
            page_size,
            total_items: meta.total_items,
            total_pages,
            last_page_full,
        })
    }

    /// Reconcile against a freshly fetched page. A server-echoed
    /// `page_size` wins over the requested one.
    pub fn from_page(page: &ListPage) -> Result<Self, ClientError> {
        let page_size = page
            .meta
            .page_size
            .filter(|&s| s > 0)
            .unwrap_or(page.requested_page_size);
        let current_page = page
            .meta
            .current_page
            .filter(|&p| p > 0)
            .unwrap_or(page.requested_page);

        Self::reconcile(current_page, page_size, &page.meta, Some(page.len()))
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Next is enabled below a known total, or optimistically for one more
    /// page when the total is unknown and the current page came back full.
    pub fn has_next(&self) -> bool {
        match self.total_pages {
            Some(total) => self.current_page < total,
            None => self.last_page_full,
        }
    }

    /// Map an intent to the page it should load. `None` means the intent is
    /// ignored: out of range, disabled, or already on that page.
    pub fn target_page(&self, intent: NavIntent) -> Option<u32> {
        let target = match intent {
            NavIntent::First => 1,
            NavIntent::Prev => self.current_page.saturating_sub(1).max(1),
            NavIntent::Next => {
                if !self.has_next() {
                    return None;
                }
                self.current_page.checked_add(1)?
            }
            NavIntent::Last => self.total_pages.filter(|&t| t >= 1)?,
            NavIntent::GoTo(page) => {
                if page == 0 {
                    return None;
                }
                if let Some(total) = self.total_pages {
                    if page > total {
                        return None;
                    }
                }
                page
            }
        };

        (target != self.current_page).then_some(target)
    }

    /// Apply an intent to `current_page`. Returns whether the page changed.
    pub fn navigate(&mut self, intent: NavIntent) -> bool {
        match self.target_page(intent) {
            Some(page) => {
                self.current_page = page;
                true
            }
            None => false,
        }
    }

    /// The control is only worth rendering with more than one page, or when
    /// more pages may exist.
    pub fn is_visible(&self) -> bool {
        match self.total_pages {
            Some(total) => total > 1,
            None => self.last_page_full,
        }
    }

    /// Page-number buttons with ellipses for large page counts.
    pub fn page_buttons(&self) -> Vec<PageButton> {
        let total = match self.total_pages {
            Some(total) if total > 0 => total,
            _ => return Vec::new(),
        };

        if total <= MAX_BUTTONS {
            return (1..=total).map(PageButton::Page).collect();
        }

        let page = self.current_page;
        let mut buttons = Vec::with_capacity(MAX_BUTTONS as usize);

        if page <= 4 {
            buttons.extend((1..=5).map(PageButton::Page));
            buttons.push(PageButton::Ellipsis(EllipsisSide::Right));
            buttons.push(PageButton::Page(total));
        } else if page >= total - 3 {
            buttons.push(PageButton::Page(1));
            buttons.push(PageButton::Ellipsis(EllipsisSide::Left));
            buttons.extend((total - 4..=total).map(PageButton::Page));
        } else {
            buttons.push(PageButton::Page(1));
            buttons.push(PageButton::Ellipsis(EllipsisSide::Left));
            buttons.extend((page - 1..=page + 1).map(PageButton::Page));
            buttons.push(PageButton::Ellipsis(EllipsisSide::Right));
            buttons.push(PageButton::Page(total));
        }

        buttons
    }
}

/// Items plus canonical pagination: what a list screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub items: Vec<Value>,
    pub pagination: PaginationState,
}

impl Listing {
    pub fn from_page(page: ListPage) -> Result<Self, ClientError> {
        let pagination = PaginationState::from_page(&page)?;
        Ok(Self {
            items: page.items,
            pagination,
        })
    }

    /// An empty first page, used when a lookup has nothing to query.
    pub fn empty(page_size: u32) -> Result<Self, ClientError> {
        let pagination =
            PaginationState::reconcile(1, page_size, &PaginationMeta::default(), Some(0))?;
        Ok(Self {
            items: Vec::new(),
            pagination,
        })
    }
}
