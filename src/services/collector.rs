//! Bounded multi-page collection from a paged list endpoint.
//!
//! Pages are fetched strictly in order starting at 1. Collection stops when
//! enough items are gathered, when a page comes back empty or short, or after
//! [`SAFETY_CAP_PAGES`] fetches, whichever happens first. A page that is
//! exactly full is always taken to mean more pages exist.

use std::future::Future;

use serde_json::Value;

use crate::errors::ClientError;
use crate::models::list_page::ListPage;

/// Maximum number of page fetches in one collection run.
pub const SAFETY_CAP_PAGES: u32 = 10;

/// Why a collection run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    EmptyPage,
    ShortPage,
    SafetyCap,
}

/// Items gathered by one run, plus how it ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Collected {
    pub items: Vec<Value>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

/// Collect up to `target` items by calling `fetch_page(page, page_size)` for
/// pages 1, 2, ... Any fetch error aborts the run and is returned unchanged.
pub async fn collect<F, Fut>(
    mut fetch_page: F,
    target: usize,
    page_size: u32,
) -> Result<Collected, ClientError>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<ListPage, ClientError>>,
{
    if page_size == 0 {
        return Err(ClientError::InvalidArgument(
            "page_size must be at least 1".to_string(),
        ));
    }

    let ceiling = SAFETY_CAP_PAGES as usize * page_size as usize;
    let mut items = Vec::with_capacity(target.min(ceiling));
    let mut pages_fetched = 0;

    if target == 0 {
        return Ok(Collected {
            items,
            pages_fetched,
            stop: StopReason::TargetReached,
        });
    }

    let stop = loop {
        let page = pages_fetched + 1;
        let result = fetch_page(page, page_size).await?;
        pages_fetched = page;

        tracing::debug!(page, received = result.len(), page_size, "Collected page");

        if result.is_empty() {
            break StopReason::EmptyPage;
        }

        let short = result.is_short();
        items.extend(result.items);

        if items.len() >= target {
            break StopReason::TargetReached;
        }
        if short {
            break StopReason::ShortPage;
        }
        if pages_fetched >= SAFETY_CAP_PAGES {
            break StopReason::SafetyCap;
        }
    };

    items.truncate(target);
    tracing::debug!(
        pages = pages_fetched,
        items = items.len(),
        stop = ?stop,
        "Collection finished"
    );

    Ok(Collected {
        items,
        pages_fetched,
        stop,
    })
}
