use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::types::{GraphEntry, ListPage};

/// A cursor-paginated list endpoint. The client implements this over HTTP;
/// tests implement it over canned pages.
#[async_trait]
pub trait PageSource {
    async fn fetch_page(&mut self, cursor: Option<&str>) -> Result<ListPage>;
}

/// Drain a paginated source to completion, preserving service order.
///
/// Issues one request per page, sleeping `delay` between consecutive pages to
/// stay under the service's rate limit. The delay is fixed; it never grows.
/// Stops at the first response without a cursor. Any page error aborts the
/// whole walk with no partial result.
pub async fn collect_pages<S>(source: &mut S, delay: Duration) -> Result<Vec<GraphEntry>>
where
    S: PageSource + Send,
{
    let mut entries: Vec<GraphEntry> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_count: u32 = 0;

    loop {
        let page = source.fetch_page(cursor.as_deref()).await?;
        page_count += 1;
        debug!(page = page_count, items = page.entries.len(), "Fetched page");
        entries.extend(page.entries);

        match page.cursor {
            Some(next) => {
                cursor = Some(next);
                tokio::time::sleep(delay).await;
            }
            None => break,
        }
    }

    Ok(entries)
}
