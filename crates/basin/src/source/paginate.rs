//! Paginated crawling of upstream list endpoints.
//!
//! Two styles exist upstream:
//!
//! - **Page-number** endpoints: request page N (starting at 1); an empty
//!   page terminates the crawl (success, not an error).
//! - **Continuation-token** endpoints: each response carries an opaque next
//!   token and an is-last flag; termination is the flag or an absent token,
//!   never an empty page.
//!
//! Both loops wait on a [`HostPacer`] before every request, which enforces
//! the fixed inter-request delay toward one host. A transport or parse
//! error aborts the crawl and surfaces to the caller; the coordinator
//! decides whether that is fatal (Metadata) or folds into a zero-count.

use std::future::Future;

use tokio::sync::mpsc;

use super::errors::Result;
use super::pacing::HostPacer;

/// One page of a continuation-token endpoint.
#[derive(Debug, Clone)]
pub struct TokenPage<T> {
    pub items: Vec<T>,
    /// Token for the next request; `None` ends the crawl.
    pub next_token: Option<String>,
    /// Explicit last-page flag; also ends the crawl.
    pub is_last: bool,
}

/// Crawl a page-number endpoint to completion, collecting every item.
///
/// `fetch_page` receives the 1-based page number. The crawl is finite and
/// not restartable mid-stream; a caller who needs to resume re-issues the
/// whole crawl from page 1.
pub async fn fetch_pages<T, F, Fut>(pacer: &HostPacer, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut all = Vec::new();
    let mut page = 1u32;

    loop {
        pacer.wait().await;
        let items = fetch_page(page).await?;
        if items.is_empty() {
            break;
        }
        all.extend(items);
        page += 1;
    }

    Ok(all)
}

/// Crawl a page-number endpoint, sending items through a channel as pages
/// complete.
///
/// Lets downstream persistence start before the crawl finishes. Returns the
/// number of items sent. A closed receiver ends the crawl early without an
/// error - the consumer has decided it is done.
pub async fn fetch_pages_streaming<T, F, Fut>(
    pacer: &HostPacer,
    tx: mpsc::Sender<T>,
    mut fetch_page: F,
) -> Result<usize>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut sent = 0usize;
    let mut page = 1u32;

    'crawl: loop {
        pacer.wait().await;
        let items = fetch_page(page).await?;
        if items.is_empty() {
            break;
        }
        for item in items {
            if tx.send(item).await.is_err() {
                tracing::debug!(page, sent, "page stream receiver closed, stopping crawl");
                break 'crawl;
            }
            sent += 1;
        }
        page += 1;
    }

    Ok(sent)
}

/// Crawl a continuation-token endpoint to completion.
///
/// `fetch_page` receives the token of the page to fetch (`None` for the
/// first). Termination is the response's is-last flag or an absent next
/// token, not an empty page.
pub async fn fetch_token_pages<T, F, Fut>(pacer: &HostPacer, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<TokenPage<T>>>,
{
    let mut all = Vec::new();
    let mut token: Option<String> = None;

    loop {
        pacer.wait().await;
        let page = fetch_page(token.take()).await?;
        all.extend(page.items);
        if page.is_last || page.next_token.is_none() {
            break;
        }
        token = page.next_token;
    }

    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::source::errors::SourceError;

    fn pacer() -> HostPacer {
        HostPacer::new(Duration::ZERO)
    }

    /// Pages of sizes [100, 100, 37, 0] yield exactly 237 records in
    /// exactly 4 page requests: a short page does not end the crawl, only
    /// an empty one does.
    #[tokio::test]
    async fn crawl_terminates_on_empty_page_only() {
        let requests = Arc::new(AtomicUsize::new(0));
        let requests_capture = Arc::clone(&requests);

        let sizes = [100usize, 100, 37, 0];
        let items = fetch_pages(&pacer(), move |page| {
            let requests_capture = Arc::clone(&requests_capture);
            async move {
                requests_capture.fetch_add(1, Ordering::SeqCst);
                let size = sizes[(page as usize) - 1];
                Ok(vec![0u8; size])
            }
        })
        .await
        .expect("crawl should succeed");

        assert_eq!(items.len(), 237);
        assert_eq!(requests.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn empty_first_page_is_success_with_zero_items() {
        let items: Vec<u8> = fetch_pages(&pacer(), |_page| async { Ok(Vec::new()) })
            .await
            .expect("empty crawl should succeed");
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn fetch_error_aborts_the_crawl() {
        let err = fetch_pages::<u8, _, _>(&pacer(), |page| async move {
            if page == 1 {
                Ok(vec![1, 2, 3])
            } else {
                Err(SourceError::network("connection reset"))
            }
        })
        .await
        .expect_err("second page error should abort");

        assert!(matches!(err, SourceError::Network { .. }));
    }

    #[tokio::test]
    async fn streaming_sends_every_item_in_order() {
        let (tx, mut rx) = mpsc::channel::<u32>(256);

        let sent = fetch_pages_streaming(&pacer(), tx, |page| async move {
            if page <= 2 {
                Ok(vec![page * 10, page * 10 + 1])
            } else {
                Ok(Vec::new())
            }
        })
        .await
        .expect("stream crawl should succeed");

        assert_eq!(sent, 4);
        let mut received = Vec::new();
        while let Some(item) = rx.recv().await {
            received.push(item);
        }
        assert_eq!(received, vec![10, 11, 20, 21]);
    }

    #[tokio::test]
    async fn streaming_stops_when_receiver_is_dropped() {
        let (tx, rx) = mpsc::channel::<u32>(1);
        drop(rx);

        let sent = fetch_pages_streaming(&pacer(), tx, |_page| async { Ok(vec![1, 2, 3]) })
            .await
            .expect("closed receiver is not an error");
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn token_crawl_follows_tokens_until_last_flag() {
        let items = fetch_token_pages(&pacer(), |token| async move {
            match token.as_deref() {
                None => Ok(TokenPage {
                    items: vec!["a", "b"],
                    next_token: Some("t1".to_string()),
                    is_last: false,
                }),
                Some("t1") => Ok(TokenPage {
                    items: vec!["c"],
                    next_token: Some("t2".to_string()),
                    is_last: true,
                }),
                other => panic!("unexpected token {other:?}"),
            }
        })
        .await
        .expect("token crawl should succeed");

        // The is-last flag terminates even though a next token was present.
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn token_crawl_does_not_stop_on_empty_page() {
        let items = fetch_token_pages(&pacer(), |token| async move {
            match token.as_deref() {
                None => Ok(TokenPage {
                    items: Vec::<&str>::new(),
                    next_token: Some("t1".to_string()),
                    is_last: false,
                }),
                Some("t1") => Ok(TokenPage {
                    items: vec!["late"],
                    next_token: None,
                    is_last: false,
                }),
                other => panic!("unexpected token {other:?}"),
            }
        })
        .await
        .expect("token crawl should succeed");

        assert_eq!(items, vec!["late"]);
    }

    #[tokio::test]
    async fn crawl_respects_the_pacer_spacing() {
        let pacer = HostPacer::new(Duration::from_millis(30));
        let start = std::time::Instant::now();

        let _items = fetch_pages(&pacer, |page| async move {
            if page <= 2 { Ok(vec![0u8]) } else { Ok(Vec::new()) }
        })
        .await
        .expect("crawl should succeed");

        // Three requests, two enforced gaps.
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
