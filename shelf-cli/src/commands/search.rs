//! The `search` command.

use super::{build_api, open_store, print_book};
use anyhow::{anyhow, Result};
use shelf_client::{Config, SearchController, SearchOptions};
use shelf_core::search::{SearchSignal, SearchState};
use shelf_types::SearchSort;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// How long to wait for any single page before giving up.
const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Run a search through the full pipeline and print the annotated results.
pub async fn run(config: &Config, query: &str, sort: SearchSort, pages: u32) -> Result<()> {
    anyhow::ensure!(!query.trim().is_empty(), "query must not be blank");

    let api = build_api(config)?;
    let store = open_store(config).await?;
    let controller = SearchController::new(
        api,
        store,
        SearchOptions {
            debounce: Duration::from_millis(config.search.debounce_ms),
            page_size: config.search.page_size,
        },
    );

    let mut states = controller.state();
    let mut signals = controller
        .take_signals()
        .ok_or_else(|| anyhow!("signal stream already taken"))?;

    controller.set_sort(sort).await;
    controller.set_query(query).await;
    let mut complete = wait_for_page(&mut states, &mut signals, 1).await?;

    for page in 2..=pages {
        if !complete || controller.current().is_last_page {
            break;
        }
        controller.load_more().await;
        complete = wait_for_page(&mut states, &mut signals, page).await?;
    }

    let state = controller.current();
    if state.books.is_empty() {
        println!("no results for {query:?}");
        return Ok(());
    }

    for (index, book) in state.books.iter().enumerate() {
        print_book(index, book);
    }
    println!(
        "\nloaded {} results (page {}{})",
        state.books.len(),
        state.current_page,
        if state.is_last_page { ", end" } else { "" }
    );

    Ok(())
}

/// Wait until the pipeline has `min_page` loaded and is idle again.
///
/// Returns `Ok(false)` when the pipeline reported a failure instead; the
/// notification is printed the way a UI toast would show it.
async fn wait_for_page(
    states: &mut watch::Receiver<SearchState>,
    signals: &mut mpsc::UnboundedReceiver<SearchSignal>,
    min_page: u32,
) -> Result<bool> {
    loop {
        {
            let state = states.borrow_and_update();
            if !state.is_loading && (state.current_page >= min_page || state.is_last_page) {
                return Ok(true);
            }
        }

        tokio::select! {
            changed = states.changed() => {
                changed.map_err(|_| anyhow!("search pipeline stopped"))?;
            }
            signal = signals.recv() => {
                match signal {
                    Some(SearchSignal::SearchFailed { message }) => {
                        eprintln!("warning: {message}");
                        return Ok(false);
                    }
                    Some(_) => {}
                    None => return Err(anyhow!("search pipeline stopped")),
                }
            }
            _ = tokio::time::sleep(PAGE_TIMEOUT) => {
                return Err(anyhow!("timed out waiting for search results"));
            }
        }
    }
}
