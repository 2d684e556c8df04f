//! Search pipeline state machine.
//!
//! This module provides a pure, side-effect-free state machine for the
//! query → debounce → fetch → merge pipeline. The state machine takes
//! events as input and produces a new state plus a list of actions to
//! execute.
//!
//! The actual I/O (debounce timers, network fetches, favorite lookups) is
//! performed by shelf-client, not by this module. This enables instant
//! unit testing without network mocks.
//!
//! Supersession is tracked with a monotonically increasing generation:
//! every query or sort change bumps it, and debounce expirations and fetch
//! completions carry the generation they were issued for. An event whose
//! generation no longer matches the state is dropped without touching
//! anything, so a stale in-flight search can never overwrite state for a
//! newer query/sort combination.

use crate::merge::annotate_favorites;
use shelf_types::{Book, SearchPage, SearchSort};
use std::collections::HashSet;

/// Fallback notification text when an error carries no message.
const FALLBACK_ERROR: &str = "something went wrong";

/// State of the search screen - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    /// Current query text, updated on every keystroke.
    pub query: String,
    /// Current sort order.
    pub sort: SearchSort,
    /// Loaded books, favorite-annotated, across all loaded pages.
    pub books: Vec<Book>,
    /// Highest page loaded so far (0 until the first page lands).
    pub current_page: u32,
    /// Whether the server reported the end of results.
    pub is_last_page: bool,
    /// Whether a fetch is in flight.
    pub is_loading: bool,
    generation: u64,
}

impl SearchState {
    /// Create the initial state: blank query, nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current supersession generation.
    ///
    /// Bumped on every query/sort change; carried by debounce and fetch
    /// completions so stale ones can be recognized.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (shelf-client)
    /// is responsible for executing the returned actions.
    pub fn on_event(mut self, event: SearchEvent) -> (Self, Vec<SearchAction>) {
        match event {
            SearchEvent::QueryChanged(query) => {
                if query == self.query {
                    return (self, vec![]);
                }
                self.query = query;
                self.generation += 1;
                let generation = self.generation;
                (self, vec![SearchAction::RestartDebounce { generation }])
            }

            SearchEvent::SortChanged(sort) => {
                if sort == self.sort {
                    return (self, vec![]);
                }
                self.sort = sort;
                self.generation += 1;
                let generation = self.generation;
                (self, vec![SearchAction::RestartDebounce { generation }])
            }

            SearchEvent::DebounceElapsed { generation } => {
                if generation != self.generation {
                    // A newer query/sort change restarted the window.
                    return (self, vec![]);
                }
                if self.query.trim().is_empty() {
                    self.books = Vec::new();
                    self.current_page = 1;
                    self.is_last_page = true;
                    self.is_loading = false;
                    return (self, vec![]);
                }
                self.is_loading = true;
                let fetch = SearchAction::Fetch {
                    query: self.query.clone(),
                    sort: self.sort,
                    page: 1,
                    generation,
                };
                (self, vec![fetch])
            }

            SearchEvent::LoadMoreRequested => {
                if self.is_last_page || self.is_loading || self.query.trim().is_empty() {
                    return (self, vec![]);
                }
                self.is_loading = true;
                let fetch = SearchAction::Fetch {
                    query: self.query.clone(),
                    sort: self.sort,
                    page: self.current_page + 1,
                    generation: self.generation,
                };
                (self, vec![fetch])
            }

            SearchEvent::PageLoaded {
                generation,
                page,
                favorite_isbns,
            } => {
                if generation != self.generation {
                    // Response to a query/sort combination that is no
                    // longer current. Ignore it wholesale.
                    return (self, vec![]);
                }
                let merged = annotate_favorites(page.books, &favorite_isbns);
                if page.current_page <= 1 {
                    self.books = merged;
                } else {
                    self.books.extend(merged);
                }
                self.current_page = page.current_page;
                self.is_last_page = page.is_last_page;
                self.is_loading = false;
                (self, vec![])
            }

            SearchEvent::FetchFailed {
                generation,
                message,
            } => {
                if generation != self.generation {
                    return (self, vec![]);
                }
                self.is_loading = false;
                let message = if message.trim().is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    message
                };
                (
                    self,
                    vec![SearchAction::Emit(SearchSignal::SearchFailed {
                        message,
                    })],
                )
            }

            SearchEvent::FavoritesChanged { favorite_isbns } => {
                let books = std::mem::take(&mut self.books);
                self.books = annotate_favorites(books, &favorite_isbns);
                (self, vec![])
            }

            SearchEvent::BookSelected(book) => {
                (self, vec![SearchAction::Emit(SearchSignal::OpenDetail(book))])
            }
        }
    }
}

/// Events that drive the search pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The user edited the query text.
    QueryChanged(String),
    /// The user picked a different sort order.
    SortChanged(SearchSort),
    /// A debounce window opened by a query/sort change has elapsed.
    DebounceElapsed {
        /// Generation the window was opened for.
        generation: u64,
    },
    /// The user scrolled to the end and asked for the next page.
    LoadMoreRequested,
    /// A fetch completed.
    PageLoaded {
        /// Generation the fetch was issued for.
        generation: u64,
        /// The raw page returned by the search engine.
        page: SearchPage,
        /// ISBNs among the page's books that are currently favorited.
        favorite_isbns: HashSet<String>,
    },
    /// A fetch failed.
    FetchFailed {
        /// Generation the fetch was issued for.
        generation: u64,
        /// Error message describing the failure.
        message: String,
    },
    /// The authoritative favorite set changed somewhere in the app.
    FavoritesChanged {
        /// The complete current favorite ISBN set.
        favorite_isbns: HashSet<String>,
    },
    /// The user tapped a book in the result list.
    BookSelected(Book),
}

/// Actions to be executed by shelf-client.
///
/// These are instructions, not side effects. The client interprets these
/// and performs the actual timers and I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// (Re)start the debounce timer for the given generation.
    ///
    /// Timers for older generations are implicitly cancelled: when they
    /// fire, their [`SearchEvent::DebounceElapsed`] is stale and dropped.
    RestartDebounce {
        /// Generation to report back when the window elapses.
        generation: u64,
    },
    /// Fetch one page of search results.
    Fetch {
        /// Query to search for. Never blank.
        query: String,
        /// Sort order to request.
        sort: SearchSort,
        /// 1-based page to fetch.
        page: u32,
        /// Generation to report back with the completion.
        generation: u64,
    },
    /// Emit a one-shot signal to the presentation layer.
    Emit(SearchSignal),
}

/// One-shot signals emitted to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchSignal {
    /// A search failed; show a dismissible notification.
    SearchFailed {
        /// Human-readable message, never empty.
        message: String,
    },
    /// The user asked to open a book's detail view.
    OpenDetail(Book),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: format!("Title {isbn}"),
            authors: vec![],
            publisher: String::new(),
            publication_date: String::new(),
            price: 10000,
            sale_price: 0,
            thumbnail: String::new(),
            description: String::new(),
            is_favorite: false,
        }
    }

    fn page(isbns: &[&str], current_page: u32, is_last_page: bool) -> SearchPage {
        SearchPage {
            books: isbns.iter().map(|i| book(i)).collect(),
            is_last_page,
            current_page,
            total_count: 100,
            pageable_count: 100,
        }
    }

    fn no_favorites() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn starts_blank_and_idle() {
        let state = SearchState::new();
        assert_eq!(state.query, "");
        assert!(state.books.is_empty());
        assert!(!state.is_loading);
        assert!(!state.is_last_page);
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn query_change_restarts_debounce() {
        let (state, actions) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));

        assert_eq!(state.query, "kotlin");
        assert_eq!(state.generation(), 1);
        assert_eq!(
            actions,
            vec![SearchAction::RestartDebounce { generation: 1 }]
        );
    }

    #[test]
    fn identical_query_is_a_no_op() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, actions) = state.on_event(SearchEvent::QueryChanged("kotlin".into()));

        assert_eq!(state.generation(), 1);
        assert!(actions.is_empty());
    }

    #[test]
    fn sort_change_restarts_debounce() {
        let (state, actions) = SearchState::new().on_event(SearchEvent::SortChanged(SearchSort::Latest));

        assert_eq!(state.sort, SearchSort::Latest);
        assert_eq!(
            actions,
            vec![SearchAction::RestartDebounce { generation: 1 }]
        );
    }

    #[test]
    fn stale_debounce_expiry_is_dropped() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("a".into()));
        let (state, _) = state.on_event(SearchEvent::QueryChanged("ab".into()));

        let (state, actions) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });

        assert!(actions.is_empty());
        assert!(!state.is_loading);
    }

    #[test]
    fn debounce_expiry_fetches_page_one() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, actions) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });

        assert!(state.is_loading);
        assert_eq!(
            actions,
            vec![SearchAction::Fetch {
                query: "kotlin".into(),
                sort: SearchSort::Accuracy,
                page: 1,
                generation: 1,
            }]
        );
    }

    #[test]
    fn blank_query_clears_without_fetching() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });
        let (state, _) = state.on_event(SearchEvent::PageLoaded {
            generation: 1,
            page: page(&["111"], 1, false),
            favorite_isbns: no_favorites(),
        });

        let (state, _) = state.on_event(SearchEvent::QueryChanged("".into()));
        let (state, actions) = state.on_event(SearchEvent::DebounceElapsed { generation: 2 });

        assert!(actions.is_empty());
        assert!(state.books.is_empty());
        assert!(state.is_last_page);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn first_page_replaces_and_annotates() {
        let favorites: HashSet<String> = ["222".to_string()].into_iter().collect();
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });

        let (state, actions) = state.on_event(SearchEvent::PageLoaded {
            generation: 1,
            page: page(&["111", "222"], 1, false),
            favorite_isbns: favorites,
        });

        assert!(actions.is_empty());
        assert!(!state.is_loading);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.books.len(), 2);
        assert!(!state.books[0].is_favorite);
        assert!(state.books[1].is_favorite);
    }

    #[test]
    fn stale_page_never_lands() {
        // Query changes from "a" to "b" while a's fetch is in flight.
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("a".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });
        let (state, _) = state.on_event(SearchEvent::QueryChanged("b".into()));

        let (state, actions) = state.on_event(SearchEvent::PageLoaded {
            generation: 1,
            page: page(&["stale"], 1, true),
            favorite_isbns: no_favorites(),
        });

        assert!(actions.is_empty());
        assert!(state.books.is_empty());
        assert_eq!(state.query, "b");
    }

    #[test]
    fn load_more_appends_the_next_page() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });
        let (state, _) = state.on_event(SearchEvent::PageLoaded {
            generation: 1,
            page: page(&["111", "222"], 1, false),
            favorite_isbns: no_favorites(),
        });

        let (state, actions) = state.on_event(SearchEvent::LoadMoreRequested);
        assert!(state.is_loading);
        assert_eq!(
            actions,
            vec![SearchAction::Fetch {
                query: "kotlin".into(),
                sort: SearchSort::Accuracy,
                page: 2,
                generation: 1,
            }]
        );

        let (state, _) = state.on_event(SearchEvent::PageLoaded {
            generation: 1,
            page: page(&["333"], 2, true),
            favorite_isbns: no_favorites(),
        });

        let isbns: Vec<&str> = state.books.iter().map(|b| b.isbn.as_str()).collect();
        assert_eq!(isbns, vec!["111", "222", "333"]);
        assert_eq!(state.current_page, 2);
        assert!(state.is_last_page);
    }

    #[test]
    fn load_more_is_a_no_op_on_the_last_page() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });
        let (state, _) = state.on_event(SearchEvent::PageLoaded {
            generation: 1,
            page: page(&["111"], 1, true),
            favorite_isbns: no_favorites(),
        });

        let before = state.clone();
        let (state, actions) = state.on_event(SearchEvent::LoadMoreRequested);

        assert!(actions.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn load_more_before_any_search_never_fetches() {
        let (state, actions) = SearchState::new().on_event(SearchEvent::LoadMoreRequested);

        assert!(actions.is_empty());
        assert!(!state.is_loading);
    }

    #[test]
    fn load_more_is_a_no_op_while_loading() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });

        let before = state.clone();
        let (state, actions) = state.on_event(SearchEvent::LoadMoreRequested);

        assert!(actions.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn favorites_change_remerges_without_fetching() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });
        let (state, _) = state.on_event(SearchEvent::PageLoaded {
            generation: 1,
            page: page(&["111", "222"], 1, false),
            favorite_isbns: no_favorites(),
        });

        let favorites: HashSet<String> = ["111".to_string()].into_iter().collect();
        let (state, actions) = state.on_event(SearchEvent::FavoritesChanged {
            favorite_isbns: favorites,
        });

        assert!(actions.is_empty());
        assert!(state.books[0].is_favorite);
        assert!(!state.books[1].is_favorite);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn fetch_failure_keeps_last_known_good_state() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });
        let (state, _) = state.on_event(SearchEvent::PageLoaded {
            generation: 1,
            page: page(&["111"], 1, false),
            favorite_isbns: no_favorites(),
        });

        let (state, _) = state.on_event(SearchEvent::LoadMoreRequested);
        let (state, actions) = state.on_event(SearchEvent::FetchFailed {
            generation: 1,
            message: "connection reset".into(),
        });

        assert!(!state.is_loading);
        assert_eq!(state.books.len(), 1);
        assert_eq!(state.current_page, 1);
        assert_eq!(
            actions,
            vec![SearchAction::Emit(SearchSignal::SearchFailed {
                message: "connection reset".into(),
            })]
        );
    }

    #[test]
    fn empty_failure_message_gets_a_fallback() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("kotlin".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });

        let (_, actions) = state.on_event(SearchEvent::FetchFailed {
            generation: 1,
            message: "  ".into(),
        });

        assert_eq!(
            actions,
            vec![SearchAction::Emit(SearchSignal::SearchFailed {
                message: FALLBACK_ERROR.into(),
            })]
        );
    }

    #[test]
    fn stale_failure_is_dropped() {
        let (state, _) = SearchState::new().on_event(SearchEvent::QueryChanged("a".into()));
        let (state, _) = state.on_event(SearchEvent::DebounceElapsed { generation: 1 });
        let (state, _) = state.on_event(SearchEvent::QueryChanged("b".into()));

        let (_, actions) = state.on_event(SearchEvent::FetchFailed {
            generation: 1,
            message: "timeout".into(),
        });

        assert!(actions.is_empty());
    }

    #[test]
    fn selecting_a_book_emits_open_detail() {
        let selected = book("111");
        let (_, actions) = SearchState::new().on_event(SearchEvent::BookSelected(selected.clone()));

        assert_eq!(
            actions,
            vec![SearchAction::Emit(SearchSignal::OpenDetail(selected))]
        );
    }
}
