// Search session state machine: throttle, dispatch, classify, notify
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use codecheck_api::{Clock, RepositorySummary, SystemClock};
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};

use crate::message::UserMessage;
use crate::search::SearchProvider;

/// Floor on the spacing between two outgoing search requests
pub const MIN_SEARCH_INTERVAL: Duration = Duration::from_millis(1000);

/// Owns the state of one search session and serializes searches through it.
///
/// Searches go Idle → Throttling → InFlight → Idle. `is_loading` stays true
/// for the whole throttle-and-request stretch. State is published through
/// `watch` channels; errors and navigation requests go out as one-shot events
/// on the receivers returned from the constructor.
pub struct SearchCoordinator {
    provider: Box<dyn SearchProvider>,
    clock: Arc<dyn Clock>,
    min_interval: Duration,

    search_text: watch::Sender<String>,
    items: watch::Sender<Vec<RepositorySummary>>,
    is_loading: watch::Sender<bool>,
    is_empty_input_error: watch::Sender<bool>,

    // Searches currently between lock acquisition and completion
    in_flight: StdMutex<usize>,
    // Held across read-wait-stamp so concurrent searches queue up
    last_dispatch: Mutex<Option<DateTime<Utc>>>,

    messages: mpsc::UnboundedSender<UserMessage>,
    navigation: mpsc::UnboundedSender<RepositorySummary>,
}

/// Receiving ends of the one-shot event channels
pub struct CoordinatorEvents {
    /// Error notifications, in emission order, none dropped
    pub messages: mpsc::UnboundedReceiver<UserMessage>,
    pub navigation: NavigationRequests,
}

/// "Open the detail view for this repository" requests.
///
/// Only the newest pending request matters, so consumers usually want
/// [`NavigationRequests::recv_latest`].
pub struct NavigationRequests {
    rx: mpsc::UnboundedReceiver<RepositorySummary>,
}

impl NavigationRequests {
    pub async fn recv(&mut self) -> Option<RepositorySummary> {
        self.rx.recv().await
    }

    /// Wait for a request, then skip past any stale ones queued behind it
    pub async fn recv_latest(&mut self) -> Option<RepositorySummary> {
        let first = self.rx.recv().await?;
        Some(self.drain_newer(first))
    }

    /// Newest pending request without waiting
    pub fn try_recv_latest(&mut self) -> Option<RepositorySummary> {
        let first = self.rx.try_recv().ok()?;
        Some(self.drain_newer(first))
    }

    fn drain_newer(&mut self, mut latest: RepositorySummary) -> RepositorySummary {
        while let Ok(newer) = self.rx.try_recv() {
            latest = newer;
        }
        latest
    }
}

impl SearchCoordinator {
    pub fn new(provider: Box<dyn SearchProvider>) -> (Self, CoordinatorEvents) {
        Self::with_options(provider, Arc::new(SystemClock), MIN_SEARCH_INTERVAL)
    }

    /// Intervals shorter than [`MIN_SEARCH_INTERVAL`] are raised to it
    pub fn with_options(
        provider: Box<dyn SearchProvider>,
        clock: Arc<dyn Clock>,
        min_interval: Duration,
    ) -> (Self, CoordinatorEvents) {
        let (messages_tx, messages_rx) = mpsc::unbounded_channel();
        let (navigation_tx, navigation_rx) = mpsc::unbounded_channel();

        let coordinator = Self {
            provider,
            clock,
            min_interval: min_interval.max(MIN_SEARCH_INTERVAL),
            search_text: watch::Sender::new(String::new()),
            items: watch::Sender::new(Vec::new()),
            is_loading: watch::Sender::new(false),
            is_empty_input_error: watch::Sender::new(false),
            in_flight: StdMutex::new(0),
            last_dispatch: Mutex::new(None),
            messages: messages_tx,
            navigation: navigation_tx,
        };
        let events = CoordinatorEvents {
            messages: messages_rx,
            navigation: NavigationRequests { rx: navigation_rx },
        };

        (coordinator, events)
    }

    /// Run one search. Blank input is the caller's problem, see
    /// [`SearchCoordinator::is_valid_input`].
    pub async fn search(&self, text: &str) {
        let mut last_dispatch = self.last_dispatch.lock().await;
        let _loading = LoadingGuard::engage(self);

        if let Some(previous) = *last_dispatch {
            let wait = self.remaining_interval(previous);
            if !wait.is_zero() {
                debug!("Throttling search for '{}' by {:?}", text, wait);
                tokio::time::sleep(wait).await;
            }
        }
        *last_dispatch = Some(self.clock.now());
        drop(last_dispatch);

        info!("Searching for '{}'", text);
        match self.provider.search(text).await {
            Ok(items) => {
                info!("Found {} repositories for '{}'", items.len(), text);
                self.items.send_replace(items);
            }
            Err(err) => {
                warn!(status = ?err.status(), "Search for '{}' failed: {}", text, err);
                self.items.send_replace(Vec::new());
                let message = UserMessage::from_error(&err, self.clock.now());
                if self.messages.send(message).is_err() {
                    debug!("User message dropped, nobody is listening");
                }
            }
        }
    }

    fn remaining_interval(&self, previous: DateTime<Utc>) -> Duration {
        // A clock that went backwards counts as no time elapsed
        let elapsed = (self.clock.now() - previous)
            .to_std()
            .unwrap_or(Duration::ZERO);
        self.min_interval.saturating_sub(elapsed)
    }

    pub fn on_input_changed(&self, text: &str) {
        self.search_text.send_replace(text.to_string());
        if Self::is_valid_input(text) {
            self.is_empty_input_error.send_if_modified(|flag| {
                let was_set = *flag;
                *flag = false;
                was_set
            });
        }
    }

    pub fn set_empty_input_flag(&self, is_empty: bool) {
        self.is_empty_input_error.send_replace(is_empty);
    }

    pub fn is_valid_input(text: &str) -> bool {
        !text.trim().is_empty()
    }

    pub fn clear_results(&self) {
        self.items.send_replace(Vec::new());
    }

    pub fn select_item(&self, item: RepositorySummary) {
        debug!("Navigating to {}", item.name);
        if self.navigation.send(item).is_err() {
            debug!("Navigation request dropped, nobody is listening");
        }
    }

    // Snapshots

    pub fn search_text(&self) -> String {
        self.search_text.borrow().clone()
    }

    pub fn items(&self) -> Vec<RepositorySummary> {
        self.items.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.is_loading.borrow()
    }

    pub fn is_empty_input_error(&self) -> bool {
        *self.is_empty_input_error.borrow()
    }

    // Observers

    pub fn subscribe_search_text(&self) -> watch::Receiver<String> {
        self.search_text.subscribe()
    }

    pub fn subscribe_items(&self) -> watch::Receiver<Vec<RepositorySummary>> {
        self.items.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.is_loading.subscribe()
    }

    pub fn subscribe_empty_input_error(&self) -> watch::Receiver<bool> {
        self.is_empty_input_error.subscribe()
    }
}

/// Keeps `is_loading` true while at least one search is running.
///
/// Dropping it (normal exit, error, or the search future being cancelled)
/// is what turns the indicator back off.
struct LoadingGuard<'a> {
    coordinator: &'a SearchCoordinator,
}

impl<'a> LoadingGuard<'a> {
    fn engage(coordinator: &'a SearchCoordinator) -> Self {
        let mut in_flight = coordinator
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *in_flight += 1;
        coordinator.is_loading.send_replace(true);
        Self { coordinator }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = self
            .coordinator
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *in_flight = in_flight.saturating_sub(1);
        if *in_flight == 0 {
            self.coordinator.is_loading.send_replace(false);
        }
    }
}
