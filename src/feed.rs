use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};

use crate::api::{ApiClient, ApiError, EventsSource};
use crate::filters::Filter;
use crate::media;
use crate::models::EventCard;

/// Fetch lifecycle of one screen instance. `Failed` holds no list on purpose:
/// screens render it as empty, but it must stay distinguishable from
/// `Ready(vec![])`.
#[derive(Debug, Clone, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Ready(Vec<EventCard>),
    Failed,
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn items(&self) -> &[EventCard] {
        match self {
            FetchState::Ready(items) => items,
            _ => &[],
        }
    }
}

/// Identifies one fetch attempt. A completion carrying a stale ticket is
/// ignored, which is what guards against the out-of-order arrival of a
/// superseded request's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// The presentation state a screen binds to. Pure and synchronous: all the
/// async lives in whoever drives `begin_fetch`/`complete_fetch`.
#[derive(Debug, Default)]
pub struct FeedScreen {
    state: FetchState,
    generation: u64,
    unmounted: bool,
    failed_images: HashSet<String>,
}

impl FeedScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// The full unfiltered list; empty unless the last fetch succeeded.
    pub fn items(&self) -> &[EventCard] {
        self.state.items()
    }

    pub fn last_fetch_succeeded(&self) -> bool {
        matches!(self.state, FetchState::Ready(_))
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = FetchState::Loading;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Applies a fetch result. Returns false without touching state when the
    /// screen has been unmounted or the ticket was superseded by a newer
    /// `begin_fetch`.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<EventCard>, ApiError>,
    ) -> bool {
        if self.unmounted || ticket.generation != self.generation {
            tracing::debug!("dropping stale fetch completion");
            return false;
        }
        self.state = match result {
            Ok(items) => FetchState::Ready(items),
            Err(err) => {
                tracing::warn!("events fetch failed: {err}");
                FetchState::Failed
            }
        };
        true
    }

    /// After this, every pending completion is a no-op.
    pub fn unmount(&mut self) {
        self.unmounted = true;
    }

    pub fn filtered(&self, filter: &Filter) -> Vec<&EventCard> {
        self.items().iter().filter(|e| filter.matches(e)).collect()
    }

    /// Records matching any selected category, capped at `limit`. When the
    /// selection narrows the feed to nothing while data exists, the first
    /// `limit` unfiltered records are shown instead of a blank feed.
    pub fn personalized<'a>(
        &'a self,
        selected: &[String],
        categories: &[Filter],
        limit: usize,
    ) -> Vec<&'a EventCard> {
        let items = self.items();
        let chosen: Vec<&Filter> = categories
            .iter()
            .filter(|category| selected.contains(&category.key))
            .collect();
        if chosen.is_empty() {
            return items.iter().take(limit).collect();
        }
        let matched: Vec<&EventCard> = items
            .iter()
            .filter(|event| chosen.iter().any(|category| category.matches(event)))
            .take(limit)
            .collect();
        if matched.is_empty() && !items.is_empty() {
            items.iter().take(limit).collect()
        } else {
            matched
        }
    }

    /// The first record, in list order, with a displayable image; its resolved
    /// URL represents the whole list.
    pub fn hero_image(&self, api_base: &str) -> Option<String> {
        for event in self.items() {
            let media_url = event.media_urls.iter().find(|url| media::is_likely_image(url));
            let Some(resolved) = media::resolve_media_url(media_url.map(String::as_str), api_base)
            else {
                continue;
            };
            if media::is_likely_image(&resolved) {
                return Some(resolved);
            }
        }
        None
    }

    /// Every media URL across the loaded list, resolved and filtered to
    /// images, de-duplicated in first-seen order, capped at `cap`.
    pub fn carousel_images(&self, api_base: &str, cap: usize) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for event in self.items() {
            for media_url in &event.media_urls {
                let Some(resolved) = media::resolve_media_url(Some(media_url), api_base) else {
                    continue;
                };
                if !media::is_likely_image(&resolved) {
                    continue;
                }
                if urls.iter().any(|existing| existing == &resolved) {
                    continue;
                }
                urls.push(resolved);
                if urls.len() == cap {
                    return urls;
                }
            }
        }
        urls
    }

    /// A record whose image failed to render once is never retried for this
    /// screen's lifetime; the failure stays isolated to that record.
    pub fn mark_image_failed(&mut self, event_id: &str) {
        self.failed_images.insert(event_id.to_string());
    }

    pub fn image_failed(&self, event_id: &str) -> bool {
        self.failed_images.contains(event_id)
    }
}

/// Binds one screen's state to a fetch source. Each screen owns its own
/// controller; nothing is shared or de-duplicated across instances.
pub struct FeedController<S> {
    source: S,
    screen: Mutex<FeedScreen>,
}

impl<S: EventsSource> FeedController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            screen: Mutex::new(FeedScreen::new()),
        }
    }

    /// One fetch cycle: enter `Loading`, await the source, apply the result.
    /// Returns whether the completion was applied (false when superseded or
    /// unmounted mid-flight). No retries: a failure waits for the next
    /// explicit refresh.
    pub async fn refresh(&self, limit: u32) -> bool {
        let ticket = self.lock().begin_fetch();
        let result = self.source.fetch_events(limit).await;
        self.lock().complete_fetch(ticket, result)
    }

    pub fn unmount(&self) {
        self.lock().unmount();
    }

    pub fn snapshot(&self) -> FetchState {
        self.lock().state().clone()
    }

    pub fn with_screen<R>(&self, f: impl FnOnce(&FeedScreen) -> R) -> R {
        f(&self.lock())
    }

    pub fn with_screen_mut<R>(&self, f: impl FnOnce(&mut FeedScreen) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, FeedScreen> {
        self.screen.lock().expect("feed state mutex poisoned")
    }
}

impl FeedController<ApiClient> {
    /// The debug-screen flow: trigger server-side ingestion, wait for it to
    /// finish, then re-query the feed. Returns how many events the re-query
    /// produced.
    pub async fn ingest_and_refresh(
        &self,
        per_channel_limit: u32,
        event_only: bool,
        limit: u32,
    ) -> Result<usize> {
        self.source
            .trigger_event_ingest(per_channel_limit, event_only)
            .await
            .context("event ingestion trigger failed")?;
        self.refresh(limit).await;
        let screen = self.lock();
        if screen.last_fetch_succeeded() {
            Ok(screen.items().len())
        } else {
            Err(anyhow!("events re-query failed after ingestion"))
        }
    }
}
