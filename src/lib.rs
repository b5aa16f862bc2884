pub mod api;
pub mod config;
pub mod feed;
pub mod filters;
pub mod media;
pub mod models;
pub mod storage;
pub mod text;
mod utils;

pub use api::{ApiClient, ApiError, EventsSource};
pub use config::ApiConfig;
pub use feed::{FeedController, FeedScreen, FetchState, FetchTicket};
pub use filters::{default_filters, interest_categories, matched_categories, Filter};
pub use media::{is_likely_image, resolve_media_url};
pub use models::{AuthTokens, ChannelInfo, EventCard, UserProfile};
pub use storage::{ProfileStore, TokenStore};
pub use text::{
    channel_label, clean_text, first_line, format_event_date, truncate, DATE_PLACEHOLDER,
};
