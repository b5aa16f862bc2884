use serde::{Deserialize, Serialize};

use crate::text;

/// A single server-supplied event record. The backend owns this shape; every
/// field defaults so that schema drift on the server never fails a fetch.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct EventCard {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub channel: String,
    pub message_id: i64,
    pub event_time: Option<String>,
    pub media_urls: Vec<String>,
    pub location: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub source_link: Option<String>,
    pub created_at: String,
}

impl EventCard {
    pub fn headline(&self) -> String {
        let from_title = text::first_line(Some(&self.title));
        if !from_title.is_empty() {
            return from_title;
        }
        let from_description = text::first_line(self.description.as_deref());
        if !from_description.is_empty() {
            return from_description;
        }
        "Событие".to_string()
    }

    /// When the event happens, falling back to when the record was created.
    pub fn anchor_time(&self) -> &str {
        self.event_time
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(&self.created_at)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ChannelInfo {
    pub name: String,
    pub subs: Option<String>,
    pub avatar: Option<String>,
}

/// Locally persisted preferences: display name, city, and the set of selected
/// interest keys. Replaced wholesale on every toggle and saved immediately.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub city: String,
    pub selected: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct AuthTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        let json = r#"{
            "id": "abc",
            "title": "Концерт в саду\nвторая строка",
            "description": "описание",
            "channel": "@msk_events",
            "message_id": 42,
            "event_time": "2026-03-15T19:00:00",
            "media_urls": ["/media/a.jpg", "https://x/b.mp4"],
            "location": "Москва",
            "price": "500₽",
            "category": null,
            "source_link": "https://t.me/msk_events/42",
            "created_at": "2026-03-01T10:00:00"
        }"#;
        let card: EventCard = serde_json::from_str(json).expect("parse event card");
        assert_eq!(card.id, "abc");
        assert_eq!(card.message_id, 42);
        assert_eq!(card.media_urls.len(), 2);
        assert_eq!(card.headline(), "Концерт в саду");
        assert_eq!(card.anchor_time(), "2026-03-15T19:00:00");
    }

    #[test]
    fn tolerates_missing_and_unknown_fields() {
        let json = r#"{"id": "x", "unknown_field": {"nested": true}}"#;
        let card: EventCard = serde_json::from_str(json).expect("sparse record should parse");
        assert_eq!(card.id, "x");
        assert_eq!(card.message_id, 0);
        assert!(card.media_urls.is_empty());
        assert!(card.description.is_none());
    }

    #[test]
    fn headline_falls_back_to_description_then_placeholder() {
        let card = EventCard {
            title: "\n  \n".to_string(),
            description: Some("\nВыставка\nподробности".to_string()),
            ..EventCard::default()
        };
        assert_eq!(card.headline(), "Выставка");

        let blank = EventCard::default();
        assert_eq!(blank.headline(), "Событие");
    }

    #[test]
    fn anchor_time_ignores_blank_event_time() {
        let card = EventCard {
            event_time: Some("  ".to_string()),
            created_at: "2026-01-01T00:00:00".to_string(),
            ..EventCard::default()
        };
        assert_eq!(card.anchor_time(), "2026-01-01T00:00:00");
    }

    #[test]
    fn channel_info_avatar_is_nullable() {
        let json = r#"[{"name": "@greenfashionmsk", "subs": "12K", "avatar": null}]"#;
        let channels: Vec<ChannelInfo> = serde_json::from_str(json).expect("parse channels");
        assert_eq!(channels[0].name, "@greenfashionmsk");
        assert!(channels[0].avatar.is_none());
    }
}
