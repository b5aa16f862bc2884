use serde::{Deserialize, Serialize};

use crate::models::EventCard;

/// A named set of lowercase keyword substrings. An empty keyword set is the
/// universal filter and matches every event.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Filter {
    pub key: String,
    pub label: String,
    pub keywords: Vec<String>,
}

impl Filter {
    pub fn new(key: &str, label: &str, keywords: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            keywords: keywords.iter().map(|kw| kw.to_string()).collect(),
        }
    }

    pub fn matches(&self, event: &EventCard) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let haystack = format!(
            "{}\n{}\n{}",
            event.title,
            event.description.as_deref().unwrap_or(""),
            event.channel
        )
        .to_lowercase();
        self.keywords.iter().any(|kw| haystack.contains(kw.as_str()))
    }
}

/// Every category with at least one keyword hit. Membership is not exclusive:
/// an event may land in zero, one, or several categories.
pub fn matched_categories<'a>(event: &EventCard, categories: &'a [Filter]) -> Vec<&'a Filter> {
    categories
        .iter()
        .filter(|category| !category.keywords.is_empty() && category.matches(event))
        .collect()
}

/// The feed filter row. Hand-tuned keyword lists with no server-side source of
/// truth; callers may substitute their own taxonomy anywhere a `&[Filter]` is
/// accepted.
pub fn default_filters() -> Vec<Filter> {
    vec![
        Filter::new("all", "Все", &[]),
        Filter::new("concerts", "Концерты", &["концерт", "gig", "live", "выступ", "музы"]),
        Filter::new("theatre", "Театр", &["театр", "спектакл", "пьеса", "постановк"]),
        Filter::new("party", "Вечеринки", &["вечерин", "rave", "dj", "техно", "house"]),
        Filter::new("exhibition", "Выставки", &["выстав", "экспоз", "галере", "арт", "art"]),
        Filter::new("lecture", "Лекции", &["лекц", "talk", "meetup", "воркшоп", "workshop"]),
    ]
}

/// Interest categories offered on the profile screens; the selected keys are
/// what `UserProfile::selected` stores.
pub fn interest_categories() -> Vec<Filter> {
    vec![
        Filter::new(
            "upcycle",
            "Upcycle одежда",
            &["upcycle", "апсайкл", "переработк", "second hand"],
        ),
        Filter::new(
            "fairs",
            "Фэры и маркеты",
            &["фэр", "маркет", "ярмарк", "блошинг", "fleamarket"],
        ),
        Filter::new(
            "niche",
            "Нишевые бренды",
            &["sustainable", "эко", "локальн", "handmade"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, description: Option<&str>, channel: &str) -> EventCard {
        EventCard {
            id: "e1".to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            channel: channel.to_string(),
            created_at: "2026-03-01T10:00:00".to_string(),
            ..EventCard::default()
        }
    }

    #[test]
    fn empty_keyword_set_matches_everything() {
        let all = Filter::new("all", "Все", &[]);
        assert!(all.matches(&event("anything", None, "@ch")));
        assert!(all.matches(&EventCard::default()));
    }

    #[test]
    fn matching_is_case_insensitive_for_cyrillic() {
        let concerts = Filter::new("concerts", "Концерты", &["концерт"]);
        assert!(concerts.matches(&event("БОЛЬШОЙ КОНЦЕРТ В ПАРКЕ", None, "@ch")));
    }

    #[test]
    fn matching_is_substring_not_word_boundary() {
        let party = Filter::new("party", "Вечеринки", &["house"]);
        assert!(party.matches(&event("Warehouse opening", None, "@ch")));
    }

    #[test]
    fn matches_across_title_description_and_channel() {
        let filter = Filter::new("f", "F", &["техно"]);
        assert!(filter.matches(&event("заголовок", Some("Техно вечер"), "@ch")));
        assert!(filter.matches(&event("заголовок", None, "@техно_мск")));
        assert!(!filter.matches(&event("заголовок", None, "@ch")));
    }

    #[test]
    fn categorization_allows_multiple_memberships() {
        let categories = default_filters();
        let card = event("Арт-вечеринка с DJ", Some("выставка и рейв"), "@msk");
        let matched = matched_categories(&card, &categories);
        let keys: Vec<&str> = matched.iter().map(|f| f.key.as_str()).collect();
        assert!(keys.contains(&"party"));
        assert!(keys.contains(&"exhibition"));
        // the universal filter is not a category
        assert!(!keys.contains(&"all"));
    }

    #[test]
    fn categorization_may_match_nothing() {
        let categories = default_filters();
        let card = event("Просто объявление", None, "@misc");
        assert!(matched_categories(&card, &categories).is_empty());
    }
}
