//! Projection of dashboard state into what is on screen
//!
//! Everything here is pure: the egui layer in [`crate::ui`] draws these
//! values and never reads controller state for text of its own.

use std::fmt;

use nebula_shared::{App, Developer, PromotionPlacement, Stat};

use crate::controller::{Dashboard, Phase, Tab};
use crate::format;

pub const UNAUTHENTICATED_MESSAGE: &str = "Это приложение должно быть запущено через Telegram.";
pub const NO_TELEGRAM_USER_MESSAGE: &str =
    "Не удалось определить пользователя Telegram. Откройте приложение заново из чата.";
pub const LOADING_MESSAGE: &str = "Загрузка...";

/// The single top-level screen to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Unauthenticated,
    LoadError(String),
    Loading,
    Tabs(Tab),
}

pub fn screen(dashboard: &Dashboard) -> Screen {
    match dashboard.phase() {
        Phase::Unauthenticated => Screen::Unauthenticated,
        Phase::LoadError(message) => Screen::LoadError(message.clone()),
        Phase::Loading => Screen::Loading,
        Phase::Ready => match dashboard.developer() {
            Some(_) => Screen::Tabs(dashboard.active_tab()),
            None => Screen::Loading,
        },
    }
}

/// Text for [`Screen::Unauthenticated`].
pub fn unauthenticated_message(dashboard: &Dashboard) -> &'static str {
    if dashboard.identity().is_telegram {
        NO_TELEGRAM_USER_MESSAGE
    } else {
        UNAUTHENTICATED_MESSAGE
    }
}

/// One `label: value` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub label: String,
    pub value: String,
}

impl Line {
    pub fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub lines: Vec<Line>,
}

impl Card {
    /// Value of the first line with `label`.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.value.as_str())
    }
}

/// A card about one of the developer's apps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCard {
    pub app_id: String,
    pub card: Card,
}

// =============================================================================
// Profile
// =============================================================================

pub fn profile_card(developer: &Developer) -> Card {
    Card {
        title: "Профиль разработчика".to_string(),
        lines: vec![
            Line::new("Дата регистрации", format::date(&developer.registration_date)),
            Line::new("Количество приложений", developer.apps.len()),
            Line::new("Баланс Stars", developer.stars_balance.unwrap_or(0)),
            Line::new("Реферальный код", &developer.referral_code),
        ],
    }
}

// =============================================================================
// Editor list
// =============================================================================

pub fn edit_cards(developer: &Developer) -> Vec<AppCard> {
    developer.apps.iter().map(edit_card).collect()
}

fn edit_card(app: &App) -> AppCard {
    let mut lines = vec![Line::new("Статус", app.status.label())];
    if let Some(reason) = app.rejection_reason.as_deref().filter(|r| !r.is_empty()) {
        lines.push(Line::new("Причина отклонения", reason));
    }
    lines.push(Line::new("Количество редакций", app.edit_count));

    AppCard {
        app_id: app.id.clone(),
        card: Card {
            title: format::title(&app.name),
            lines,
        },
    }
}

// =============================================================================
// Statistics
// =============================================================================

pub fn stats_cards(stats: &[Stat]) -> Vec<Card> {
    stats.iter().map(stats_card).collect()
}

fn stats_card(stat: &Stat) -> Card {
    let mut lines = vec![
        Line::new("Переходы", stat.clicks),
        Line::new("Stars", stat.telegram_stars),
        Line::new("Жалобы", stat.complaints),
        Line::new("Место в каталоге", format!("#{}", stat.catalog_rank)),
        Line::new("Место в основной категории", format!("#{}", stat.category_rank)),
    ];
    lines.extend(stat.additional_category_ranks.iter().map(|rank| {
        Line::new(format!("Место в {}", rank.category), format!("#{}", rank.rank))
    }));
    lines.push(Line::new("Платформы", format::list(&stat.platforms)));

    Card {
        title: format::title(&stat.name),
        lines,
    }
}

// =============================================================================
// Services
// =============================================================================

/// Warning shown above the promotion controls. The price is set and charged
/// by the server, so only the balance it is taken from is known here.
pub fn promotion_notice(developer: &Developer) -> String {
    format!(
        "Продвижение платное: стоимость в Stars зависит от срока и списывается с баланса (сейчас {}).",
        developer.stars_balance.unwrap_or(0)
    )
}

pub fn service_cards(developer: &Developer) -> Vec<AppCard> {
    developer.apps.iter().map(service_card).collect()
}

fn service_card(app: &App) -> AppCard {
    let lines = PromotionPlacement::ALL
        .iter()
        .filter_map(|&placement| {
            app.promotion(placement).map(|window| {
                Line::new(
                    placement.label(),
                    format!(
                        "с {} до {}",
                        format::date_time(window.start),
                        format::date_time(window.finish)
                    ),
                )
            })
        })
        .collect();

    AppCard {
        app_id: app.id.clone(),
        card: Card {
            title: format::title(&app.name),
            lines,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Completion, FetchPurpose, Outcome};
    use crate::identity::Identity;
    use serde_json::json;

    fn developer() -> Developer {
        serde_json::from_value(json!({
            "id": "42",
            "registrationDate": "2024-01-01",
            "starsBalance": 10,
            "referralCode": "R1",
            "apps": []
        }))
        .unwrap()
    }

    fn app(value: serde_json::Value) -> App {
        let mut base = json!({"id": "a", "type": "game", "name": "Bounce"});
        if let (Some(base), Some(extra)) = (base.as_object_mut(), value.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).unwrap()
    }

    // =============================================================
    // Screens
    // =============================================================

    #[test]
    fn test_screen_follows_phase() {
        let mut dashboard = Dashboard::new();
        assert_eq!(screen(&dashboard), Screen::Unauthenticated);

        let commands = dashboard.mount(Identity {
            user_id: "42".to_string(),
            is_telegram: true,
        });
        assert_eq!(screen(&dashboard), Screen::Loading);

        dashboard.complete(Completion {
            generation: commands[0].generation,
            outcome: Outcome::Developer {
                purpose: FetchPurpose::Initial,
                result: Ok(developer()),
            },
        });
        assert_eq!(screen(&dashboard), Screen::Tabs(Tab::Profile));
    }

    #[test]
    fn test_unauthenticated_message_depends_on_bridge() {
        let mut dashboard = Dashboard::new();
        dashboard.mount(Identity::guest());
        assert_eq!(unauthenticated_message(&dashboard), UNAUTHENTICATED_MESSAGE);

        dashboard.mount(Identity {
            user_id: "guest".to_string(),
            is_telegram: true,
        });
        assert_eq!(screen(&dashboard), Screen::Unauthenticated);
        assert_eq!(unauthenticated_message(&dashboard), NO_TELEGRAM_USER_MESSAGE);
    }

    // =============================================================
    // Cards
    // =============================================================

    #[test]
    fn test_profile_card() {
        let card = profile_card(&developer());
        let rendered: Vec<String> = card.lines.iter().map(ToString::to_string).collect();

        assert!(rendered.contains(&"Количество приложений: 0".to_string()));
        assert!(rendered.contains(&"Баланс Stars: 10".to_string()));
        assert!(rendered.contains(&"Реферальный код: R1".to_string()));
        assert_eq!(card.value("Дата регистрации"), Some("01.01.2024"));
    }

    #[test]
    fn test_profile_missing_balance_is_zero() {
        let mut developer = developer();
        developer.stars_balance = None;
        assert_eq!(profile_card(&developer).value("Баланс Stars"), Some("0"));
    }

    #[test]
    fn test_edit_card_shows_rejection_reason_only_when_present() {
        let rejected = app(json!({"status": "rejected", "rejectionReason": "Нет иконки", "editCount": 2}));
        let card = edit_card(&rejected).card;
        assert_eq!(card.value("Статус"), Some("Отклонено"));
        assert_eq!(card.value("Причина отклонения"), Some("Нет иконки"));
        assert_eq!(card.value("Количество редакций"), Some("2"));

        let pending = edit_card(&app(json!({}))).card;
        assert_eq!(pending.value("Статус"), Some("На модерации"));
        assert_eq!(pending.value("Причина отклонения"), None);
    }

    #[test]
    fn test_stats_card_ranks() {
        let stat: Stat = serde_json::from_value(json!({
            "appId": "a",
            "name": "Bounce",
            "clicks": 120,
            "catalogRank": 3,
            "categoryRank": 1,
            "additionalCategoryRanks": [{"category": "Race", "rank": 4}],
            "platforms": ["ios", "android"]
        }))
        .unwrap();
        let card = &stats_cards(&[stat])[0];

        assert_eq!(card.value("Переходы"), Some("120"));
        assert_eq!(card.value("Место в каталоге"), Some("#3"));
        assert_eq!(card.value("Место в Race"), Some("#4"));
        assert_eq!(card.value("Платформы"), Some("ios, android"));
    }

    #[test]
    fn test_service_card_lists_active_windows() {
        let promoted = app(json!({
            "startPromoCategory": "2025-01-01T00:00:00Z",
            "finishPromoCategory": "2025-01-04T00:00:00Z"
        }));
        let card = service_card(&promoted).card;

        assert_eq!(card.lines.len(), 1);
        assert_eq!(card.lines[0].label, "Продвижение в категории");
        assert!(card.lines[0].value.starts_with("с "));
        assert!(service_card(&app(json!({}))).card.lines.is_empty());
    }

    #[test]
    fn test_promotion_notice_shows_balance() {
        let notice = promotion_notice(&developer());
        assert!(notice.starts_with("Продвижение платное"));
        assert!(notice.contains("(сейчас 10)"));
    }
}
