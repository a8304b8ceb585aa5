//! API response types for the developer catalog.

use serde::{Deserialize, Serialize};

use crate::categories::Classification;
use crate::requests::PromotionPlacement;

/// A developer account with every app they have submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    /// Telegram user id of the developer.
    #[serde(alias = "userId")]
    pub id: String,
    /// ISO 8601 date or timestamp of registration.
    pub registration_date: String,
    /// Telegram Stars available for paid services. Missing means zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars_balance: Option<u64>,
    /// Code other developers can use to register as a referral.
    #[serde(default)]
    pub referral_code: String,
    /// Submitted apps, in server order.
    #[serde(default)]
    pub apps: Vec<App>,
}

impl Developer {
    /// Find an app by id.
    pub fn app(&self, app_id: &str) -> Option<&App> {
        self.apps.iter().find(|app| app.id == app_id)
    }

    /// Insert a newly created app, or replace it if the id is already listed.
    ///
    /// Returns `true` when the list grew.
    pub fn upsert_app(&mut self, app: App) -> bool {
        match self.apps.iter_mut().find(|existing| existing.id == app.id) {
            Some(existing) => {
                *existing = app;
                false
            }
            None => {
                self.apps.push(app);
                true
            }
        }
    }

    /// Replace the app with the same id. Other entries are left untouched.
    ///
    /// Returns `false` if no app with that id exists.
    pub fn replace_app(&mut self, app: App) -> bool {
        match self.apps.iter_mut().find(|existing| existing.id == app.id) {
            Some(existing) => {
                *existing = app;
                true
            }
            None => false,
        }
    }
}

/// Moderation lifecycle of a submitted app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModerationStatus {
    /// Approved and listed in the catalog.
    Added,
    /// Waiting for a moderator. New and edited apps start here.
    #[default]
    OnModeration,
    /// Rejected; see the app's rejection reason.
    Rejected,
}

impl ModerationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ModerationStatus::Added => "Опубликовано",
            ModerationStatus::OnModeration => "На модерации",
            ModerationStatus::Rejected => "Отклонено",
        }
    }
}

/// An app or game listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    /// Server-assigned identifier.
    pub id: String,
    /// Kind plus category selection (`type`, `category`, `additionalCategories`).
    #[serde(flatten)]
    pub classification: Classification,
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    /// Icon image URL.
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    /// Screenshot URLs.
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_id: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub age_rating: String,
    #[serde(default)]
    pub in_app_purchases: bool,
    #[serde(default, rename = "supportsTON")]
    pub supports_ton: bool,
    #[serde(default)]
    pub supports_telegram_stars: bool,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default)]
    pub status: ModerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Telegram link that opens the app (`https://t.me/...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_promo_catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_promo_catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_promo_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_promo_category: Option<String>,
    /// How many times the app has been edited since submission.
    #[serde(default)]
    pub edit_count: u32,
}

/// A running or past promotion, as ISO 8601 start and finish timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionWindow<'a> {
    pub start: &'a str,
    pub finish: &'a str,
}

impl App {
    /// Promotion window for a placement, if the server reports both ends.
    pub fn promotion(&self, placement: PromotionPlacement) -> Option<PromotionWindow<'_>> {
        let (start, finish) = match placement {
            PromotionPlacement::Catalog => (&self.start_promo_catalog, &self.finish_promo_catalog),
            PromotionPlacement::Category => {
                (&self.start_promo_category, &self.finish_promo_category)
            }
        };
        match (start.as_deref(), finish.as_deref()) {
            (Some(start), Some(finish)) if !start.is_empty() && !finish.is_empty() => {
                Some(PromotionWindow { start, finish })
            }
            _ => None,
        }
    }
}

/// Rank of an app inside one of its additional categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRank {
    pub category: String,
    pub rank: u32,
}

/// Performance counters for one app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub app_id: String,
    pub name: String,
    /// Times users opened the app from the catalog.
    #[serde(default)]
    pub clicks: u64,
    /// Stars earned through the app.
    #[serde(default)]
    pub telegram_stars: u64,
    #[serde(default)]
    pub complaints: u64,
    #[serde(default)]
    pub catalog_rank: u32,
    #[serde(default)]
    pub category_rank: u32,
    #[serde(default)]
    pub additional_category_ranks: Vec<CategoryRank>,
    #[serde(default)]
    pub platforms: Vec<String>,
}
