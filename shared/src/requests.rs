//! API request and response bodies.

use serde::{Deserialize, Serialize};

use crate::categories::Classification;

/// Body of `POST /apps` and `PATCH /apps/{appId}`.
///
/// Only the classification fields of the chosen kind exist, and blank
/// optional values are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSubmission {
    #[serde(flatten)]
    pub classification: Classification,
    pub name: String,
    pub short_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub age_rating: String,
    pub in_app_purchases: bool,
    #[serde(rename = "supportsTON")]
    pub supports_ton: bool,
    pub supports_telegram_stars: bool,
    pub contact_info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_app: Option<String>,
}

/// Where a promotion lifts the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionPlacement {
    /// Top of the whole catalog.
    Catalog,
    /// Top of the app's primary category.
    Category,
}

impl PromotionPlacement {
    pub const ALL: [PromotionPlacement; 2] =
        [PromotionPlacement::Catalog, PromotionPlacement::Category];

    pub fn label(&self) -> &'static str {
        match self {
            PromotionPlacement::Catalog => "Продвижение в каталоге",
            PromotionPlacement::Category => "Продвижение в категории",
        }
    }
}

/// Length of a paid promotion. Serialized as the number of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum PromotionDuration {
    ThreeDays,
    FourteenDays,
    ThirtyDays,
}

impl PromotionDuration {
    pub const ALL: [PromotionDuration; 3] = [
        PromotionDuration::ThreeDays,
        PromotionDuration::FourteenDays,
        PromotionDuration::ThirtyDays,
    ];

    pub fn days(&self) -> u16 {
        match self {
            PromotionDuration::ThreeDays => 3,
            PromotionDuration::FourteenDays => 14,
            PromotionDuration::ThirtyDays => 30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromotionDuration::ThreeDays => "3 дня",
            PromotionDuration::FourteenDays => "14 дней",
            PromotionDuration::ThirtyDays => "30 дней",
        }
    }
}

impl From<PromotionDuration> for u16 {
    fn from(duration: PromotionDuration) -> Self {
        duration.days()
    }
}

impl TryFrom<u16> for PromotionDuration {
    type Error = String;

    fn try_from(days: u16) -> Result<Self, Self::Error> {
        PromotionDuration::ALL
            .into_iter()
            .find(|d| d.days() == days)
            .ok_or_else(|| format!("unsupported promotion duration: {} days", days))
    }
}

/// Body of `POST /promote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteRequest {
    pub app_id: String,
    #[serde(rename = "type")]
    pub placement: PromotionPlacement,
    pub duration: PromotionDuration,
}

/// Confirmation returned after a promotion is charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoteResponse {
    /// Message to show the developer verbatim.
    pub message: String,
}
