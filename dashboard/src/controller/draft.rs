//! Client-side form state for new and edited apps
//!
//! A draft never reaches the developer's app list by itself; only the
//! server's response to a create or update does. Every change goes through
//! [`AppDraft::apply`], which keeps the form invariants:
//! - the short description is cut to [`SHORT_DESCRIPTION_MAX_CHARS`]
//! - at most [`MAX_ADDITIONAL_CATEGORIES`] additional categories, also when
//!   prefilled from a server app
//! - switching kind clears the category selection

use nebula_shared::constants::{MAX_ADDITIONAL_CATEGORIES, SHORT_DESCRIPTION_MAX_CHARS};
use nebula_shared::{App, AppKind, AppSubmission, Classification};

/// One field change coming from the form.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Kind(AppKind),
    Name(String),
    ShortDescription(String),
    LongDescription(String),
    Icon(String),
    Banner(String),
    /// Comma-separated screenshot URLs
    Gallery(String),
    Video(String),
    /// `None` or a blank name clears the primary category
    PrimaryCategory(Option<String>),
    /// Full new selection of additional categories
    AdditionalCategories(Vec<String>),
    /// Comma-separated platform names
    Platforms(String),
    AgeRating(String),
    InAppPurchases(bool),
    SupportsTon(bool),
    SupportsTelegramStars(bool),
    ContactInfo(String),
    LinkApp(String),
}

/// An app being created or edited.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppDraft {
    classification: Classification,
    short_description: String,
    pub name: String,
    pub long_description: String,
    pub icon: String,
    pub banner: String,
    /// Screenshot URLs as typed, comma-separated
    pub gallery: String,
    pub video: String,
    /// Platform names as typed, comma-separated
    pub platforms: String,
    pub age_rating: String,
    pub in_app_purchases: bool,
    pub supports_ton: bool,
    pub supports_telegram_stars: bool,
    pub contact_info: String,
    pub link_app: String,
}

impl AppDraft {
    /// Prefill a draft from an existing app.
    pub fn from_app(app: &App) -> Self {
        Self {
            classification: app.classification.within_limit(),
            short_description: truncate_chars(&app.short_description, SHORT_DESCRIPTION_MAX_CHARS),
            name: app.name.clone(),
            long_description: app.long_description.clone().unwrap_or_default(),
            icon: app.icon.clone(),
            banner: app.banner.clone().unwrap_or_default(),
            gallery: join_list(&app.gallery),
            video: app.video.clone().unwrap_or_default(),
            platforms: join_list(&app.platforms),
            age_rating: app.age_rating.clone(),
            in_app_purchases: app.in_app_purchases,
            supports_ton: app.supports_ton,
            supports_telegram_stars: app.supports_telegram_stars,
            contact_info: app.contact_info.clone(),
            link_app: app.link_app.clone().unwrap_or_default(),
        }
    }

    pub fn kind(&self) -> AppKind {
        self.classification.kind()
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    /// Apply one field change.
    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Kind(kind) => {
                if kind != self.kind() {
                    self.classification = Classification::empty(kind);
                }
            }
            DraftEdit::Name(name) => self.name = name,
            DraftEdit::ShortDescription(text) => {
                self.short_description = truncate_chars(&text, SHORT_DESCRIPTION_MAX_CHARS);
            }
            DraftEdit::LongDescription(text) => self.long_description = text,
            DraftEdit::Icon(url) => self.icon = url,
            DraftEdit::Banner(url) => self.banner = url,
            DraftEdit::Gallery(text) => self.gallery = text,
            DraftEdit::Video(url) => self.video = url,
            DraftEdit::PrimaryCategory(name) => {
                if let Err(e) = self.classification.set_primary_name(name.as_deref()) {
                    tracing::debug!("Ignoring primary category: {}", e);
                }
            }
            DraftEdit::AdditionalCategories(names) => {
                match self.classification.select_additional_names(&names) {
                    Ok(true) => {}
                    Ok(false) => tracing::debug!(
                        "Ignoring selection of {} additional categories (max {})",
                        names.len(),
                        MAX_ADDITIONAL_CATEGORIES
                    ),
                    Err(e) => tracing::debug!("Ignoring additional categories: {}", e),
                }
            }
            DraftEdit::Platforms(text) => self.platforms = text,
            DraftEdit::AgeRating(text) => self.age_rating = text,
            DraftEdit::InAppPurchases(value) => self.in_app_purchases = value,
            DraftEdit::SupportsTon(value) => self.supports_ton = value,
            DraftEdit::SupportsTelegramStars(value) => self.supports_telegram_stars = value,
            DraftEdit::ContactInfo(text) => self.contact_info = text,
            DraftEdit::LinkApp(url) => self.link_app = url,
        }
    }

    /// Request body for this draft.
    ///
    /// Blank optional fields are left out and blank list entries dropped.
    pub fn to_submission(&self) -> AppSubmission {
        AppSubmission {
            classification: self.classification.clone(),
            name: self.name.trim().to_string(),
            short_description: self.short_description.clone(),
            long_description: non_blank(&self.long_description),
            icon: self.icon.trim().to_string(),
            banner: non_blank(&self.banner),
            gallery: split_list(&self.gallery),
            video: non_blank(&self.video),
            platforms: split_list(&self.platforms),
            age_rating: self.age_rating.trim().to_string(),
            in_app_purchases: self.in_app_purchases,
            supports_ton: self.supports_ton,
            supports_telegram_stars: self.supports_telegram_stars,
            contact_info: self.contact_info.trim().to_string(),
            link_app: non_blank(&self.link_app),
        }
    }
}

/// An edit in progress for one of the developer's apps.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub app_id: String,
    pub draft: AppDraft,
}

impl EditSession {
    pub fn from_app(app: &App) -> Self {
        Self {
            app_id: app.id.clone(),
            draft: AppDraft::from_app(app),
        }
    }
}

/// Split comma-separated input into trimmed, non-blank entries.
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Text-field form of a list, for prefilling from a server app.
fn join_list(items: &[String]) -> String {
    items.join(", ")
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
