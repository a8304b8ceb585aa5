//! Catalog categories and the kind-keyed classification of an app.
//!
//! Games and apps draw from disjoint category lists. [`Classification`] is a
//! tagged union keyed by the `type` field, so a game can never carry an app
//! category (and vice versa). On the wire both kinds use the unified
//! `category` / `additionalCategories` fields:
//!
//! ```json
//! { "type": "game", "category": "Arcade", "additionalCategories": ["Race"] }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_ADDITIONAL_CATEGORIES;

/// Whether a catalog entry is a game or an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    #[default]
    Game,
    App,
}

impl AppKind {
    /// Every kind, in display order.
    pub const ALL: [AppKind; 2] = [AppKind::Game, AppKind::App];

    /// Wire name (`"game"` or `"app"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            AppKind::Game => "game",
            AppKind::App => "app",
        }
    }

    /// Label shown in the kind selector.
    pub fn label(&self) -> &'static str {
        match self {
            AppKind::Game => "Игра",
            AppKind::App => "Приложение",
        }
    }

    /// Names of the categories available for this kind.
    pub fn category_names(&self) -> Vec<&'static str> {
        match self {
            AppKind::Game => GameCategory::ALL.iter().map(|c| c.as_str()).collect(),
            AppKind::App => AppCategory::ALL.iter().map(|c| c.as_str()).collect(),
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category name that does not exist for the given kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} category '{name}'")]
pub struct UnknownCategory {
    pub kind: AppKind,
    pub name: String,
}

/// A category enum belonging to one [`AppKind`].
pub trait Category:
    Copy + Eq + fmt::Debug + FromStr<Err = UnknownCategory> + 'static
{
    /// Kind this category list belongs to.
    const KIND: AppKind;
    /// Every category, in display order.
    const ALL: &'static [Self];

    /// Wire and display name.
    fn as_str(&self) -> &'static str;
}

fn parse_category<C: Category>(name: &str) -> Result<C, UnknownCategory> {
    C::ALL
        .iter()
        .copied()
        .find(|c| c.as_str() == name)
        .ok_or_else(|| UnknownCategory {
            kind: C::KIND,
            name: name.to_string(),
        })
}

/// Categories for games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameCategory {
    Arcade,
    Sport,
    Card,
    Race,
}

impl Category for GameCategory {
    const KIND: AppKind = AppKind::Game;
    const ALL: &'static [Self] = &[Self::Arcade, Self::Sport, Self::Card, Self::Race];

    fn as_str(&self) -> &'static str {
        match self {
            GameCategory::Arcade => "Arcade",
            GameCategory::Sport => "Sport",
            GameCategory::Card => "Card",
            GameCategory::Race => "Race",
        }
    }
}

impl FromStr for GameCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s)
    }
}

/// Categories for (non-game) apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppCategory {
    Useful,
    Business,
    Personal,
    Simple,
}

impl Category for AppCategory {
    const KIND: AppKind = AppKind::App;
    const ALL: &'static [Self] = &[Self::Useful, Self::Business, Self::Personal, Self::Simple];

    fn as_str(&self) -> &'static str {
        match self {
            AppCategory::Useful => "Useful",
            AppCategory::Business => "Business",
            AppCategory::Personal => "Personal",
            AppCategory::Simple => "Simple",
        }
    }
}

impl FromStr for AppCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s)
    }
}

/// Primary category plus up to [`MAX_ADDITIONAL_CATEGORIES`] additional ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "C: Category + Deserialize<'de>"))]
pub struct CategorySelection<C> {
    /// Primary category; blank or unknown on the wire means "not chosen".
    #[serde(
        rename = "category",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary: Option<C>,
    /// Unknown names are dropped; `null` reads as empty.
    #[serde(
        rename = "additionalCategories",
        default,
        deserialize_with = "known_categories"
    )]
    additional: Vec<C>,
}

impl<C> Default for CategorySelection<C> {
    fn default() -> Self {
        Self {
            primary: None,
            additional: Vec::new(),
        }
    }
}

impl<C: Category> CategorySelection<C> {
    /// Additional categories in selection order.
    pub fn additional(&self) -> &[C] {
        &self.additional
    }

    /// Replace the additional categories.
    ///
    /// Duplicates are collapsed. A selection larger than
    /// [`MAX_ADDITIONAL_CATEGORIES`] is rejected as a whole and the previous
    /// selection stays in place; returns whether the selection was applied.
    pub fn select_additional(&mut self, selected: &[C]) -> bool {
        let mut deduped: Vec<C> = Vec::with_capacity(selected.len());
        for category in selected {
            if !deduped.contains(category) {
                deduped.push(*category);
            }
        }
        if deduped.len() > MAX_ADDITIONAL_CATEGORIES {
            return false;
        }
        self.additional = deduped;
        true
    }

    fn truncate_additional(&mut self) {
        self.additional.truncate(MAX_ADDITIONAL_CATEGORIES);
    }

    fn set_primary_name(&mut self, name: Option<&str>) -> Result<(), UnknownCategory> {
        self.primary = match name.map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(name.parse()?),
        };
        Ok(())
    }

    fn select_additional_names<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<bool, UnknownCategory> {
        let parsed = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<C>, _>>()?;
        Ok(self.select_additional(&parsed))
    }
}

fn blank_as_none<'de, D, C>(deserializer: D) -> Result<Option<C>, D::Error>
where
    D: Deserializer<'de>,
    C: Category,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(name) => known(name),
    })
}

fn known_categories<'de, D, C>(deserializer: D) -> Result<Vec<C>, D::Error>
where
    D: Deserializer<'de>,
    C: Category,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    let mut categories = Vec::new();
    for category in raw.iter().flatten().filter_map(|name| known::<C>(name.trim())) {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(categories)
}

/// Server data may carry names from older category lists; those are skipped
/// so one stale app cannot fail the whole developer record.
fn known<C: Category>(name: &str) -> Option<C> {
    match name.parse() {
        Ok(category) => Some(category),
        Err(e) => {
            tracing::warn!("Skipping category from server: {}", e);
            None
        }
    }
}

/// Kind of a catalog entry together with its category selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Classification {
    Game(CategorySelection<GameCategory>),
    App(CategorySelection<AppCategory>),
}

impl Default for Classification {
    fn default() -> Self {
        Self::empty(AppKind::default())
    }
}

impl Classification {
    /// A classification of the given kind with nothing selected.
    pub fn empty(kind: AppKind) -> Self {
        match kind {
            AppKind::Game => Classification::Game(CategorySelection::default()),
            AppKind::App => Classification::App(CategorySelection::default()),
        }
    }

    pub fn kind(&self) -> AppKind {
        match self {
            Classification::Game(_) => AppKind::Game,
            Classification::App(_) => AppKind::App,
        }
    }

    /// Name of the primary category, if one is chosen.
    pub fn primary_name(&self) -> Option<&'static str> {
        match self {
            Classification::Game(s) => s.primary.map(|c| c.as_str()),
            Classification::App(s) => s.primary.map(|c| c.as_str()),
        }
    }

    /// Names of the additional categories.
    pub fn additional_names(&self) -> Vec<&'static str> {
        match self {
            Classification::Game(s) => s.additional().iter().map(|c| c.as_str()).collect(),
            Classification::App(s) => s.additional().iter().map(|c| c.as_str()).collect(),
        }
    }

    /// Set (or clear, with `None` or a blank name) the primary category.
    pub fn set_primary_name(&mut self, name: Option<&str>) -> Result<(), UnknownCategory> {
        match self {
            Classification::Game(s) => s.set_primary_name(name),
            Classification::App(s) => s.set_primary_name(name),
        }
    }

    /// Copy with the additional categories cut to
    /// [`MAX_ADDITIONAL_CATEGORIES`], keeping the first ones.
    pub fn within_limit(&self) -> Self {
        let mut limited = self.clone();
        match &mut limited {
            Classification::Game(s) => s.truncate_additional(),
            Classification::App(s) => s.truncate_additional(),
        }
        limited
    }

    /// Replace the additional categories by name.
    ///
    /// Returns `Ok(false)` when the selection exceeds the limit and was
    /// ignored.
    pub fn select_additional_names<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<bool, UnknownCategory> {
        match self {
            Classification::Game(s) => s.select_additional_names(names),
            Classification::App(s) => s.select_additional_names(names),
        }
    }
}
