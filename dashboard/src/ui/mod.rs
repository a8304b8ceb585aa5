//! egui dashboard UI
//!
//! Draws the screen chosen by [`crate::view::screen`] and reports what the
//! user did as a [`UiAction`]. Controller state is only ever read here.

mod form;
mod panels;

use std::collections::HashMap;

use eframe::egui;
use nebula_shared::{PromotionDuration, PromotionPlacement};

use crate::controller::{Dashboard, DraftEdit, NoticeKind, Tab};
use crate::view::{self, Screen};

/// The dashboard UI and its widget-only state.
pub struct DashboardUi {
    /// Duration picked in each promotion section, keyed by app and placement
    pub promotion_durations: HashMap<(String, PromotionPlacement), PromotionDuration>,
}

impl Default for DashboardUi {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardUi {
    pub fn new() -> Self {
        Self {
            promotion_durations: HashMap::new(),
        }
    }

    /// Renders the dashboard and returns the user's action for this frame, if any.
    pub fn show(&mut self, ctx: &egui::Context, dashboard: &Dashboard) -> Option<UiAction> {
        let mut action = None;
        let screen = view::screen(dashboard);

        if let Screen::Tabs(active) = screen {
            egui::TopBottomPanel::bottom("tab_bar").show(ctx, |ui| {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    for tab in Tab::ALL {
                        if ui.selectable_label(tab == active, tab.label()).clicked()
                            && tab != active
                        {
                            action = Some(UiAction::SelectTab(tab));
                        }
                    }
                });
                ui.add_space(4.0);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| match &screen {
            Screen::Unauthenticated => {
                ui.centered_and_justified(|ui| {
                    ui.label(view::unauthenticated_message(dashboard));
                });
            }
            Screen::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(view::LOADING_MESSAGE);
                });
            }
            Screen::LoadError(message) => {
                ui.colored_label(egui::Color32::LIGHT_RED, message.as_str());
                ui.add_space(10.0);
                if ui.button("Повторить").clicked() {
                    action = Some(UiAction::Retry);
                }
            }
            Screen::Tabs(tab) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let panel_action = match tab {
                        Tab::Profile => panels::profile(ui, dashboard),
                        Tab::Add => panels::add(ui, dashboard),
                        Tab::Edit => panels::edit(ui, dashboard),
                        Tab::Stats => {
                            panels::stats(ui, dashboard);
                            None
                        }
                        Tab::Services => panels::services(ui, dashboard, self),
                    };
                    if panel_action.is_some() {
                        action = panel_action;
                    }
                });
            }
        });

        if let Some(notice) = dashboard.notice() {
            let title = match notice.kind {
                NoticeKind::Info => "Готово",
                NoticeKind::Error => "Ошибка",
            };
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(notice.text.as_str());
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        action = Some(UiAction::DismissNotice);
                    }
                });
        }

        action
    }
}

/// Actions the user can trigger from the dashboard UI.
///
/// Returned by [`DashboardUi::show`] and handed to
/// [`Dashboard::handle`](crate::controller::Dashboard::handle).
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Switch to another tab
    SelectTab(Tab),
    /// Change a field of the new-app form
    EditNewApp(DraftEdit),
    /// Change a field of the app being edited
    EditExisting(DraftEdit),
    /// Send the new-app form
    SubmitNewApp,
    /// Open the edit form for the app with this id
    BeginEdit(String),
    /// Send the edit form
    SubmitEdit,
    /// Close the edit form without saving
    CancelEdit,
    /// Buy a promotion
    Promote {
        app_id: String,
        placement: PromotionPlacement,
        duration: PromotionDuration,
    },
    /// Re-fetch developer data and statistics
    Refresh,
    /// Retry the initial load after it failed
    Retry,
    /// Close the front notice
    DismissNotice,
    /// Open the administration contact link
    ContactAdmin,
}
