//! One panel per dashboard tab

use eframe::egui::{self, ComboBox, Ui};
use nebula_shared::{PromotionDuration, PromotionPlacement};

use super::{DashboardUi, UiAction, form};
use crate::controller::Dashboard;
use crate::view::{self, Card};

fn card_lines(ui: &mut Ui, card: &Card) {
    for line in &card.lines {
        ui.horizontal_wrapped(|ui| {
            ui.strong(format!("{}:", line.label));
            ui.label(line.value.as_str());
        });
    }
}

pub fn profile(ui: &mut Ui, dashboard: &Dashboard) -> Option<UiAction> {
    let developer = dashboard.developer()?;
    let mut action = None;
    let card = view::profile_card(developer);

    ui.heading(card.title.as_str());
    ui.add_space(10.0);
    ui.group(|ui| {
        card_lines(ui, &card);
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui.button("Связаться с администрацией").clicked() {
                action = Some(UiAction::ContactAdmin);
            }
            if ui.button("Обновить").clicked() {
                action = Some(UiAction::Refresh);
            }
        });
    });

    action
}

pub fn add(ui: &mut Ui, dashboard: &Dashboard) -> Option<UiAction> {
    let mut action = None;

    ui.heading("Добавить приложение");
    ui.add_space(10.0);
    ui.group(|ui| {
        if let Some(edit) = form::draft_form(ui, "new_app", dashboard.new_app()) {
            action = Some(UiAction::EditNewApp(edit));
        }
        ui.add_space(10.0);
        let busy = dashboard.in_flight().creating > 0;
        if form::submit_button(ui, "Добавить приложение", busy) {
            action = Some(UiAction::SubmitNewApp);
        }
    });

    action
}

pub fn edit(ui: &mut Ui, dashboard: &Dashboard) -> Option<UiAction> {
    let developer = dashboard.developer()?;
    let mut action = None;

    ui.heading("Редактор приложений");
    ui.add_space(10.0);

    if developer.apps.is_empty() {
        ui.label("У вас пока нет приложений.");
    }

    let editing_id = dashboard.editing().map(|session| session.app_id.as_str());
    for app_card in view::edit_cards(developer) {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(&app_card.card.title).strong().size(16.0));
            card_lines(ui, &app_card.card);
            let is_editing = editing_id == Some(app_card.app_id.as_str());
            if ui
                .add_enabled(!is_editing, egui::Button::new("Редактировать"))
                .clicked()
            {
                action = Some(UiAction::BeginEdit(app_card.app_id.clone()));
            }
        });
        ui.add_space(5.0);
    }

    if let Some(session) = dashboard.editing() {
        ui.separator();
        ui.heading("Редактировать приложение");
        ui.add_space(10.0);
        ui.group(|ui| {
            if let Some(edit) = form::draft_form(ui, "edit_app", &session.draft) {
                action = Some(UiAction::EditExisting(edit));
            }
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let busy = dashboard.in_flight().updating > 0;
                if form::submit_button(ui, "Сохранить изменения", busy) {
                    action = Some(UiAction::SubmitEdit);
                }
                if ui.button("Отмена").clicked() {
                    action = Some(UiAction::CancelEdit);
                }
            });
        });
    }

    action
}

pub fn stats(ui: &mut Ui, dashboard: &Dashboard) {
    ui.heading("Статистика");
    ui.add_space(10.0);

    let cards = view::stats_cards(dashboard.stats());
    if cards.is_empty() {
        ui.label("Статистика пока недоступна.");
    }
    for card in &cards {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(&card.title).strong().size(16.0));
            card_lines(ui, card);
        });
        ui.add_space(5.0);
    }
}

pub fn services(
    ui: &mut Ui,
    dashboard: &Dashboard,
    state: &mut DashboardUi,
) -> Option<UiAction> {
    let developer = dashboard.developer()?;
    let mut action = None;

    ui.heading("Услуги");
    ui.add_space(5.0);
    ui.colored_label(
        egui::Color32::YELLOW,
        view::promotion_notice(developer),
    );
    ui.add_space(10.0);

    let busy = dashboard.in_flight().promoting > 0;
    for app_card in view::service_cards(developer) {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(&app_card.card.title).strong().size(16.0));
            card_lines(ui, &app_card.card);

            for placement in PromotionPlacement::ALL {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(placement.label()).strong());
                let duration = state
                    .promotion_durations
                    .entry((app_card.app_id.clone(), placement))
                    .or_insert(PromotionDuration::ThreeDays);

                ui.horizontal(|ui| {
                    ComboBox::from_id_salt((app_card.app_id.as_str(), placement.label()))
                        .selected_text(duration.label())
                        .show_ui(ui, |ui| {
                            for option in PromotionDuration::ALL {
                                ui.selectable_value(duration, option, option.label());
                            }
                        });
                    if form::submit_button(ui, "Продвинуть", busy) {
                        action = Some(UiAction::Promote {
                            app_id: app_card.app_id.clone(),
                            placement,
                            duration: *duration,
                        });
                    }
                });
            }
        });
        ui.add_space(5.0);
    }

    action
}
