//! App form shared by the add and edit panels

use eframe::egui::{self, ComboBox, TextEdit, Ui};
use nebula_shared::AppKind;
use nebula_shared::constants::MAX_ADDITIONAL_CATEGORIES;

use crate::controller::{AppDraft, DraftEdit};

/// Draws the form for `draft` and returns the field the user changed.
///
/// `id` keeps widget ids apart when more than one form could be shown.
pub fn draft_form(ui: &mut Ui, id: &str, draft: &AppDraft) -> Option<DraftEdit> {
    let mut edit = None;

    let mut kind = draft.kind();
    ComboBox::from_id_salt((id, "kind"))
        .selected_text(kind.label())
        .show_ui(ui, |ui| {
            for option in AppKind::ALL {
                ui.selectable_value(&mut kind, option, option.label());
            }
        });
    if kind != draft.kind() {
        edit = Some(DraftEdit::Kind(kind));
    }

    text_field(ui, "Название", &draft.name, DraftEdit::Name, &mut edit);
    multiline_field(
        ui,
        "Короткое описание (до 100 символов)",
        draft.short_description(),
        DraftEdit::ShortDescription,
        &mut edit,
    );
    multiline_field(
        ui,
        "Полное описание",
        &draft.long_description,
        DraftEdit::LongDescription,
        &mut edit,
    );
    text_field(ui, "URL аватарки", &draft.icon, DraftEdit::Icon, &mut edit);
    text_field(ui, "URL баннера (опционально)", &draft.banner, DraftEdit::Banner, &mut edit);
    text_field(
        ui,
        "URL скриншотов (через запятую)",
        &draft.gallery,
        DraftEdit::Gallery,
        &mut edit,
    );
    text_field(ui, "URL видео (опционально)", &draft.video, DraftEdit::Video, &mut edit);

    ui.add_space(5.0);
    if let Some(change) = categories(ui, id, draft) {
        edit = Some(change);
    }
    ui.add_space(5.0);

    text_field(
        ui,
        "Платформы (через запятую)",
        &draft.platforms,
        DraftEdit::Platforms,
        &mut edit,
    );
    text_field(ui, "Возрастной рейтинг", &draft.age_rating, DraftEdit::AgeRating, &mut edit);
    text_field(ui, "Контакты для связи", &draft.contact_info, DraftEdit::ContactInfo, &mut edit);
    text_field(
        ui,
        "Ссылка на приложение (https://t.me/...)",
        &draft.link_app,
        DraftEdit::LinkApp,
        &mut edit,
    );

    flag(ui, "Внутриигровые покупки", draft.in_app_purchases, DraftEdit::InAppPurchases, &mut edit);
    flag(ui, "Поддержка TON кошелька", draft.supports_ton, DraftEdit::SupportsTon, &mut edit);
    flag(
        ui,
        "Поддержка Telegram Stars",
        draft.supports_telegram_stars,
        DraftEdit::SupportsTelegramStars,
        &mut edit,
    );

    edit
}

fn categories(ui: &mut Ui, id: &str, draft: &AppDraft) -> Option<DraftEdit> {
    let mut edit = None;
    let classification = draft.classification();
    let names = draft.kind().category_names();
    let primary = classification.primary_name();

    ComboBox::from_id_salt((id, "primary_category"))
        .selected_text(primary.unwrap_or("Выберите основную категорию"))
        .show_ui(ui, |ui| {
            if ui
                .selectable_label(primary.is_none(), "Выберите основную категорию")
                .clicked()
            {
                edit = Some(DraftEdit::PrimaryCategory(None));
            }
            for &name in &names {
                if ui.selectable_label(primary == Some(name), name).clicked() {
                    edit = Some(DraftEdit::PrimaryCategory(Some(name.to_string())));
                }
            }
        });

    ui.label(format!(
        "Дополнительные категории (до {})",
        MAX_ADDITIONAL_CATEGORIES
    ));
    let selected = classification.additional_names();
    ui.horizontal_wrapped(|ui| {
        for &name in &names {
            let mut checked = selected.contains(&name);
            if ui.checkbox(&mut checked, name).changed() {
                let next: Vec<String> = if checked {
                    selected
                        .iter()
                        .copied()
                        .chain(std::iter::once(name))
                        .map(str::to_string)
                        .collect()
                } else {
                    selected
                        .iter()
                        .copied()
                        .filter(|&n| n != name)
                        .map(str::to_string)
                        .collect()
                };
                edit = Some(DraftEdit::AdditionalCategories(next));
            }
        }
    });

    edit
}

fn text_field(
    ui: &mut Ui,
    hint: &str,
    value: &str,
    to_edit: fn(String) -> DraftEdit,
    edit: &mut Option<DraftEdit>,
) {
    let mut text = value.to_string();
    let response = ui.add(
        TextEdit::singleline(&mut text)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        *edit = Some(to_edit(text));
    }
}

fn multiline_field(
    ui: &mut Ui,
    hint: &str,
    value: &str,
    to_edit: fn(String) -> DraftEdit,
    edit: &mut Option<DraftEdit>,
) {
    let mut text = value.to_string();
    let response = ui.add(
        TextEdit::multiline(&mut text)
            .hint_text(hint)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        *edit = Some(to_edit(text));
    }
}

fn flag(
    ui: &mut Ui,
    label: &str,
    value: bool,
    to_edit: fn(bool) -> DraftEdit,
    edit: &mut Option<DraftEdit>,
) {
    let mut checked = value;
    if ui.checkbox(&mut checked, label).changed() {
        *edit = Some(to_edit(checked));
    }
}

/// Renders a submit button that is disabled while `busy`.
pub fn submit_button(ui: &mut Ui, label: &str, busy: bool) -> bool {
    let clicked = ui
        .add_enabled(!busy, egui::Button::new(label))
        .clicked();
    if busy {
        ui.spinner();
    }
    clicked
}
