//! Controller, executor and client together against an in-process server

mod common;

use axum::http::StatusCode;
use common::{MockCatalog, developer_json, drive};
use nebula_dashboard::controller::{Dashboard, DraftEdit, NoticeKind, Phase, Tab};
use nebula_dashboard::identity::{IdentityProvider, LaunchParams};
use nebula_dashboard::ui::UiAction;
use nebula_dashboard::view::{self, Screen};
use nebula_shared::{ModerationStatus, PromotionDuration, PromotionPlacement};
use serde_json::json;

const INIT_DATA: &str = "user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Ann%22%7D&auth_date=1700000000&hash=abc";

/// Dashboard mounted through launch data, with both mount requests done.
fn mounted(mock: &MockCatalog) -> (Dashboard, nebula_dashboard::app::Executor) {
    let executor = mock.executor();
    let mut provider = IdentityProvider::new(LaunchParams::from_raw(Some(INIT_DATA)));
    let identity = provider.evaluate().unwrap();

    let mut dashboard = Dashboard::new();
    let commands = dashboard.set_identity(identity);
    drive(&mut dashboard, &executor, commands);
    (dashboard, executor)
}

#[test]
fn test_mount_shows_profile() {
    let mock = MockCatalog::start(Some(developer_json(json!([]))));
    let (dashboard, _executor) = mounted(&mock);

    assert_eq!(view::screen(&dashboard), Screen::Tabs(Tab::Profile));
    let card = view::profile_card(dashboard.developer().unwrap());
    let lines: Vec<String> = card.lines.iter().map(ToString::to_string).collect();
    assert!(lines.contains(&"Количество приложений: 0".to_string()));
    assert!(lines.contains(&"Баланс Stars: 10".to_string()));

    let mut requests = mock.state.requests();
    requests.sort();
    assert_eq!(
        requests,
        vec!["GET /api/developer/42", "GET /api/developer/42/stats"]
    );
}

#[test]
fn test_guest_makes_no_requests() {
    let mock = MockCatalog::start(Some(developer_json(json!([]))));
    let mut provider = IdentityProvider::new(LaunchParams::absent());
    assert!(provider.evaluate().is_none());
    assert!(provider.bridge_loaded().is_none());

    let mut dashboard = Dashboard::new();
    assert!(dashboard.set_identity(provider.identity().clone()).is_empty());
    assert_eq!(view::screen(&dashboard), Screen::Unauthenticated);
    assert!(mock.state.requests().is_empty());
}

#[test]
fn test_stats_failure_leaves_stats_empty() {
    let mock = MockCatalog::start(Some(developer_json(json!([]))));
    mock.state
        .set_stats(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"down"}"#);
    let (dashboard, _executor) = mounted(&mock);

    assert_eq!(dashboard.phase(), &Phase::Ready);
    assert!(dashboard.stats().is_empty());
    assert!(dashboard.notice().is_none());
}

#[test]
fn test_missing_developer_shows_load_error() {
    let mock = MockCatalog::start(None);
    let (dashboard, _executor) = mounted(&mock);

    match view::screen(&dashboard) {
        Screen::LoadError(message) => assert!(message.contains("404")),
        other => panic!("expected load error, got {:?}", other),
    }
}

#[test]
fn test_stale_category_does_not_block_dashboard() {
    let mock = MockCatalog::start(Some(developer_json(json!([
        {"id": "a", "type": "game", "name": "Bounce", "category": "Arcade"},
        {"id": "b", "type": "game", "name": "Blocks", "category": "Puzzle",
         "additionalCategories": null}
    ]))));
    let (dashboard, _executor) = mounted(&mock);

    assert_eq!(view::screen(&dashboard), Screen::Tabs(Tab::Profile));
    assert_eq!(dashboard.developer().unwrap().apps.len(), 2);
}

#[test]
fn test_create_appends_app_on_moderation() {
    let mock = MockCatalog::start(Some(developer_json(json!([]))));
    let (mut dashboard, executor) = mounted(&mock);

    dashboard.handle(UiAction::EditNewApp(DraftEdit::Name("Bounce".to_string())));
    dashboard.handle(UiAction::EditNewApp(DraftEdit::PrimaryCategory(Some(
        "Arcade".to_string(),
    ))));
    let commands = dashboard.handle(UiAction::SubmitNewApp);
    drive(&mut dashboard, &executor, commands);

    let apps = &dashboard.developer().unwrap().apps;
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].name, "Bounce");
    assert_eq!(apps[0].status, ModerationStatus::OnModeration);
    assert_eq!(dashboard.notice().unwrap().kind, NoticeKind::Info);
    assert!(dashboard.new_app().name.is_empty());
}

#[test]
fn test_create_failure_shows_error_and_keeps_draft() {
    let mock = MockCatalog::start(Some(developer_json(json!([]))));
    let (mut dashboard, executor) = mounted(&mock);
    *mock.state.fail_mutations.lock().unwrap() = Some(StatusCode::BAD_REQUEST);

    dashboard.handle(UiAction::EditNewApp(DraftEdit::Name("Bounce".to_string())));
    let commands = dashboard.handle(UiAction::SubmitNewApp);
    drive(&mut dashboard, &executor, commands);

    let notice = dashboard.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(
        notice.text,
        "Ошибка при добавлении приложения: Ошибка: 400 Bad Request - Сервис недоступен"
    );
    assert_eq!(dashboard.new_app().name, "Bounce");
}

#[test]
fn test_update_replaces_edited_app() {
    let mock = MockCatalog::start(Some(developer_json(json!([
        {"id": "a", "type": "game", "name": "First", "status": "added"},
        {"id": "b", "type": "app", "name": "Second", "status": "rejected", "rejectionReason": "Нет иконки"}
    ]))));
    let (mut dashboard, executor) = mounted(&mock);

    dashboard.handle(UiAction::BeginEdit("b".to_string()));
    dashboard.handle(UiAction::EditExisting(DraftEdit::Icon(
        "https://cdn.example/icon.png".to_string(),
    )));
    let commands = dashboard.handle(UiAction::SubmitEdit);
    drive(&mut dashboard, &executor, commands);

    let apps = &dashboard.developer().unwrap().apps;
    assert_eq!(apps[0].name, "First");
    assert_eq!(apps[0].status, ModerationStatus::Added);
    assert_eq!(apps[1].icon, "https://cdn.example/icon.png");
    assert_eq!(apps[1].status, ModerationStatus::OnModeration);
    assert!(dashboard.editing().is_none());
    assert!(
        mock.state
            .requests()
            .contains(&"PATCH /api/developer/42/apps/b".to_string())
    );
}

#[test]
fn test_promote_then_refetch_in_order() {
    let mock = MockCatalog::start(Some(developer_json(json!([
        {"id": "a", "type": "game", "name": "Bounce", "status": "added"}
    ]))));
    let (mut dashboard, executor) = mounted(&mock);
    let before = mock.state.requests().len();

    let commands = dashboard.handle(UiAction::Promote {
        app_id: "a".to_string(),
        placement: PromotionPlacement::Catalog,
        duration: PromotionDuration::ThreeDays,
    });
    drive(&mut dashboard, &executor, commands);

    let requests = mock.state.requests();
    assert_eq!(
        &requests[before..],
        &[
            "POST /api/developer/42/promote".to_string(),
            "GET /api/developer/42".to_string(),
        ]
    );
    assert_eq!(
        dashboard.notice().unwrap().text,
        "Продвижение успешно активировано"
    );
    let app = &dashboard.developer().unwrap().apps[0];
    assert!(app.promotion(PromotionPlacement::Catalog).is_some());
    assert!(app.promotion(PromotionPlacement::Category).is_none());
}
