//! Dashboard state machine
//!
//! [`Dashboard`] owns every piece of UI state and decides which catalog
//! requests to make. It performs no I/O itself: user actions and request
//! completions go in, [`Command`]s come out, and the executor runs them.
//! This keeps ordering guarantees (such as "re-fetch the developer after a
//! promotion") observable in plain unit tests.

mod command;
mod draft;

pub use command::{Command, Completion, FetchPurpose, Outcome, Request};
pub use draft::{AppDraft, DraftEdit, EditSession};

use std::collections::VecDeque;

use nebula_shared::{Developer, PromoteRequest, Stat};

use crate::identity::Identity;
use crate::ui::UiAction;

/// Dashboard tabs, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Profile,
    Add,
    Edit,
    Stats,
    Services,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Profile, Tab::Add, Tab::Edit, Tab::Stats, Tab::Services];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Profile => "Профиль",
            Tab::Add => "Добавить",
            Tab::Edit => "Редактор",
            Tab::Stats => "Статистика",
            Tab::Services => "Услуги",
        }
    }
}

/// Whether tab content can be shown at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Not inside Telegram, or no user id.
    Unauthenticated,
    /// Waiting for the first developer record.
    Loading,
    /// The first developer fetch failed.
    LoadError(String),
    /// Developer record loaded.
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Mutating requests currently running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlight {
    pub creating: u32,
    pub updating: u32,
    pub promoting: u32,
}

pub const LOAD_ERROR_PREFIX: &str =
    "Не удалось загрузить данные. Проверьте ваш userId или попробуйте позже: ";
pub const CREATED_MESSAGE: &str = "Приложение успешно добавлено и отправлено на модерацию!";
pub const UPDATED_MESSAGE: &str =
    "Приложение успешно обновлено и отправлено на повторную модерацию!";

/// Dashboard controller state.
#[derive(Debug)]
pub struct Dashboard {
    identity: Identity,
    generation: u64,
    phase: Phase,
    active_tab: Tab,
    developer: Option<Developer>,
    stats: Vec<Stat>,
    new_app: AppDraft,
    editing: Option<EditSession>,
    notices: VecDeque<Notice>,
    in_flight: InFlight,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    /// A dashboard for the guest identity.
    pub fn new() -> Self {
        Self {
            identity: Identity::guest(),
            generation: 0,
            phase: Phase::Unauthenticated,
            active_tab: Tab::default(),
            developer: None,
            stats: Vec::new(),
            new_app: AppDraft::default(),
            editing: None,
            notices: VecDeque::new(),
            in_flight: InFlight::default(),
        }
    }

    // === Accessors ===

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn developer(&self) -> Option<&Developer> {
        self.developer.as_ref()
    }

    pub fn stats(&self) -> &[Stat] {
        &self.stats
    }

    pub fn new_app(&self) -> &AppDraft {
        &self.new_app
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Notice to show now, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn in_flight(&self) -> InFlight {
        self.in_flight
    }

    // === Transitions ===

    /// Mount the dashboard for an identity.
    pub fn mount(&mut self, identity: Identity) -> Vec<Command> {
        self.generation += 1;
        self.identity = identity;
        self.developer = None;
        self.stats.clear();
        self.editing = None;
        self.in_flight = InFlight::default();

        if !self.identity.is_authenticated() {
            tracing::info!(
                "Not fetching developer data: is_telegram={}, user_id={}",
                self.identity.is_telegram,
                self.identity.user_id
            );
            self.phase = Phase::Unauthenticated;
            return Vec::new();
        }

        tracing::info!("Loading developer {}", self.identity.user_id);
        self.phase = Phase::Loading;
        vec![
            self.developer_fetch(FetchPurpose::Initial),
            self.command(Request::FetchStats {
                user_id: self.identity.user_id.clone(),
            }),
        ]
    }

    /// The identity provider reported a (possibly new) identity.
    ///
    /// Remounts only when the identity actually changed.
    pub fn set_identity(&mut self, identity: Identity) -> Vec<Command> {
        if identity == self.identity && self.generation > 0 {
            return Vec::new();
        }
        self.mount(identity)
    }

    /// Handle a user action.
    pub fn handle(&mut self, action: UiAction) -> Vec<Command> {
        match action {
            UiAction::SelectTab(tab) => {
                self.active_tab = tab;
                Vec::new()
            }
            UiAction::EditNewApp(edit) => {
                self.new_app.apply(edit);
                Vec::new()
            }
            UiAction::EditExisting(edit) => {
                match self.editing.as_mut() {
                    Some(session) => session.draft.apply(edit),
                    None => tracing::debug!("Edit ignored, no app selected"),
                }
                Vec::new()
            }
            UiAction::SubmitNewApp => self.submit_new_app(),
            UiAction::BeginEdit(app_id) => {
                self.begin_edit(&app_id);
                Vec::new()
            }
            UiAction::SubmitEdit => self.submit_edit(),
            UiAction::CancelEdit => {
                self.editing = None;
                Vec::new()
            }
            UiAction::Promote {
                app_id,
                placement,
                duration,
            } => self.promote(PromoteRequest {
                app_id,
                placement,
                duration,
            }),
            UiAction::Refresh | UiAction::Retry => self.reload(),
            UiAction::DismissNotice => {
                self.notices.pop_front();
                Vec::new()
            }
            // Opening links is up to the shell
            UiAction::ContactAdmin => Vec::new(),
        }
    }

    /// Apply the result of a request.
    ///
    /// Returns follow-up commands (the reconciliation fetch after a
    /// promotion).
    pub fn complete(&mut self, completion: Completion) -> Vec<Command> {
        if completion.generation != self.generation {
            tracing::debug!(
                "Dropping completion from generation {} (current {})",
                completion.generation,
                self.generation
            );
            return Vec::new();
        }

        match completion.outcome {
            Outcome::Developer { purpose, result } => {
                self.developer_loaded(purpose, result);
                Vec::new()
            }
            Outcome::Stats(result) => {
                match result {
                    Ok(stats) => self.stats = stats,
                    Err(e) => tracing::warn!("Failed to load stats: {}", e),
                }
                Vec::new()
            }
            Outcome::Created(result) => {
                self.in_flight.creating = self.in_flight.creating.saturating_sub(1);
                match result {
                    Ok(app) => {
                        tracing::info!("App created: {}", app.id);
                        match self.developer.as_mut() {
                            Some(developer) => {
                                developer.upsert_app(app);
                            }
                            None => tracing::warn!("Created app {} with no developer loaded", app.id),
                        }
                        self.new_app = AppDraft::default();
                        self.notices.push_back(Notice::info(CREATED_MESSAGE));
                    }
                    Err(e) => {
                        tracing::error!("Failed to create app: {}", e);
                        self.notices.push_back(Notice::error(format!(
                            "Ошибка при добавлении приложения: {}",
                            e
                        )));
                    }
                }
                Vec::new()
            }
            Outcome::Updated { app_id, result } => {
                self.in_flight.updating = self.in_flight.updating.saturating_sub(1);
                match result {
                    Ok(app) => {
                        tracing::info!("App updated: {}", app.id);
                        let replaced = self
                            .developer
                            .as_mut()
                            .is_some_and(|developer| developer.replace_app(app));
                        if !replaced {
                            tracing::warn!("Updated app {} is not in the app list", app_id);
                        }
                        if self.editing.as_ref().is_some_and(|s| s.app_id == app_id) {
                            self.editing = None;
                        }
                        self.notices.push_back(Notice::info(UPDATED_MESSAGE));
                    }
                    Err(e) => {
                        tracing::error!("Failed to update app {}: {}", app_id, e);
                        self.notices.push_back(Notice::error(format!(
                            "Ошибка при обновлении приложения: {}",
                            e
                        )));
                    }
                }
                Vec::new()
            }
            Outcome::Promoted { app_id, result } => {
                self.in_flight.promoting = self.in_flight.promoting.saturating_sub(1);
                match result {
                    Ok(response) => {
                        tracing::info!("Promotion activated for {}", app_id);
                        self.notices.push_back(Notice::info(response.message));
                        // Promotion windows are computed server-side
                        vec![self.developer_fetch(FetchPurpose::Reconcile)]
                    }
                    Err(e) => {
                        tracing::error!("Failed to promote {}: {}", app_id, e);
                        self.notices.push_back(Notice::error(format!(
                            "Ошибка при активации продвижения: {}",
                            e
                        )));
                        Vec::new()
                    }
                }
            }
        }
    }

    // === Internals ===

    fn command(&self, request: Request) -> Command {
        Command {
            generation: self.generation,
            request,
        }
    }

    fn developer_fetch(&self, purpose: FetchPurpose) -> Command {
        self.command(Request::FetchDeveloper {
            user_id: self.identity.user_id.clone(),
            purpose,
        })
    }

    /// User id for mutating requests; requires a loaded developer.
    fn ready_user(&self) -> Option<String> {
        if self.phase == Phase::Ready && self.identity.is_authenticated() {
            Some(self.identity.user_id.clone())
        } else {
            tracing::warn!("Action ignored: dashboard is not ready ({:?})", self.phase);
            None
        }
    }

    fn developer_loaded(
        &mut self,
        purpose: FetchPurpose,
        result: Result<Developer, crate::client::ClientError>,
    ) {
        match (purpose, result) {
            (_, Ok(developer)) => {
                tracing::info!(
                    "Developer {} loaded with {} apps",
                    developer.id,
                    developer.apps.len()
                );
                let edited_gone = self
                    .editing
                    .as_ref()
                    .is_some_and(|session| developer.app(&session.app_id).is_none());
                if edited_gone {
                    self.editing = None;
                }
                self.developer = Some(developer);
                self.phase = Phase::Ready;
            }
            (FetchPurpose::Initial, Err(e)) => {
                tracing::error!("Failed to load developer data: {}", e);
                self.phase = Phase::LoadError(format!("{}{}", LOAD_ERROR_PREFIX, e));
            }
            (FetchPurpose::Reconcile, Err(e)) => {
                tracing::error!("Failed to refresh developer data: {}", e);
                self.notices
                    .push_back(Notice::error(format!("Не удалось обновить данные: {}", e)));
            }
        }
    }

    fn reload(&mut self) -> Vec<Command> {
        if !self.identity.is_authenticated() {
            return Vec::new();
        }
        let purpose = match self.phase {
            Phase::Loading | Phase::Unauthenticated => return Vec::new(),
            Phase::LoadError(_) => {
                self.phase = Phase::Loading;
                FetchPurpose::Initial
            }
            Phase::Ready => FetchPurpose::Reconcile,
        };
        tracing::info!("Reloading developer {}", self.identity.user_id);
        vec![
            self.developer_fetch(purpose),
            self.command(Request::FetchStats {
                user_id: self.identity.user_id.clone(),
            }),
        ]
    }

    fn submit_new_app(&mut self) -> Vec<Command> {
        let Some(user_id) = self.ready_user() else {
            return Vec::new();
        };
        tracing::info!("Submitting new {} '{}'", self.new_app.kind(), self.new_app.name);
        self.in_flight.creating += 1;
        vec![self.command(Request::CreateApp {
            user_id,
            submission: self.new_app.to_submission(),
        })]
    }

    fn begin_edit(&mut self, app_id: &str) {
        match self.developer.as_ref().and_then(|d| d.app(app_id)) {
            Some(app) => {
                tracing::info!("Editing app {}", app_id);
                self.editing = Some(EditSession::from_app(app));
            }
            None => tracing::warn!("Cannot edit unknown app {}", app_id),
        }
    }

    fn submit_edit(&mut self) -> Vec<Command> {
        let Some(user_id) = self.ready_user() else {
            return Vec::new();
        };
        let Some(session) = self.editing.as_ref() else {
            tracing::debug!("Submit ignored, no app selected");
            return Vec::new();
        };
        tracing::info!("Submitting changes to app {}", session.app_id);
        let request = Request::UpdateApp {
            user_id,
            app_id: session.app_id.clone(),
            submission: session.draft.to_submission(),
        };
        self.in_flight.updating += 1;
        vec![self.command(request)]
    }

    fn promote(&mut self, request: PromoteRequest) -> Vec<Command> {
        let Some(user_id) = self.ready_user() else {
            return Vec::new();
        };
        tracing::info!(
            "Promoting app {} ({:?}, {} days)",
            request.app_id,
            request.placement,
            request.duration.days()
        );
        self.in_flight.promoting += 1;
        vec![self.command(Request::Promote { user_id, request })]
    }
}
