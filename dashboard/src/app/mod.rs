//! Dashboard application state and main loop
//!
//! The app wires the pieces together:
//! - resolves the Telegram identity and mounts the dashboard for it
//! - feeds finished requests back into the controller every frame
//! - runs the commands the controller emits on the executor

mod executor;
mod init;

pub use executor::{Executor, Wake};
pub use init::AppError;

use std::sync::Arc;

use eframe::egui;

use crate::client::CatalogClient;
use crate::config::{Config, Overrides};
use crate::controller::{Command, Dashboard};
use crate::identity::{HostBridge, Identity, IdentityProvider};
use crate::ui::{DashboardUi, UiAction};

/// Dashboard application state
pub struct App {
    /// Configuration as loaded from `config.toml`, without command-line
    /// overrides; this is what gets saved
    config: Config,
    /// Telegram identity resolution
    identity: IdentityProvider<Box<dyn HostBridge>>,
    /// Controller state
    dashboard: Dashboard,
    /// Widget-only UI state
    ui: DashboardUi,
    /// Runs catalog requests off the UI thread
    executor: Executor,
    /// Whether the bridge-loaded signal has been delivered
    bridge_signalled: bool,
}

impl App {
    /// Create the app and start loading if the identity is already known.
    pub fn new(config: Config, bridge: Box<dyn HostBridge>, executor: Executor) -> Self {
        let mut app = Self {
            config,
            identity: IdentityProvider::new(bridge),
            dashboard: Dashboard::new(),
            ui: DashboardUi::new(),
            executor,
            bridge_signalled: false,
        };

        let commands = match app.identity.evaluate() {
            Some(identity) => app.dashboard.set_identity(identity),
            None => app.dashboard.mount(Identity::guest()),
        };
        app.run_commands(commands);
        app
    }

    fn run_commands(&self, commands: Vec<Command>) {
        if !commands.is_empty() {
            self.executor.submit(commands);
        }
    }

    /// The window is up, so the host has had its chance to inject launch data.
    fn signal_bridge_loaded(&mut self) {
        if self.bridge_signalled {
            return;
        }
        self.bridge_signalled = true;
        if let Some(identity) = self.identity.bridge_loaded() {
            let commands = self.dashboard.set_identity(identity);
            self.run_commands(commands);
        }
    }

    fn apply_completions(&mut self) {
        for completion in self.executor.drain() {
            let commands = self.dashboard.complete(completion);
            self.run_commands(commands);
        }
    }

    /// Handle UI actions
    fn handle_ui_action(&mut self, action: UiAction) {
        match action {
            UiAction::ContactAdmin => {
                let url = &self.config.ui.admin_contact_url;
                tracing::info!("Opening {}", url);
                if let Err(e) = open::that(url) {
                    tracing::error!("Failed to open browser: {}", e);
                }
            }
            action => {
                let commands = self.dashboard.handle(action);
                self.run_commands(commands);
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle F11 for fullscreen toggle
        if ctx.input(|i| i.key_pressed(egui::Key::F11)) {
            let is_fullscreen = ctx.input(|i| i.viewport().fullscreen).unwrap_or(false);
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(!is_fullscreen));
            self.config.ui.fullscreen = !is_fullscreen;
            if let Err(e) = crate::config::save(&self.config) {
                tracing::warn!("Failed to save config: {}", e);
            }
        }

        self.signal_bridge_loaded();
        self.apply_completions();

        if let Some(action) = self.ui.show(ctx, &self.dashboard) {
            self.handle_ui_action(action);
        }
    }
}

/// Run the dashboard
pub fn run(
    config: Config,
    overrides: Overrides,
    bridge: Box<dyn HostBridge>,
) -> Result<(), AppError> {
    tracing::info!("Starting Nebula developer dashboard");

    let effective = overrides.apply(&config);
    let client = CatalogClient::new(&effective.api)?;
    tracing::info!("Catalog API: {}", client.base_url());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Nebula Dashboard")
            .with_inner_size([effective.ui.window_width, effective.ui.window_height])
            .with_fullscreen(effective.ui.fullscreen),
        ..Default::default()
    };

    eframe::run_native(
        "Nebula Dashboard",
        native_options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let wake: Wake = Arc::new(move || ctx.request_repaint());
            let executor = Executor::new(client, wake)?;
            Ok(Box::new(App::new(config, bridge, executor)))
        }),
    )
    .map_err(|e| AppError::EventLoop(format!("eframe error: {}", e)))?;

    Ok(())
}
