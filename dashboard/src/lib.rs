//! Nebula Developer Dashboard
//!
//! Desktop dashboard for developers publishing apps and games to the Nebula
//! Telegram catalog. The user is identified from Telegram Mini-App launch
//! data; profile, apps and statistics come from the catalog HTTP API.
//!
//! The pieces, leaf first:
//! - [`identity`] resolves who is using the dashboard
//! - [`client`] talks to the catalog API
//! - [`controller`] owns all state and decides which requests to make
//! - [`view`] and [`ui`] show that state and collect user input
//! - [`app`] runs requests in the background and drives the window

pub mod app;
pub mod client;
pub mod config;
pub mod controller;
pub mod format;
pub mod identity;
pub mod ui;
pub mod view;
