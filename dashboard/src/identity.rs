//! Telegram Mini-App identity
//!
//! The Telegram client hands a Mini-App its launch data (`initData`), which
//! carries the current user. [`HostBridge`] is the injected capability that
//! exposes it; [`IdentityProvider`] turns it into an [`Identity`] with the
//! `"guest"` sentinel whenever no user can be determined.
//!
//! Resolution is one-shot: the provider reports guest until it is evaluated,
//! checks the bridge once, and if the bridge is missing waits for a single
//! "bridge loaded" signal before settling for good.

use nebula_shared::constants::GUEST_USER_ID;
use serde::Deserialize;
use thiserror::Error;

/// Telegram user as found in `initData`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// Unverified launch data. The server is responsible for checking `hash`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitDataUnsafe {
    pub user: Option<TelegramUser>,
    pub auth_date: Option<i64>,
    pub query_id: Option<String>,
    pub start_param: Option<String>,
}

/// The host's Web App object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebAppBridge {
    pub init_data_unsafe: InitDataUnsafe,
}

#[derive(Error, Debug)]
pub enum InitDataError {
    #[error("invalid user object in launch data: {0}")]
    User(#[from] serde_json::Error),
    #[error("invalid auth_date '{0}'")]
    AuthDate(String),
    #[error("launch data has neither user nor auth_date")]
    NotTelegram,
}

impl InitDataUnsafe {
    /// Parse a raw `initData` query string.
    ///
    /// Unknown keys (including `hash` and `signature`) are ignored.
    pub fn parse(raw: &str) -> Result<Self, InitDataError> {
        let mut data = InitDataUnsafe::default();
        let raw = raw.trim().trim_start_matches(['#', '?']);

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            match &*key {
                "user" => data.user = Some(serde_json::from_str(&value)?),
                "auth_date" => {
                    let auth_date = value
                        .parse()
                        .map_err(|_| InitDataError::AuthDate(value.to_string()))?;
                    data.auth_date = Some(auth_date);
                }
                "query_id" => data.query_id = Some(value.into_owned()),
                "start_param" => data.start_param = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(data)
    }
}

/// Access to the host runtime's Web App object.
///
/// Implementations can be swapped for tests or for other launchers.
pub trait HostBridge: Send + Sync {
    /// Returns the Web App object, or `None` when not running inside the host.
    fn web_app(&self) -> Option<WebAppBridge>;
}

impl<B: HostBridge + ?Sized> HostBridge for Box<B> {
    fn web_app(&self) -> Option<WebAppBridge> {
        (**self).web_app()
    }
}

/// Launch parameters passed to the dashboard on startup.
#[derive(Debug, Clone, Default)]
pub struct LaunchParams {
    web_app: Option<WebAppBridge>,
}

/// Fragment key Telegram uses to pass `initData` in the launch URL.
const WEB_APP_DATA_KEY: &str = "tgWebAppData";

impl LaunchParams {
    /// Launched outside Telegram.
    pub fn absent() -> Self {
        Self { web_app: None }
    }

    /// Parse either raw `initData` or a launch fragment
    /// (`#tgWebAppData=...&tgWebAppVersion=...`).
    ///
    /// Telegram always sends `auth_date`, and `user` for a signed-in user;
    /// data with neither is not a Telegram launch.
    pub fn parse(raw: &str) -> Result<Self, InitDataError> {
        let trimmed = raw.trim().trim_start_matches(['#', '?']);
        let init_data = url::form_urlencoded::parse(trimmed.as_bytes())
            .find(|(key, _)| key == WEB_APP_DATA_KEY)
            .map(|(_, value)| value.into_owned());

        let init_data_unsafe = match init_data {
            Some(inner) => InitDataUnsafe::parse(&inner)?,
            None => InitDataUnsafe::parse(trimmed)?,
        };
        if init_data_unsafe.user.is_none() && init_data_unsafe.auth_date.is_none() {
            return Err(InitDataError::NotTelegram);
        }

        Ok(Self {
            web_app: Some(WebAppBridge { init_data_unsafe }),
        })
    }

    /// Parse launch data if any was supplied.
    ///
    /// Malformed data is logged and treated as running outside Telegram.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => Self::absent(),
            Some(raw) => Self::parse(raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring launch data: {}", e);
                Self::absent()
            }),
        }
    }
}

impl HostBridge for LaunchParams {
    fn web_app(&self) -> Option<WebAppBridge> {
        self.web_app.clone()
    }
}

/// Who is using the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Telegram user id, or `"guest"`.
    pub user_id: String,
    /// Whether the host bridge is present.
    pub is_telegram: bool,
}

impl Identity {
    pub fn guest() -> Self {
        Self {
            user_id: GUEST_USER_ID.to_string(),
            is_telegram: false,
        }
    }

    pub fn from_bridge(web_app: Option<&WebAppBridge>) -> Self {
        match web_app {
            None => Self::guest(),
            Some(web_app) => Self {
                user_id: web_app
                    .init_data_unsafe
                    .user
                    .as_ref()
                    .map(|user| user.id.to_string())
                    .unwrap_or_else(|| GUEST_USER_ID.to_string()),
                is_telegram: true,
            },
        }
    }

    /// Inside the host with a known user; only then may identity-bound
    /// requests be issued.
    pub fn is_authenticated(&self) -> bool {
        self.is_telegram && self.user_id != GUEST_USER_ID
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Unevaluated,
    AwaitingLoad,
    Settled,
}

/// Resolves the current [`Identity`] from a [`HostBridge`].
pub struct IdentityProvider<B> {
    bridge: B,
    identity: Identity,
    resolution: Resolution,
}

impl<B: HostBridge> IdentityProvider<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            bridge,
            identity: Identity::guest(),
            resolution: Resolution::Unevaluated,
        }
    }

    /// Current identity; guest until resolved.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Whether no further re-check will happen.
    pub fn is_settled(&self) -> bool {
        self.resolution == Resolution::Settled
    }

    /// First check of the bridge.
    ///
    /// Returns the new identity if it changed. When the bridge is missing the
    /// provider waits for [`Self::bridge_loaded`].
    pub fn evaluate(&mut self) -> Option<Identity> {
        if self.resolution != Resolution::Unevaluated {
            return None;
        }
        match self.bridge.web_app() {
            Some(web_app) => {
                self.resolution = Resolution::Settled;
                self.adopt(Identity::from_bridge(Some(&web_app)))
            }
            None => {
                tracing::debug!("Host bridge not present yet, waiting for load signal");
                self.resolution = Resolution::AwaitingLoad;
                None
            }
        }
    }

    /// The host signalled that its bridge script finished loading.
    ///
    /// Re-checks the bridge once; later signals are ignored.
    pub fn bridge_loaded(&mut self) -> Option<Identity> {
        if self.resolution == Resolution::Settled {
            return None;
        }
        self.resolution = Resolution::Settled;
        let web_app = self.bridge.web_app();
        if web_app.is_none() {
            tracing::info!("No Telegram host bridge, staying unauthenticated");
        }
        self.adopt(Identity::from_bridge(web_app.as_ref()))
    }

    fn adopt(&mut self, identity: Identity) -> Option<Identity> {
        if identity == self.identity {
            return None;
        }
        tracing::info!(
            "Identity resolved: user_id={}, is_telegram={}",
            identity.user_id,
            identity.is_telegram
        );
        self.identity = identity.clone();
        Some(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Bridge whose Web App object can appear after construction.
    struct LateBridge {
        web_app: Mutex<Option<WebAppBridge>>,
        checks: Mutex<u32>,
    }

    impl LateBridge {
        fn empty() -> Self {
            Self {
                web_app: Mutex::new(None),
                checks: Mutex::new(0),
            }
        }

        fn install(&self, user_id: i64) {
            *self.web_app.lock().unwrap() = Some(bridge_for(user_id));
        }

        fn checks(&self) -> u32 {
            *self.checks.lock().unwrap()
        }
    }

    impl HostBridge for &LateBridge {
        fn web_app(&self) -> Option<WebAppBridge> {
            *self.checks.lock().unwrap() += 1;
            self.web_app.lock().unwrap().clone()
        }
    }

    fn bridge_for(user_id: i64) -> WebAppBridge {
        WebAppBridge {
            init_data_unsafe: InitDataUnsafe {
                user: Some(TelegramUser {
                    id: user_id,
                    first_name: None,
                    last_name: None,
                    username: None,
                    language_code: None,
                }),
                ..Default::default()
            },
        }
    }

    // =============================================================
    // Launch data parsing
    // =============================================================

    const RAW_INIT_DATA: &str = "query_id=AAH&user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Ann%22%2C%22username%22%3A%22ann%22%7D&auth_date=1700000000&hash=abc";

    #[test]
    fn test_parse_raw_init_data() {
        let data = InitDataUnsafe::parse(RAW_INIT_DATA).unwrap();
        let user = data.user.unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.username.as_deref(), Some("ann"));
        assert_eq!(data.auth_date, Some(1_700_000_000));
        assert_eq!(data.query_id.as_deref(), Some("AAH"));
    }

    #[test]
    fn test_parse_launch_fragment() {
        let encoded: String =
            url::form_urlencoded::byte_serialize(RAW_INIT_DATA.as_bytes()).collect();
        let fragment = format!(
            "#tgWebAppData={}&tgWebAppVersion=7.0&tgWebAppPlatform=tdesktop",
            encoded
        );

        let params = LaunchParams::parse(&fragment).unwrap();
        let identity = Identity::from_bridge(params.web_app().as_ref());
        assert_eq!(identity.user_id, "42");
        assert!(identity.is_authenticated());
    }

    #[test]
    fn test_parse_rejects_bad_user_json() {
        assert!(matches!(
            InitDataUnsafe::parse("user=%7Bnot-json"),
            Err(InitDataError::User(_))
        ));
        assert!(matches!(
            InitDataUnsafe::parse("auth_date=yesterday"),
            Err(InitDataError::AuthDate(_))
        ));
    }

    #[test]
    fn test_unrelated_launch_data_is_not_telegram() {
        assert!(matches!(
            LaunchParams::parse("foo"),
            Err(InitDataError::NotTelegram)
        ));
        assert!(LaunchParams::from_raw(Some("foo")).web_app().is_none());
        assert!(LaunchParams::from_raw(Some("#tgWebAppVersion=7.0")).web_app().is_none());

        let signed_out = LaunchParams::from_raw(Some("auth_date=1700000000&hash=abc"));
        let identity = Identity::from_bridge(signed_out.web_app().as_ref());
        assert!(identity.is_telegram);
        assert!(!identity.is_authenticated());
    }

    #[test]
    fn test_from_raw_malformed_is_absent() {
        assert!(LaunchParams::from_raw(Some("user=%7Bbroken")).web_app().is_none());
        assert!(LaunchParams::from_raw(Some("   ")).web_app().is_none());
        assert!(LaunchParams::from_raw(None).web_app().is_none());
    }

    // =============================================================
    // Identity
    // =============================================================

    #[test]
    fn test_bridge_without_user_is_telegram_guest() {
        let identity = Identity::from_bridge(Some(&WebAppBridge::default()));
        assert!(identity.is_telegram);
        assert_eq!(identity.user_id, "guest");
        assert!(!identity.is_authenticated());
    }

    #[test]
    fn test_no_bridge_is_guest() {
        let identity = Identity::from_bridge(None);
        assert_eq!(identity, Identity::guest());
        assert!(!identity.is_authenticated());
    }

    // =============================================================
    // Provider resolution
    // =============================================================

    #[test]
    fn test_provider_reports_guest_before_evaluation() {
        let bridge = LateBridge::empty();
        bridge.install(42);
        let provider = IdentityProvider::new(&bridge);

        assert_eq!(provider.identity(), &Identity::guest());
        assert_eq!(bridge.checks(), 0);
    }

    #[test]
    fn test_provider_resolves_present_bridge_immediately() {
        let bridge = LateBridge::empty();
        bridge.install(42);
        let mut provider = IdentityProvider::new(&bridge);

        let identity = provider.evaluate().unwrap();
        assert_eq!(identity.user_id, "42");
        assert!(provider.is_settled());
        assert!(provider.bridge_loaded().is_none());
    }

    #[test]
    fn test_provider_rechecks_once_after_load_signal() {
        let bridge = LateBridge::empty();
        let mut provider = IdentityProvider::new(&bridge);

        assert!(provider.evaluate().is_none());
        assert!(!provider.is_settled());

        bridge.install(7);
        let identity = provider.bridge_loaded().unwrap();
        assert_eq!(identity.user_id, "7");
        assert_eq!(bridge.checks(), 2);
    }

    #[test]
    fn test_provider_stays_guest_when_bridge_never_appears() {
        let bridge = LateBridge::empty();
        let mut provider = IdentityProvider::new(&bridge);

        provider.evaluate();
        assert!(provider.bridge_loaded().is_none());

        bridge.install(7);
        assert!(provider.bridge_loaded().is_none());
        assert!(provider.evaluate().is_none());
        assert_eq!(provider.identity(), &Identity::guest());
        assert_eq!(bridge.checks(), 2);
    }
}
