//! Session state: is the user logged in, and as whom.
//!
//! The session itself lives in a cookie the gateway holds; this type only
//! mirrors whether that cookie is believed to be valid.

use catalog::Credentials;
use gateway::CatalogGateway;
use tracing::{info, warn};

use crate::error::{Result, StateError};
use crate::notify::{Notice, Notifier, Severity, StateEvent};

/// Display identity of the logged-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Default)]
pub struct Session {
    identity: Option<Identity>,
    notifier: Option<Notifier>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifier(notifier: Notifier) -> Self {
        Self {
            identity: None,
            notifier: Some(notifier),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Gate for anything that needs a live session
    pub fn require_active(&self) -> Result<&Identity> {
        self.identity.as_ref().ok_or(StateError::NotAuthenticated)
    }

    /// Log in through the gateway.
    ///
    /// On success the session becomes active with the given identity. On
    /// failure the session is left exactly as it was and the gateway error
    /// is returned.
    pub async fn login(
        &mut self,
        gateway: &dyn CatalogGateway,
        credentials: &Credentials,
    ) -> Result<()> {
        if let Err(e) = gateway.login(credentials.name(), credentials.email()).await {
            warn!("Login failed for {}: {}", credentials.email(), e);
            self.notice(Notice::error("Failed to log in. Please try again."));
            return Err(e.into());
        }

        info!("Logged in as {} <{}>", credentials.name(), credentials.email());
        self.identity = Some(Identity {
            name: credentials.name().to_string(),
            email: credentials.email().to_string(),
        });
        self.emit(StateEvent::SessionChanged { authenticated: true });
        self.notice(Notice::new(
            Severity::Success,
            "Success",
            "You have successfully logged in",
        ));
        Ok(())
    }

    /// Log out through the gateway.
    ///
    /// Local state is cleared whether or not the gateway call succeeds; a
    /// gateway failure is still returned so the caller can report it.
    pub async fn logout(&mut self, gateway: &dyn CatalogGateway) -> Result<()> {
        let remote = gateway.logout().await;
        let was_active = self.identity.take().is_some();
        if was_active {
            self.emit(StateEvent::SessionChanged {
                authenticated: false,
            });
        }

        match remote {
            Ok(()) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) => {
                warn!("Logout failed remotely, local session cleared anyway: {}", e);
                self.notice(Notice::new(
                    Severity::Warning,
                    "Logout",
                    "The server did not confirm logout; you have been logged out locally",
                ));
                Err(e.into())
            }
        }
    }

    fn emit(&self, event: StateEvent) {
        if let Some(notifier) = &self.notifier {
            notifier.emit(event);
        }
    }

    fn notice(&self, notice: Notice) {
        self.emit(StateEvent::Notice(notice));
    }
}
