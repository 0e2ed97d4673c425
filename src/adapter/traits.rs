//! Collaborator traits
//!
//! The adapter talks to three external parties: the consumer that receives the
//! login outcome, the provider surface that shows the consent flow, and the
//! host shell that displays short user-visible notices.

use crate::models::{FailureReason, NormalizedIdentity};
use crate::session::LaunchRequest;
use std::fmt;

/// Consumer-facing sink for login outcomes
///
/// Exactly one of the two methods is invoked per logical login request. The
/// bounded account-mismatch retry is invisible here, and cancelled or
/// superseded requests invoke neither.
pub trait AuthCallback: Send {
    /// The provider signed the user in
    fn on_success(&mut self, identity: NormalizedIdentity);

    /// The login request ended without an identity
    fn on_failure(&mut self, reason: FailureReason);
}

/// The external provider consent surface
pub trait ProviderSurface: Send {
    /// Open the consent flow for a launch request
    ///
    /// The host later feeds the result, tagged with `request.token`, back into
    /// the adapter.
    fn open(&mut self, request: &LaunchRequest);

    /// Release resources held for the provider surface
    fn close(&mut self) {}
}

/// Short user-visible notice delegated to the host shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The user was signed in with the pinned account
    SignedInWithAccount { email: String },
    /// The application is misconfigured for the provider
    DeveloperError,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SignedInWithAccount { email } => write!(f, "Signed in as {email}"),
            Notice::DeveloperError => write!(f, "Developer error."),
        }
    }
}

/// Host UI shell
pub trait HostShell: Send {
    fn show_notice(&mut self, notice: &Notice);
}
