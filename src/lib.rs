#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the idp-signin library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapter;
pub mod models;
pub mod provider;
pub mod session;
pub mod settings;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use adapter::{
    AdapterError, AuthCallback, ConcurrentLoginPolicy, GoogleProviderAdapter, HostShell, Notice,
    ProviderSurface, ResultDisposition,
};
pub use models::{create_auth_credential, AuthCredential, FailureReason, NormalizedIdentity};
pub use provider::{ProviderConfig, ProviderDescriptor, RawSignInResult, StatusCode};
pub use session::{CorrelationToken, LaunchRequest};
pub use settings::IdpSettings;
