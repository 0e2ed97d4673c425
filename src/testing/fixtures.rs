//! Test fixtures providing pre-built test objects
//!
//! This module provides commonly used provider configurations, provider
//! results and a fully wired adapter harness.

use crate::adapter::{ConcurrentLoginPolicy, GoogleProviderAdapter};
use crate::provider::{ProviderConfig, RawSignInResult, SignInAccount, StatusCode};

use super::constants::{
    TEST_ACCOUNT_ID, TEST_CLIENT_ID, TEST_ID_TOKEN, TEST_PHOTO_URL, TEST_USER_NAME,
};
use super::mock::{RecordingCallback, RecordingShell, RecordingSurface};

/// Adapter wired to recording collaborators
pub struct AdapterHarness {
    pub adapter: GoogleProviderAdapter,
    pub surface: RecordingSurface,
    pub callback: RecordingCallback,
    pub shell: RecordingShell,
}

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Configuration pinned to `hint`, requesting an ID token
    #[must_use]
    pub fn hinted_config(hint: &str) -> ProviderConfig {
        ProviderConfig::default()
            .with_account_hint(Some(hint))
            .with_client_id(Some(TEST_CLIENT_ID))
    }

    /// Full account payload for `email`
    #[must_use]
    pub fn account(email: &str) -> SignInAccount {
        SignInAccount {
            id: Some(TEST_ACCOUNT_ID.to_string()),
            email: Some(email.to_string()),
            display_name: Some(TEST_USER_NAME.to_string()),
            photo_url: Some(TEST_PHOTO_URL.to_string()),
            id_token: Some(TEST_ID_TOKEN.to_string()),
        }
    }

    #[must_use]
    pub fn success_result(email: &str) -> RawSignInResult {
        RawSignInResult::success(Self::account(email))
    }

    /// The provider rejected the hinted or cached account
    #[must_use]
    pub fn invalid_account_result() -> RawSignInResult {
        RawSignInResult::failure(StatusCode::INVALID_ACCOUNT, Some("Invalid account"))
    }

    #[must_use]
    pub fn developer_error_result() -> RawSignInResult {
        RawSignInResult::failure(StatusCode::DEVELOPER_ERROR, None)
    }

    #[must_use]
    pub fn network_error_result() -> RawSignInResult {
        RawSignInResult::failure(StatusCode::NETWORK_ERROR, Some("Network unreachable"))
    }

    #[must_use]
    pub fn cancelled_result() -> RawSignInResult {
        RawSignInResult::failure(StatusCode::SIGN_IN_CANCELLED, None)
    }

    /// Adapter with the default concurrent login policy
    ///
    /// # Panics
    ///
    /// Panics if the callback cannot be registered, which only happens while
    /// a session is outstanding.
    #[must_use]
    pub fn harness(config: ProviderConfig) -> AdapterHarness {
        Self::harness_with_policy(config, ConcurrentLoginPolicy::default())
    }

    /// Adapter with an explicit concurrent login policy
    ///
    /// # Panics
    ///
    /// Panics if the callback cannot be registered, which only happens while
    /// a session is outstanding.
    #[must_use]
    pub fn harness_with_policy(
        config: ProviderConfig,
        policy: ConcurrentLoginPolicy,
    ) -> AdapterHarness {
        let surface = RecordingSurface::new();
        let callback = RecordingCallback::new();
        let shell = RecordingShell::new();

        let mut adapter = GoogleProviderAdapter::new(config, surface.boxed())
            .with_policy(policy)
            .with_shell(shell.boxed());
        adapter
            .set_callback(callback.boxed())
            .expect("a fresh adapter has no outstanding session");

        AdapterHarness {
            adapter,
            surface,
            callback,
            shell,
        }
    }
}
