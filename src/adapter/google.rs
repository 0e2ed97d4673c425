//! Google sign-in adapter
//!
//! The adapter owns at most one outstanding `SignInSession`. Results that do
//! not carry the outstanding session's correlation token are dropped. A
//! rejected account hint is retried exactly once without the hint; every other
//! failure is terminal.

use crate::adapter::traits::{AuthCallback, HostShell, Notice, ProviderSurface};
use crate::adapter::{AdapterError, ConcurrentLoginPolicy, ResultDisposition};
use crate::models::{FailureReason, NormalizedIdentity};
use crate::provider::{
    ConfigError, ProviderConfig, ProviderDescriptor, RawSignInResult, StatusCode,
    GOOGLE_PROVIDER_ID,
};
use crate::session::{CorrelationToken, SignInSession};
use crate::settings::IdpSettings;
use crate::utils::logging::LoggingHelper;
use log::{debug, error};

enum AdapterState {
    Idle,
    Awaiting(SignInSession),
    Disposed,
}

/// Classification of a matched provider result
enum Outcome {
    Success(NormalizedIdentity),
    Retry(ProviderConfig),
    Failure(FailureReason),
}

/// Sign-in state machine for the Google provider
pub struct GoogleProviderAdapter {
    descriptor: ProviderDescriptor,
    config: ProviderConfig,
    policy: ConcurrentLoginPolicy,
    surface: Box<dyn ProviderSurface>,
    callback: Option<Box<dyn AuthCallback>>,
    shell: Option<Box<dyn HostShell>>,
    state: AdapterState,
}

impl GoogleProviderAdapter {
    /// Create an adapter that launches `surface` with `config`
    #[must_use]
    pub fn new(config: ProviderConfig, surface: Box<dyn ProviderSurface>) -> Self {
        Self {
            descriptor: ProviderDescriptor::google(),
            config,
            policy: ConcurrentLoginPolicy::default(),
            surface,
            callback: None,
            shell: None,
            state: AdapterState::Idle,
        }
    }

    /// Create an adapter from the `google` provider entry of the settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No `google` provider is configured
    /// - The provider is disabled
    /// - A configured scope is blank
    pub fn from_settings(
        settings: &IdpSettings,
        surface: Box<dyn ProviderSurface>,
    ) -> Result<Self, ConfigError> {
        let provider_settings = settings
            .get_provider(GOOGLE_PROVIDER_ID)
            .ok_or_else(|| ConfigError::UnknownProvider(GOOGLE_PROVIDER_ID.to_string()))?;

        if !provider_settings.enabled {
            return Err(ConfigError::ProviderDisabled(
                GOOGLE_PROVIDER_ID.to_string(),
            ));
        }

        let config = ProviderConfig::from_settings(provider_settings)?;
        let descriptor = ProviderDescriptor::from_settings(provider_settings);
        LoggingHelper::log_provider_init(&descriptor, config.requests_id_token());

        Ok(Self::new(config, surface)
            .with_descriptor(descriptor)
            .with_policy(settings.adapter.concurrent_login))
    }

    #[must_use]
    pub fn with_descriptor(mut self, descriptor: ProviderDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ConcurrentLoginPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach the host shell that receives user-visible notices
    #[must_use]
    pub fn with_shell(mut self, shell: Box<dyn HostShell>) -> Self {
        self.shell = Some(shell);
        self
    }

    #[must_use]
    pub fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    /// Configuration the next `start_login` launches with
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    #[must_use]
    pub fn policy(&self) -> ConcurrentLoginPolicy {
        self.policy
    }

    /// Token of the outstanding session, if any
    #[must_use]
    pub fn outstanding_token(&self) -> Option<&CorrelationToken> {
        match &self.state {
            AdapterState::Awaiting(session) => Some(session.token()),
            AdapterState::Idle | AdapterState::Disposed => None,
        }
    }

    #[must_use]
    pub fn is_awaiting_result(&self) -> bool {
        matches!(self.state, AdapterState::Awaiting(_))
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        matches!(self.state, AdapterState::Disposed)
    }

    /// Register the single authentication callback
    ///
    /// # Errors
    ///
    /// Returns `AdapterError::CallbackBusy` while a session is outstanding
    pub fn set_callback(&mut self, callback: Box<dyn AuthCallback>) -> Result<(), AdapterError> {
        if self.is_awaiting_result() {
            return Err(AdapterError::CallbackBusy);
        }
        self.callback = Some(callback);
        Ok(())
    }

    /// Start a logical login request and open the provider surface
    ///
    /// Returns the correlation token the provider result must carry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The adapter has been disposed
    /// - No callback is registered
    /// - A session is outstanding and the policy is `Reject`
    pub fn start_login(&mut self) -> Result<CorrelationToken, AdapterError> {
        if self.is_disposed() {
            return Err(AdapterError::Disposed);
        }
        if self.callback.is_none() {
            return Err(AdapterError::NoCallback);
        }

        match &self.state {
            AdapterState::Awaiting(session) => match self.policy {
                ConcurrentLoginPolicy::Reject => {
                    return Err(AdapterError::LoginInProgress(session.token().clone()));
                }
                ConcurrentLoginPolicy::Supersede => {
                    LoggingHelper::log_superseded(&self.descriptor.id, session.token());
                }
            },
            AdapterState::Idle | AdapterState::Disposed => {}
        }

        Ok(self.launch(SignInSession::new(self.config.clone())))
    }

    /// Handle the asynchronous result of a provider launch
    ///
    /// `None` stands for a delivery that carried no result at all.
    pub fn handle_provider_result(
        &mut self,
        token: &CorrelationToken,
        result: Option<RawSignInResult>,
    ) -> ResultDisposition {
        let session = match std::mem::replace(&mut self.state, AdapterState::Idle) {
            AdapterState::Awaiting(session) if session.matches(token) => session,
            other => {
                self.state = other;
                LoggingHelper::log_stale_result(&self.descriptor.id, token);
                return ResultDisposition::Stale;
            }
        };

        match self.classify(&session, result) {
            Outcome::Retry(config) => {
                LoggingHelper::log_account_mismatch_retry(&self.descriptor.id);
                // A rejected hint stays rejected for later logins too
                self.config = self.config.without_account_hint();
                self.launch(SignInSession::retry(config));
                ResultDisposition::Relaunched
            }
            Outcome::Success(identity) => {
                LoggingHelper::log_sign_in_success(
                    &self.descriptor.id,
                    &identity.unique_key,
                    session.elapsed(),
                );
                if session.config().has_account_hint() {
                    self.notify(&Notice::SignedInWithAccount {
                        email: identity.unique_key.clone(),
                    });
                }
                match self.callback.as_mut() {
                    Some(callback) => callback.on_success(identity),
                    None => error!("{} sign-in succeeded with no callback", self.descriptor.id),
                }
                ResultDisposition::Delivered
            }
            Outcome::Failure(reason) => {
                if reason.is_configuration_warning() {
                    LoggingHelper::log_developer_error(&self.descriptor.id, self.config.client_id());
                    self.notify(&Notice::DeveloperError);
                }
                LoggingHelper::log_sign_in_failure(&self.descriptor.display_name, &reason);
                match self.callback.as_mut() {
                    Some(callback) => callback.on_failure(reason),
                    None => error!("{} sign-in failed with no callback", self.descriptor.id),
                }
                ResultDisposition::Delivered
            }
        }
    }

    /// Handle a provider result delivered as JSON text
    ///
    /// Text that does not parse counts as a delivery without a result.
    pub fn handle_provider_json(
        &mut self,
        token: &CorrelationToken,
        json: &str,
    ) -> ResultDisposition {
        let result = match RawSignInResult::from_json(json) {
            Ok(result) => Some(result),
            Err(e) => {
                LoggingHelper::log_unparseable_result(&self.descriptor.id, &e);
                None
            }
        };
        self.handle_provider_result(token, result)
    }

    /// Invalidate the outstanding session; a late result is dropped as stale
    pub fn cancel(&mut self) {
        if let AdapterState::Awaiting(session) = &self.state {
            LoggingHelper::log_cancelled(&self.descriptor.id, session.token());
            self.state = AdapterState::Idle;
        }
    }

    /// Cancel, release the provider surface and refuse further logins
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.cancel();
        self.surface.close();
        self.state = AdapterState::Disposed;
        debug!("{} provider adapter disposed", self.descriptor.id);
    }

    /// Report a connection failure of the provider surface
    ///
    /// Connection failures are only logged; the outstanding session, if any,
    /// still waits for its result.
    pub fn on_connection_failed(&self, reason: &str) {
        LoggingHelper::log_connection_failed(&self.descriptor.id, reason);
    }

    fn launch(&mut self, session: SignInSession) -> CorrelationToken {
        LoggingHelper::log_launch(
            &self.descriptor.id,
            session.attempt(),
            session.config().has_account_hint(),
            session.token(),
        );
        let request = session.launch_request();
        self.state = AdapterState::Awaiting(session);
        self.surface.open(&request);
        request.token
    }

    fn classify(&self, session: &SignInSession, result: Option<RawSignInResult>) -> Outcome {
        let Some(result) = result else {
            return Outcome::Failure(FailureReason::NoResult);
        };

        if result.is_success() {
            let Some(account) = result.account else {
                return Outcome::Failure(FailureReason::MalformedResult(
                    "success status without an account".to_string(),
                ));
            };
            return match NormalizedIdentity::from_account(&self.descriptor.id, &account) {
                Ok(identity) => Outcome::Success(identity),
                Err(e) => Outcome::Failure(FailureReason::MalformedResult(e.to_string())),
            };
        }

        let status = result.status;
        match status.code {
            StatusCode::INVALID_ACCOUNT if !session.is_retried() => {
                Outcome::Retry(session.config().without_account_hint())
            }
            StatusCode::INVALID_ACCOUNT => Outcome::Failure(FailureReason::AccountMismatch {
                message: status.describe(),
            }),
            StatusCode::DEVELOPER_ERROR => Outcome::Failure(FailureReason::Misconfiguration {
                code: status.code,
                message: status.describe(),
            }),
            code => Outcome::Failure(FailureReason::ProviderFailure {
                code,
                message: status.describe(),
            }),
        }
    }

    fn notify(&mut self, notice: &Notice) {
        if let Some(shell) = self.shell.as_mut() {
            shell.show_notice(notice);
        }
    }
}

impl Drop for GoogleProviderAdapter {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::constants::TEST_EMAIL;
    use crate::testing::fixtures::TestFixtures;
    use crate::settings::ProviderSettings;
    use crate::testing::mock::{CallbackEvent, RecordingCallback, RecordingSurface};

    #[test]
    fn test_start_login_requires_callback() {
        let surface = RecordingSurface::new();
        let mut adapter = GoogleProviderAdapter::new(ProviderConfig::default(), surface.boxed());

        assert!(matches!(adapter.start_login(), Err(AdapterError::NoCallback)));
        assert_eq!(surface.launch_count(), 0);
    }

    #[test]
    fn test_start_login_opens_surface_with_config() {
        let config = TestFixtures::hinted_config("a@x.com");
        let mut harness = TestFixtures::harness(config.clone());

        let token = harness.adapter.start_login().unwrap();

        let launch = harness.surface.last_launch().unwrap();
        assert_eq!(launch.token, token);
        assert_eq!(launch.config, config);
        assert_eq!(harness.adapter.outstanding_token(), Some(&token));
    }

    #[test]
    fn test_supersede_policy_invalidates_prior_token() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());

        let first = harness.adapter.start_login().unwrap();
        let second = harness.adapter.start_login().unwrap();
        assert_ne!(first, second);
        assert_eq!(harness.surface.launch_count(), 2);

        let disposition = harness
            .adapter
            .handle_provider_result(&first, Some(TestFixtures::success_result(TEST_EMAIL)));
        assert_eq!(disposition, ResultDisposition::Stale);
        assert!(harness.callback.events().is_empty());
        assert_eq!(harness.adapter.outstanding_token(), Some(&second));
    }

    #[test]
    fn test_reject_policy_keeps_outstanding_session() {
        let mut harness = TestFixtures::harness_with_policy(
            ProviderConfig::default(),
            ConcurrentLoginPolicy::Reject,
        );

        let first = harness.adapter.start_login().unwrap();
        match harness.adapter.start_login() {
            Err(AdapterError::LoginInProgress(token)) => assert_eq!(token, first),
            other => panic!("expected LoginInProgress, got {other:?}"),
        }
        assert_eq!(harness.surface.launch_count(), 1);
        assert_eq!(harness.adapter.outstanding_token(), Some(&first));
    }

    #[test]
    fn test_set_callback_rejected_while_outstanding() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        let replacement = RecordingCallback::new();
        assert!(matches!(
            harness.adapter.set_callback(replacement.boxed()),
            Err(AdapterError::CallbackBusy)
        ));

        harness
            .adapter
            .handle_provider_result(&token, Some(TestFixtures::success_result(TEST_EMAIL)));
        assert_eq!(harness.callback.success_count(), 1);
        assert!(replacement.events().is_empty());

        // Idle again, so replacement is allowed
        assert!(harness.adapter.set_callback(replacement.boxed()).is_ok());
    }

    #[test]
    fn test_missing_result_reports_no_result() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        let disposition = harness.adapter.handle_provider_result(&token, None);

        assert_eq!(disposition, ResultDisposition::Delivered);
        assert_eq!(
            harness.callback.events(),
            vec![CallbackEvent::Failure(FailureReason::NoResult)]
        );
        assert!(!harness.adapter.is_awaiting_result());
    }

    #[test]
    fn test_success_without_account_is_malformed() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        let result = RawSignInResult {
            account: None,
            ..TestFixtures::success_result(TEST_EMAIL)
        };
        harness.adapter.handle_provider_result(&token, Some(result));

        let events = harness.callback.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            CallbackEvent::Failure(FailureReason::MalformedResult(_))
        ));
    }

    #[test]
    fn test_success_without_email_is_malformed() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        let mut result = TestFixtures::success_result(TEST_EMAIL);
        if let Some(account) = result.account.as_mut() {
            account.email = None;
        }
        harness.adapter.handle_provider_result(&token, Some(result));

        assert_eq!(harness.callback.failure_count(), 1);
        assert_eq!(harness.callback.success_count(), 0);
    }

    #[test]
    fn test_unparseable_json_reports_no_result() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        let disposition = harness.adapter.handle_provider_json(&token, "{not json");

        assert_eq!(disposition, ResultDisposition::Delivered);
        assert_eq!(
            harness.callback.events(),
            vec![CallbackEvent::Failure(FailureReason::NoResult)]
        );
    }

    #[test]
    fn test_json_success_is_delivered() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        let json = serde_json::to_string(&TestFixtures::success_result(TEST_EMAIL)).unwrap();
        harness.adapter.handle_provider_json(&token, &json);

        assert_eq!(harness.callback.success_count(), 1);
    }

    #[test]
    fn test_cached_success_is_delivered() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        let json = r#"{"status":{"code":-1},"account":{"email":"b@x.com","idToken":"t"}}"#;
        let disposition = harness.adapter.handle_provider_json(&token, json);

        assert_eq!(disposition, ResultDisposition::Delivered);
        assert_eq!(harness.callback.success_count(), 1);
        assert_eq!(harness.callback.failure_count(), 0);
        assert!(!harness.adapter.is_awaiting_result());
    }

    #[test]
    fn test_retry_forgets_stale_hint_for_later_logins() {
        let mut harness = TestFixtures::harness(TestFixtures::hinted_config("a@x.com"));
        let token = harness.adapter.start_login().unwrap();

        harness
            .adapter
            .handle_provider_result(&token, Some(TestFixtures::invalid_account_result()));

        assert!(!harness.adapter.config().has_account_hint());
    }

    #[test]
    fn test_invalid_account_without_hint_still_retries_once() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        let disposition = harness
            .adapter
            .handle_provider_result(&token, Some(TestFixtures::invalid_account_result()));

        assert_eq!(disposition, ResultDisposition::Relaunched);
        assert_eq!(harness.surface.launch_count(), 2);
        assert!(harness.callback.events().is_empty());
    }

    #[test]
    fn test_developer_error_shows_notice() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        harness
            .adapter
            .handle_provider_result(&token, Some(TestFixtures::developer_error_result()));

        assert_eq!(harness.shell.notices(), vec![Notice::DeveloperError]);
        assert_eq!(harness.callback.failure_count(), 1);
    }

    #[test]
    fn test_dispose_closes_surface_and_refuses_logins() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        harness.adapter.dispose();
        assert!(harness.surface.was_closed());
        assert!(harness.adapter.is_disposed());
        assert!(matches!(
            harness.adapter.start_login(),
            Err(AdapterError::Disposed)
        ));

        let disposition = harness
            .adapter
            .handle_provider_result(&token, Some(TestFixtures::success_result(TEST_EMAIL)));
        assert_eq!(disposition, ResultDisposition::Stale);
        assert!(harness.callback.events().is_empty());
    }

    #[test]
    fn test_disposed_adapter_without_callback_reports_disposed() {
        let surface = RecordingSurface::new();
        let mut adapter = GoogleProviderAdapter::new(ProviderConfig::default(), surface.boxed());

        adapter.dispose();

        assert!(matches!(adapter.start_login(), Err(AdapterError::Disposed)));
        assert_eq!(surface.launch_count(), 0);
    }

    #[test]
    fn test_dropping_adapter_closes_surface() {
        let harness = TestFixtures::harness(ProviderConfig::default());
        let surface = harness.surface.clone();
        assert!(!surface.was_closed());

        drop(harness);

        assert!(surface.was_closed());
    }

    #[test]
    fn test_connection_failure_keeps_session() {
        let mut harness = TestFixtures::harness(ProviderConfig::default());
        let token = harness.adapter.start_login().unwrap();

        harness.adapter.on_connection_failed("SERVICE_MISSING");
        assert_eq!(harness.adapter.outstanding_token(), Some(&token));
    }

    #[test]
    fn test_from_settings_uses_google_provider() {
        let mut settings = IdpSettings::default();
        settings.adapter.concurrent_login = ConcurrentLoginPolicy::Reject;
        settings.providers = vec![ProviderSettings {
            display_name: Some("Google Workspace".to_string()),
            scopes: vec!["calendar".to_string()],
            account_hint: Some("a@x.com".to_string()),
            ..Default::default()
        }];

        let adapter =
            GoogleProviderAdapter::from_settings(&settings, RecordingSurface::new().boxed())
                .unwrap();

        assert_eq!(adapter.descriptor().display_name, "Google Workspace");
        assert_eq!(adapter.policy(), ConcurrentLoginPolicy::Reject);
        assert_eq!(adapter.config().account_hint(), Some("a@x.com"));
        assert!(adapter.config().scopes().contains("calendar"));
    }

    #[test]
    fn test_from_settings_rejects_disabled_or_missing_provider() {
        let mut settings = IdpSettings::default();
        settings.providers[0].enabled = false;
        assert!(matches!(
            GoogleProviderAdapter::from_settings(&settings, RecordingSurface::new().boxed()),
            Err(ConfigError::ProviderDisabled(_))
        ));

        settings.providers.clear();
        assert!(matches!(
            GoogleProviderAdapter::from_settings(&settings, RecordingSurface::new().boxed()),
            Err(ConfigError::UnknownProvider(_))
        ));
    }
}
