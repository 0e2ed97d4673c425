// Centralized logging for the sign-in flow so every adapter reports the same events the same way
use crate::models::FailureReason;
use crate::provider::ProviderDescriptor;
use crate::session::CorrelationToken;
use chrono::Duration;
use log::{debug, error, info, warn};

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log provider initialization status
    pub fn log_provider_init(descriptor: &ProviderDescriptor, client_id_configured: bool) {
        if client_id_configured {
            info!(
                "✅ {} sign-in configured ({})",
                descriptor.display_name, descriptor.id
            );
        } else {
            warn!(
                "⚠️  {} sign-in configured without a web client id - no ID token will be requested",
                descriptor.display_name
            );
        }
    }

    /// Log a launch of the provider surface
    pub fn log_launch(provider: &str, attempt: u8, hinted: bool, token: &CorrelationToken) {
        info!(
            "🔄 Launching {provider} sign-in (attempt {attempt}, account hint: {})",
            if hinted { "pinned" } else { "none" }
        );
        debug!("{provider} sign-in session token: {token}");
    }

    /// Log that an outstanding session was replaced by a new login
    pub fn log_superseded(provider: &str, token: &CorrelationToken) {
        info!("⏭️  Superseding outstanding {provider} sign-in session {token}");
    }

    /// Log that an outstanding session was cancelled by the host
    pub fn log_cancelled(provider: &str, token: &CorrelationToken) {
        info!("Cancelled {provider} sign-in session {token}");
    }

    /// Log a result that does not belong to the outstanding session
    pub fn log_stale_result(provider: &str, token: &CorrelationToken) {
        debug!("Discarding stale {provider} sign-in result for session {token}");
    }

    /// Log a raw result that could not be parsed
    pub fn log_unparseable_result(provider: &str, err: &serde_json::Error) {
        warn!("Could not parse {provider} sign-in result: {err}");
    }

    /// Log the bounded retry after the provider rejected the pinned account
    pub fn log_account_mismatch_retry(provider: &str) {
        info!("🔁 {provider} rejected the cached account, retrying once without the account hint");
    }

    /// Log a misconfiguration reported by the provider
    pub fn log_developer_error(provider: &str, client_id: Option<&str>) {
        warn!(
            "Developer error: this application is misconfigured for {provider}. \
             Check the signing certificate fingerprint, package name and web client id ({})",
            client_id.unwrap_or("not set")
        );
    }

    /// Log a terminal sign-in failure
    pub fn log_sign_in_failure(display_name: &str, reason: &FailureReason) {
        error!(
            "Error logging in with {display_name}. [{}] {reason}",
            reason.tag()
        );
    }

    /// Log a successful sign-in
    pub fn log_sign_in_success(provider: &str, unique_key: &str, elapsed: Duration) {
        info!(
            "🎯 {provider} sign-in succeeded for {unique_key} after {}ms",
            elapsed.num_milliseconds()
        );
    }

    /// Log a connection failure reported by the provider surface
    pub fn log_connection_failed(provider: &str, reason: &str) {
        warn!("{provider} connection failed: {reason}");
    }
}
