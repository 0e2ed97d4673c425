//! Provider-agnostic identity and credential types

pub mod auth;

pub use auth::{CredentialError, FailureReason, NormalizeError};

use crate::provider::SignInAccount;
use crate::utils::non_blank;
use log::warn;
use serde::{Deserialize, Serialize};
use url::Url;

/// Provider-agnostic profile produced by a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedIdentity {
    pub provider_id: String,
    /// Provider-issued unique user identifier (the account email for Google)
    pub unique_key: String,
    pub display_name: Option<String>,
    pub photo_ref: Option<String>,
    /// Signed identity token, empty when the provider returned none
    pub raw_token: String,
}

impl NormalizedIdentity {
    /// Normalize a provider success payload
    ///
    /// Blank optional fields become `None`. A photo reference that is not an
    /// absolute URL is dropped.
    ///
    /// # Errors
    ///
    /// Returns `NormalizeError::MissingUniqueKey` if the payload has no email
    pub fn from_account(
        provider_id: &str,
        account: &SignInAccount,
    ) -> Result<Self, NormalizeError> {
        let unique_key =
            non_blank(account.email.as_deref()).ok_or(NormalizeError::MissingUniqueKey)?;

        let photo_ref = non_blank(account.photo_url.as_deref()).and_then(|photo| {
            match Url::parse(&photo) {
                Ok(url) => Some(String::from(url)),
                Err(e) => {
                    warn!("Dropping invalid photo reference for {provider_id} account: {e}");
                    None
                }
            }
        });

        Ok(Self {
            provider_id: provider_id.to_string(),
            unique_key,
            display_name: non_blank(account.display_name.as_deref()),
            photo_ref,
            raw_token: account.id_token.clone().unwrap_or_default(),
        })
    }
}

/// Credential handed to the backend identity service for exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthCredential {
    pub provider_id: String,
    pub id_token: String,
}

/// Build the backend credential for a normalized identity
///
/// # Errors
///
/// Returns `CredentialError::MissingIdToken` if the identity carries no token
pub fn create_auth_credential(
    identity: &NormalizedIdentity,
) -> Result<AuthCredential, CredentialError> {
    if identity.raw_token.is_empty() {
        return Err(CredentialError::MissingIdToken(
            identity.provider_id.clone(),
        ));
    }

    Ok(AuthCredential {
        provider_id: identity.provider_id.clone(),
        id_token: identity.raw_token.clone(),
    })
}
