//! Reqwest-backed identity-provider metadata writer.
//!
//! Only the role claim inside the user's public metadata is written. The
//! provider's API secret is sent as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{ExternalUserId, Role};
use crate::outbound::{body_preview, join_segments};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MetadataPatch<'a> {
    public_metadata: RoleMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct RoleMetadata<'a> {
    role: &'a str,
}

impl MetadataPatch<'static> {
    fn for_role(role: Role) -> Self {
        Self {
            public_metadata: RoleMetadata {
                role: role.as_claim_str(),
            },
        }
    }
}

/// Identity provider adapter writing role claims over HTTP.
pub struct HttpIdentityProvider {
    client: Client,
    base_url: Url,
    secret: String,
}

impl HttpIdentityProvider {
    /// Build an adapter authenticated with the provider's API `secret`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            secret: secret.into(),
        })
    }

    fn metadata_url(&self, external_id: &ExternalUserId) -> Result<Url, IdentityProviderError> {
        join_segments(&self.base_url, ["users", external_id.as_ref(), "metadata"]).ok_or_else(
            || {
                IdentityProviderError::transport(format!(
                    "identity base URL cannot carry a path: {}",
                    self.base_url
                ))
            },
        )
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn set_role_claim(
        &self,
        external_id: &ExternalUserId,
        role: Role,
    ) -> Result<(), IdentityProviderError> {
        let url = self.metadata_url(external_id)?;
        debug!(%url, %role, "writing role claim");
        let response = self
            .client
            .patch(url)
            .bearer_auth(&self.secret)
            .json(&MetadataPatch::for_role(role))
            .send()
            .await
            .map_err(|error| IdentityProviderError::transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| IdentityProviderError::transport(error.to_string()))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            IdentityProviderError::unauthorised(body_preview(body))
        }
        _ => IdentityProviderError::rejected(status.as_u16(), body_preview(body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Role::Guest, "guest")]
    #[case(Role::Client, "client")]
    #[case(Role::Manager, "manager")]
    fn patch_body_nests_lowercase_role(#[case] role: Role, #[case] expected: &str) {
        let body = serde_json::to_value(MetadataPatch::for_role(role)).expect("serialises");
        assert_eq!(body, json!({ "publicMetadata": { "role": expected } }));
    }

    #[rstest]
    #[case(StatusCode::UNAUTHORIZED)]
    #[case(StatusCode::FORBIDDEN)]
    fn credential_failures_are_unauthorised(#[case] status: StatusCode) {
        let error = map_status_error(status, b"bad key");
        assert_eq!(error, IdentityProviderError::unauthorised("bad key"));
    }

    #[test]
    fn other_failures_are_rejections() {
        let error = map_status_error(StatusCode::UNPROCESSABLE_ENTITY, b"{ \"error\": 1 }");
        assert_eq!(
            error,
            IdentityProviderError::rejected(422_u16, "{ \"error\": 1 }")
        );
    }

    #[test]
    fn metadata_url_nests_under_user() {
        let provider = HttpIdentityProvider::new(
            Url::parse("https://id.plots.test/v1").expect("valid base"),
            "sk_test",
            Duration::from_secs(5),
        )
        .expect("client builds");
        let id = ExternalUserId::new("u_42").expect("valid id");

        let url = provider.metadata_url(&id).expect("url builds");

        assert_eq!(url.as_str(), "https://id.plots.test/v1/users/u_42/metadata");
    }
}
