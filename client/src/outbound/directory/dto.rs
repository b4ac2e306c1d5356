//! Wire shapes exchanged with the backend user directory.

use serde::{Deserialize, Serialize};

use crate::domain::{ExternalUserId, NewUserRecord, Role, UserRecord};

/// User record as returned by `GET /users/{id}` and `POST /users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserRecordDto {
    external_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl UserRecordDto {
    /// Convert into the domain record. Missing or unknown roles become
    /// [`Role::Guest`].
    pub(super) fn into_domain(self) -> Result<UserRecord, String> {
        let external_id = ExternalUserId::new(self.external_id)
            .map_err(|error| format!("invalid externalId: {error}"))?;
        let role = self
            .role
            .as_deref()
            .map_or(Role::Guest, Role::from_backend_lenient);
        Ok(UserRecord {
            external_id,
            email: self.email.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            phone: self.phone.filter(|phone| !phone.trim().is_empty()),
            role,
        })
    }
}

/// Body of `POST /users`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NewUserRecordDto<'a> {
    external_id: &'a str,
    email: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
    role: &'static str,
}

impl<'a> From<&'a NewUserRecord> for NewUserRecordDto<'a> {
    fn from(fields: &'a NewUserRecord) -> Self {
        Self {
            external_id: fields.external_id.as_ref(),
            email: fields.email.as_str(),
            name: fields.name.as_str(),
            phone: fields.phone.as_deref(),
            role: fields.role.as_backend_str(),
        }
    }
}
