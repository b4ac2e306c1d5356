//! Reqwest-backed user directory adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP status mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::{NewUserRecordDto, UserRecordDto};
use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{ExternalUserId, NewUserRecord, UserRecord};
use crate::outbound::{body_preview, join_segments};

const USERS_SEGMENT: &str = "users";

/// User directory adapter speaking JSON over HTTP.
pub struct HttpUserDirectory {
    client: Client,
    base_url: Url,
}

impl HttpUserDirectory {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn users_url(&self) -> Result<Url, UserDirectoryError> {
        endpoint(&self.base_url, &[USERS_SEGMENT])
    }

    fn user_url(&self, external_id: &ExternalUserId) -> Result<Url, UserDirectoryError> {
        endpoint(&self.base_url, &[USERS_SEGMENT, external_id.as_ref()])
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn lookup(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<UserRecord>, UserDirectoryError> {
        let url = self.user_url(external_id)?;
        debug!(%url, "looking up user record");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), external_id));
        }
        parse_record(body.as_ref()).map(Some)
    }

    async fn create(&self, fields: &NewUserRecord) -> Result<UserRecord, UserDirectoryError> {
        let url = self.users_url()?;
        debug!(%url, external_id = %fields.external_id, "creating user record");
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&NewUserRecordDto::from(fields))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(
                status,
                body.as_ref(),
                &fields.external_id,
            ));
        }
        parse_record(body.as_ref())
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, UserDirectoryError> {
    join_segments(base, segments.iter().copied()).ok_or_else(|| {
        UserDirectoryError::transport(format!("directory base URL cannot carry a path: {base}"))
    })
}

fn parse_record(body: &[u8]) -> Result<UserRecord, UserDirectoryError> {
    let decoded: UserRecordDto = serde_json::from_slice(body).map_err(|error| {
        UserDirectoryError::decode(format!("invalid user record payload: {error}"))
    })?;
    decoded.into_domain().map_err(UserDirectoryError::decode)
}

fn map_transport_error(error: reqwest::Error) -> UserDirectoryError {
    if error.is_timeout() {
        UserDirectoryError::timeout(error.to_string())
    } else {
        UserDirectoryError::transport(error.to_string())
    }
}

fn map_status_error(
    status: StatusCode,
    body: &[u8],
    external_id: &ExternalUserId,
) -> UserDirectoryError {
    match status {
        StatusCode::CONFLICT => UserDirectoryError::conflict(external_id.as_ref()),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            UserDirectoryError::timeout(format!("status {}", status.as_u16()))
        }
        _ => UserDirectoryError::server(status.as_u16(), body_preview(body)),
    }
}
