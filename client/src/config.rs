//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `PLOT_CLIENT_*` environment variables or a config file;
//! identity fields for a run are passed on the command line instead.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{GeoPoint, GeofenceValidationError, OfficeGeofence};

const DEFAULT_DIRECTORY_URL: &str = "http://localhost:8080/api";
const DEFAULT_IDENTITY_URL: &str = "http://localhost:8081/v1";
const DEFAULT_OFFICE_RADIUS_METRES: f64 = 150.0;
const DEFAULT_MAX_ACCURACY_METRES: f64 = 50.0;

/// Errors raised while turning raw settings into typed values.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{field} is not a valid URL: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("office latitude and longitude must be configured together")]
    IncompleteOffice,
    #[error(transparent)]
    Geofence(#[from] GeofenceValidationError),
}

/// Configuration values for the role guard and attendance check-in.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PLOT_CLIENT")]
pub struct ClientSettings {
    /// Base URL of the backend user directory.
    pub directory_url: Option<String>,
    /// Base URL of the identity provider's admin API.
    pub identity_url: Option<String>,
    /// Secret used to authenticate identity-provider metadata writes.
    pub identity_secret: Option<String>,
    /// Per-request timeout for outbound HTTP calls, in seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// Office latitude for attendance check-ins.
    pub office_latitude: Option<f64>,
    /// Office longitude for attendance check-ins.
    pub office_longitude: Option<f64>,
    /// Geofence radius around the office.
    pub office_radius_metres: Option<f64>,
    /// Largest position uncertainty accepted for a check-in.
    pub max_accuracy_metres: Option<f64>,
}

impl ClientSettings {
    /// Directory base URL, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the configured value does
    /// not parse.
    pub fn directory_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "directory_url",
            self.directory_url.as_deref().unwrap_or(DEFAULT_DIRECTORY_URL),
        )
    }

    /// Identity-provider base URL, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the configured value does
    /// not parse.
    pub fn identity_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "identity_url",
            self.identity_url.as_deref().unwrap_or(DEFAULT_IDENTITY_URL),
        )
    }

    /// Identity-provider secret; empty when unset so writes fail with an
    /// authorisation error rather than at startup.
    pub fn identity_secret(&self) -> &str {
        self.identity_secret.as_deref().unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Office geofence, or `None` when no office location is configured.
    ///
    /// # Errors
    ///
    /// Returns an error when only one coordinate is set or a value is out of
    /// range.
    pub fn office_geofence(&self) -> Result<Option<OfficeGeofence>, SettingsError> {
        let (latitude, longitude) = match (self.office_latitude, self.office_longitude) {
            (None, None) => return Ok(None),
            (Some(latitude), Some(longitude)) => (latitude, longitude),
            _ => return Err(SettingsError::IncompleteOffice),
        };
        let geofence = OfficeGeofence::new(
            GeoPoint::new(latitude, longitude)?,
            self.office_radius_metres
                .unwrap_or(DEFAULT_OFFICE_RADIUS_METRES),
            self.max_accuracy_metres
                .unwrap_or(DEFAULT_MAX_ACCURACY_METRES),
        )?;
        Ok(Some(geofence))
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|source| SettingsError::InvalidUrl { field, source })
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "PLOT_CLIENT_DIRECTORY_URL",
        "PLOT_CLIENT_IDENTITY_URL",
        "PLOT_CLIENT_IDENTITY_SECRET",
        "PLOT_CLIENT_REQUEST_TIMEOUT_SECS",
        "PLOT_CLIENT_OFFICE_LATITUDE",
        "PLOT_CLIENT_OFFICE_LONGITUDE",
        "PLOT_CLIENT_OFFICE_RADIUS_METRES",
        "PLOT_CLIENT_MAX_ACCURACY_METRES",
    ];

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("role-guard")])
            .expect("config should load")
    }

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|var| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == var)
                    .map(|(_, value)| (*value).to_owned());
                (*var, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(env_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.directory_url().expect("default url").as_str(),
            "http://localhost:8080/api"
        );
        assert_eq!(settings.identity_secret(), "");
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert!(settings.office_geofence().expect("no office").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("PLOT_CLIENT_DIRECTORY_URL", "https://api.plots.test/v2"),
            ("PLOT_CLIENT_IDENTITY_SECRET", "sk_live"),
            ("PLOT_CLIENT_REQUEST_TIMEOUT_SECS", "3"),
            ("PLOT_CLIENT_OFFICE_LATITUDE", "17.385"),
            ("PLOT_CLIENT_OFFICE_LONGITUDE", "78.4867"),
            ("PLOT_CLIENT_OFFICE_RADIUS_METRES", "80"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.directory_url().expect("configured url").as_str(),
            "https://api.plots.test/v2"
        );
        assert_eq!(settings.identity_secret(), "sk_live");
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
        let geofence = settings
            .office_geofence()
            .expect("valid office")
            .expect("office configured");
        assert!((geofence.radius_metres() - 80.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn rejects_unparseable_urls() {
        let _guard = lock_env(env_with(&[("PLOT_CLIENT_IDENTITY_URL", "not a url")]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.identity_url(),
            Err(SettingsError::InvalidUrl {
                field: "identity_url",
                ..
            })
        ));
    }

    #[rstest]
    fn rejects_half_configured_office() {
        let _guard = lock_env(env_with(&[("PLOT_CLIENT_OFFICE_LATITUDE", "17.385")]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.office_geofence(),
            Err(SettingsError::IncompleteOffice)
        ));
    }
}
