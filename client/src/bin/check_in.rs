//! Record a manager attendance check-in from a position fix supplied on the
//! command line.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use client::config::ClientSettings;
use client::domain::{AttendanceService, ExternalUserId, GeoPoint, PositionFix};
use client::outbound::attendance::HttpAttendanceLedger;
use client::outbound::location::FixedLocation;

/// `check-in` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "check-in",
    about = "Check a manager in at the office if the supplied position is inside the geofence",
    version
)]
struct CliArgs {
    /// Identity-provider user id of the manager.
    #[arg(long = "external-id", value_name = "id")]
    external_id: String,
    /// Latitude of the device fix, in decimal degrees.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    latitude: f64,
    /// Longitude of the device fix, in decimal degrees.
    #[arg(long, value_name = "degrees", allow_negative_numbers = true)]
    longitude: f64,
    /// Horizontal accuracy reported with the fix, in metres.
    #[arg(long = "accuracy-metres", value_name = "metres", allow_negative_numbers = true)]
    accuracy_metres: Option<f64>,
}

impl CliArgs {
    fn user_id(&self) -> Result<ExternalUserId> {
        ExternalUserId::new(self.external_id.as_str()).wrap_err("invalid --external-id")
    }

    fn fix(&self) -> Result<PositionFix> {
        let point = GeoPoint::new(self.latitude, self.longitude).wrap_err("invalid position")?;
        Ok(PositionFix {
            point,
            accuracy_metres: self.accuracy_metres,
        })
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = CliArgs::try_parse()?;
    let settings = ClientSettings::load_from_iter([OsString::from("check-in")])
        .map_err(|error| eyre!("load client settings: {error}"))?;
    let geofence = settings
        .office_geofence()?
        .ok_or_else(|| eyre!("office location is not configured"))?;

    let ledger = HttpAttendanceLedger::new(settings.directory_url()?, settings.request_timeout())
        .wrap_err("build attendance ledger client")?;
    let service = AttendanceService::new(
        Arc::new(FixedLocation::new(args.fix()?)),
        Arc::new(ledger),
        Arc::new(DefaultClock),
        geofence,
    );

    let check_in = service.check_in(&args.user_id()?).await?;
    println!(
        "checked-in distance_metres={:.0} at={}",
        check_in.distance_metres,
        check_in.checked_in_at.to_rfc3339()
    );
    Ok(())
}
