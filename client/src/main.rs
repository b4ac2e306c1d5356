//! Run the role guard once for an identity supplied on the command line.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use client::config::ClientSettings;
use client::domain::ports::Navigator;
use client::domain::{
    Destination, ExternalUserId, Identity, RoleGuard, RoleGuardPorts, SessionState,
};
use client::inbound::{SessionWatcher, WatchSession};
use client::outbound::directory::HttpUserDirectory;
use client::outbound::identity::HttpIdentityProvider;
use client::outbound::navigation::StackNavigator;

/// `role-guard` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "role-guard",
    about = "Resolve a signed-in user's role and report the home screen they land on",
    version
)]
struct CliArgs {
    /// Identity-provider user id.
    #[arg(long = "external-id", value_name = "id")]
    external_id: String,
    /// Primary email address.
    #[arg(long, value_name = "address")]
    email: Option<String>,
    /// Full display name.
    #[arg(long = "full-name", value_name = "name")]
    full_name: Option<String>,
    /// First name.
    #[arg(long = "first-name", value_name = "name")]
    first_name: Option<String>,
    /// Primary phone number.
    #[arg(long, value_name = "number")]
    phone: Option<String>,
    /// Role claim currently cached by the identity provider.
    #[arg(long = "role-claim", value_name = "role")]
    role_claim: Option<String>,
}

impl CliArgs {
    fn identity(&self) -> Result<Identity> {
        let external_id = ExternalUserId::new(self.external_id.as_str())
            .wrap_err("invalid --external-id")?;
        let mut identity = Identity::new(external_id);
        if let Some(email) = &self.email {
            identity = identity.with_primary_email(email.as_str());
        }
        if let Some(full_name) = &self.full_name {
            identity = identity.with_full_name(full_name.as_str());
        }
        if let Some(first_name) = &self.first_name {
            identity = identity.with_first_name(first_name.as_str());
        }
        if let Some(phone) = &self.phone {
            identity = identity.with_primary_phone(phone.as_str());
        }
        if let Some(claim) = &self.role_claim {
            identity = identity.with_role_claim(claim.as_str());
        }
        Ok(identity)
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
    let settings = ClientSettings::load_from_iter([OsString::from("role-guard")])
        .map_err(|error| eyre!("load client settings: {error}"))?;

    let timeout = settings.request_timeout();
    let directory = HttpUserDirectory::new(settings.directory_url()?, timeout)
        .wrap_err("build directory client")?;
    let identity_provider = HttpIdentityProvider::new(
        settings.identity_url()?,
        settings.identity_secret(),
        timeout,
    )
    .wrap_err("build identity provider client")?;

    let (sender, receiver) = watch::channel(SessionState::SignedIn(args.identity()?));
    let navigator = Arc::new(StackNavigator::starting_at(Destination::SignIn));
    let guard = Arc::new(RoleGuard::new(RoleGuardPorts {
        directory: Arc::new(directory),
        identity_provider: Arc::new(identity_provider),
        session: Arc::new(WatchSession::new(receiver.clone())),
        navigator: navigator.clone(),
    }));

    let watcher = SessionWatcher::new(guard, receiver);
    drop(sender);
    let completed = watcher.run().await;
    info!(completed, "session watcher stopped");

    let landed = navigator
        .current()
        .ok_or_else(|| eyre!("navigation stack is empty"))?;
    println!("destination={landed}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_identity_from_flags() {
        let args = CliArgs::try_parse_from([
            "role-guard",
            "--external-id",
            "u_42",
            "--email",
            "a@b.com",
            "--role-claim",
            "MANAGER",
        ])
        .expect("arguments parse");

        let identity = args.identity().expect("valid identity");

        assert_eq!(identity.external_id().as_ref(), "u_42");
        assert_eq!(identity.primary_email(), Some("a@b.com"));
        assert_eq!(identity.role_claim(), Some("MANAGER"));
        assert_eq!(identity.full_name(), None);
    }

    #[test]
    fn rejects_padded_external_id() {
        let args = CliArgs::try_parse_from(["role-guard", "--external-id", " u_42"])
            .expect("arguments parse");
        assert!(args.identity().is_err());
    }
}
