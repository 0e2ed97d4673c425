#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{bail, Context, Result};
use idp_signin::{
    create_auth_credential, AuthCallback, FailureReason, GoogleProviderAdapter, HostShell,
    IdpSettings, LaunchRequest, NormalizedIdentity, Notice, ProviderSurface, ResultDisposition,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

/// Everything the scripted host reacts to, delivered in order on one channel
enum HostEvent {
    Launched(LaunchRequest),
    Finished(Result<NormalizedIdentity, FailureReason>),
}

/// Provider surface that hands launch requests to the host loop
struct ChannelSurface {
    events: UnboundedSender<HostEvent>,
}

impl ProviderSurface for ChannelSurface {
    fn open(&mut self, request: &LaunchRequest) {
        let _ = self.events.send(HostEvent::Launched(request.clone()));
    }
}

struct ChannelCallback {
    events: UnboundedSender<HostEvent>,
}

impl AuthCallback for ChannelCallback {
    fn on_success(&mut self, identity: NormalizedIdentity) {
        let _ = self.events.send(HostEvent::Finished(Ok(identity)));
    }

    fn on_failure(&mut self, reason: FailureReason) {
        let _ = self.events.send(HostEvent::Finished(Err(reason)));
    }
}

struct ConsoleShell;

impl HostShell for ConsoleShell {
    fn show_notice(&mut self, notice: &Notice) {
        eprintln!("ℹ {notice}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = IdpSettings::load().context("Failed to load settings")?;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut adapter = GoogleProviderAdapter::from_settings(
        &settings,
        Box::new(ChannelSurface {
            events: events_tx.clone(),
        }),
    )
    .context("Failed to configure the Google provider")?
    .with_shell(Box::new(ConsoleShell));
    adapter.set_callback(Box::new(ChannelCallback { events: events_tx }))?;

    print_startup_info(&adapter);
    adapter.start_login()?;

    // Each launch is answered by the next line of stdin, read as the raw provider result
    let mut results = BufReader::new(tokio::io::stdin()).lines();
    while let Some(event) = events_rx.recv().await {
        match event {
            HostEvent::Launched(request) => {
                println!("{}", serde_json::to_string(&request)?);
                let Some(line) = results
                    .next_line()
                    .await
                    .context("Failed to read provider result")?
                else {
                    adapter.dispose();
                    bail!("Provider result stream closed before sign-in finished");
                };
                if adapter.handle_provider_json(&request.token, &line) == ResultDisposition::Stale
                {
                    bail!("Provider result for {} was not accepted", request.token);
                }
            }
            HostEvent::Finished(Ok(identity)) => {
                println!("{}", serde_json::to_string_pretty(&identity)?);
                match create_auth_credential(&identity) {
                    Ok(credential) => println!(
                        "✓ Credential ready for exchange with provider {}",
                        credential.provider_id
                    ),
                    Err(e) => eprintln!("⚠️  {e}"),
                }
                return Ok(());
            }
            HostEvent::Finished(Err(reason)) => {
                eprintln!("✗ Sign-in failed [{}]: {reason}", reason.tag());
                adapter.dispose();
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_startup_info(adapter: &GoogleProviderAdapter) {
    let descriptor = adapter.descriptor();
    let config = adapter.config();
    eprintln!("Starting {} sign-in ({})", descriptor.display_name, descriptor.id);
    eprintln!(
        "  Scopes: {}",
        config
            .effective_scopes()
            .into_iter()
            .collect::<Vec<_>>()
            .join(" ")
    );
    eprintln!("  Account hint: {}", config.account_hint().unwrap_or("none"));
    eprintln!("  Concurrent login policy: {:?}", adapter.policy());
    eprintln!();
    eprintln!("Launch requests are written to stdout as JSON.");
    eprintln!("Answer each one with a provider result on stdin, for example:");
    eprintln!(r#"  {{"status":{{"code":0}},"account":{{"email":"b@x.com","displayName":"B"}}}}"#);
    eprintln!(r#"  {{"status":{{"code":5,"message":"Invalid account"}}}}"#);
}
