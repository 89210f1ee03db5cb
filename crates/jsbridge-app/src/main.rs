// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSBridge demo
//
// Entry point. Initialises logging, loads the bridge configuration, and runs
// a round of calls against simulated Android and iOS hosts.
//
// Usage: jsbridge-demo [config.json]

mod simulator;

use std::sync::Arc;

use jsbridge_core::BridgeConfig;
use jsbridge_core::error::{BridgeError, Result};
use jsbridge_registry::{JsBridge, bridge_args};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

#[derive(Debug, Deserialize)]
struct UserInfo {
    name: String,
    id: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("JSBridge demo starting");

    let config = match load_config(std::env::args().nth(1).as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "could not load configuration");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(config).await {
        error!(error = %e, "demo failed");
        std::process::exit(1);
    }
}

/// Read a JSON config file, or fall back to defaults when no path is given.
fn load_config(path: Option<&str>) -> Result<BridgeConfig> {
    let Some(path) = path else {
        return Ok(BridgeConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| BridgeError::Config(format!("{path}: {e}")))?;
    let config = BridgeConfig::from_json(&text)?;
    info!(path, timeout_ms = config.timeout_ms, "configuration loaded");
    Ok(config)
}

async fn run(config: BridgeConfig) -> Result<()> {
    let android = simulator::android_host();
    let bridge = JsBridge::new(Arc::new(android), config.clone())?;
    info!(platform = %bridge.platform(), "android round");
    exercise(&bridge).await;
    drop(bridge);

    let ios = simulator::ios_host(&config.message_handler);
    let bridge = JsBridge::new(Arc::new(ios), config)?;
    info!(platform = %bridge.platform(), "ios round");
    exercise(&bridge).await;

    Ok(())
}

async fn exercise(bridge: &JsBridge) {
    match bridge.invoke::<UserInfo>("getUserInfo", bridge_args![]).await {
        Ok(user) => info!(name = %user.name, id = user.id, "getUserInfo resolved"),
        Err(e) => warn!(error = %e, "getUserInfo rejected"),
    }

    // Independent calls are in flight together and settle independently.
    let location = bridge.invoke_raw("getLocation", bridge_args![]);
    let version = bridge.invoke::<String>("getVersion", bridge_args!["beta"]);
    let denied = bridge.invoke_raw("deleteAccount", bridge_args![true]);
    let missing = bridge.invoke_raw("getContacts", bridge_args![]);
    info!(pending = bridge.pending_count(), "calls in flight");

    report("getLocation", location.await);
    report("getVersion", version.await.map(Value::String));
    report("deleteAccount", denied.await);
    report("getContacts", missing.await);

    if bridge.config().timeout_ms <= 2_000 {
        report(
            "neverAnswers",
            bridge.invoke_raw("neverAnswers", bridge_args![]).await,
        );
    } else {
        info!(
            timeout_ms = bridge.config().timeout_ms,
            "skipping neverAnswers (set timeout_ms <= 2000 to watch it time out)"
        );
    }
}

fn report(method: &str, outcome: Result<Value>) {
    match outcome {
        Ok(data) => info!(method, %data, "resolved"),
        Err(e) => warn!(method, kind = ?e.kind(), error = %e, "rejected"),
    }
}
