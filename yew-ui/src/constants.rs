/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

//! Runtime configuration, read from `window.__APP_CONFIG` so one build can be
//! deployed against different SDK projects.

use anyhow::{anyhow, bail, Result};
use serde::Deserialize;
use serde_wasm_bindgen::from_value as from_js_value;
use viacall_client::{HostedSdkOptions, PeerConfig};
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(rename = "appId")]
    pub app_id: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "iceServers")]
    #[serde(default)]
    pub ice_servers: Option<String>,
}

pub fn app_config() -> Result<RuntimeConfig> {
    let win = gloo_utils::window();
    let config = js_sys::Reflect::get(&win, &JsValue::from_str("__APP_CONFIG"))
        .unwrap_or(JsValue::UNDEFINED);
    if config.is_undefined() || config.is_null() {
        bail!("Runtime configuration not found (window.__APP_CONFIG missing)");
    }
    let config = from_js_value::<RuntimeConfig>(config)
        .map_err(|e| anyhow!("Failed to parse __APP_CONFIG: {e:?}"))?;
    if config.app_id.trim().is_empty() {
        bail!("__APP_CONFIG.appId is empty");
    }
    Ok(config)
}

/// Options for the hosted SDK. Fails when no application id is configured.
pub fn hosted_options() -> Result<HostedSdkOptions> {
    let config = app_config()?;
    Ok(HostedSdkOptions::new(config.app_id.trim()).with_token(config.token))
}

/// ICE servers for manual calls. The peer-to-peer view works without any
/// runtime configuration, so a missing config means the default STUN server.
pub fn peer_config() -> PeerConfig {
    match app_config() {
        Ok(config) => PeerConfig::from_ice_server_list(config.ice_servers.as_deref()),
        Err(_) => {
            let win = gloo_utils::window();
            let ice_servers = js_sys::Reflect::get(&win, &JsValue::from_str("__APP_CONFIG"))
                .and_then(|c| js_sys::Reflect::get(&c, &JsValue::from_str("iceServers")))
                .ok()
                .and_then(|v| v.as_string());
            PeerConfig::from_ice_server_list(ice_servers.as_deref())
        }
    }
}
