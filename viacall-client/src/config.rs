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

/// STUN server used when no ICE servers are configured.
pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

/// Settings for a manually negotiated peer connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerConfig {
    pub ice_servers: Vec<String>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![DEFAULT_STUN_SERVER.to_string()],
        }
    }
}

impl PeerConfig {
    /// Builds a config from a comma-separated list of STUN/TURN urls. Blank
    /// input falls back to the default STUN server.
    pub fn from_ice_server_list(list: Option<&str>) -> Self {
        let ice_servers = split_list(list);
        if ice_servers.is_empty() {
            Self::default()
        } else {
            Self { ice_servers }
        }
    }
}

/// Settings for the hosted SDK client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedSdkOptions {
    pub app_id: String,
    /// Channel token; `None` for projects without token authentication.
    pub token: Option<String>,
    pub codec: String,
    pub mode: String,
}

impl HostedSdkOptions {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            token: None,
            codec: "vp8".to_string(),
            mode: "rtc".to_string(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

pub fn split_list(s: Option<&str>) -> Vec<String> {
    if let Some(s) = s {
        s.split(',')
            .filter_map(|s| {
                let s = s.trim().to_string();
                if s.is_empty() {
                    None
                } else {
                    Some(s)
                }
            })
            .collect::<Vec<String>>()
    } else {
        Vec::new()
    }
}
