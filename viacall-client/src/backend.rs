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

//! The call abstraction the UI talks to.
//!
//! Both ways of placing a call, a hosted-SDK channel and a manually
//! negotiated peer connection, sit behind [`CallBackend`] and report progress
//! through the same [`ClientState`].

use crate::error::CallError;
use crate::state::ClientState;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    HostedSdk,
    ManualPeer,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BackendKind::HostedSdk => write!(f, "hosted-sdk"),
            BackendKind::ManualPeer => write!(f, "manual-peer"),
        }
    }
}

/// What a [`CallBackend::join`] call should connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinTarget {
    /// A named channel on the hosted SDK.
    Channel(String),
    /// Start a manual call by producing an offer code.
    CreateOffer,
    /// Answer a manual call from a pasted offer code.
    AcceptOffer(String),
    /// Finish a manual call the local side started, from a pasted answer code.
    AcceptAnswer(String),
}

impl JoinTarget {
    pub fn operation(&self) -> &'static str {
        match self {
            JoinTarget::Channel(_) => "joining a channel",
            JoinTarget::CreateOffer => "creating an offer",
            JoinTarget::AcceptOffer(_) => "accepting an offer",
            JoinTarget::AcceptAnswer(_) => "accepting an answer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteParticipant {
    pub uid: String,
    pub has_audio: bool,
    pub has_video: bool,
}

#[async_trait(?Send)]
pub trait CallBackend {
    fn kind(&self) -> BackendKind;

    fn state(&self) -> ClientState;

    /// Connects to `target`. Returns the connection code the user has to pass
    /// on, if the target produces one.
    async fn join(&mut self, target: JoinTarget) -> Result<Option<String>, CallError>;

    /// Publishes whatever local tracks are currently enabled.
    async fn publish_tracks(&mut self) -> Result<(), CallError>;

    fn remote_participants(&self) -> Vec<RemoteParticipant>;

    /// Releases every local resource and returns to [`ClientState::Idle`].
    /// Calling it while idle does nothing.
    async fn leave(&mut self) -> Result<(), CallError>;
}
