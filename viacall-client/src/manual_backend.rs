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

use crate::backend::{BackendKind, CallBackend, JoinTarget, RemoteParticipant};
use crate::config::PeerConfig;
use crate::error::CallError;
use crate::handshake::{CallRole, ManualHandshake};
use crate::media::{MediaDevices, TrackKind};
use crate::peer::PeerConnectionFactory;
use crate::state::{CallStateMachine, ClientState, Transition};
use async_trait::async_trait;
use log::{debug, warn};
use std::rc::Rc;

/// [`CallBackend`] over a [`ManualHandshake`].
///
/// The offerer sits in [`ClientState::Joining`] between creating its offer
/// and accepting the answer; the answerer is [`ClientState::Joined`] as soon
/// as its answer is applied. A bad paste leaves the state where it was so the
/// user can paste again.
pub struct ManualPeerBackend {
    devices: Rc<dyn MediaDevices>,
    handshake: ManualHandshake,
    machine: CallStateMachine,
}

impl ManualPeerBackend {
    pub fn new(
        devices: Rc<dyn MediaDevices>,
        factory: Rc<dyn PeerConnectionFactory>,
        config: PeerConfig,
    ) -> Self {
        Self {
            devices,
            handshake: ManualHandshake::new(factory, config),
            machine: CallStateMachine::new(BackendKind::ManualPeer),
        }
    }

    pub fn handshake(&self) -> &ManualHandshake {
        &self.handshake
    }

    pub async fn start_camera(&mut self) -> Result<(), CallError> {
        let devices = Rc::clone(&self.devices);
        self.handshake.start_local_stream(devices.as_ref()).await
    }

    async fn create_offer(&mut self) -> Result<Option<String>, CallError> {
        self.require_camera()?;
        self.machine.apply(Transition::BeginJoin)?;
        match self.handshake.start_call().await {
            Ok(code) => Ok(Some(code.into())),
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn accept_offer(&mut self, code: &str) -> Result<Option<String>, CallError> {
        self.require_camera()?;
        self.machine.apply(Transition::BeginJoin)?;
        match self.handshake.join_call(code).await {
            Ok(answer) => {
                self.machine.apply(Transition::Joined)?;
                Ok(Some(answer.into()))
            }
            Err(e) if e.is_input_error() => {
                self.machine.apply(Transition::Leave)?;
                Err(e)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn accept_answer(&mut self, code: &str) -> Result<Option<String>, CallError> {
        if !self.machine.state().is_joining() || self.handshake.role() != Some(CallRole::Offerer)
        {
            return Err(CallError::invalid_state("Create a call before accepting an answer."));
        }
        match self.handshake.accept_answer(code).await {
            Ok(()) => {
                self.machine.apply(Transition::Joined)?;
                Ok(None)
            }
            Err(e) if e.is_input_error() => Err(e),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn require_camera(&self) -> Result<(), CallError> {
        if self.handshake.local_stream().is_none() {
            return Err(CallError::invalid_state("Start the camera first."));
        }
        Ok(())
    }

    /// Drops the half-negotiated peer, keeps the camera and records the
    /// failure.
    fn fail(&mut self, error: CallError) -> CallError {
        self.handshake.reset_negotiation();
        if let Err(e) = self.machine.apply(Transition::Fail(error.to_string())) {
            warn!("Could not record failure: {e}");
        }
        error
    }
}

#[async_trait(?Send)]
impl CallBackend for ManualPeerBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ManualPeer
    }

    fn state(&self) -> ClientState {
        self.machine.state().clone()
    }

    async fn join(&mut self, target: JoinTarget) -> Result<Option<String>, CallError> {
        match target {
            JoinTarget::CreateOffer => self.create_offer().await,
            JoinTarget::AcceptOffer(code) => self.accept_offer(&code).await,
            JoinTarget::AcceptAnswer(code) => self.accept_answer(&code).await,
            target @ JoinTarget::Channel(_) => Err(CallError::Unsupported {
                backend: BackendKind::ManualPeer,
                operation: target.operation(),
            }),
        }
    }

    /// Local tracks travel with the offer or answer, so there is nothing to
    /// publish separately once the camera runs.
    async fn publish_tracks(&mut self) -> Result<(), CallError> {
        self.require_camera()?;
        debug!("Local tracks are attached during negotiation");
        Ok(())
    }

    fn remote_participants(&self) -> Vec<RemoteParticipant> {
        self.handshake
            .remote_stream()
            .map(|stream| RemoteParticipant {
                uid: stream.id(),
                has_audio: stream.has_kind(TrackKind::Audio),
                has_video: stream.has_kind(TrackKind::Video),
            })
            .into_iter()
            .collect()
    }

    async fn leave(&mut self) -> Result<(), CallError> {
        self.handshake.end_call();
        self.machine.apply(Transition::Leave)
    }
}
