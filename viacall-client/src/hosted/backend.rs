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

use super::HostedSdkClient;
use crate::backend::{BackendKind, CallBackend, JoinTarget, RemoteParticipant};
use crate::config::HostedSdkOptions;
use crate::error::{CallError, MediaError};
use crate::event_bus::emit_client_event;
use crate::events::ClientEvent;
use crate::media::{MediaTrack, TrackGuard, TrackKind};
use crate::state::{CallStateMachine, ClientState, Transition};
use async_trait::async_trait;
use log::{error, info, warn};
use std::rc::Rc;
use viacall_types::validate_channel_name;

/// Shown to the user when the SDK refuses the join.
pub const JOIN_FAILED_MESSAGE: &str = "Failed to join the channel. Please try again.";

/// [`CallBackend`] for a named channel on a hosted SDK.
///
/// Microphone and camera are each held in a [`TrackGuard`]; switching one off
/// stops the device, switching it back on captures and publishes a fresh
/// track.
pub struct HostedSdkBackend<C: HostedSdkClient> {
    client: C,
    options: HostedSdkOptions,
    machine: CallStateMachine,
    microphone: Option<TrackGuard>,
    camera: Option<TrackGuard>,
    mic_on: bool,
    camera_on: bool,
    channel: Option<String>,
    uid: Option<String>,
    media_error: Option<MediaError>,
}

impl<C: HostedSdkClient> HostedSdkBackend<C> {
    pub fn new(client: C, options: HostedSdkOptions) -> Self {
        Self {
            client,
            options,
            machine: CallStateMachine::new(BackendKind::HostedSdk),
            microphone: None,
            camera: None,
            mic_on: true,
            camera_on: true,
            channel: None,
            uid: None,
            media_error: None,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn mic_on(&self) -> bool {
        self.mic_on
    }

    pub fn camera_on(&self) -> bool {
        self.camera_on
    }

    /// The last failure to capture a local device, if any.
    pub fn media_error(&self) -> Option<&MediaError> {
        self.media_error.as_ref()
    }

    pub fn local_video_track(&self) -> Option<Rc<dyn MediaTrack>> {
        self.camera.as_ref().map(|g| Rc::clone(g.track()))
    }

    pub fn local_tracks(&self) -> Vec<Rc<dyn MediaTrack>> {
        self.microphone
            .iter()
            .chain(self.camera.iter())
            .map(|g| Rc::clone(g.track()))
            .collect()
    }

    pub fn play_remote_video(&self, uid: &str, element_id: &str) -> Result<(), CallError> {
        Ok(self.client.play_remote_video(uid, element_id)?)
    }

    pub async fn set_microphone_enabled(&mut self, enabled: bool) -> Result<(), CallError> {
        self.set_track_enabled(TrackKind::Audio, enabled).await
    }

    pub async fn set_camera_enabled(&mut self, enabled: bool) -> Result<(), CallError> {
        self.set_track_enabled(TrackKind::Video, enabled).await
    }

    /// The flag only turns on once the track is captured and published, or
    /// before joining, where it picks what the join captures.
    async fn set_track_enabled(&mut self, kind: TrackKind, enabled: bool) -> Result<(), CallError> {
        let joined = self.machine.state().is_joined();
        if !enabled {
            *self.flag(kind) = false;
            if let Some(mut guard) = self.slot(kind).take() {
                if joined {
                    if let Err(e) = self.client.unpublish(&[Rc::clone(guard.track())]).await {
                        warn!("Error unpublishing {kind} track: {e}");
                    }
                }
                guard.release();
                info!("Local {kind} track released");
            }
            return Ok(());
        }

        if !joined || self.slot(kind).is_some() {
            *self.flag(kind) = true;
            return Ok(());
        }
        let Some(guard) = self.capture(kind).await else {
            return Err(self
                .media_error
                .clone()
                .map(CallError::from)
                .unwrap_or_else(|| CallError::invalid_state("Could not capture a track.")));
        };
        self.client.publish(&[Rc::clone(guard.track())]).await?;
        *self.slot(kind) = Some(guard);
        *self.flag(kind) = true;
        Ok(())
    }

    fn flag(&mut self, kind: TrackKind) -> &mut bool {
        match kind {
            TrackKind::Audio => &mut self.mic_on,
            TrackKind::Video => &mut self.camera_on,
        }
    }

    fn slot(&mut self, kind: TrackKind) -> &mut Option<TrackGuard> {
        match kind {
            TrackKind::Audio => &mut self.microphone,
            TrackKind::Video => &mut self.camera,
        }
    }

    /// Captures one device. A failure is recorded and reported on the event
    /// bus; the call goes on without that track.
    async fn capture(&mut self, kind: TrackKind) -> Option<TrackGuard> {
        let result = match kind {
            TrackKind::Audio => self.client.create_microphone_track().await,
            TrackKind::Video => self.client.create_camera_track().await,
        };
        match result {
            Ok(track) => {
                self.media_error = None;
                emit_client_event(ClientEvent::PermissionGranted);
                Some(TrackGuard::new(track))
            }
            Err(e) => {
                error!("Error creating local {kind} track: {e}");
                emit_client_event(ClientEvent::PermissionDenied(e.to_string()));
                self.media_error = Some(e);
                None
            }
        }
    }

    async fn join_channel(&mut self, channel: String) -> Result<Option<String>, CallError> {
        validate_channel_name(&channel)?;
        self.machine.apply(Transition::BeginJoin)?;
        self.media_error = None;

        // Guards stay local until the join succeeds so that any early exit,
        // including this future being dropped, stops the devices.
        let microphone = if self.mic_on {
            self.capture(TrackKind::Audio).await
        } else {
            None
        };
        let camera = if self.camera_on {
            self.capture(TrackKind::Video).await
        } else {
            None
        };

        let token = self.options.token.clone();
        match self
            .client
            .join(&self.options.app_id, &channel, token.as_deref())
            .await
        {
            Ok(uid) => {
                info!("Joined channel {channel} as {uid}");
                self.mic_on = microphone.is_some();
                self.camera_on = camera.is_some();
                self.microphone = microphone;
                self.camera = camera;
                self.channel = Some(channel);
                self.uid = Some(uid);
                self.machine.apply(Transition::Joined)?;
                emit_client_event(ClientEvent::ParticipantsChanged);
            }
            Err(e) => {
                error!("Error joining channel {channel}: {e}");
                drop(microphone);
                drop(camera);
                self.machine
                    .apply(Transition::Fail(JOIN_FAILED_MESSAGE.to_string()))?;
                return Err(e.into());
            }
        }

        self.publish_tracks().await?;
        Ok(None)
    }
}

#[async_trait(?Send)]
impl<C: HostedSdkClient> CallBackend for HostedSdkBackend<C> {
    fn kind(&self) -> BackendKind {
        BackendKind::HostedSdk
    }

    fn state(&self) -> ClientState {
        self.machine.state().clone()
    }

    async fn join(&mut self, target: JoinTarget) -> Result<Option<String>, CallError> {
        match target {
            JoinTarget::Channel(channel) => self.join_channel(channel).await,
            other => Err(CallError::Unsupported {
                backend: BackendKind::HostedSdk,
                operation: other.operation(),
            }),
        }
    }

    async fn publish_tracks(&mut self) -> Result<(), CallError> {
        if !self.machine.state().is_joined() {
            return Err(CallError::invalid_state("Join a channel before publishing."));
        }
        let tracks = self.local_tracks();
        if tracks.is_empty() {
            return Ok(());
        }
        self.client.publish(&tracks).await.map_err(|e| {
            error!("Error publishing local tracks: {e}");
            CallError::from(e)
        })?;
        info!("Published {} local track(s)", tracks.len());
        Ok(())
    }

    fn remote_participants(&self) -> Vec<RemoteParticipant> {
        if self.machine.state().is_joined() {
            self.client.remote_users()
        } else {
            Vec::new()
        }
    }

    async fn leave(&mut self) -> Result<(), CallError> {
        let was_connected = matches!(
            self.machine.state(),
            ClientState::Joining | ClientState::Joined
        );
        for mut guard in [self.microphone.take(), self.camera.take()]
            .into_iter()
            .flatten()
        {
            guard.release();
        }
        if was_connected {
            if let Err(e) = self.client.leave().await {
                warn!("Error leaving channel: {e}");
            }
            info!("Left channel {}", self.channel.as_deref().unwrap_or_default());
            emit_client_event(ClientEvent::ParticipantsChanged);
        }
        self.channel = None;
        self.uid = None;
        self.machine.apply(Transition::Leave)
    }
}
