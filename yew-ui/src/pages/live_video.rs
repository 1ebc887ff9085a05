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

//! `/via/:channel_name`: joins a hosted-SDK channel on mount and leaves it on
//! unmount.

use std::collections::HashSet;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use futures::lock::Mutex;
use log::{error, warn};
use viacall_client::web::AgoraSdkClient;
use viacall_client::{
    subscribe_client_events, validate_channel_name, BackendKind, CallBackend, ClientEvent,
    ClientState, HostedSdkBackend, JoinTarget, MediaTrack, RemoteParticipant,
};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::call_error::CallError;
use crate::components::config_error::ConfigError;
use crate::components::video_control_buttons::{CameraButton, DisconnectButton, MicButton};
use crate::constants::hosted_options;
use crate::routing::Route;

type Backend = HostedSdkBackend<AgoraSdkClient>;

const LOCAL_VIDEO_ID: &str = "local-video";

pub fn remote_video_id(uid: &str) -> String {
    format!("remote-video-{uid}")
}

#[derive(Properties, Debug, PartialEq, Clone)]
pub struct LiveVideoProps {
    pub channel_name: String,
}

#[derive(Debug, Clone, PartialEq)]
enum SetupError {
    Config(String),
    Call(String),
}

/// What the backend looked like after an operation finished.
#[derive(Debug, Clone)]
pub struct BackendSnapshot {
    state: ClientState,
    mic_on: bool,
    camera_on: bool,
    media_error: Option<String>,
}

impl BackendSnapshot {
    fn of(backend: &Backend) -> Self {
        Self {
            state: backend.state(),
            mic_on: backend.mic_on(),
            camera_on: backend.camera_on(),
            media_error: backend.media_error().map(|e| e.to_string()),
        }
    }
}

pub enum Msg {
    Event(ClientEvent),
    Updated {
        snapshot: BackendSnapshot,
        error: Option<String>,
    },
    Participants(Vec<RemoteParticipant>),
    ToggleMic,
    ToggleCamera,
    Disconnect,
    ReturnHome,
}

pub struct LiveVideo {
    backend: Option<Rc<Mutex<Backend>>>,
    setup_error: Option<SetupError>,
    state: ClientState,
    mic_on: bool,
    camera_on: bool,
    busy: bool,
    media_error: Option<String>,
    remote: Vec<RemoteParticipant>,
    playing: HashSet<String>,
    local_playing: bool,
    abort_handle: Option<AbortHandle>,
}

impl LiveVideo {
    fn open(channel_name: &str) -> Result<Backend, SetupError> {
        validate_channel_name(channel_name).map_err(|e| SetupError::Call(e.to_string()))?;
        let options = hosted_options().map_err(|e| SetupError::Config(e.to_string()))?;
        let client = AgoraSdkClient::new(&options).map_err(|e| SetupError::Call(e.to_string()))?;
        Ok(HostedSdkBackend::new(client, options))
    }

    fn refresh_participants(&self, ctx: &Context<Self>) {
        if let Some(backend) = &self.backend {
            let backend = Rc::clone(backend);
            ctx.link().send_future(async move {
                Msg::Participants(backend.lock().await.remote_participants())
            });
        }
    }

    fn apply_snapshot(&mut self, snapshot: BackendSnapshot) {
        if snapshot.camera_on != self.camera_on {
            self.local_playing = false;
        }
        self.state = snapshot.state;
        self.mic_on = snapshot.mic_on;
        self.camera_on = snapshot.camera_on;
        self.media_error = snapshot.media_error;
    }

    fn toggle(&mut self, ctx: &Context<Self>, microphone: bool) -> bool {
        let Some(backend) = &self.backend else {
            return false;
        };
        let backend = Rc::clone(backend);
        let enable = if microphone { !self.mic_on } else { !self.camera_on };
        self.busy = true;
        ctx.link().send_future(async move {
            let mut backend = backend.lock().await;
            let result = if microphone {
                backend.set_microphone_enabled(enable).await
            } else {
                backend.set_camera_enabled(enable).await
            };
            Msg::Updated {
                snapshot: BackendSnapshot::of(&backend),
                error: result.err().map(|e| e.to_string()),
            }
        });
        true
    }

    /// Hands the SDK the DOM elements for tracks that are not playing yet.
    fn play_pending(&mut self) {
        let Some(backend) = &self.backend else {
            return;
        };
        if !self.state.is_joined() {
            return;
        }

        let play_local = self.camera_on && !self.local_playing;
        self.local_playing |= play_local;
        let pending: Vec<String> = self
            .remote
            .iter()
            .filter(|p| p.has_video && !self.playing.contains(&p.uid))
            .map(|p| p.uid.clone())
            .collect();
        self.playing.extend(pending.iter().cloned());
        if !play_local && pending.is_empty() {
            return;
        }

        let backend = Rc::clone(backend);
        wasm_bindgen_futures::spawn_local(async move {
            let backend = backend.lock().await;
            if play_local {
                if let Some(track) = backend.local_video_track() {
                    track.play(LOCAL_VIDEO_ID);
                }
            }
            for uid in pending {
                if let Err(e) = backend.play_remote_video(&uid, &remote_video_id(&uid)) {
                    warn!("{e}");
                }
            }
        });
    }

    fn go_home(ctx: &Context<Self>) {
        match ctx.link().navigator() {
            Some(navigator) => navigator.push(&Route::Home),
            None => crate::components::not_found::return_home(),
        }
    }

    fn view_remote(&self) -> Html {
        html! {
            <div id="remoteVideoGrid" class="remote-grid">
                { for self.remote.iter().map(|p| html! {
                    <div key={p.uid.clone()} class="remote-tile">
                        <div id={remote_video_id(&p.uid)} class="remote-video"></div>
                        <span class="tile-label">
                            { &p.uid }
                            if !p.has_audio { { " (muted)" } }
                        </span>
                    </div>
                }) }
            </div>
        }
    }

    fn view_local(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div id="localVideo" class="local-area">
                if self.camera_on {
                    <div id={LOCAL_VIDEO_ID} class="local-video"></div>
                } else {
                    <div class="local-video camera-off">{ "Camera Off" }</div>
                }
                if let Some(err) = &self.media_error {
                    <p class="media-error">{ err }</p>
                }
                <div id="controlsToolbar" class="controls-toolbar">
                    <div id="mediaControls" class="media-controls">
                        <MicButton
                            enabled={self.mic_on}
                            busy={self.busy}
                            onclick={link.callback(|_| Msg::ToggleMic)}
                        />
                        <CameraButton
                            enabled={self.camera_on}
                            busy={self.busy}
                            onclick={link.callback(|_| Msg::ToggleCamera)}
                        />
                    </div>
                    <DisconnectButton onclick={link.callback(|_| Msg::Disconnect)} />
                </div>
            </div>
        }
    }
}

impl Component for LiveVideo {
    type Message = Msg;
    type Properties = LiveVideoProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (backend, setup_error) = match Self::open(&ctx.props().channel_name) {
            Ok(backend) => (Some(Rc::new(Mutex::new(backend))), None),
            Err(e) => {
                error!("Cannot open channel view: {e:?}");
                (None, Some(e))
            }
        };

        Self {
            backend,
            setup_error,
            state: ClientState::Idle,
            mic_on: true,
            camera_on: true,
            busy: false,
            media_error: None,
            remote: Vec::new(),
            playing: HashSet::new(),
            local_playing: false,
            abort_handle: None,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            if let Some(backend) = &self.backend {
                let link = ctx.link().clone();
                let (abort_handle, abort_reg) = AbortHandle::new_pair();
                let fut = async move {
                    let mut rx = subscribe_client_events();
                    while let Ok(evt) = rx.recv().await {
                        link.send_message(Msg::Event(evt));
                    }
                };
                let abortable = Abortable::new(fut, abort_reg);
                self.abort_handle = Some(abort_handle);
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = abortable.await;
                });

                let backend = Rc::clone(backend);
                let channel = ctx.props().channel_name.clone();
                ctx.link().send_future(async move {
                    let mut backend = backend.lock().await;
                    let result = backend.join(JoinTarget::Channel(channel)).await;
                    Msg::Updated {
                        snapshot: BackendSnapshot::of(&backend),
                        error: result.err().map(|e| e.to_string()),
                    }
                });
            }
        }
        self.play_pending();
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Event(ClientEvent::StateChanged {
                backend: BackendKind::HostedSdk,
                state,
            }) => {
                self.state = state;
                true
            }
            Msg::Event(ClientEvent::ParticipantsChanged) => {
                self.refresh_participants(ctx);
                false
            }
            Msg::Event(_) => false,
            Msg::Updated { snapshot, error } => {
                self.busy = false;
                self.apply_snapshot(snapshot);
                // Join failures already carry their message in `Failed`.
                if let (Some(err), true) = (error, self.state.is_joined()) {
                    self.media_error = Some(err);
                }
                if self.state.is_joined() {
                    self.refresh_participants(ctx);
                }
                true
            }
            Msg::Participants(remote) => {
                self.playing
                    .retain(|uid| remote.iter().any(|p| p.has_video && &p.uid == uid));
                self.remote = remote;
                true
            }
            Msg::ToggleMic => self.toggle(ctx, true),
            Msg::ToggleCamera => self.toggle(ctx, false),
            Msg::Disconnect | Msg::ReturnHome => {
                Self::go_home(ctx);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match &self.setup_error {
            Some(SetupError::Config(message)) => {
                return html! { <ConfigError message={message.clone()} /> }
            }
            Some(SetupError::Call(message)) => {
                return html! {
                    <CallError
                        message={message.clone()}
                        on_return_home={ctx.link().callback(|_| Msg::ReturnHome)}
                    />
                }
            }
            None => {}
        }

        match &self.state {
            ClientState::Idle | ClientState::Joining => html! {
                <div class="connecting">{ "Connecting to channel..." }</div>
            },
            ClientState::Failed(message) => html! {
                <CallError
                    message={message.clone()}
                    on_return_home={ctx.link().callback(|_| Msg::ReturnHome)}
                />
            },
            ClientState::Joined => html! {
                <div class="live-video">
                    { self.view_remote() }
                    { self.view_local(ctx) }
                </div>
            },
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(handle) = self.abort_handle.take() {
            handle.abort();
        }
        if let Some(backend) = self.backend.take() {
            wasm_bindgen_futures::spawn_local(async move {
                // Waits for an in-flight join before leaving.
                if let Err(e) = backend.lock().await.leave().await {
                    warn!("Error leaving channel: {e}");
                }
            });
        }
    }
}
