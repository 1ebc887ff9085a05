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

//! `/app`: a two-party call negotiated by hand.
//!
//! One side creates the call and sends its connection code to the other side
//! by any means (chat, e-mail). The other side pastes it, and sends back the
//! answer code it gets in return. Pasting that answer connects the call.

use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use futures::lock::Mutex;
use log::warn;
use viacall_client::web::{WebMediaDevices, WebMediaStream, WebPeerConnectionFactory};
use viacall_client::{
    subscribe_client_events, BackendKind, CallBackend, CallError, CallRole, ClientEvent,
    ClientState, JoinTarget, ManualPeerBackend, MediaStream,
};
use web_sys::{HtmlInputElement, HtmlVideoElement};
use yew::prelude::*;

use crate::constants::peer_config;

/// The parts of the backend the view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallView {
    state: ClientState,
    local: Option<web_sys::MediaStream>,
    remote: Option<web_sys::MediaStream>,
    connection_code: Option<String>,
    role: Option<CallRole>,
    call_started: bool,
    negotiated: bool,
}

impl CallView {
    fn of(backend: &ManualPeerBackend) -> Self {
        let handshake = backend.handshake();
        Self {
            state: backend.state(),
            local: handshake.local_stream().as_deref().and_then(browser_stream),
            remote: handshake.remote_stream().as_deref().and_then(browser_stream),
            connection_code: handshake.connection_code().map(|c| c.as_str().to_string()),
            role: handshake.role(),
            call_started: handshake.is_call_started(),
            negotiated: handshake.is_negotiated(),
        }
    }
}

fn browser_stream(stream: &dyn MediaStream) -> Option<web_sys::MediaStream> {
    stream
        .as_any()
        .downcast_ref::<WebMediaStream>()
        .map(|s| s.inner().clone())
}

pub enum Msg {
    StartCamera,
    CreateCall,
    JoinCall,
    AcceptAnswer,
    EndCall,
    JoinCodeInput(String),
    AnswerCodeInput(String),
    Done {
        view: CallView,
        error: Option<String>,
    },
    Refreshed(CallView),
    Event(ClientEvent),
}

pub struct PeerCall {
    backend: Rc<Mutex<ManualPeerBackend>>,
    view: CallView,
    join_code: String,
    answer_code: String,
    connection_state: Option<String>,
    error: Option<String>,
    busy: bool,
    local_ref: NodeRef,
    remote_ref: NodeRef,
    abort_handle: Option<AbortHandle>,
}

fn status_text(state: &ClientState) -> &'static str {
    match state {
        ClientState::Idle => "Not in a call",
        ClientState::Joining => "Waiting for the other side...",
        ClientState::Joined => "Call connected",
        ClientState::Failed(_) => "Call failed",
    }
}

/// A user action that needs the backend lock.
#[derive(Debug, Clone)]
enum Operation {
    StartCamera,
    CreateCall,
    JoinCall(String),
    AcceptAnswer(String),
    EndCall,
}

async fn perform(backend: &mut ManualPeerBackend, op: Operation) -> Result<(), CallError> {
    match op {
        Operation::StartCamera => backend.start_camera().await,
        Operation::CreateCall => backend.join(JoinTarget::CreateOffer).await.map(|_| ()),
        Operation::JoinCall(code) => backend.join(JoinTarget::AcceptOffer(code)).await.map(|_| ()),
        Operation::AcceptAnswer(code) => {
            backend.join(JoinTarget::AcceptAnswer(code)).await.map(|_| ())
        }
        Operation::EndCall => backend.leave().await,
    }
}

impl PeerCall {
    fn run(&mut self, ctx: &Context<Self>, op: Operation) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.error = None;
        let backend = Rc::clone(&self.backend);
        ctx.link().send_future(async move {
            let mut backend = backend.lock().await;
            let result = perform(&mut backend, op).await;
            Msg::Done {
                view: CallView::of(&backend),
                error: result.err().map(|e| e.to_string()),
            }
        });
        true
    }

    fn refresh(&self, ctx: &Context<Self>) {
        let backend = Rc::clone(&self.backend);
        ctx.link().send_future(async move {
            Msg::Refreshed(CallView::of(&*backend.lock().await))
        });
    }

    fn attach(node: &NodeRef, stream: Option<&web_sys::MediaStream>, muted: bool) {
        if let Some(video) = node.cast::<HtmlVideoElement>() {
            video.set_muted(muted);
            if video.src_object().as_ref() != stream {
                video.set_src_object(stream);
            }
        }
    }

    fn view_code(&self, ctx: &Context<Self>) -> Html {
        let Some(code) = &self.view.connection_code else {
            return html! {};
        };
        let answering = self.view.role == Some(CallRole::Answerer);
        let awaiting_answer = self.view.role == Some(CallRole::Offerer) && !self.view.negotiated;
        let link = ctx.link();

        html! {
            <div class="connection-code-panel">
                <p class="code-label">
                    { if answering { "Answer Code:" } else { "Connection Code:" } }
                </p>
                <p class="connection-code">{ code.clone() }</p>
                if answering {
                    <p class="code-hint">{ "Send this code back to the caller." }</p>
                }
                if awaiting_answer {
                    <div class="answer-form">
                        <input
                            id="answerCode"
                            type="text"
                            placeholder="Paste answer code"
                            value={self.answer_code.clone()}
                            oninput={link.callback(|e: InputEvent| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                Msg::AnswerCodeInput(input.value())
                            })}
                        />
                        <button
                            class="btn-primary"
                            disabled={self.busy || self.answer_code.trim().is_empty()}
                            onclick={link.callback(|_| Msg::AcceptAnswer)}
                        >
                            { "Accept Answer" }
                        </button>
                    </div>
                }
            </div>
        }
    }
}

impl Component for PeerCall {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let backend = ManualPeerBackend::new(
            Rc::new(WebMediaDevices),
            Rc::new(WebPeerConnectionFactory),
            peer_config(),
        );
        Self {
            backend: Rc::new(Mutex::new(backend)),
            view: CallView::default(),
            join_code: String::new(),
            answer_code: String::new(),
            connection_state: None,
            error: None,
            busy: false,
            local_ref: NodeRef::default(),
            remote_ref: NodeRef::default(),
            abort_handle: None,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
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
        }
        Self::attach(&self.local_ref, self.view.local.as_ref(), true);
        Self::attach(&self.remote_ref, self.view.remote.as_ref(), false);
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::StartCamera => self.run(ctx, Operation::StartCamera),
            Msg::CreateCall => self.run(ctx, Operation::CreateCall),
            Msg::JoinCall => self.run(ctx, Operation::JoinCall(self.join_code.clone())),
            Msg::AcceptAnswer => self.run(ctx, Operation::AcceptAnswer(self.answer_code.clone())),
            Msg::EndCall => {
                self.join_code.clear();
                self.answer_code.clear();
                self.connection_state = None;
                self.run(ctx, Operation::EndCall)
            }
            Msg::JoinCodeInput(code) => {
                self.join_code = code;
                self.error = None;
                true
            }
            Msg::AnswerCodeInput(code) => {
                self.answer_code = code;
                self.error = None;
                true
            }
            Msg::Done { view, error } => {
                self.busy = false;
                if view.negotiated {
                    self.answer_code.clear();
                }
                self.view = view;
                if let Some(err) = &error {
                    warn!("{err}");
                }
                self.error = error;
                true
            }
            Msg::Refreshed(view) => {
                let changed = self.view != view;
                self.view = view;
                changed
            }
            Msg::Event(ClientEvent::ConnectionStateChanged(state)) => {
                self.connection_state = Some(state);
                true
            }
            Msg::Event(ClientEvent::RemoteStreamAdded(_))
            | Msg::Event(ClientEvent::StateChanged {
                backend: BackendKind::ManualPeer,
                ..
            }) => {
                // Operations hold the lock; the refresh lands after they finish.
                self.refresh(ctx);
                false
            }
            Msg::Event(_) => false,
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let has_local = self.view.local.is_some();
        let started = self.view.call_started;

        html! {
            <div class="peer-call">
                <h2 class="peer-call-title">{ "P2P Video Call" }</h2>
                <div class="video-pair">
                    <div class="video-column">
                        <div class="video-frame">
                            <video ref={self.local_ref.clone()} autoplay=true playsinline=true muted=true />
                            <span class="video-label">{ "You" }</span>
                        </div>
                        if !started {
                            <button
                                class="btn-primary start-camera"
                                disabled={has_local || self.busy}
                                onclick={link.callback(|_| Msg::StartCamera)}
                            >
                                { "Start Camera" }
                            </button>
                            <button
                                class="btn-primary create-call"
                                disabled={!has_local || self.busy}
                                onclick={link.callback(|_| Msg::CreateCall)}
                            >
                                { "Create Call" }
                            </button>
                        }
                    </div>
                    <div class="video-column">
                        <div class="video-frame">
                            <video ref={self.remote_ref.clone()} autoplay=true playsinline=true />
                            <span class="video-label">{ "Remote" }</span>
                        </div>
                        if !started {
                            <input
                                id="joinCode"
                                type="text"
                                placeholder="Enter connection code"
                                value={self.join_code.clone()}
                                oninput={link.callback(|e: InputEvent| {
                                    let input: HtmlInputElement = e.target_unchecked_into();
                                    Msg::JoinCodeInput(input.value())
                                })}
                            />
                            <button
                                class="btn-primary join-call"
                                disabled={!has_local || self.join_code.trim().is_empty() || self.busy}
                                onclick={link.callback(|_| Msg::JoinCall)}
                            >
                                { "Join Call" }
                            </button>
                        }
                    </div>
                </div>

                <p class="call-status">{ status_text(&self.view.state) }</p>
                { self.view_code(ctx) }

                if let Some(state) = &self.connection_state {
                    <p class="connection-state">{ format!("Connection: {state}") }</p>
                }
                if let Some(err) = &self.error {
                    <p class="call-error-message">{ err.clone() }</p>
                }
                if started {
                    <button class="btn-danger end-call" onclick={link.callback(|_| Msg::EndCall)}>
                        { "End Call" }
                    </button>
                }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(handle) = self.abort_handle.take() {
            handle.abort();
        }
        let backend = Rc::clone(&self.backend);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = backend.lock().await.leave().await {
                warn!("Error ending call: {e}");
            }
        });
    }
}
