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

use super::media_devices::{WebMediaStream, WebMediaTrack};
use crate::config::PeerConfig;
use crate::error::PeerError;
use crate::media::{MediaStream, MediaTrack};
use crate::peer::{PeerConnection, PeerConnectionFactory, PeerEvents, SignalingState};
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Reflect};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use viacall_types::{SdpType, SessionDescription};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Event, RtcConfiguration, RtcIceGatheringState, RtcIceServer, RtcPeerConnection,
    RtcPeerConnectionIceEvent, RtcSdpType, RtcSessionDescriptionInit, RtcSignalingState,
    RtcTrackEvent,
};

const GATHERING_POLL_MS: u32 = 100;
// A STUN server that never answers would otherwise hold the code back forever.
const GATHERING_TIMEOUT_MS: u32 = 5_000;

/// `RTCPeerConnection`. The event handler closures live as long as the
/// connection and are detached on close.
pub struct WebPeerConnection {
    pc: RtcPeerConnection,
    _on_track: Closure<dyn FnMut(RtcTrackEvent)>,
    _on_ice_candidate: Closure<dyn FnMut(RtcPeerConnectionIceEvent)>,
    _on_ice_connection_state: Closure<dyn FnMut(Event)>,
}

impl WebPeerConnection {
    pub fn new(config: &PeerConfig, events: PeerEvents) -> Result<Self, PeerError> {
        let ice_servers = Array::new();
        for url in &config.ice_servers {
            let server = RtcIceServer::new();
            server.set_urls(&JsValue::from_str(url));
            ice_servers.push(&server);
        }
        let rtc_config = RtcConfiguration::new();
        rtc_config.set_ice_servers(&ice_servers);

        let pc = RtcPeerConnection::new_with_configuration(&rtc_config)
            .map_err(|e| PeerError::Create(js_error_message(&e)))?;

        // ontrack fires once per remote track; report each stream once.
        let last_stream_id = RefCell::new(String::new());
        let on_remote_stream = Rc::clone(&events.on_remote_stream);
        let on_track = Closure::wrap(Box::new(move |ev: RtcTrackEvent| {
            let Ok(stream) = ev.streams().get(0).dyn_into::<web_sys::MediaStream>() else {
                return;
            };
            if *last_stream_id.borrow() == stream.id() {
                return;
            }
            *last_stream_id.borrow_mut() = stream.id();
            on_remote_stream(Rc::new(WebMediaStream::new(stream)));
        }) as Box<dyn FnMut(RtcTrackEvent)>);
        pc.set_ontrack(Some(on_track.as_ref().unchecked_ref()));

        let on_ice_candidate_cb = Rc::clone(&events.on_ice_candidate);
        let on_ice_candidate = Closure::wrap(Box::new(move |ev: RtcPeerConnectionIceEvent| {
            if let Some(candidate) = ev.candidate() {
                on_ice_candidate_cb(candidate.candidate());
            }
        }) as Box<dyn FnMut(RtcPeerConnectionIceEvent)>);
        pc.set_onicecandidate(Some(on_ice_candidate.as_ref().unchecked_ref()));

        let on_connection_state = Rc::clone(&events.on_connection_state);
        let pc_for_state = pc.clone();
        let on_ice_connection_state = Closure::wrap(Box::new(move |_: Event| {
            let state = format!("{:?}", pc_for_state.ice_connection_state()).to_lowercase();
            on_connection_state(state);
        }) as Box<dyn FnMut(Event)>);
        pc.set_oniceconnectionstatechange(Some(on_ice_connection_state.as_ref().unchecked_ref()));

        debug!("Peer connection created with {} ICE server(s)", config.ice_servers.len());
        Ok(Self {
            pc,
            _on_track: on_track,
            _on_ice_candidate: on_ice_candidate,
            _on_ice_connection_state: on_ice_connection_state,
        })
    }

    pub fn inner(&self) -> &RtcPeerConnection {
        &self.pc
    }
}

#[async_trait(?Send)]
impl PeerConnection for WebPeerConnection {
    async fn create_offer(&self) -> Result<SessionDescription, PeerError> {
        let offer = JsFuture::from(self.pc.create_offer())
            .await
            .map_err(|e| PeerError::CreateDescription(SdpType::Offer, js_error_message(&e)))?;
        description_from_js(&offer)
            .ok_or_else(|| PeerError::CreateDescription(SdpType::Offer, "malformed offer".into()))
    }

    async fn create_answer(&self) -> Result<SessionDescription, PeerError> {
        let answer = JsFuture::from(self.pc.create_answer())
            .await
            .map_err(|e| PeerError::CreateDescription(SdpType::Answer, js_error_message(&e)))?;
        description_from_js(&answer)
            .ok_or_else(|| PeerError::CreateDescription(SdpType::Answer, "malformed answer".into()))
    }

    async fn set_local_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), PeerError> {
        let init = description_to_js(description);
        JsFuture::from(self.pc.set_local_description(&init))
            .await
            .map_err(|e| PeerError::SetLocalDescription(js_error_message(&e)))?;
        Ok(())
    }

    async fn set_remote_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), PeerError> {
        let init = description_to_js(description);
        JsFuture::from(self.pc.set_remote_description(&init))
            .await
            .map_err(|e| PeerError::SetRemoteDescription(js_error_message(&e)))?;
        Ok(())
    }

    async fn gathered_local_description(&self) -> Result<SessionDescription, PeerError> {
        let mut waited = 0;
        while self.pc.ice_gathering_state() != RtcIceGatheringState::Complete {
            if waited >= GATHERING_TIMEOUT_MS {
                warn!("ICE gathering still running after {waited} ms, sharing what was found");
                break;
            }
            TimeoutFuture::new(GATHERING_POLL_MS).await;
            waited += GATHERING_POLL_MS;
        }
        let local = self.pc.local_description().ok_or(PeerError::NoLocalDescription)?;
        description_from_js(&local).ok_or(PeerError::NoLocalDescription)
    }

    fn add_track(
        &self,
        track: &Rc<dyn MediaTrack>,
        stream: &Rc<dyn MediaStream>,
    ) -> Result<(), PeerError> {
        let track = track
            .as_any()
            .downcast_ref::<WebMediaTrack>()
            .ok_or_else(|| PeerError::AddTrack("not a browser track".into()))?;
        let stream = stream
            .as_any()
            .downcast_ref::<WebMediaStream>()
            .ok_or_else(|| PeerError::AddTrack("not a browser stream".into()))?;
        self.pc.add_track_0(track.inner(), stream.inner());
        Ok(())
    }

    fn signaling_state(&self) -> SignalingState {
        match self.pc.signaling_state() {
            RtcSignalingState::Stable => SignalingState::Stable,
            RtcSignalingState::HaveLocalOffer => SignalingState::HaveLocalOffer,
            RtcSignalingState::HaveRemoteOffer => SignalingState::HaveRemoteOffer,
            RtcSignalingState::HaveLocalPranswer => SignalingState::HaveLocalPranswer,
            RtcSignalingState::HaveRemotePranswer => SignalingState::HaveRemotePranswer,
            _ => SignalingState::Closed,
        }
    }

    fn close(&self) {
        self.pc.set_ontrack(None);
        self.pc.set_onicecandidate(None);
        self.pc.set_oniceconnectionstatechange(None);
        self.pc.close();
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WebPeerConnectionFactory;

impl PeerConnectionFactory for WebPeerConnectionFactory {
    fn create(
        &self,
        config: &PeerConfig,
        events: PeerEvents,
    ) -> Result<Rc<dyn PeerConnection>, PeerError> {
        Ok(Rc::new(WebPeerConnection::new(config, events)?))
    }
}

fn rtc_sdp_type(sdp_type: SdpType) -> RtcSdpType {
    match sdp_type {
        SdpType::Offer => RtcSdpType::Offer,
        SdpType::Answer => RtcSdpType::Answer,
        SdpType::Pranswer => RtcSdpType::Pranswer,
        SdpType::Rollback => RtcSdpType::Rollback,
    }
}

fn description_to_js(description: &SessionDescription) -> RtcSessionDescriptionInit {
    let init = RtcSessionDescriptionInit::new(rtc_sdp_type(description.sdp_type));
    init.set_sdp(&description.sdp);
    init
}

/// Reads `{type, sdp}` off whatever `createOffer`/`createAnswer` resolved
/// to, or off `localDescription`. Browsers differ on whether that is a plain object or an
/// `RTCSessionDescription`, so fields are read by property access.
fn description_from_js(value: &JsValue) -> Option<SessionDescription> {
    let sdp_type = Reflect::get(value, &JsValue::from_str("type")).ok()?.as_string()?;
    let sdp = Reflect::get(value, &JsValue::from_str("sdp"))
        .ok()?
        .as_string()
        .unwrap_or_default();
    let sdp_type = match sdp_type.as_str() {
        "offer" => SdpType::Offer,
        "answer" => SdpType::Answer,
        "pranswer" => SdpType::Pranswer,
        "rollback" => SdpType::Rollback,
        _ => return None,
    };
    Some(SessionDescription::new(sdp_type, sdp))
}

pub(crate) fn js_error_message(err: &JsValue) -> String {
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
