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

//! Manual offer/answer exchange without a signaling server.
//!
//! The two users carry connection codes between their browsers themselves:
//!
//! 1. Offerer: [`start_call`](ManualHandshake::start_call) returns an offer
//!    code to send to the other user.
//! 2. Answerer: [`join_call`](ManualHandshake::join_call) takes that code and
//!    returns an answer code to send back.
//! 3. Offerer: [`accept_answer`](ManualHandshake::accept_answer) applies the
//!    answer, after which media flows directly between the browsers.
//!
//! Description operations are only issued from the signaling state that
//! allows them, so a peer never holds more than one pending local and one
//! pending remote description.

use crate::config::PeerConfig;
use crate::error::CallError;
use crate::event_bus::emit_client_event;
use crate::events::ClientEvent;
use crate::media::{MediaConstraints, MediaDevices, MediaStream, MediaStreamGuard};
use crate::peer::{
    PeerConnection, PeerConnectionFactory, PeerConnectionGuard, PeerEvents, SignalingState,
};
use log::{debug, error, info};
use std::cell::RefCell;
use std::rc::Rc;
use viacall_types::{ConnectionCode, SdpType, SessionDescription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallRole {
    Offerer,
    Answerer,
}

type RemoteStreamSlot = Rc<RefCell<Option<Rc<dyn MediaStream>>>>;

pub struct ManualHandshake {
    factory: Rc<dyn PeerConnectionFactory>,
    config: PeerConfig,
    local_stream: Option<MediaStreamGuard>,
    peer: Option<PeerConnectionGuard>,
    remote_stream: RemoteStreamSlot,
    role: Option<CallRole>,
    connection_code: Option<ConnectionCode>,
    negotiated: bool,
}

impl ManualHandshake {
    pub fn new(factory: Rc<dyn PeerConnectionFactory>, config: PeerConfig) -> Self {
        Self {
            factory,
            config,
            local_stream: None,
            peer: None,
            remote_stream: Rc::new(RefCell::new(None)),
            role: None,
            connection_code: None,
            negotiated: false,
        }
    }

    pub fn local_stream(&self) -> Option<Rc<dyn MediaStream>> {
        self.local_stream.as_ref().map(|g| Rc::clone(g.stream()))
    }

    pub fn remote_stream(&self) -> Option<Rc<dyn MediaStream>> {
        self.remote_stream.borrow().clone()
    }

    /// The code this side must hand to the other user: the offer for the
    /// offerer, the answer for the answerer.
    pub fn connection_code(&self) -> Option<&ConnectionCode> {
        self.connection_code.as_ref()
    }

    pub fn role(&self) -> Option<CallRole> {
        self.role
    }

    pub fn is_call_started(&self) -> bool {
        self.role.is_some()
    }

    /// Both descriptions are in place on this side.
    pub fn is_negotiated(&self) -> bool {
        self.negotiated
    }

    pub fn has_peer_connection(&self) -> bool {
        self.peer.is_some()
    }

    /// Nothing acquired, nothing negotiated.
    pub fn is_idle(&self) -> bool {
        self.local_stream.is_none()
            && self.peer.is_none()
            && self.remote_stream.borrow().is_none()
            && self.role.is_none()
            && self.connection_code.is_none()
            && !self.negotiated
    }

    /// Captures camera and microphone. On failure nothing is attached.
    pub async fn start_local_stream(&mut self, devices: &dyn MediaDevices) -> Result<(), CallError> {
        if self.local_stream.is_some() {
            return Err(CallError::invalid_state("The camera is already started."));
        }
        match devices.get_user_media(MediaConstraints::default()).await {
            Ok(stream) => {
                info!(
                    "Local stream {} started with {} track(s)",
                    stream.id(),
                    stream.tracks().len()
                );
                self.local_stream = Some(MediaStreamGuard::new(stream));
                emit_client_event(ClientEvent::PermissionGranted);
                Ok(())
            }
            Err(e) => {
                error!("Error accessing media devices: {e}");
                emit_client_event(ClientEvent::PermissionDenied(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Creates an offer, applies it locally and returns it, with its ICE
    /// candidates, as a connection code for the other user.
    pub async fn start_call(&mut self) -> Result<ConnectionCode, CallError> {
        self.require_idle_call()?;
        let (peer, fresh) = self.current_or_new_peer()?;

        let offer = match negotiate_offer(peer.as_ref()).await {
            Ok(offer) => offer,
            Err(e) => {
                // `fresh` drops here and closes the connection this attempt opened.
                error!("Error creating offer: {e}");
                return Err(e);
            }
        };

        if let Some(guard) = fresh {
            self.peer = Some(guard);
        }
        let code = ConnectionCode::encode(&offer);
        info!("Offer created and applied locally");
        self.role = Some(CallRole::Offerer);
        self.connection_code = Some(code.clone());
        emit_client_event(ClientEvent::OfferCreated);
        Ok(code)
    }

    /// Applies a pasted offer code and returns the answer code that must be
    /// sent back to the offerer.
    pub async fn join_call(&mut self, code: &str) -> Result<ConnectionCode, CallError> {
        self.require_idle_call()?;
        let offer = decode_expecting(code, SdpType::Offer)?;
        let (peer, fresh) = self.current_or_new_peer()?;

        let answer = match negotiate_answer(peer.as_ref(), &offer).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Error joining call: {e}");
                return Err(e);
            }
        };

        if let Some(guard) = fresh {
            self.peer = Some(guard);
        }
        let code = ConnectionCode::encode(&answer);
        info!("Answer created and applied locally");
        self.role = Some(CallRole::Answerer);
        self.connection_code = Some(code.clone());
        self.negotiated = true;
        emit_client_event(ClientEvent::AnswerCreated);
        Ok(code)
    }

    /// Offerer side: applies the answer code pasted back by the other user.
    pub async fn accept_answer(&mut self, code: &str) -> Result<(), CallError> {
        if self.role != Some(CallRole::Offerer) {
            return Err(CallError::invalid_state(
                "Only the side that created the call can accept an answer.",
            ));
        }
        let peer = match &self.peer {
            Some(guard) => Rc::clone(guard.peer()),
            None => return Err(CallError::invalid_state("No call in progress.")),
        };
        expect_signaling(peer.as_ref(), SignalingState::HaveLocalOffer)?;
        let answer = decode_expecting(code, SdpType::Answer)?;
        peer.set_remote_description(&answer).await.map_err(|e| {
            error!("Error applying answer: {e}");
            CallError::from(e)
        })?;
        info!("Answer applied, call negotiated");
        self.negotiated = true;
        Ok(())
    }

    /// Closes the peer connection and forgets the negotiation but keeps the
    /// camera running, so a new call can be started right away.
    pub fn reset_negotiation(&mut self) {
        if let Some(mut peer) = self.peer.take() {
            peer.release();
        }
        self.remote_stream.borrow_mut().take();
        self.role = None;
        self.connection_code = None;
        self.negotiated = false;
    }

    /// Closes the peer connection, stops every local track and forgets all
    /// call state. Safe to call at any time.
    pub fn end_call(&mut self) {
        let had_resources = self.peer.is_some() || self.local_stream.is_some();
        self.reset_negotiation();
        if let Some(mut stream) = self.local_stream.take() {
            stream.release();
        }
        if had_resources {
            info!("Call ended");
            emit_client_event(ClientEvent::CallEnded);
        }
    }

    fn require_idle_call(&self) -> Result<(), CallError> {
        if self.local_stream.is_none() {
            return Err(CallError::invalid_state("Start the camera first."));
        }
        if self.role.is_some() {
            return Err(CallError::invalid_state("A call is already in progress."));
        }
        Ok(())
    }

    /// Returns the existing connection, or a new one whose guard the caller
    /// keeps until negotiation succeeds.
    fn current_or_new_peer(
        &self,
    ) -> Result<(Rc<dyn PeerConnection>, Option<PeerConnectionGuard>), CallError> {
        if let Some(guard) = &self.peer {
            return Ok((Rc::clone(guard.peer()), None));
        }
        let guard = self.open_peer()?;
        Ok((Rc::clone(guard.peer()), Some(guard)))
    }

    fn open_peer(&self) -> Result<PeerConnectionGuard, CallError> {
        let stream = match &self.local_stream {
            Some(guard) => Rc::clone(guard.stream()),
            None => return Err(CallError::invalid_state("Start the camera first.")),
        };

        let remote_slot = Rc::clone(&self.remote_stream);
        let events = PeerEvents {
            on_remote_stream: Rc::new(move |remote: Rc<dyn MediaStream>| {
                info!("Remote stream {} received", remote.id());
                emit_client_event(ClientEvent::RemoteStreamAdded(remote.id()));
                *remote_slot.borrow_mut() = Some(remote);
            }),
            on_ice_candidate: Rc::new(|candidate: String| {
                debug!("New ICE candidate: {candidate}");
                emit_client_event(ClientEvent::IceCandidate(candidate));
            }),
            on_connection_state: Rc::new(|state: String| {
                info!("ICE connection state: {state}");
                emit_client_event(ClientEvent::ConnectionStateChanged(state));
            }),
        };

        let guard = PeerConnectionGuard::new(self.factory.create(&self.config, events)?);
        for track in stream.tracks() {
            guard.peer().add_track(&track, &stream)?;
        }
        Ok(guard)
    }
}

fn expect_signaling(peer: &dyn PeerConnection, expected: SignalingState) -> Result<(), CallError> {
    let actual = peer.signaling_state();
    if actual == expected {
        Ok(())
    } else {
        Err(CallError::invalid_state(format!(
            "Peer connection is {actual}, expected {expected}."
        )))
    }
}

fn decode_expecting(code: &str, expected: SdpType) -> Result<SessionDescription, CallError> {
    let description = ConnectionCode::parse(code)?.decode()?;
    if description.sdp_type != expected {
        return Err(CallError::UnexpectedDescription {
            expected,
            actual: description.sdp_type,
        });
    }
    Ok(description)
}

async fn negotiate_offer(peer: &dyn PeerConnection) -> Result<SessionDescription, CallError> {
    expect_signaling(peer, SignalingState::Stable)?;
    let offer = peer.create_offer().await?;
    peer.set_local_description(&offer).await?;
    Ok(peer.gathered_local_description().await?)
}

async fn negotiate_answer(
    peer: &dyn PeerConnection,
    offer: &SessionDescription,
) -> Result<SessionDescription, CallError> {
    expect_signaling(peer, SignalingState::Stable)?;
    peer.set_remote_description(offer).await?;
    let answer = peer.create_answer().await?;
    peer.set_local_description(&answer).await?;
    Ok(peer.gathered_local_description().await?)
}
