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

//! The peer connection seen by the manual handshake.
//!
//! ICE, codec negotiation, encryption and transport all happen inside the
//! implementation (the browser's `RTCPeerConnection`); this trait only
//! exposes the description exchange and track plumbing.

mod guard;

pub use guard::PeerConnectionGuard;

use crate::config::PeerConfig;
use crate::error::PeerError;
use crate::media::{MediaStream, MediaTrack};
use async_trait::async_trait;
use std::fmt;
use std::rc::Rc;
use viacall_types::SessionDescription;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingState {
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    HaveLocalPranswer,
    HaveRemotePranswer,
    Closed,
}

impl fmt::Display for SignalingState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            SignalingState::Stable => "stable",
            SignalingState::HaveLocalOffer => "have-local-offer",
            SignalingState::HaveRemoteOffer => "have-remote-offer",
            SignalingState::HaveLocalPranswer => "have-local-pranswer",
            SignalingState::HaveRemotePranswer => "have-remote-pranswer",
            SignalingState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Callbacks a peer connection invokes as the session progresses.
#[derive(Clone)]
pub struct PeerEvents {
    pub on_remote_stream: Rc<dyn Fn(Rc<dyn MediaStream>)>,
    pub on_ice_candidate: Rc<dyn Fn(String)>,
    pub on_connection_state: Rc<dyn Fn(String)>,
}

impl Default for PeerEvents {
    fn default() -> Self {
        Self {
            on_remote_stream: Rc::new(|_| {}),
            on_ice_candidate: Rc::new(|_| {}),
            on_connection_state: Rc::new(|_| {}),
        }
    }
}

#[async_trait(?Send)]
pub trait PeerConnection {
    async fn create_offer(&self) -> Result<SessionDescription, PeerError>;

    async fn create_answer(&self) -> Result<SessionDescription, PeerError>;

    async fn set_local_description(&self, description: &SessionDescription)
        -> Result<(), PeerError>;

    async fn set_remote_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), PeerError>;

    /// The applied local description once ICE gathering has finished, with
    /// the candidates found so far written into its SDP. There is no
    /// trickle channel, so this is what the other side gets.
    async fn gathered_local_description(&self) -> Result<SessionDescription, PeerError>;

    fn add_track(
        &self,
        track: &Rc<dyn MediaTrack>,
        stream: &Rc<dyn MediaStream>,
    ) -> Result<(), PeerError>;

    fn signaling_state(&self) -> SignalingState;

    fn close(&self);
}

pub trait PeerConnectionFactory {
    fn create(
        &self,
        config: &PeerConfig,
        events: PeerEvents,
    ) -> Result<Rc<dyn PeerConnection>, PeerError>;
}
