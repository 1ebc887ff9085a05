// Copyright 2025 Security Union LLC
// Licensed under MIT OR Apache-2.0
//
// Shared test harness for viacall-client integration tests.
//
// Mock devices, peer connections and a mock hosted SDK that keep a ledger of
// every device they hand out, so tests can assert that hardware is released
// on every exit path.
//
// Each test file that does `mod support;` compiles its own copy, so not every
// function is used in every compilation unit.
#![allow(dead_code)]

use async_trait::async_trait;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use viacall_client::{
    HostedSdkClient, MediaConstraints, MediaDevices, MediaError, MediaStream, MediaTrack,
    PeerConfig, PeerConnection, PeerConnectionFactory, PeerError, PeerEvents, RemoteParticipant,
    SdkError, SignalingState, TrackKind,
};
use viacall_types::{SdpType, SessionDescription};

// ---------------------------------------------------------------------------
// Device ledger
// ---------------------------------------------------------------------------

/// Counts captured and stopped tracks across every mock that shares it.
#[derive(Default)]
pub struct DeviceLedger {
    acquired: Cell<usize>,
    stopped: Cell<usize>,
}

impl DeviceLedger {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn acquired(&self) -> usize {
        self.acquired.get()
    }

    pub fn stopped(&self) -> usize {
        self.stopped.get()
    }

    /// Tracks captured and not yet stopped.
    pub fn live(&self) -> usize {
        self.acquired.get() - self.stopped.get()
    }
}

pub struct MockTrack {
    id: String,
    kind: TrackKind,
    live: Cell<bool>,
    enabled: Cell<bool>,
    ledger: Rc<DeviceLedger>,
}

impl MockTrack {
    pub fn capture(ledger: &Rc<DeviceLedger>, kind: TrackKind) -> Rc<Self> {
        ledger.acquired.set(ledger.acquired.get() + 1);
        Rc::new(Self {
            id: format!("{kind}-{}", ledger.acquired.get()),
            kind,
            live: Cell::new(true),
            enabled: Cell::new(true),
            ledger: Rc::clone(ledger),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl MediaTrack for MockTrack {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn is_live(&self) -> bool {
        self.live.get()
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn stop(&self) {
        if self.live.replace(false) {
            self.ledger.stopped.set(self.ledger.stopped.get() + 1);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockStream {
    id: String,
    tracks: Vec<Rc<dyn MediaTrack>>,
}

impl MockStream {
    pub fn new(id: &str, tracks: Vec<Rc<dyn MediaTrack>>) -> Rc<Self> {
        Rc::new(Self {
            id: id.to_string(),
            tracks,
        })
    }
}

impl MediaStream for MockStream {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn tracks(&self) -> Vec<Rc<dyn MediaTrack>> {
        self.tracks.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// getUserMedia
// ---------------------------------------------------------------------------

pub struct MockDevices {
    pub ledger: Rc<DeviceLedger>,
    fail_with: RefCell<Option<MediaError>>,
    requests: Cell<usize>,
}

impl MockDevices {
    pub fn new(ledger: &Rc<DeviceLedger>) -> Rc<Self> {
        Rc::new(Self {
            ledger: Rc::clone(ledger),
            fail_with: RefCell::new(None),
            requests: Cell::new(0),
        })
    }

    pub fn failing(ledger: &Rc<DeviceLedger>, error: MediaError) -> Rc<Self> {
        let devices = Self::new(ledger);
        *devices.fail_with.borrow_mut() = Some(error);
        devices
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

#[async_trait(?Send)]
impl MediaDevices for MockDevices {
    async fn get_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<Rc<dyn MediaStream>, MediaError> {
        self.requests.set(self.requests.get() + 1);
        if let Some(error) = self.fail_with.borrow().clone() {
            return Err(error);
        }
        let mut tracks: Vec<Rc<dyn MediaTrack>> = Vec::new();
        if constraints.audio {
            tracks.push(MockTrack::capture(&self.ledger, TrackKind::Audio) as Rc<dyn MediaTrack>);
        }
        if constraints.video {
            tracks.push(MockTrack::capture(&self.ledger, TrackKind::Video) as Rc<dyn MediaTrack>);
        }
        Ok(MockStream::new("local-stream", tracks) as Rc<dyn MediaStream>)
    }
}

// ---------------------------------------------------------------------------
// RTCPeerConnection
// ---------------------------------------------------------------------------

pub const REMOTE_STREAM_ID: &str = "remote-stream";

/// The host candidate every mock peer "gathers" after its local description
/// is applied.
pub const HOST_CANDIDATE: &str = "candidate:1 1 udp 2122260223 192.168.1.10 54400 typ host";

/// Follows the browser's signaling state table closely enough to reject
/// out-of-order description calls.
pub struct MockPeer {
    events: PeerEvents,
    signaling: Cell<SignalingState>,
    local_descriptions: RefCell<Vec<SessionDescription>>,
    gathered: RefCell<Option<SessionDescription>>,
    remote_descriptions: RefCell<Vec<SessionDescription>>,
    tracks: RefCell<Vec<String>>,
    closed: Cell<bool>,
    fail_create_offer: bool,
    fail_set_remote: bool,
    remote_ledger: Rc<DeviceLedger>,
}

impl MockPeer {
    pub fn signaling(&self) -> SignalingState {
        self.signaling.get()
    }

    pub fn local_descriptions(&self) -> Vec<SessionDescription> {
        self.local_descriptions.borrow().clone()
    }

    pub fn remote_descriptions(&self) -> Vec<SessionDescription> {
        self.remote_descriptions.borrow().clone()
    }

    pub fn track_ids(&self) -> Vec<String> {
        self.tracks.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    fn deliver_remote_stream(&self) {
        let tracks: Vec<Rc<dyn MediaTrack>> = vec![
            MockTrack::capture(&self.remote_ledger, TrackKind::Audio) as Rc<dyn MediaTrack>,
            MockTrack::capture(&self.remote_ledger, TrackKind::Video) as Rc<dyn MediaTrack>,
        ];
        (self.events.on_remote_stream)(MockStream::new(REMOTE_STREAM_ID, tracks));
        (self.events.on_connection_state)("connected".to_string());
    }

    fn check_open(&self) -> Result<(), PeerError> {
        if self.closed.get() {
            Err(PeerError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl PeerConnection for MockPeer {
    async fn create_offer(&self) -> Result<SessionDescription, PeerError> {
        self.check_open()?;
        if self.fail_create_offer {
            return Err(PeerError::CreateDescription(SdpType::Offer, "no codecs".into()));
        }
        Ok(SessionDescription::offer(format!(
            "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\ns=-\r\na=tracks:{}\r\n",
            self.tracks.borrow().len()
        )))
    }

    async fn create_answer(&self) -> Result<SessionDescription, PeerError> {
        self.check_open()?;
        if self.signaling.get() != SignalingState::HaveRemoteOffer {
            return Err(PeerError::CreateDescription(
                SdpType::Answer,
                "no remote offer".into(),
            ));
        }
        Ok(SessionDescription::answer("v=0\r\no=- 3 4 IN IP4 127.0.0.1\r\ns=-\r\n"))
    }

    async fn set_local_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), PeerError> {
        self.check_open()?;
        let next = match (self.signaling.get(), description.sdp_type) {
            (SignalingState::Stable, SdpType::Offer) => SignalingState::HaveLocalOffer,
            (SignalingState::HaveRemoteOffer, SdpType::Answer) => SignalingState::Stable,
            (state, sdp_type) => {
                return Err(PeerError::SetLocalDescription(format!(
                    "cannot set local {sdp_type} in {state}"
                )))
            }
        };
        self.local_descriptions.borrow_mut().push(description.clone());
        self.signaling.set(next);

        // Like a browser: candidates trickle out through the callback and
        // end up in the SDP of `localDescription`.
        (self.events.on_ice_candidate)(HOST_CANDIDATE.to_string());
        *self.gathered.borrow_mut() = Some(SessionDescription::new(
            description.sdp_type,
            format!("{}a={HOST_CANDIDATE}\r\n", description.sdp),
        ));
        Ok(())
    }

    async fn set_remote_description(
        &self,
        description: &SessionDescription,
    ) -> Result<(), PeerError> {
        self.check_open()?;
        if self.fail_set_remote {
            return Err(PeerError::SetRemoteDescription("bad sdp".into()));
        }
        let next = match (self.signaling.get(), description.sdp_type) {
            (SignalingState::Stable, SdpType::Offer) => SignalingState::HaveRemoteOffer,
            (SignalingState::HaveLocalOffer, SdpType::Answer) => SignalingState::Stable,
            (state, sdp_type) => {
                return Err(PeerError::SetRemoteDescription(format!(
                    "cannot set remote {sdp_type} in {state}"
                )))
            }
        };
        self.remote_descriptions.borrow_mut().push(description.clone());
        self.signaling.set(next);
        self.deliver_remote_stream();
        Ok(())
    }

    async fn gathered_local_description(&self) -> Result<SessionDescription, PeerError> {
        self.check_open()?;
        self.gathered
            .borrow()
            .clone()
            .ok_or(PeerError::NoLocalDescription)
    }

    fn add_track(
        &self,
        track: &Rc<dyn MediaTrack>,
        _stream: &Rc<dyn MediaStream>,
    ) -> Result<(), PeerError> {
        self.check_open()?;
        self.tracks.borrow_mut().push(track.id());
        Ok(())
    }

    fn signaling_state(&self) -> SignalingState {
        self.signaling.get()
    }

    fn close(&self) {
        self.closed.set(true);
        self.signaling.set(SignalingState::Closed);
    }
}

#[derive(Default)]
pub struct MockPeerFactory {
    pub fail_create: Cell<bool>,
    pub fail_create_offer: Cell<bool>,
    pub fail_set_remote: Cell<bool>,
    peers: RefCell<Vec<Rc<MockPeer>>>,
    ice_servers: RefCell<Vec<String>>,
    remote_ledger: Rc<DeviceLedger>,
}

impl MockPeerFactory {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn peers(&self) -> Vec<Rc<MockPeer>> {
        self.peers.borrow().clone()
    }

    pub fn last(&self) -> Option<Rc<MockPeer>> {
        self.peers.borrow().last().cloned()
    }

    pub fn open_peers(&self) -> usize {
        self.peers.borrow().iter().filter(|p| !p.is_closed()).count()
    }

    pub fn ice_servers(&self) -> Vec<String> {
        self.ice_servers.borrow().clone()
    }
}

impl PeerConnectionFactory for MockPeerFactory {
    fn create(
        &self,
        config: &PeerConfig,
        events: PeerEvents,
    ) -> Result<Rc<dyn PeerConnection>, PeerError> {
        if self.fail_create.get() {
            return Err(PeerError::Create("RTCPeerConnection is not supported".into()));
        }
        *self.ice_servers.borrow_mut() = config.ice_servers.clone();
        let peer = Rc::new(MockPeer {
            events,
            signaling: Cell::new(SignalingState::Stable),
            local_descriptions: RefCell::new(Vec::new()),
            gathered: RefCell::new(None),
            remote_descriptions: RefCell::new(Vec::new()),
            tracks: RefCell::new(Vec::new()),
            closed: Cell::new(false),
            fail_create_offer: self.fail_create_offer.get(),
            fail_set_remote: self.fail_set_remote.get(),
            remote_ledger: Rc::clone(&self.remote_ledger),
        });
        self.peers.borrow_mut().push(Rc::clone(&peer));
        Ok(peer as Rc<dyn PeerConnection>)
    }
}

// ---------------------------------------------------------------------------
// Hosted SDK
// ---------------------------------------------------------------------------

pub struct MockSdk {
    pub ledger: Rc<DeviceLedger>,
    pub fail_join: Cell<bool>,
    pub fail_publish: Cell<bool>,
    pub microphone_error: RefCell<Option<MediaError>>,
    pub camera_error: RefCell<Option<MediaError>>,
    pub remote: RefCell<Vec<RemoteParticipant>>,
    joins: RefCell<Vec<(String, String, Option<String>)>>,
    published: RefCell<Vec<String>>,
    leaves: Cell<usize>,
}

impl MockSdk {
    pub fn new(ledger: &Rc<DeviceLedger>) -> Self {
        Self {
            ledger: Rc::clone(ledger),
            fail_join: Cell::new(false),
            fail_publish: Cell::new(false),
            microphone_error: RefCell::new(None),
            camera_error: RefCell::new(None),
            remote: RefCell::new(Vec::new()),
            joins: RefCell::new(Vec::new()),
            published: RefCell::new(Vec::new()),
            leaves: Cell::new(0),
        }
    }

    /// `(app_id, channel, token)` of every join attempt.
    pub fn joins(&self) -> Vec<(String, String, Option<String>)> {
        self.joins.borrow().clone()
    }

    /// Ids of the tracks currently published.
    pub fn published(&self) -> Vec<String> {
        self.published.borrow().clone()
    }

    pub fn leaves(&self) -> usize {
        self.leaves.get()
    }

    fn capture(
        &self,
        error: &RefCell<Option<MediaError>>,
        kind: TrackKind,
    ) -> Result<Rc<dyn MediaTrack>, MediaError> {
        if let Some(error) = error.borrow().clone() {
            return Err(error);
        }
        Ok(MockTrack::capture(&self.ledger, kind) as Rc<dyn MediaTrack>)
    }
}

#[async_trait(?Send)]
impl HostedSdkClient for MockSdk {
    async fn join(
        &self,
        app_id: &str,
        channel: &str,
        token: Option<&str>,
    ) -> Result<String, SdkError> {
        self.joins.borrow_mut().push((
            app_id.to_string(),
            channel.to_string(),
            token.map(str::to_string),
        ));
        if self.fail_join.get() {
            return Err(SdkError::Join("CAN_NOT_GET_GATEWAY_SERVER".into()));
        }
        Ok("1001".to_string())
    }

    async fn create_microphone_track(&self) -> Result<Rc<dyn MediaTrack>, MediaError> {
        self.capture(&self.microphone_error, TrackKind::Audio)
    }

    async fn create_camera_track(&self) -> Result<Rc<dyn MediaTrack>, MediaError> {
        self.capture(&self.camera_error, TrackKind::Video)
    }

    async fn publish(&self, tracks: &[Rc<dyn MediaTrack>]) -> Result<(), SdkError> {
        if self.fail_publish.get() {
            return Err(SdkError::Publish("INVALID_OPERATION".into()));
        }
        let mut published = self.published.borrow_mut();
        for track in tracks {
            if !published.contains(&track.id()) {
                published.push(track.id());
            }
        }
        Ok(())
    }

    async fn unpublish(&self, tracks: &[Rc<dyn MediaTrack>]) -> Result<(), SdkError> {
        let ids: Vec<String> = tracks.iter().map(|t| t.id()).collect();
        self.published.borrow_mut().retain(|id| !ids.contains(id));
        Ok(())
    }

    fn remote_users(&self) -> Vec<RemoteParticipant> {
        self.remote.borrow().clone()
    }

    fn play_remote_video(&self, uid: &str, _element_id: &str) -> Result<(), SdkError> {
        if self.remote.borrow().iter().any(|p| p.uid == uid && p.has_video) {
            Ok(())
        } else {
            Err(SdkError::Playback(format!("no video from {uid}")))
        }
    }

    async fn leave(&self) -> Result<(), SdkError> {
        self.leaves.set(self.leaves.get() + 1);
        self.published.borrow_mut().clear();
        Ok(())
    }
}

pub fn remote(uid: &str) -> RemoteParticipant {
    RemoteParticipant {
        uid: uid.to_string(),
        has_audio: true,
        has_video: true,
    }
}
