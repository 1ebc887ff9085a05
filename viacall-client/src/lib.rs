//! This crate is the call engine behind the viacall front end. It places calls two ways: by
//! joining a named channel on a hosted real-time SDK, or by negotiating a peer connection by
//! hand, with the offer and answer carried between the two users as copy-and-paste
//! "connection codes".
//!
//! The crate makes no assumptions about the UI. Both ways of calling implement [`CallBackend`]
//! and report progress through one [`ClientState`] machine, and every change is broadcast on the
//! global event bus ([`subscribe_client_events`]) for whatever framework renders it.
//!
//! Browser implementations (`getUserMedia`, `RTCPeerConnection`, the Agora Web SDK) live in
//! [`web`] behind the `wasm` feature. Everything else builds and tests natively against mock
//! devices.
//!
//! # Outline of usage
//!
//! ## Hosted SDK channel:
//! ```ignore
//! let sdk = AgoraSdkClient::new(&options)?;
//! let mut backend = HostedSdkBackend::new(sdk, options);
//!
//! backend.join(JoinTarget::Channel("lobby".into())).await?;
//! backend.set_camera_enabled(false).await?; // stops the camera
//! backend.leave().await?;                   // stops everything
//! ```
//!
//! ## Manual peer-to-peer call:
//! ```ignore
//! let mut backend = ManualPeerBackend::new(devices, factory, PeerConfig::default());
//! backend.start_camera().await?;
//!
//! // offering side
//! let offer = backend.join(JoinTarget::CreateOffer).await?;
//! // ...the other side pastes `offer` and sends back its answer...
//! backend.join(JoinTarget::AcceptAnswer(answer)).await?;
//!
//! // answering side
//! let answer = backend.join(JoinTarget::AcceptOffer(offer)).await?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod events;
pub mod handshake;
pub mod hosted;
pub mod manual_backend;
pub mod media;
pub mod peer;
pub mod state;

#[cfg(feature = "wasm")]
pub mod web;

pub use backend::{BackendKind, CallBackend, JoinTarget, RemoteParticipant};
pub use config::{HostedSdkOptions, PeerConfig, DEFAULT_STUN_SERVER};
pub use error::{CallError, MediaError, PeerError, SdkError};
pub use event_bus::{emit_client_event, global_client_sender, subscribe_client_events};
pub use events::ClientEvent;
pub use handshake::{CallRole, ManualHandshake};
pub use hosted::{HostedSdkBackend, HostedSdkClient, JOIN_FAILED_MESSAGE};
pub use manual_backend::ManualPeerBackend;
pub use media::{
    MediaConstraints, MediaDevices, MediaStream, MediaStreamGuard, MediaTrack, TrackGuard,
    TrackKind,
};
pub use peer::{PeerConnection, PeerConnectionFactory, PeerConnectionGuard, PeerEvents, SignalingState};
pub use state::{CallStateMachine, ClientState, Transition};
pub use viacall_types::{channel_name_error, validate_channel_name, ConnectionCode};
