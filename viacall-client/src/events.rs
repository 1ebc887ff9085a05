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

//! Framework-agnostic event types for the call engine.
//!
//! These events are emitted via the event bus and can be subscribed to by any
//! frontend framework.

use crate::backend::BackendKind;
use crate::state::ClientState;

/// Events emitted by the call backends that UI frameworks can subscribe to.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientEvent {
    // === State Events ===
    /// A backend moved to a new [`ClientState`]
    StateChanged {
        backend: BackendKind,
        state: ClientState,
    },

    // === Device Events ===
    /// Camera/microphone capture succeeded
    PermissionGranted,

    /// Camera/microphone capture failed
    PermissionDenied(String),

    /// Local tracks were stopped and their hardware released (track count)
    LocalTracksReleased(usize),

    // === Participant Events ===
    /// Remote participants joined, left, published or unpublished media
    ParticipantsChanged,

    /// A remote media stream arrived on the peer connection (stream id)
    RemoteStreamAdded(String),

    // === Peer Connection Events ===
    /// A local ICE candidate was gathered
    IceCandidate(String),

    /// The peer connection's ICE connection state changed
    ConnectionStateChanged(String),

    /// A local offer was created and applied
    OfferCreated,

    /// A local answer was created and applied
    AnswerCreated,

    /// A manual call was torn down
    CallEnded,
}
