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

//! Error types for the call engine.
//!
//! Every failure that the browser or the hosted SDK reports ends up as a
//! [`CallError`] returned to the caller; nothing is only logged.

use crate::backend::BackendKind;
use thiserror::Error;
use viacall_types::{ChannelNameError, ConnectionCodeError, SdpType};

/// Failures while acquiring camera/microphone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("Camera or microphone access was denied: {0}")]
    PermissionDenied(String),

    #[error("No camera or microphone was found: {0}")]
    NoDevice(String),

    #[error("Could not access media devices: {0}")]
    Other(String),
}

/// Failures reported by the peer connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    #[error("Failed to create peer connection: {0}")]
    Create(String),

    #[error("Failed to create {0}: {1}")]
    CreateDescription(SdpType, String),

    #[error("Failed to set local description: {0}")]
    SetLocalDescription(String),

    #[error("Failed to set remote description: {0}")]
    SetRemoteDescription(String),

    #[error("Failed to add track: {0}")]
    AddTrack(String),

    #[error("No local description to share")]
    NoLocalDescription,

    #[error("Peer connection is closed")]
    Closed,
}

/// Failures reported by the hosted SDK.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    #[error("Hosted SDK is not available: {0}")]
    Unavailable(String),

    #[error("Failed to join channel: {0}")]
    Join(String),

    #[error("Failed to publish tracks: {0}")]
    Publish(String),

    #[error("Failed to unpublish tracks: {0}")]
    Unpublish(String),

    #[error("Failed to leave channel: {0}")]
    Leave(String),

    #[error("Failed to play remote media: {0}")]
    Playback(String),
}

#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    InvalidChannel(#[from] ChannelNameError),

    #[error(transparent)]
    InvalidCode(#[from] ConnectionCodeError),

    #[error("Expected an {expected} code but this is an {actual} code.")]
    UnexpectedDescription { expected: SdpType, actual: SdpType },

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Peer(#[from] PeerError),

    #[error(transparent)]
    Sdk(#[from] SdkError),

    #[error("{0}")]
    InvalidState(String),

    #[error("{backend} does not support {operation}")]
    Unsupported {
        backend: BackendKind,
        operation: &'static str,
    },
}

impl CallError {
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        CallError::InvalidState(message.into())
    }

    /// Errors caused by what the user typed or pasted, as opposed to the
    /// browser or the SDK failing.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CallError::InvalidChannel(_)
                | CallError::InvalidCode(_)
                | CallError::UnexpectedDescription { .. }
        )
    }
}
