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

//! Calls placed through a hosted real-time SDK.
//!
//! The SDK owns transport, mixing and subscription; the code here only joins
//! a channel, publishes local tracks and keeps the hardware accounting
//! straight.

mod backend;

pub use backend::{HostedSdkBackend, JOIN_FAILED_MESSAGE};

use crate::backend::RemoteParticipant;
use crate::error::{MediaError, SdkError};
use crate::media::MediaTrack;
use async_trait::async_trait;
use std::rc::Rc;

/// The subset of a hosted SDK client the backend drives.
///
/// Implementations subscribe to remote users on their own as they publish
/// and emit [`ClientEvent::ParticipantsChanged`](crate::ClientEvent) when the
/// remote set changes.
#[async_trait(?Send)]
pub trait HostedSdkClient {
    /// Joins `channel` and returns the uid the SDK assigned to this client.
    async fn join(
        &self,
        app_id: &str,
        channel: &str,
        token: Option<&str>,
    ) -> Result<String, SdkError>;

    async fn create_microphone_track(&self) -> Result<Rc<dyn MediaTrack>, MediaError>;

    async fn create_camera_track(&self) -> Result<Rc<dyn MediaTrack>, MediaError>;

    async fn publish(&self, tracks: &[Rc<dyn MediaTrack>]) -> Result<(), SdkError>;

    async fn unpublish(&self, tracks: &[Rc<dyn MediaTrack>]) -> Result<(), SdkError>;

    fn remote_users(&self) -> Vec<RemoteParticipant>;

    /// Renders a remote user's video into the element with id `element_id`.
    fn play_remote_video(&self, uid: &str, element_id: &str) -> Result<(), SdkError>;

    async fn leave(&self) -> Result<(), SdkError>;
}
