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

//! Browser implementations of the media, peer and hosted-SDK seams.

mod agora;
mod media_devices;
mod peer_connection;

pub use agora::{AgoraMediaTrack, AgoraSdkClient, AgoraTrack};
pub use media_devices::{media_error_from_js, WebMediaDevices, WebMediaStream, WebMediaTrack};
pub use peer_connection::{WebPeerConnection, WebPeerConnectionFactory};
