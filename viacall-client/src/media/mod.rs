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

//! Camera and microphone capture.
//!
//! The browser (`getUserMedia`) and the hosted SDK each produce their own
//! track objects; both are seen through [`MediaTrack`] / [`MediaStream`] so
//! the handshake and the backends stay testable off the browser.

mod guard;

pub use guard::{MediaStreamGuard, TrackGuard};

use crate::error::MediaError;
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Video => write!(f, "video"),
        }
    }
}

/// A single live audio or video track.
pub trait MediaTrack {
    fn id(&self) -> String;

    fn kind(&self) -> TrackKind;

    /// `false` once the track has been stopped.
    fn is_live(&self) -> bool;

    /// Mutes/unmutes without releasing the device.
    fn set_enabled(&self, enabled: bool);

    /// Stops the track and releases the underlying device.
    fn stop(&self);

    /// Renders the track into the DOM element with id `element_id`. Only
    /// hosted-SDK tracks render themselves; browser tracks are attached
    /// through their stream instead.
    fn play(&self, _element_id: &str) {}

    fn as_any(&self) -> &dyn Any;
}

/// An ordered set of tracks captured together.
pub trait MediaStream {
    fn id(&self) -> String;

    fn tracks(&self) -> Vec<Rc<dyn MediaTrack>>;

    fn as_any(&self) -> &dyn Any;

    fn has_kind(&self, kind: TrackKind) -> bool {
        self.tracks().iter().any(|t| t.kind() == kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Source of captured streams (`navigator.mediaDevices` in the browser).
#[async_trait(?Send)]
pub trait MediaDevices {
    async fn get_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<Rc<dyn MediaStream>, MediaError>;
}
