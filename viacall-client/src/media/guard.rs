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

//! Deferred-release guards for captured media.
//!
//! Dropping a guard stops its tracks. `release()` does the same eagerly and
//! is idempotent, so an explicit teardown followed by the drop stops each
//! track exactly once.

use super::{MediaStream, MediaTrack};
use crate::event_bus::emit_client_event;
use crate::events::ClientEvent;
use log::debug;
use std::rc::Rc;

pub struct MediaStreamGuard {
    stream: Rc<dyn MediaStream>,
    released: bool,
}

impl MediaStreamGuard {
    pub fn new(stream: Rc<dyn MediaStream>) -> Self {
        Self {
            stream,
            released: false,
        }
    }

    pub fn stream(&self) -> &Rc<dyn MediaStream> {
        &self.stream
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Stops every track; returns how many were stopped by this call.
    pub fn release(&mut self) -> usize {
        if self.released {
            return 0;
        }
        self.released = true;
        let tracks = self.stream.tracks();
        for track in &tracks {
            track.stop();
        }
        debug!(
            "Released {} track(s) of stream {}",
            tracks.len(),
            self.stream.id()
        );
        emit_client_event(ClientEvent::LocalTracksReleased(tracks.len()));
        tracks.len()
    }
}

impl Drop for MediaStreamGuard {
    fn drop(&mut self) {
        self.release();
    }
}

pub struct TrackGuard {
    track: Rc<dyn MediaTrack>,
    released: bool,
}

impl TrackGuard {
    pub fn new(track: Rc<dyn MediaTrack>) -> Self {
        Self {
            track,
            released: false,
        }
    }

    pub fn track(&self) -> &Rc<dyn MediaTrack> {
        &self.track
    }

    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        self.track.stop();
        debug!("Released {} track {}", self.track.kind(), self.track.id());
        emit_client_event(ClientEvent::LocalTracksReleased(1));
        true
    }
}

impl Drop for TrackGuard {
    fn drop(&mut self) {
        self.release();
    }
}
