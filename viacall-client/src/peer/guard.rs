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

use super::PeerConnection;
use log::debug;
use std::rc::Rc;

/// Closes the peer connection when dropped. A closed connection cannot be
/// reused, so the guard is discarded together with it.
pub struct PeerConnectionGuard {
    peer: Rc<dyn PeerConnection>,
    released: bool,
}

impl PeerConnectionGuard {
    pub fn new(peer: Rc<dyn PeerConnection>) -> Self {
        Self {
            peer,
            released: false,
        }
    }

    pub fn peer(&self) -> &Rc<dyn PeerConnection> {
        &self.peer
    }

    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.peer.close();
            debug!("Peer connection closed");
        }
    }
}

impl Drop for PeerConnectionGuard {
    fn drop(&mut self) {
        self.release();
    }
}
