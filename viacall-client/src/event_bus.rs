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

//! Global event bus for framework-agnostic client events.
//!
//! This module provides a MPMC (multi-producer, multi-consumer) broadcast channel
//! for client events. Any component can subscribe to receive events, and any
//! component can emit events.
//!
//! # Example
//!
//! ```ignore
//! use viacall_client::{subscribe_client_events, emit_client_event, ClientEvent};
//!
//! let mut rx = subscribe_client_events();
//! wasm_bindgen_futures::spawn_local(async move {
//!     while let Ok(event) = rx.recv().await {
//!         if let ClientEvent::ParticipantsChanged = event {
//!             // re-render the remote grid
//!         }
//!     }
//! });
//!
//! emit_client_event(ClientEvent::ParticipantsChanged);
//! ```

use crate::events::ClientEvent;
use async_broadcast::{broadcast, InactiveReceiver, Receiver, Sender};
use once_cell::sync::Lazy;

/// Capacity of the event bus channel
pub const EVENT_BUS_CAPACITY: usize = 256;

struct EventBus {
    sender: Sender<ClientEvent>,
    // Holds the channel open while nobody is subscribed.
    _keepalive: InactiveReceiver<ClientEvent>,
}

static BUS: Lazy<EventBus> = Lazy::new(|| {
    let (mut sender, receiver) = broadcast(EVENT_BUS_CAPACITY);
    // Slow subscribers lose the oldest events instead of blocking emitters.
    sender.set_overflow(true);
    EventBus {
        sender,
        _keepalive: receiver.deactivate(),
    }
});

/// Get the global sender for emitting client events.
pub fn global_client_sender() -> Sender<ClientEvent> {
    BUS.sender.clone()
}

/// Subscribe to client events.
///
/// Returns a receiver that will receive all future client events.
/// Each subscriber receives all events independently (broadcast pattern).
pub fn subscribe_client_events() -> Receiver<ClientEvent> {
    BUS.sender.new_receiver()
}

/// Emit a client event to all subscribers.
///
/// This never blocks. With no active subscriber the event is dropped.
pub fn emit_client_event(event: ClientEvent) {
    let _ = BUS.sender.try_broadcast(event);
}
