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

//! Explicit client state machine shared by every call backend.
//!
//! ```text
//!   Idle ──BeginJoin──▶ Joining ──Joined──▶ Joined
//!    ▲                     │                   │
//!    │                   Fail                  │
//!    │                     ▼                   │
//!    └───────Leave────── Failed ◀──────────────┘ (Leave from any state)
//! ```
//!
//! `Failed` only moves on through an explicit user action (`BeginJoin` to
//! retry, `Leave` to go home); nothing is retried automatically.

use crate::backend::BackendKind;
use crate::error::CallError;
use crate::event_bus::emit_client_event;
use crate::events::ClientEvent;
use log::debug;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClientState {
    #[default]
    Idle,
    Joining,
    Joined,
    /// Carries the message shown to the user.
    Failed(String),
}

impl ClientState {
    pub fn is_joining(&self) -> bool {
        matches!(self, ClientState::Joining)
    }

    pub fn is_joined(&self) -> bool {
        matches!(self, ClientState::Joined)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            ClientState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The state reached by applying `transition`, or `None` when the
    /// transition is not allowed from here.
    pub fn next(&self, transition: &Transition) -> Option<ClientState> {
        use ClientState::*;
        match (self, transition) {
            (Idle | Failed(_), Transition::BeginJoin) => Some(Joining),
            (Joining, Transition::Joined) => Some(Joined),
            (Joining, Transition::Fail(message)) => Some(Failed(message.clone())),
            (_, Transition::Leave) => Some(Idle),
            _ => None,
        }
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientState::Idle => write!(f, "idle"),
            ClientState::Joining => write!(f, "joining"),
            ClientState::Joined => write!(f, "joined"),
            ClientState::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    BeginJoin,
    Joined,
    Fail(String),
    Leave,
}

/// Owns a backend's [`ClientState`] and publishes every change on the event
/// bus.
#[derive(Debug)]
pub struct CallStateMachine {
    backend: BackendKind,
    state: ClientState,
}

impl CallStateMachine {
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            state: ClientState::Idle,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn apply(&mut self, transition: Transition) -> Result<(), CallError> {
        let next = self.state.next(&transition).ok_or_else(|| {
            CallError::invalid_state(format!(
                "Cannot {transition:?} while {}",
                self.state
            ))
        })?;
        if next != self.state {
            debug!("{}: {} -> {}", self.backend, self.state, next);
            self.state = next;
            emit_client_event(ClientEvent::StateChanged {
                backend: self.backend,
                state: self.state.clone(),
            });
        }
        Ok(())
    }
}
