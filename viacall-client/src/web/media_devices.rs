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

use crate::error::MediaError;
use crate::media::{MediaConstraints, MediaDevices, MediaStream, MediaTrack, TrackKind};
use async_trait::async_trait;
use gloo_utils::window;
use std::any::Any;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DomException, MediaStreamConstraints, MediaStreamTrackState};

/// A `MediaStreamTrack` from `getUserMedia` or a peer connection.
pub struct WebMediaTrack {
    track: web_sys::MediaStreamTrack,
    kind: TrackKind,
}

impl WebMediaTrack {
    pub fn new(track: web_sys::MediaStreamTrack) -> Self {
        let kind = if track.kind() == "audio" {
            TrackKind::Audio
        } else {
            TrackKind::Video
        };
        Self { track, kind }
    }

    pub fn inner(&self) -> &web_sys::MediaStreamTrack {
        &self.track
    }
}

impl MediaTrack for WebMediaTrack {
    fn id(&self) -> String {
        self.track.id()
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn is_live(&self) -> bool {
        self.track.ready_state() == MediaStreamTrackState::Live
    }

    fn set_enabled(&self, enabled: bool) {
        self.track.set_enabled(enabled);
    }

    fn stop(&self) {
        self.track.stop();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A browser `MediaStream`; [`inner`](Self::inner) is what a `<video>`
/// element's `srcObject` takes.
pub struct WebMediaStream {
    stream: web_sys::MediaStream,
}

impl WebMediaStream {
    pub fn new(stream: web_sys::MediaStream) -> Self {
        Self { stream }
    }

    pub fn inner(&self) -> &web_sys::MediaStream {
        &self.stream
    }
}

impl MediaStream for WebMediaStream {
    fn id(&self) -> String {
        self.stream.id()
    }

    fn tracks(&self) -> Vec<Rc<dyn MediaTrack>> {
        self.stream
            .get_tracks()
            .iter()
            .filter_map(|t| t.dyn_into::<web_sys::MediaStreamTrack>().ok())
            .map(|t| Rc::new(WebMediaTrack::new(t)) as Rc<dyn MediaTrack>)
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `navigator.mediaDevices`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebMediaDevices;

#[async_trait(?Send)]
impl MediaDevices for WebMediaDevices {
    async fn get_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<Rc<dyn MediaStream>, MediaError> {
        let media_devices = window()
            .navigator()
            .media_devices()
            .map_err(media_error_from_js)?;

        let js_constraints = MediaStreamConstraints::new();
        js_constraints.set_audio(&JsValue::from_bool(constraints.audio));
        js_constraints.set_video(&JsValue::from_bool(constraints.video));

        let promise = media_devices
            .get_user_media_with_constraints(&js_constraints)
            .map_err(media_error_from_js)?;
        let stream = JsFuture::from(promise)
            .await
            .map_err(media_error_from_js)?
            .dyn_into::<web_sys::MediaStream>()
            .map_err(|_| MediaError::Other("getUserMedia did not return a MediaStream".into()))?;

        Ok(Rc::new(WebMediaStream::new(stream)))
    }
}

/// Maps a `getUserMedia` rejection to a [`MediaError`] by its DOMException
/// name.
pub fn media_error_from_js(err: JsValue) -> MediaError {
    match err.dyn_ref::<DomException>() {
        Some(ex) => match ex.name().as_str() {
            "NotAllowedError" | "SecurityError" => MediaError::PermissionDenied(ex.message()),
            "NotFoundError" | "OverconstrainedError" => MediaError::NoDevice(ex.message()),
            name => MediaError::Other(format!("{name}: {}", ex.message())),
        },
        None => MediaError::Other(format!("{err:?}")),
    }
}
