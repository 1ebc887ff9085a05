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

//! Bindings to the Agora Web SDK (`AgoraRTC` global, loaded by a `<script>`
//! tag in `index.html`).

use super::peer_connection::js_error_message;
use crate::backend::RemoteParticipant;
use crate::config::HostedSdkOptions;
use crate::error::{MediaError, SdkError};
use crate::event_bus::emit_client_event;
use crate::events::ClientEvent;
use crate::hosted::HostedSdkClient;
use crate::media::{MediaTrack, TrackKind};
use async_trait::async_trait;
use js_sys::{Array, Promise, Reflect};
use log::{debug, error, warn};
use serde::Serialize;
use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = AgoraRTC, js_name = createClient)]
    fn create_client(config: &JsValue) -> Result<AgoraClient, JsValue>;

    #[wasm_bindgen(catch, js_namespace = AgoraRTC, js_name = createMicrophoneAudioTrack)]
    fn create_microphone_audio_track() -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = AgoraRTC, js_name = createCameraVideoTrack)]
    fn create_camera_video_track() -> Result<Promise, JsValue>;

    #[derive(Clone)]
    type AgoraClient;

    #[wasm_bindgen(catch, method)]
    fn join(
        this: &AgoraClient,
        app_id: &str,
        channel: &str,
        token: &JsValue,
        uid: &JsValue,
    ) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, method)]
    fn publish(this: &AgoraClient, tracks: &Array) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, method)]
    fn unpublish(this: &AgoraClient, tracks: &Array) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, method)]
    fn subscribe(this: &AgoraClient, user: &RemoteUser, media_type: &str)
        -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, method)]
    fn leave(this: &AgoraClient) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &AgoraClient, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn off(this: &AgoraClient, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, getter, js_name = remoteUsers)]
    fn remote_users(this: &AgoraClient) -> Array;

    type RemoteUser;

    #[wasm_bindgen(method, getter)]
    fn uid(this: &RemoteUser) -> JsValue;

    #[wasm_bindgen(method, getter, js_name = hasAudio)]
    fn has_audio(this: &RemoteUser) -> bool;

    #[wasm_bindgen(method, getter, js_name = hasVideo)]
    fn has_video(this: &RemoteUser) -> bool;

    #[wasm_bindgen(method, getter, js_name = audioTrack)]
    fn audio_track(this: &RemoteUser) -> Option<AgoraTrack>;

    #[wasm_bindgen(method, getter, js_name = videoTrack)]
    fn video_track(this: &RemoteUser) -> Option<AgoraTrack>;

    /// Local or remote SDK track.
    #[derive(Clone)]
    pub type AgoraTrack;

    #[wasm_bindgen(method, js_name = getTrackId)]
    fn get_track_id(this: &AgoraTrack) -> String;

    #[wasm_bindgen(catch, method, js_name = play)]
    fn play_in(this: &AgoraTrack, element_id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, method, js_name = play)]
    fn play_audio(this: &AgoraTrack) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, method, js_name = setEnabled)]
    fn set_enabled(this: &AgoraTrack, enabled: bool) -> Result<Promise, JsValue>;

    #[wasm_bindgen(method)]
    fn close(this: &AgoraTrack);
}

#[derive(Serialize)]
struct ClientConfig<'a> {
    codec: &'a str,
    mode: &'a str,
}

/// A local microphone or camera track created by the SDK. Closing it
/// releases the device.
pub struct AgoraMediaTrack {
    track: AgoraTrack,
    kind: TrackKind,
    closed: Cell<bool>,
}

impl AgoraMediaTrack {
    fn new(track: AgoraTrack, kind: TrackKind) -> Self {
        Self {
            track,
            kind,
            closed: Cell::new(false),
        }
    }

    pub fn inner(&self) -> &AgoraTrack {
        &self.track
    }
}

impl MediaTrack for AgoraMediaTrack {
    fn id(&self) -> String {
        self.track.get_track_id()
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn is_live(&self) -> bool {
        !self.closed.get()
    }

    fn set_enabled(&self, enabled: bool) {
        match self.track.set_enabled(enabled) {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    warn!("Error toggling track: {}", js_error_message(&e));
                }
            }),
            Err(e) => warn!("Error toggling track: {}", js_error_message(&e)),
        }
    }

    fn stop(&self) {
        if !self.closed.replace(true) {
            self.track.close();
        }
    }

    fn play(&self, element_id: &str) {
        if let Err(e) = self.track.play_in(element_id) {
            warn!("Error playing local {} track: {}", self.kind, js_error_message(&e));
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

type Listener = Closure<dyn FnMut(JsValue, JsValue)>;

/// [`HostedSdkClient`] over an `AgoraRTC` client.
///
/// Remote users are subscribed as soon as they publish; remote audio starts
/// playing right away, remote video waits for the UI to call
/// [`play_remote_video`](HostedSdkClient::play_remote_video).
pub struct AgoraSdkClient {
    client: AgoraClient,
    listeners: Vec<(&'static str, Listener)>,
}

impl AgoraSdkClient {
    pub fn new(options: &HostedSdkOptions) -> Result<Self, SdkError> {
        let has_sdk = Reflect::has(&js_sys::global(), &JsValue::from_str("AgoraRTC"))
            .unwrap_or(false);
        if !has_sdk {
            return Err(SdkError::Unavailable("AgoraRTC is not loaded".into()));
        }
        let config = serde_wasm_bindgen::to_value(&ClientConfig {
            codec: &options.codec,
            mode: &options.mode,
        })
        .map_err(|e| SdkError::Unavailable(e.to_string()))?;
        let client =
            create_client(&config).map_err(|e| SdkError::Unavailable(js_error_message(&e)))?;

        let mut sdk = Self {
            client,
            listeners: Vec::new(),
        };
        sdk.listen_for_remote_users();
        Ok(sdk)
    }

    fn listen_for_remote_users(&mut self) {
        let client = self.client.clone();
        let on_published = Closure::wrap(Box::new(move |user: JsValue, media_type: JsValue| {
            let user: RemoteUser = user.unchecked_into();
            let media_type = media_type.as_string().unwrap_or_default();
            let client = client.clone();
            spawn_local(async move {
                if let Err(e) = subscribe_remote(&client, &user, &media_type).await {
                    error!("Error subscribing to remote {media_type}: {e}");
                }
                emit_client_event(ClientEvent::ParticipantsChanged);
            });
        }) as Box<dyn FnMut(JsValue, JsValue)>);
        self.add_listener("user-published", on_published);

        for event in ["user-unpublished", "user-joined", "user-left"] {
            let listener = Closure::wrap(Box::new(move |_: JsValue, _: JsValue| {
                debug!("Remote {event}");
                emit_client_event(ClientEvent::ParticipantsChanged);
            }) as Box<dyn FnMut(JsValue, JsValue)>);
            self.add_listener(event, listener);
        }
    }

    fn add_listener(&mut self, event: &'static str, listener: Listener) {
        self.client.on(event, listener.as_ref().unchecked_ref());
        self.listeners.push((event, listener));
    }

    fn find_user(&self, uid: &str) -> Option<RemoteUser> {
        self.client
            .remote_users()
            .iter()
            .map(|u| u.unchecked_into::<RemoteUser>())
            .find(|u| uid_to_string(&u.uid()) == uid)
    }

    async fn create_track(
        &self,
        kind: TrackKind,
        create: fn() -> Result<Promise, JsValue>,
    ) -> Result<Rc<dyn MediaTrack>, MediaError> {
        let promise = create().map_err(|e| sdk_media_error(&e))?;
        let track = JsFuture::from(promise)
            .await
            .map_err(|e| sdk_media_error(&e))?;
        Ok(Rc::new(AgoraMediaTrack::new(track.unchecked_into(), kind)))
    }
}

impl Drop for AgoraSdkClient {
    fn drop(&mut self) {
        for (event, listener) in &self.listeners {
            self.client.off(event, listener.as_ref().unchecked_ref());
        }
    }
}

#[async_trait(?Send)]
impl HostedSdkClient for AgoraSdkClient {
    async fn join(
        &self,
        app_id: &str,
        channel: &str,
        token: Option<&str>,
    ) -> Result<String, SdkError> {
        let token = token.map(JsValue::from_str).unwrap_or(JsValue::NULL);
        let promise = self
            .client
            .join(app_id, channel, &token, &JsValue::NULL)
            .map_err(|e| SdkError::Join(js_error_message(&e)))?;
        let uid = JsFuture::from(promise)
            .await
            .map_err(|e| SdkError::Join(js_error_message(&e)))?;
        Ok(uid_to_string(&uid))
    }

    async fn create_microphone_track(&self) -> Result<Rc<dyn MediaTrack>, MediaError> {
        self.create_track(TrackKind::Audio, create_microphone_audio_track)
            .await
    }

    async fn create_camera_track(&self) -> Result<Rc<dyn MediaTrack>, MediaError> {
        self.create_track(TrackKind::Video, create_camera_video_track)
            .await
    }

    async fn publish(&self, tracks: &[Rc<dyn MediaTrack>]) -> Result<(), SdkError> {
        let tracks = sdk_tracks(tracks).map_err(SdkError::Publish)?;
        let promise = self
            .client
            .publish(&tracks)
            .map_err(|e| SdkError::Publish(js_error_message(&e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| SdkError::Publish(js_error_message(&e)))?;
        Ok(())
    }

    async fn unpublish(&self, tracks: &[Rc<dyn MediaTrack>]) -> Result<(), SdkError> {
        let tracks = sdk_tracks(tracks).map_err(SdkError::Unpublish)?;
        let promise = self
            .client
            .unpublish(&tracks)
            .map_err(|e| SdkError::Unpublish(js_error_message(&e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| SdkError::Unpublish(js_error_message(&e)))?;
        Ok(())
    }

    fn remote_users(&self) -> Vec<RemoteParticipant> {
        self.client
            .remote_users()
            .iter()
            .map(|u| {
                let user: RemoteUser = u.unchecked_into();
                RemoteParticipant {
                    uid: uid_to_string(&user.uid()),
                    has_audio: user.has_audio(),
                    has_video: user.has_video(),
                }
            })
            .collect()
    }

    fn play_remote_video(&self, uid: &str, element_id: &str) -> Result<(), SdkError> {
        let track = self
            .find_user(uid)
            .and_then(|u| u.video_track())
            .ok_or_else(|| SdkError::Playback(format!("no video from {uid}")))?;
        track
            .play_in(element_id)
            .map_err(|e| SdkError::Playback(js_error_message(&e)))
    }

    async fn leave(&self) -> Result<(), SdkError> {
        let promise = self
            .client
            .leave()
            .map_err(|e| SdkError::Leave(js_error_message(&e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| SdkError::Leave(js_error_message(&e)))?;
        Ok(())
    }
}

async fn subscribe_remote(
    client: &AgoraClient,
    user: &RemoteUser,
    media_type: &str,
) -> Result<(), String> {
    let promise = client
        .subscribe(user, media_type)
        .map_err(|e| js_error_message(&e))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| js_error_message(&e))?;
    if media_type == "audio" {
        if let Some(track) = user.audio_track() {
            track.play_audio().map_err(|e| js_error_message(&e))?;
        }
    }
    Ok(())
}

fn sdk_tracks(tracks: &[Rc<dyn MediaTrack>]) -> Result<Array, String> {
    let array = Array::new();
    for track in tracks {
        let track = track
            .as_any()
            .downcast_ref::<AgoraMediaTrack>()
            .ok_or_else(|| format!("track {} was not created by the SDK", track.id()))?;
        array.push(track.inner());
    }
    Ok(array)
}

/// Uids are numbers unless the app joined with a string uid.
fn uid_to_string(uid: &JsValue) -> String {
    uid.as_f64()
        .map(|n| format!("{n}"))
        .or_else(|| uid.as_string())
        .unwrap_or_default()
}

/// Maps an SDK track-creation error by its `code` (`PERMISSION_DENIED`,
/// `DEVICE_NOT_FOUND`, ...) or, failing that, by its DOMException name.
fn sdk_media_error(err: &JsValue) -> MediaError {
    let code = Reflect::get(err, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_string())
        .unwrap_or_default();
    let message = js_error_message(err);
    match code.as_str() {
        "PERMISSION_DENIED" => MediaError::PermissionDenied(message),
        "DEVICE_NOT_FOUND" | "NOT_SUPPORTED" => MediaError::NoDevice(message),
        _ => match super::media_devices::media_error_from_js(err.clone()) {
            MediaError::Other(_) => MediaError::Other(message),
            mapped => mapped,
        },
    }
}
