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
 */

//! Integration tests for the hosted-SDK call backend.

#![cfg(not(target_arch = "wasm32"))]

mod support;

use std::rc::Rc;
use support::{remote, DeviceLedger, MockSdk};
use viacall_client::{
    BackendKind, CallBackend, CallError, ClientState, HostedSdkBackend, HostedSdkOptions,
    JoinTarget, MediaError, SdkError, TrackKind, JOIN_FAILED_MESSAGE,
};
use viacall_types::ChannelNameError;

fn backend(ledger: &Rc<DeviceLedger>) -> HostedSdkBackend<MockSdk> {
    HostedSdkBackend::new(MockSdk::new(ledger), HostedSdkOptions::new("test-app-id"))
}

async fn joined(ledger: &Rc<DeviceLedger>) -> HostedSdkBackend<MockSdk> {
    let mut backend = backend(ledger);
    backend
        .join(JoinTarget::Channel("lobby".into()))
        .await
        .unwrap();
    backend
}

#[tokio::test]
async fn join_captures_and_publishes_both_tracks() {
    let ledger = DeviceLedger::new();
    let backend = joined(&ledger).await;

    assert_eq!(backend.state(), ClientState::Joined);
    assert_eq!(backend.channel(), Some("lobby"));
    assert_eq!(backend.uid(), Some("1001"));
    assert_eq!(
        backend.client().joins(),
        vec![("test-app-id".to_string(), "lobby".to_string(), None)]
    );
    assert_eq!(ledger.live(), 2);
    assert_eq!(backend.client().published().len(), 2);
    assert!(backend.local_video_track().is_some());
}

#[tokio::test]
async fn token_is_passed_through() {
    let ledger = DeviceLedger::new();
    let options = HostedSdkOptions::new("app").with_token(Some("secret".into()));
    let mut backend = HostedSdkBackend::new(MockSdk::new(&ledger), options);

    backend
        .join(JoinTarget::Channel("lobby".into()))
        .await
        .unwrap();

    assert_eq!(backend.client().joins()[0].2.as_deref(), Some("secret"));
}

#[tokio::test]
async fn invalid_channel_is_rejected_before_anything_is_captured() {
    let ledger = DeviceLedger::new();
    let mut backend = backend(&ledger);

    let err = backend
        .join(JoinTarget::Channel("no spaces".into()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CallError::InvalidChannel(ChannelNameError::InvalidCharacters)
    ));
    assert_eq!(backend.state(), ClientState::Idle);
    assert_eq!(ledger.acquired(), 0);
    assert!(backend.client().joins().is_empty());
}

#[tokio::test]
async fn join_failure_releases_tracks_and_fails() {
    let ledger = DeviceLedger::new();
    let mut backend = backend(&ledger);
    backend.client().fail_join.set(true);

    let err = backend
        .join(JoinTarget::Channel("lobby".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::Sdk(SdkError::Join(_))));
    assert_eq!(
        backend.state(),
        ClientState::Failed(JOIN_FAILED_MESSAGE.to_string())
    );
    assert_eq!(ledger.acquired(), 2);
    assert_eq!(ledger.live(), 0);
    assert!(backend.local_tracks().is_empty());
    assert!(backend.remote_participants().is_empty());
}

#[tokio::test]
async fn retry_after_failure_needs_an_explicit_join() {
    let ledger = DeviceLedger::new();
    let mut backend = backend(&ledger);
    backend.client().fail_join.set(true);
    assert!(backend
        .join(JoinTarget::Channel("lobby".into()))
        .await
        .is_err());

    backend.client().fail_join.set(false);
    backend
        .join(JoinTarget::Channel("lobby".into()))
        .await
        .unwrap();

    assert_eq!(backend.state(), ClientState::Joined);
    assert_eq!(backend.client().joins().len(), 2);
    assert_eq!(ledger.live(), 2);
}

#[tokio::test]
async fn camera_denial_is_recorded_but_the_call_goes_on() {
    let ledger = DeviceLedger::new();
    let mut backend = backend(&ledger);
    *backend.client().camera_error.borrow_mut() =
        Some(MediaError::PermissionDenied("PERMISSION_DENIED".into()));

    backend
        .join(JoinTarget::Channel("lobby".into()))
        .await
        .unwrap();

    assert_eq!(backend.state(), ClientState::Joined);
    assert!(matches!(
        backend.media_error(),
        Some(MediaError::PermissionDenied(_))
    ));
    assert!(backend.local_video_track().is_none());
    assert!(!backend.camera_on());
    assert!(backend.mic_on());
    assert_eq!(backend.client().published().len(), 1);
}

#[tokio::test]
async fn toggling_the_camera_off_releases_it() {
    let ledger = DeviceLedger::new();
    let mut backend = joined(&ledger).await;

    backend.set_camera_enabled(false).await.unwrap();

    assert!(!backend.camera_on());
    assert!(backend.local_video_track().is_none());
    assert_eq!(ledger.live(), 1);
    assert_eq!(backend.client().published().len(), 1);

    backend.set_camera_enabled(true).await.unwrap();

    assert!(backend.camera_on());
    assert!(backend.local_video_track().is_some());
    assert_eq!(ledger.acquired(), 3);
    assert_eq!(ledger.live(), 2);
    assert_eq!(backend.client().published().len(), 2);
}

#[tokio::test]
async fn toggling_the_microphone_off_releases_it() {
    let ledger = DeviceLedger::new();
    let mut backend = joined(&ledger).await;

    backend.set_microphone_enabled(false).await.unwrap();
    backend.set_microphone_enabled(false).await.unwrap();

    assert!(!backend.mic_on());
    assert_eq!(ledger.live(), 1);
    assert!(backend
        .local_tracks()
        .iter()
        .all(|t| t.kind() == TrackKind::Video));
}

#[tokio::test]
async fn toggles_before_joining_only_change_what_is_captured() {
    let ledger = DeviceLedger::new();
    let mut backend = backend(&ledger);
    backend.set_microphone_enabled(false).await.unwrap();
    assert_eq!(ledger.acquired(), 0);

    backend
        .join(JoinTarget::Channel("lobby".into()))
        .await
        .unwrap();

    assert_eq!(ledger.acquired(), 1);
    assert_eq!(backend.local_tracks()[0].kind(), TrackKind::Video);
}

#[tokio::test]
async fn re_enabling_a_track_that_cannot_be_captured_reports_why() {
    let ledger = DeviceLedger::new();
    let mut backend = joined(&ledger).await;
    backend.set_microphone_enabled(false).await.unwrap();
    *backend.client().microphone_error.borrow_mut() =
        Some(MediaError::NoDevice("DEVICE_NOT_FOUND".into()));

    let err = backend.set_microphone_enabled(true).await.unwrap_err();

    assert!(matches!(err, CallError::Media(MediaError::NoDevice(_))));
    assert!(!backend.mic_on());
    assert_eq!(ledger.live(), 1);
}

#[tokio::test]
async fn camera_stays_off_when_the_new_track_cannot_be_published() {
    let ledger = DeviceLedger::new();
    let mut backend = joined(&ledger).await;
    backend.set_camera_enabled(false).await.unwrap();
    backend.client().fail_publish.set(true);

    let err = backend.set_camera_enabled(true).await.unwrap_err();

    assert!(matches!(err, CallError::Sdk(_)));
    assert!(!backend.camera_on());
    assert!(backend.local_video_track().is_none());
    assert_eq!(ledger.live(), 1);
}

#[tokio::test]
async fn leave_releases_every_track() {
    let ledger = DeviceLedger::new();
    let mut backend = joined(&ledger).await;
    backend.client().remote.borrow_mut().push(remote("2002"));
    assert_eq!(backend.remote_participants().len(), 1);

    backend.leave().await.unwrap();

    assert_eq!(backend.state(), ClientState::Idle);
    assert_eq!(ledger.live(), 0);
    assert_eq!(backend.client().leaves(), 1);
    assert!(backend.remote_participants().is_empty());
    assert_eq!(backend.channel(), None);

    backend.leave().await.unwrap();
    assert_eq!(backend.client().leaves(), 1);
}

#[tokio::test]
async fn dropping_the_backend_releases_every_track() {
    let ledger = DeviceLedger::new();
    let backend = joined(&ledger).await;

    drop(backend);

    assert_eq!(ledger.live(), 0);
}

#[tokio::test]
async fn publish_failure_is_reported_without_leaving() {
    let ledger = DeviceLedger::new();
    let mut backend = backend(&ledger);
    backend.client().fail_publish.set(true);

    let err = backend
        .join(JoinTarget::Channel("lobby".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::Sdk(SdkError::Publish(_))));
    assert_eq!(backend.state(), ClientState::Joined);

    backend.leave().await.unwrap();
    assert_eq!(ledger.live(), 0);
}

#[tokio::test]
async fn manual_targets_are_not_supported() {
    let ledger = DeviceLedger::new();
    let mut backend = backend(&ledger);
    assert_eq!(backend.kind(), BackendKind::HostedSdk);

    let err = backend.join(JoinTarget::CreateOffer).await.unwrap_err();

    assert!(matches!(
        err,
        CallError::Unsupported {
            backend: BackendKind::HostedSdk,
            ..
        }
    ));
}

#[tokio::test]
async fn remote_video_playback_goes_through_the_sdk() {
    let ledger = DeviceLedger::new();
    let backend = joined(&ledger).await;
    backend.client().remote.borrow_mut().push(remote("2002"));

    backend.play_remote_video("2002", "remote-2002").unwrap();
    assert!(matches!(
        backend.play_remote_video("3003", "remote-3003"),
        Err(CallError::Sdk(SdkError::Playback(_)))
    ));
}
