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

//! Call toolbar buttons with SVG icons.

use yew::prelude::*;

// =============================================================================
// Microphone Button
// =============================================================================

#[derive(Properties, PartialEq)]
pub struct MicButtonProps {
    pub enabled: bool,
    #[prop_or(false)]
    pub busy: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(MicButton)]
pub fn mic_button(props: &MicButtonProps) -> Html {
    let class = classes!(
        "video-control-button",
        "mic-button",
        if props.enabled { "active" } else { "off" }
    );

    html! {
        <button {class} disabled={props.busy} onclick={props.onclick.clone()}>
            {
                if props.enabled {
                    html! {
                        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                            <path d="M12 2a3 3 0 0 0-3 3v7a3 3 0 0 0 6 0V5a3 3 0 0 0-3-3z"></path>
                            <path d="M19 10v2a7 7 0 0 1-14 0v-2"></path>
                            <line x1="12" y1="19" x2="12" y2="22"></line>
                        </svg>
                    }
                } else {
                    html! {
                        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                            <line x1="1" y1="1" x2="23" y2="23"></line>
                            <path d="M9 9v3a3 3 0 0 0 5.12 2.12M15 9.34V5a3 3 0 0 0-5.94-.6"></path>
                            <path d="M17 16.95A7 7 0 0 1 5 12v-2m14 0v2a7 7 0 0 1-.11 1.23"></path>
                            <line x1="12" y1="19" x2="12" y2="22"></line>
                        </svg>
                    }
                }
            }
            <span class="control-label">{ if props.enabled { "Mic On" } else { "Mic Off" } }</span>
        </button>
    }
}

// =============================================================================
// Camera Button
// =============================================================================

#[derive(Properties, PartialEq)]
pub struct CameraButtonProps {
    pub enabled: bool,
    #[prop_or(false)]
    pub busy: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(CameraButton)]
pub fn camera_button(props: &CameraButtonProps) -> Html {
    let class = classes!(
        "video-control-button",
        "camera-button",
        if props.enabled { "active" } else { "off" }
    );

    html! {
        <button {class} disabled={props.busy} onclick={props.onclick.clone()}>
            {
                if props.enabled {
                    html! {
                        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                            <polygon points="23 7 16 12 23 17 23 7"></polygon>
                            <rect x="1" y="5" width="15" height="14" rx="2" ry="2"></rect>
                        </svg>
                    }
                } else {
                    html! {
                        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">
                            <path d="M16 16v1a2 2 0 0 1-2 2H3a2 2 0 0 1-2-2V7a2 2 0 0 1 2-2h2m5.66 0H14a2 2 0 0 1 2 2v3.34l1 1L23 7v10"></path>
                            <line x1="1" y1="1" x2="23" y2="23"></line>
                        </svg>
                    }
                }
            }
            <span class="control-label">{ if props.enabled { "Camera On" } else { "Camera Off" } }</span>
        </button>
    }
}

// =============================================================================
// Disconnect Button
// =============================================================================

#[derive(Properties, PartialEq)]
pub struct DisconnectButtonProps {
    pub onclick: Callback<MouseEvent>,
}

#[function_component(DisconnectButton)]
pub fn disconnect_button(props: &DisconnectButtonProps) -> Html {
    html! {
        <button id="endConnection" class="video-control-button danger" onclick={props.onclick.clone()}>
            <svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" fill="currentColor" viewBox="0 0 24 24">
                <path d="M12.017 6.995c-2.306 0-4.534.408-6.215 1.507-1.737 1.135-2.788 2.944-2.797 5.451a4.8 4.8 0 0 0 .01.62c.015.193.047.512.138.763a2.557 2.557 0 0 0 2.579 1.677H7.31a2.685 2.685 0 0 0 2.685-2.684v-.645a.684.684 0 0 1 .684-.684h2.647a.686.686 0 0 1 .686.687v.645c0 .712.284 1.395.787 1.898.478.478 1.101.787 1.847.787h1.647a2.555 2.555 0 0 0 2.575-1.674c.09-.25.123-.57.137-.763.015-.2.022-.433.01-.617-.002-2.508-1.049-4.32-2.785-5.458-1.68-1.1-3.907-1.51-6.213-1.51Z"/>
            </svg>
            <span class="control-label">{ "Disconnect" }</span>
        </button>
    }
}
