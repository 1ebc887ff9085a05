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

//! Landing page: pick a channel name and go to `/via/:channel_name`.

use viacall_types::channel_name_error;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::routing::Route;

#[function_component(ConnectForm)]
pub fn connect_form() -> Html {
    let navigator = use_navigator();
    let channel_name = use_state(String::new);
    let invalid_input_msg = use_state(String::new);
    let is_loading = use_state(|| false);

    let oninput = {
        let channel_name = channel_name.clone();
        let invalid_input_msg = invalid_input_msg.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            channel_name.set(input.value());
            invalid_input_msg.set(String::new());
        })
    };

    let onsubmit = {
        let channel_name = channel_name.clone();
        let invalid_input_msg = invalid_input_msg.clone();
        let is_loading = is_loading.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let trimmed = channel_name.trim().to_string();
            if let Some(msg) = channel_name_error(&trimmed) {
                invalid_input_msg.set(msg);
                if trimmed.is_empty() {
                    channel_name.set(String::new());
                }
                return;
            }

            let Some(navigator) = navigator.as_ref() else {
                log::error!("Router unavailable, cannot open channel {trimmed}");
                return;
            };
            is_loading.set(true);
            log::info!("Connecting to channel {trimmed}");
            navigator.push(&Route::Via {
                channel_name: trimmed,
            });
        })
    };

    html! {
        <form class="connect-form" {onsubmit}>
            <h1 class="connect-title">{ "viacall" }</h1>
            <div class="connect-fields">
                <input
                    id="channelName"
                    type="text"
                    placeholder="Channel Name"
                    value={(*channel_name).clone()}
                    {oninput}
                    disabled={*is_loading}
                />
                <button type="submit" class="btn-primary" disabled={*is_loading}>
                    { if *is_loading { "Connecting..." } else { "Connect" } }
                </button>
                if !invalid_input_msg.is_empty() {
                    <p class="input-error">{ (*invalid_input_msg).clone() }</p>
                }
            </div>
            <p class="connect-alt">
                <Link<Route> to={Route::PeerCall}>{ "Or start a peer-to-peer call" }</Link<Route>>
            </p>
        </form>
    }
}
