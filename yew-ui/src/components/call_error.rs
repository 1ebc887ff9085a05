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

//! Error screen for a call that could not be set up.
//!
//! Renders the message and a "Return Home" button. The button navigates with
//! the router when the caller passes `on_return_home`, otherwise it reloads
//! `/`.

use yew::prelude::*;

use super::not_found::return_home;

#[derive(Properties, Debug, PartialEq)]
pub struct CallErrorProps {
    pub message: String,
    #[prop_or_default]
    pub on_return_home: Option<Callback<MouseEvent>>,
}

#[function_component(CallError)]
pub fn call_error(props: &CallErrorProps) -> Html {
    let onclick = props
        .on_return_home
        .clone()
        .unwrap_or_else(|| Callback::from(|_: MouseEvent| return_home()));

    html! {
        <div class="call-error">
            <p class="call-error-message">{ &props.message }</p>
            <button class="btn-primary return-home-btn" {onclick}>
                { "Return Home" }
            </button>
        </div>
    }
}
