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

use yew::prelude::*;

/// Full page reload back to `/`, so whatever was mounted is torn down.
pub fn return_home() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href("/");
    }
}

#[function_component(NotFound)]
pub fn not_found() -> Html {
    let on_return_home = Callback::from(|_: MouseEvent| return_home());

    html! {
        <div class="not-found-page">
            <h1>{ "Page Not Found" }</h1>
            <button class="btn-primary return-home-btn" onclick={on_return_home}>
                { "Return Home" }
            </button>
        </div>
    }
}
