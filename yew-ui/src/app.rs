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
use yew_router::prelude::*;

use crate::components::not_found::NotFound;
use crate::pages::connect::ConnectForm;
use crate::pages::live_video::LiveVideo;
use crate::pages::peer_call::PeerCall;
use crate::routing::Route;

pub fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <ConnectForm /> },
        Route::PeerCall => html! { <PeerCall /> },
        Route::Via { channel_name } => html! {
            // Keyed so that moving between channels tears the old call down.
            <LiveVideo key={channel_name.clone()} channel_name={channel_name.clone()} />
        },
        Route::NotFound => html! { <NotFound /> },
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <div class="app-root">
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </div>
    }
}
