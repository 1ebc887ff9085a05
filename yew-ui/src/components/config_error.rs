/*
 * Copyright 2025 Security Union LLC
 * Licensed under MIT OR Apache-2.0
 */

use yew::prelude::*;

#[derive(Properties, Debug, PartialEq)]
pub struct ConfigErrorProps {
    pub message: String,
}

/// Shown instead of the channel view when `window.__APP_CONFIG` is unusable.
#[function_component(ConfigError)]
pub fn config_error(props: &ConfigErrorProps) -> Html {
    html! {
        <div class="error-container">
            <h2>{ "Configuration error" }</h2>
            <p class="error-message">{ props.message.clone() }</p>
            <p class="error-hint">
                { "Set window.__APP_CONFIG = { appId: \"...\" } before loading the app." }
            </p>
        </div>
    }
}
