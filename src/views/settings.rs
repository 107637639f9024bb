use crate::config::ApiConfig;
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::ui::PreferenceStore;
use dioxus::prelude::*;

#[component]
pub fn SettingsView() -> Element {
    let mut store = use_context::<PreferenceStore>();
    let theme = store.theme();
    let toggle_label = theme_definition(theme).toggle_label;
    let api_config = use_hook(ApiConfig::from_env);
    let timeout = match api_config.request_timeout {
        Some(limit) => format!("{}s", limit.as_secs()),
        None => "none".to_string(),
    };

    rsx! {
        div { class: "main-container",
            div { class: "settings-section",
                h3 { class: "section-title", "Display" }
                div { class: "theme-toggle",
                    button {
                        class: format_args!(
                            "theme-option {}",
                            if matches!(theme, ThemeMode::Dark) { "active" } else { "" }
                        ),
                        r#type: "button",
                        onclick: move |_| store.set_theme(ThemeMode::Dark),
                        "Dark"
                    }
                    button {
                        class: format_args!(
                            "theme-option {}",
                            if matches!(theme, ThemeMode::Light) { "active" } else { "" }
                        ),
                        r#type: "button",
                        onclick: move |_| store.set_theme(ThemeMode::Light),
                        "Light"
                    }
                }
                button {
                    class: "btn btn-ghost", r#type: "button", title: "Toggle theme",
                    onclick: move |_| store.set_theme(theme.toggled()),
                    "Switch to {toggle_label}"
                }
            }
            div { class: "settings-section",
                h3 { class: "section-title", "Analysis service" }
                div { class: "locked-input",
                    input {
                        r#type: "text",
                        value: "{api_config.base_url}",
                        readonly: true,
                        disabled: true,
                    }
                }
                p { class: "text-muted", "Request timeout: {timeout}" }
            }
        }
    }
}
