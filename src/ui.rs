use crate::api::AnalysisApi;
use crate::preferences::Preferences;
use crate::theme::theme_definition;
use crate::types::ThemeMode;
use crate::views::{ChatView, DemoConsoleView, SettingsView};
use dioxus::prelude::*;
use std::sync::Arc;

const MEDIVERSE_CSS: Asset = asset!("/assets/mediverse.css");

/// Shared handle to the analysis backend, provided as root context.
#[derive(Clone)]
pub struct ApiHandle(pub Arc<dyn AnalysisApi>);

impl ApiHandle {
    pub fn api(&self) -> &dyn AnalysisApi {
        self.0.as_ref()
    }
}

/// Preferences signal that writes through to disk.
#[derive(Clone, Copy)]
pub struct PreferenceStore {
    prefs: Signal<Preferences>,
}

impl PreferenceStore {
    pub fn theme(&self) -> ThemeMode {
        self.prefs.read().theme
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        if self.theme() == theme {
            return;
        }
        self.prefs.write().theme = theme;
        let snapshot = *self.prefs.read();
        if let Err(err) = snapshot.save() {
            tracing::warn!(error = %err, "failed to save preferences");
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppTab {
    Chat,
    Demo,
    Settings,
}

#[component]
pub fn App() -> Element {
    let initial = try_use_context::<Preferences>().unwrap_or_default();
    let prefs = use_signal(|| initial);
    let store = use_context_provider(|| PreferenceStore { prefs });
    let active_tab = use_signal(|| AppTab::Chat);

    rsx! {
        ThemeStyles { theme: store.theme() }
        AppHeader { active_tab }
        TabPanels { active_tab }
    }
}

#[component]
fn ThemeStyles(theme: ThemeMode) -> Element {
    let definition = theme_definition(theme);
    rsx! {
        document::Link { rel: "stylesheet", href: MEDIVERSE_CSS }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "header no-divider",
            div { class: "header-content",
                span { class: "wordmark", "Mediverse" }
                TabNavigation { active_tab }
            }
        }
    }
}

#[component]
fn TabPanels(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tab-panels",
            TabPanel {
                active_tab,
                tab: AppTab::Chat,
                children: rsx!( ChatView {} ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Demo,
                children: rsx!( DemoConsoleView {} ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Settings,
                children: rsx!( SettingsView {} ),
            }
        }
    }
}

// Panels stay mounted so chat history survives tab switches.
#[component]
fn TabPanel(active_tab: Signal<AppTab>, tab: AppTab, children: Element) -> Element {
    let is_active = active_tab() == tab;
    let class_suffix = if is_active { "active" } else { "" };
    rsx! {
        div {
            class: format_args!("tab-panel {}", class_suffix),
            aria_hidden: (!is_active).to_string(),
            {children}
        }
    }
}

#[component]
fn TabNavigation(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tabs",
            TabButton { active_tab, tab: AppTab::Chat, label: "Chat" }
            TabButton { active_tab, tab: AppTab::Demo, label: "Demo" }
            TabButton { active_tab, tab: AppTab::Settings, label: "Settings" }
        }
    }
}

#[component]
fn TabButton(active_tab: Signal<AppTab>, tab: AppTab, label: &'static str) -> Element {
    let mut active_tab = active_tab;
    let class = if active_tab() == tab {
        "tab active"
    } else {
        "tab"
    };
    rsx! {
        h1 {
            class: class,
            onclick: move |_| active_tab.set(tab),
            "{label}"
        }
    }
}
