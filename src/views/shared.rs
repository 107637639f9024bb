use crate::chat::format_relevance;
use crate::console::format_confidence;
use crate::markdown::safe_link;
use crate::types::Source;
use dioxus::prelude::*;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

pub fn format_message_timestamp(timestamp: OffsetDateTime) -> Option<String> {
    let mut datetime = timestamp;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

/// `true` once the component has mounted. Locale-dependent output waits for it.
pub fn use_mounted() -> Signal<bool> {
    let mut mounted = use_signal(|| false);
    use_effect(move || mounted.set(true));
    mounted
}

pub fn copy_to_clipboard(text: String) {
    #[cfg(any(feature = "desktop", feature = "mobile"))]
    {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(err) = clipboard.set_text(text) {
                    tracing::warn!(error = %err, "clipboard write failed");
                }
            }
            Err(err) => tracing::warn!(error = %err, "clipboard unavailable"),
        }
    }
    #[cfg(not(any(feature = "desktop", feature = "mobile")))]
    {
        let _ = text;
    }
}

#[component]
pub fn ConfidenceLine(confidence: f64) -> Element {
    rsx! {
        div { class: "confidence-line",
            span { class: "text-muted", "Confidence: " }
            span { class: "confidence-value", "{format_confidence(confidence)}" }
        }
    }
}

#[component]
pub fn SourceList(sources: Vec<Source>) -> Element {
    rsx! {
        div { class: "source-list",
            p { class: "source-heading", "Sources ({sources.len()}):" }
            for (i, source) in sources.iter().enumerate() {
                SourceCard { key: "{i}", source: source.clone() }
            }
        }
    }
}

// Non-web URLs are shown as text and never linked.
#[component]
fn SourceCard(source: Source) -> Element {
    let width = (source.score * 100.0).clamp(0.0, 100.0);
    let body = rsx! {
        p { class: "source-title", "{source.title}" }
        p { class: "source-url", "{source.url}" }
        div { class: "source-score",
            div { class: "score-track",
                div { class: "score-fill", style: format_args!("width: {width:.0}%;") }
            }
            span { class: "text-muted", "{format_relevance(source.score)}" }
        }
    };
    match safe_link(&source.url) {
        Some(href) => rsx! {
            a {
                class: "source-card",
                href: "{href}",
                target: "_blank",
                rel: "noopener noreferrer",
                {body}
            }
        },
        None => rsx! {
            div { class: "source-card unlinked", {body} }
        },
    }
}
