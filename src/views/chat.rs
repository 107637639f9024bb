use crate::chat::ChatSession;
use crate::markdown::render_markdown;
use crate::staging::{PROCESSING_FEEDBACK, StagedImage};
use crate::types::{Message, Mode, Role};
use crate::ui::ApiHandle;
use crate::views::shared::{
    ConfidenceLine, SourceList, copy_to_clipboard, format_message_timestamp, use_mounted,
};
use crate::views::staging::ImageDropzone;
use dioxus::events::Key;
use dioxus::prelude::*;

fn send_message(mut session: Signal<ChatSession>, api: ApiHandle) {
    let Some(pending) = session.write().begin_send() else {
        return;
    };
    spawn(async move {
        let settled = pending.run(api.api()).await;
        session.write().complete(settled);
    });
}

// The processing flag is cleared from this scope so it survives the dropzone unmounting.
fn stage_image(mut session: Signal<ChatSession>, image: StagedImage) {
    let generation = session.write().stage_image(image);
    spawn(async move {
        tokio::time::sleep(PROCESSING_FEEDBACK).await;
        session.write().mark_image_ready(generation);
    });
}

#[component]
pub fn ChatView() -> Element {
    let api = use_context::<ApiHandle>();
    let mut session = use_signal(ChatSession::new);
    let mounted = use_mounted();
    use_drop(move || {
        if let Ok(mut session) = session.try_write() {
            session.cancel();
        }
    });

    let snapshot = session.read();
    let messages = snapshot.transcript().messages().to_vec();
    let input = snapshot.input().to_string();
    let mode = snapshot.mode();
    let sending = snapshot.is_sending();
    let can_send = snapshot.can_send();
    let show_upload = snapshot.show_upload();
    let show_sources = snapshot.show_sources();
    let sources_toggle = snapshot.sources_toggle_visible();
    let staged = snapshot.staged_image().cloned();
    let processing = snapshot.image_processing();
    drop(snapshot);

    let key_api = api.clone();

    rsx! {
        div { class: "main-container",
            div { class: "chat-wrap",
                div { id: "chat-list", class: "chat-list",
                    for msg in messages.iter() {
                        MessageRow {
                            key: "{msg.id}",
                            message: msg.clone(),
                            show_sources,
                            show_time: mounted(),
                        }
                    }
                    if sending {
                        div { class: "message-row assistant",
                            div { class: "avatar assistant", "M" }
                            div { class: "shimmer-line",
                                span { class: "shimmer-text", "Analyzing…" }
                            }
                        }
                    }
                }
            }

            form { class: "composer no-divider",
                div { class: "composer-inner",
                    ModeBar {
                        mode,
                        sources_toggle,
                        show_sources,
                        on_select: move |mode| session.write().select_mode(mode),
                        on_toggle_sources: move |_| session.write().toggle_sources(),
                    }

                    if show_upload {
                        ImageDropzone {
                            staged: None,
                            processing: false,
                            on_stage: move |image| stage_image(session, image),
                            on_remove: move |_| session.write().remove_image(),
                        }
                    }

                    if let Some(image) = staged {
                        ImageDropzone {
                            staged: Some(image),
                            processing,
                            on_stage: move |image| stage_image(session, image),
                            on_remove: move |_| session.write().remove_image(),
                        }
                    }

                    div { class: "hstack", style: "gap: 0.5rem; width: 100%; align-items: flex-end;",
                        button {
                            class: "btn btn-ghost", r#type: "button", title: "Attach image",
                            onclick: move |_| session.write().toggle_upload(),
                            "Attach"
                        }
                        textarea {
                            rows: "1",
                            placeholder: "Ask about symptoms, treatments, or upload a medical image...",
                            value: "{input}",
                            oninput: move |ev| session.write().set_input(ev.value()),
                            onkeydown: move |ev| {
                                if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                    ev.prevent_default();
                                    send_message(session, key_api.clone());
                                }
                            },
                            disabled: sending,
                            autofocus: true,
                        }
                        button {
                            class: "btn btn-primary", r#type: "button",
                            disabled: !can_send,
                            onclick: move |_| send_message(session, api.clone()),
                            "Send"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ModeBar(
    mode: Mode,
    sources_toggle: bool,
    show_sources: bool,
    on_select: EventHandler<Mode>,
    on_toggle_sources: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "mode-bar",
            for option in Mode::ALL {
                button {
                    key: "{option.as_str()}",
                    class: format_args!("mode-option {}", if option == mode { "active" } else { "" }),
                    r#type: "button",
                    onclick: move |_| on_select.call(option),
                    "{option.label()}"
                }
            }
            if sources_toggle {
                div { class: "sources-toggle",
                    span { class: "text-muted", "Show Sources" }
                    button {
                        class: format_args!("switch {}", if show_sources { "on" } else { "off" }),
                        r#type: "button",
                        aria_pressed: show_sources.to_string(),
                        onclick: move |_| on_toggle_sources.call(()),
                    }
                }
            }
        }
    }
}

#[component]
fn MessageRow(message: Message, show_sources: bool, show_time: bool) -> Element {
    let role = message.role.as_str();
    let align = match message.role {
        Role::User => "align-end",
        Role::Assistant => "align-start",
    };
    let timestamp = if show_time {
        format_message_timestamp(message.timestamp)
    } else {
        None
    };

    rsx! {
        div { class: "message-row {role}",
            if matches!(message.role, Role::Assistant) { div { class: "avatar assistant", "M" } }
            div { class: "message-stack",
                div { class: "bubble {role}",
                    if let Some(preview) = message.image.clone() {
                        img { class: "message-image", src: "{preview}", alt: "Uploaded scan" }
                    }
                    if matches!(message.role, Role::Assistant) {
                        AssistantBody { message: message.clone(), show_sources }
                    } else {
                        p { class: "user-text", "{message.content}" }
                    }
                }
                if let Some(ts) = timestamp {
                    div { class: "message-meta {align}",
                        span { class: "message-timestamp", "{ts}" }
                    }
                }
            }
        }
    }
}

#[component]
fn AssistantBody(message: Message, show_sources: bool) -> Element {
    let content_html = render_markdown(&message.content);
    let copy_payload = message.content.clone();

    rsx! {
        div { class: "bubble-controls",
            div { class: "actions",
                button {
                    class: "action-btn", title: "Copy answer",
                    onclick: move |_| copy_to_clipboard(copy_payload.clone()),
                    "Copy"
                }
            }
        }
        div { class: "md", dangerous_inner_html: "{content_html}" }
        if show_sources && !message.sources.is_empty() {
            SourceList { sources: message.sources.clone() }
        }
        if let Some(confidence) = message.confidence {
            ConfidenceLine { confidence }
        }
    }
}
