use crate::console::{DemoConsole, DemoState, format_confidence};
use crate::reveal::REVEAL_INTERVAL;
use crate::ui::ApiHandle;
use dioxus::prelude::*;

fn submit(
    mut console: Signal<DemoConsole>,
    mut reveal_task: Signal<Option<Task>>,
    api: ApiHandle,
) {
    let Some(pending) = console.write().begin_submit() else {
        return;
    };
    if let Some(task) = reveal_task.write().take() {
        task.cancel();
    }
    spawn(async move {
        let settled = pending.run(api.api()).await;
        let applied = console.write().complete(settled);
        if applied && matches!(*console.read().state(), DemoState::Success { .. }) {
            let ticker = spawn(async move {
                loop {
                    tokio::time::sleep(REVEAL_INTERVAL).await;
                    if console.write().tick_reveal() {
                        break;
                    }
                }
            });
            reveal_task.set(Some(ticker));
        }
    });
}

#[component]
pub fn DemoConsoleView() -> Element {
    let api = use_context::<ApiHandle>();
    let mut console = use_signal(DemoConsole::new);
    let mut reveal_task = use_signal(|| Option::<Task>::None);
    use_drop(move || {
        if let Ok(mut console) = console.try_write() {
            console.cancel();
        }
    });

    let snapshot = console.read();
    let pending = snapshot.is_pending();
    let helper = snapshot.helper_copy().to_string();
    let prompt = snapshot.prompt().to_string();
    let state = snapshot.state().clone();
    let revealed = snapshot.revealed_text().to_string();
    drop(snapshot);

    let outcome = match state {
        DemoState::Idle => rsx! {},
        DemoState::Pending => rsx! {
            div { class: "shimmer-line",
                span { class: "shimmer-text", "Gathering evidence from trusted medical sources..." }
            }
        },
        DemoState::Success { confidence, .. } => rsx! {
            div { class: "demo-answer",
                p { class: "demo-text", "{revealed}" }
                ConfidenceBadge { confidence }
            }
        },
        DemoState::Error { message } => rsx! {
            div { class: "demo-error",
                "Unable to complete the demo right now. {message} Try again when the API is reachable."
            }
        },
    };

    rsx! {
        div { class: "main-container demo-console",
            div { class: "demo-header",
                p { class: "eyebrow", "Live sandbox" }
                h2 { class: "section-title", "See Mediverse in action" }
            }
            p { class: "helper-copy", "{helper}" }

            label { class: "field-label", r#for: "demo-prompt", "Clinical question" }
            textarea {
                id: "demo-prompt",
                rows: "3",
                value: "{prompt}",
                oninput: move |ev| console.write().set_prompt(ev.value()),
            }
            div { class: "hstack",
                button {
                    class: "btn btn-primary", r#type: "button",
                    disabled: pending,
                    onclick: move |_| submit(console, reveal_task, api.clone()),
                    if pending { "Analyzing…" } else { "Run demo" }
                }
                button {
                    class: "btn btn-ghost", r#type: "button",
                    onclick: move |_| {
                        if let Some(task) = reveal_task.write().take() {
                            task.cancel();
                        }
                        console.write().reset();
                    },
                    "Reset"
                }
            }

            {outcome}
        }
    }
}

#[component]
fn ConfidenceBadge(confidence: f64) -> Element {
    rsx! {
        div { class: "confidence-badge",
            span { class: "text-muted", "Confidence score" }
            span { class: "confidence-value", "{format_confidence(confidence)}" }
        }
    }
}
