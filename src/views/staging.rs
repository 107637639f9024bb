use crate::staging::{StageError, StagedImage, accept_attribute, base_name, prescreen};
use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;
use std::sync::Arc;

/// Reads the first file from a drop or picker event.
///
/// The type and size screen runs on metadata first, so rejected files are never
/// read into memory. Engines that cannot report a size are screened after the read.
async fn stage_first_file(engine: Arc<dyn FileEngine>) -> Option<Result<StagedImage, StageError>> {
    let path = engine.files().into_iter().next()?;
    let name = base_name(&path);
    let size = engine.file_size(&path).await;
    if let Err(err) = prescreen(&name, size) {
        return Some(Err(err));
    }
    let staged = match engine.read_file(&path).await {
        Some(bytes) => StagedImage::from_bytes(name, bytes),
        None => Err(StageError::Unreadable(name)),
    };
    Some(staged)
}

#[component]
pub fn ImageDropzone(
    staged: Option<StagedImage>,
    processing: bool,
    on_stage: EventHandler<StagedImage>,
    on_remove: EventHandler<()>,
) -> Element {
    let mut dragging = use_signal(|| false);
    let mut rejection = use_signal(|| Option::<String>::None);

    let handle_files = move |engine: Option<Arc<dyn FileEngine>>| {
        let Some(engine) = engine else {
            return;
        };
        spawn(async move {
            match stage_first_file(engine).await {
                Some(Ok(image)) => {
                    rejection.set(None);
                    on_stage.call(image);
                }
                Some(Err(err)) => {
                    tracing::info!(error = %err, "rejected dropped file");
                    rejection.set(Some(err.to_string()));
                }
                None => {}
            }
        });
    };

    if let Some(image) = staged {
        return rsx! {
            div { class: "dropzone-preview",
                img { class: "preview-image", src: "{image.preview}", alt: "Staged scan" }
                div { class: "preview-meta",
                    if processing {
                        span { class: "shimmer-text", "Processing…" }
                    } else {
                        span { class: "preview-ready", "Ready for analysis" }
                    }
                    span { class: "text-muted", "{image.file_name}" }
                }
                button {
                    class: "btn btn-ghost", r#type: "button", title: "Remove image",
                    onclick: move |_| on_remove.call(()),
                    "Remove"
                }
            }
        };
    }

    rsx! {
        div {
            class: format_args!("dropzone {}", if dragging() { "dragging" } else { "" }),
            ondragover: move |ev: DragEvent| {
                ev.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| dragging.set(false),
            ondrop: move |ev: DragEvent| {
                ev.prevent_default();
                dragging.set(false);
                handle_files(ev.files());
            },
            label { class: "dropzone-label",
                if dragging() {
                    p { "Drop the image here" }
                } else {
                    p { "Drag & drop a medical image, or click to select" }
                }
                p { class: "text-muted", "JPEG, PNG or DICOM up to 10 MB" }
                input {
                    r#type: "file",
                    accept: accept_attribute(),
                    multiple: false,
                    class: "visually-hidden",
                    onchange: move |ev: FormEvent| handle_files(ev.files()),
                }
            }
            if let Some(message) = rejection() {
                p { class: "dropzone-error", "{message}" }
            }
        }
    }
}
