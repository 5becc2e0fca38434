use api::storage::{upload_image, DEFAULT_BUCKET};
use dioxus::prelude::*;
use store::models::ImageRef;

use crate::backend::use_backend;
use crate::icons::{FaImage, FaXmark};
use crate::Icon;

/// Picks one image, uploads it and reports the stored reference.
/// `on_change(None)` is sent when the current image is removed.
#[component]
pub fn ImageUpload(
    value: Option<ImageRef>,
    on_change: EventHandler<Option<ImageRef>>,
    #[props(default = "Click to upload image".to_string())] prompt: String,
) -> Element {
    let backend = use_backend();
    let mut uploading = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let handle_files = move |evt: FormEvent| {
        let backend = backend.clone();
        spawn(async move {
            let Some(file) = evt.files().into_iter().next() else { return };
            uploading.set(true);
            error.set(None);
            let result = match file.read_bytes().await {
                Ok(bytes) => upload_image(&backend.storage, DEFAULT_BUCKET, &file.name(), bytes.to_vec())
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(format!("Could not read file: {e}")),
            };
            match result {
                Ok(uploaded) => on_change.call(Some(uploaded.into())),
                Err(message) => {
                    tracing::warn!("image upload failed: {message}");
                    error.set(Some(message));
                }
            }
            uploading.set(false);
        });
    };

    rsx! {
        div {
            class: "image-upload",
            if let Some(image) = value {
                div {
                    class: "image-upload__preview",
                    img { src: "{image.url}", alt: "Uploaded image" }
                    button {
                        r#type: "button",
                        class: "image-upload__remove",
                        onclick: move |_| on_change.call(None),
                        Icon { icon: FaXmark, width: 12, height: 12 }
                    }
                }
            } else {
                label {
                    class: if uploading() { "image-upload__drop image-upload__drop--busy" } else { "image-upload__drop" },
                    if uploading() {
                        crate::components::Spinner { size: 28 }
                    } else {
                        Icon { icon: FaImage, width: 28, height: 28 }
                    }
                    span { class: "small", if uploading() { "Uploading..." } else { "{prompt}" } }
                    span { class: "muted tiny", "Max 5MB" }
                    input {
                        r#type: "file",
                        accept: "image/*",
                        class: "visually-hidden",
                        disabled: uploading(),
                        onchange: handle_files,
                    }
                }
            }
            if let Some(err) = error() {
                p { class: "error-text tiny", "{err}" }
            }
        }
    }
}
