//! Spreadsheet upload form

use leptos::prelude::*;
use snomed_mapper_common::ViewState;
use web_sys::{File, HtmlInputElement};

/// The picked file is kept as a browser `File` and read when the form is submitted
#[component]
pub fn FileUploadForm<F>(
    view: RwSignal<ViewState>,
    selected: RwSignal<Option<File>, LocalStorage>,
    on_upload: F,
) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let is_uploading = move || view.with(|v| v.upload.is_uploading());

    let on_change = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let file = input.files().and_then(|files| files.get(0));

        view.update(|v| v.set_selected_file(file.as_ref().map(|f| f.name()).as_deref()));
        selected.set(file);
    };

    view! {
        <form
            class="upload-form"
            on:submit=move |ev| {
                ev.prevent_default();
                on_upload();
            }
        >
            <label class="file-picker">
                <input type="file" accept=".xlsx,.xls" on:change=on_change />
                <span class="file-label">{move || view.with(|v| v.upload.file_label.clone())}</span>
            </label>
            <button type="submit" class="btn btn-primary" disabled=is_uploading>
                "Upload and Process"
            </button>
        </form>
    }
}
