//! Upload progress indicator

use leptos::prelude::*;
use snomed_mapper_common::ViewState;

#[component]
pub fn ProgressBar(view: RwSignal<ViewState>) -> impl IntoView {
    let progress = move || view.with(|v| v.upload.progress.clone());

    view! {
        <Show when=move || progress().visible>
            <div class="progress-container">
                <div class="progress-bar">
                    <div
                        class="progress-fill"
                        style=move || format!("width: {}%", progress().percent)
                    />
                </div>
                <p class="progress-text">{move || progress().status}</p>
            </div>
        </Show>
    }
}
