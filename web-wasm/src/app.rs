//! Main application component

use crate::api::{FetchApi, TimeoutSleeper};
use crate::components::{
    file_upload::FileUploadForm, header::Header, progress_bar::ProgressBar,
    results_table::{FileResultsPanel, ResultsTable},
    tabs::TabBar, text_match::TextMatchForm,
};
use crate::upload::read_upload;
use leptos::prelude::*;
use leptos::task::spawn_local;
use snomed_mapper_common::{Sleeper, Tab, TariffApi, ViewState, PROGRESS_RESET_DELAY};

#[component]
pub fn App() -> impl IntoView {
    let view = RwSignal::new(ViewState::new());
    let selected = RwSignal::new_local(None::<web_sys::File>);

    let on_submit = move |raw_text: String| {
        let begun = view.try_update(|v| v.begin_submit(&raw_text));
        show_notice(view);
        let Some(Ok((token, request))) = begun else {
            return;
        };

        spawn_local(async move {
            let outcome = FetchApi.match_tariffs(&request).await;
            view.update(|v| {
                let _ = v.finish_submit(token, outcome);
            });
            show_notice(view);
        });
    };

    let on_upload = move || {
        let Some(file) = selected.get_untracked() else {
            view.update(|v| {
                let _ = v.begin_upload(None);
            });
            show_notice(view);
            return;
        };

        spawn_local(async move {
            let upload = match read_upload(&file).await {
                Ok(upload) => upload,
                Err(e) => {
                    gloo::console::error!(format!("failed to read {}: {}", file.name(), e));
                    return;
                }
            };

            let begun = view.try_update(|v| v.begin_upload(Some(&upload)).map(|(token, _)| token));
            show_notice(view);
            let Some(Ok(token)) = begun else {
                return;
            };

            let outcome = FetchApi.process_excel(&upload).await;
            view.update(|v| {
                let _ = v.finish_upload(token, outcome);
            });
            show_notice(view);

            TimeoutSleeper.sleep(PROGRESS_RESET_DELAY).await;
            view.update(|v| v.reset_progress(token));
        });
    };

    view! {
        <div class="container">
            <Header />

            <TabBar view=view />

            <section
                id=Tab::Text.panel_id()
                class="tab-content"
                style:display=move || panel_display(view, Tab::Text)
            >
                <TextMatchForm view=view on_submit=on_submit />
                <ResultsTable view=view />
            </section>

            <section
                id=Tab::File.panel_id()
                class="tab-content"
                style:display=move || panel_display(view, Tab::File)
            >
                <FileUploadForm view=view selected=selected on_upload=on_upload />
                <ProgressBar view=view />
                <FileResultsPanel view=view />
            </section>
        </div>
    }
}

fn panel_display(view: RwSignal<ViewState>, tab: Tab) -> &'static str {
    if view.with(|v| v.tabs.is_panel_visible(tab)) {
        "block"
    } else {
        "none"
    }
}

/// Surface the pending notification as a blocking alert
fn show_notice(view: RwSignal<ViewState>) {
    if view.with_untracked(|v| v.notice.is_none()) {
        return;
    }
    if let Some(message) = view.try_update(|v| v.take_notice()).flatten() {
        gloo::dialogs::alert(&message);
    }
}
