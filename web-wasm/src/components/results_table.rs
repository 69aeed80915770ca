//! Match results and upload summary

use leptos::prelude::*;
use snomed_mapper_common::ViewState;

#[component]
pub fn ResultsTable(view: RwSignal<ViewState>) -> impl IntoView {
    view! {
        <Show when=move || view.with(|v| v.text.results_visible)>
            <table class="results-table">
                <thead>
                    <tr>
                        <th>"Input Name"</th>
                        <th>"Matched Name"</th>
                        <th>"SNOMED Code"</th>
                        <th>"SNOMED Description"</th>
                        <th>"Similarity Score"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        view.with(|v| v.text.rows.clone())
                            .into_iter()
                            .map(|row| {
                                let class = row.score_class();
                                view! {
                                    <tr>
                                        <td>{row.input_name}</td>
                                        <td>{row.matched_name}</td>
                                        <td>{row.snomed_code}</td>
                                        <td>{row.snomed_description}</td>
                                        <td class=class>{row.score_text}</td>
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
        </Show>
    }
}

#[component]
pub fn FileResultsPanel(view: RwSignal<ViewState>) -> impl IntoView {
    let results = move || view.with(|v| v.upload.results.clone());

    view! {
        {move || {
            results().map(|r| {
                view! {
                    <div class="file-results">
                        <p>"Total tariff items processed: " <strong>{r.total_rows}</strong></p>
                        <p>"Duplicate items found: " <strong>{r.duplicated_rows}</strong></p>
                        <a class="btn btn-success" href=r.download_url download="">
                            "Download results"
                        </a>
                    </div>
                }
            })
        }}
    }
}
