//! Tab buttons

use leptos::prelude::*;
use snomed_mapper_common::{Tab, ViewState};

fn tab_title(tab: Tab) -> &'static str {
    match tab {
        Tab::Text => "Text Input",
        Tab::File => "File Upload",
    }
}

#[component]
pub fn TabBar(view: RwSignal<ViewState>) -> impl IntoView {
    let buttons = Tab::ALL
        .into_iter()
        .map(|tab| {
            let on_click = move |_| {
                view.update(|v| {
                    if let Err(e) = v.tabs.activate(tab.panel_id(), tab) {
                        gloo::console::error!(e.to_string());
                    }
                });
            };
            view! {
                <button
                    class="tab-button"
                    class:active=move || view.with(|v| v.tabs.is_button_active(tab))
                    on:click=on_click
                >
                    {tab_title(tab)}
                </button>
            }
        })
        .collect_view();

    view! { <nav class="tabs">{buttons}</nav> }
}
