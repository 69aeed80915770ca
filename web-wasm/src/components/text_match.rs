//! Tariff-name text form

use leptos::prelude::*;
use snomed_mapper_common::ViewState;

#[component]
pub fn TextMatchForm<F>(view: RwSignal<ViewState>, on_submit: F) -> impl IntoView
where
    F: Fn(String) + Copy + 'static,
{
    let (text, set_text) = signal(String::new());
    let is_loading = move || view.with(|v| v.text.is_loading());

    view! {
        <form
            class="text-form"
            on:submit=move |ev| {
                ev.prevent_default();
                on_submit(text.get_untracked());
            }
        >
            <label for="tariffNames">"Tariff names (one per line)"</label>
            <textarea
                id="tariffNames"
                rows="8"
                placeholder="Paracetamol 500mg tablet\nFull blood count"
                prop:value=move || text.get()
                on:input=move |ev| set_text.set(event_target_value(&ev))
            />
            <button type="submit" class="btn btn-primary" disabled=is_loading>
                {move || if is_loading() { "Matching..." } else { "Match" }}
            </button>
        </form>
    }
}
