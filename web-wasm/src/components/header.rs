//! Header component

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"SNOMED Mapper"</h1>
            <p class="text-muted">"Match tariff names to SNOMED codes"</p>
        </header>
    }
}
