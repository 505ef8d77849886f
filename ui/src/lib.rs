//! Presentational pieces shared by the dashboards.

use dioxus::prelude::*;

#[component]
pub fn PageHeader(title: String, subtitle: String) -> Element {
    rsx! {
        div { class: "page-header",
            div { class: "page-header-content",
                h1 { class: "page-title", "{title}" }
                p { class: "page-subtitle", "{subtitle}" }
            }
        }
    }
}

#[component]
pub fn Loading(#[props(default = "Loading...".to_string())] message: String) -> Element {
    rsx! {
        div { class: "loading", "{message}" }
    }
}

#[component]
pub fn EmptyState(message: String) -> Element {
    rsx! {
        div { class: "empty-state", "{message}" }
    }
}

/// A status pill, colored by the `kind` css modifier.
#[component]
pub fn Badge(kind: &'static str, label: &'static str) -> Element {
    rsx! {
        span { class: "badge badge-{kind}", "{label}" }
    }
}
