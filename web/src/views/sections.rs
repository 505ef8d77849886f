//! Landlord-area sections without workflows of their own yet.

use crate::{Route, use_viewer};
use dioxus::prelude::*;
use types::Role;
use ui::{EmptyState, PageHeader};

#[component]
fn Section(title: String, subtitle: String, empty: String) -> Element {
    let viewer = use_viewer();
    let acting_for = (viewer.user.role == Role::Caretaker).then_some("Acting as caretaker");

    rsx! {
        div {
            PageHeader { title, subtitle }
            if let Some(note) = acting_for {
                p { class: "text-muted", "{note}" }
            }
            div { class: "card",
                EmptyState { message: empty }
            }
            Link { to: Route::LandlordDashboard {}, class: "btn btn-link", "Back to dashboard" }
        }
    }
}

#[component]
pub fn LandlordProperties() -> Element {
    rsx! {
        Section {
            title: "Properties",
            subtitle: "Units, occupancy and listings.",
            empty: "No properties yet.",
        }
    }
}

#[component]
pub fn LandlordTenants() -> Element {
    rsx! {
        Section {
            title: "Tenants",
            subtitle: "Leases and tenant contacts.",
            empty: "No tenants yet.",
        }
    }
}

#[component]
pub fn LandlordFinance() -> Element {
    rsx! {
        Section {
            title: "Finance",
            subtitle: "Rent collection and balances.",
            empty: "No payments recorded.",
        }
    }
}

#[component]
pub fn LandlordReports() -> Element {
    rsx! {
        Section {
            title: "Reports",
            subtitle: "Revenue and occupancy summaries.",
            empty: "Reports appear once rent has been collected.",
        }
    }
}

#[component]
pub fn LandlordCaretakers() -> Element {
    rsx! {
        Section {
            title: "Caretakers",
            subtitle: "Caretakers and the areas they may manage.",
            empty: "No caretakers invited.",
        }
    }
}
