use crate::{Route, use_viewer};
use dioxus::prelude::*;
use ui::PageHeader;

struct Card {
    route: Route,
    title: &'static str,
    description: &'static str,
}

fn landlord_cards() -> Vec<Card> {
    vec![
        Card {
            route: Route::LandlordProperties {},
            title: "Properties",
            description: "Units, occupancy and listings across your portfolio.",
        },
        Card {
            route: Route::LandlordTenants {},
            title: "Tenants",
            description: "Leases, contacts and move-ins.",
        },
        Card {
            route: Route::LandlordFinance {},
            title: "Finance",
            description: "Rent collection and outstanding balances.",
        },
        Card {
            route: Route::LandlordMaintenance {},
            title: "Maintenance",
            description: "Triage requests and assign service providers.",
        },
        Card {
            route: Route::LandlordReports {},
            title: "Reports",
            description: "Revenue and occupancy summaries.",
        },
        Card {
            route: Route::LandlordCaretakers {},
            title: "Caretakers",
            description: "Who helps you manage, and what they may touch.",
        },
    ]
}

#[component]
fn Welcome(subtitle: String) -> Element {
    let viewer = use_viewer();
    let title = format!("Welcome, {}", viewer.user.name);

    rsx! {
        PageHeader { title, subtitle }
    }
}

#[component]
pub fn LandlordDashboard() -> Element {
    let viewer = use_viewer();
    let cards: Vec<Card> = landlord_cards()
        .into_iter()
        .filter(|card| viewer.can_open(&card.route))
        .collect();

    rsx! {
        div {
            Welcome { subtitle: "Everything happening across your properties." }
            div { class: "dashboard-grid",
                for card in cards {
                    Link {
                        key: "{card.route}",
                        to: card.route,
                        class: "dashboard-card",
                        h3 { class: "dashboard-card-title", "{card.title}" }
                        p { class: "dashboard-card-desc", "{card.description}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn TenantDashboard() -> Element {
    rsx! {
        div {
            Welcome { subtitle: "Your lease, rent payments and maintenance requests." }
            div { class: "dashboard-grid",
                div { class: "dashboard-card",
                    h3 { class: "dashboard-card-title", "Rent" }
                    p { class: "dashboard-card-desc", "Payment history and upcoming dues." }
                }
                div { class: "dashboard-card",
                    h3 { class: "dashboard-card-title", "Maintenance" }
                    p { class: "dashboard-card-desc", "Report a problem in your unit." }
                }
            }
        }
    }
}

#[component]
pub fn AgentDashboard() -> Element {
    rsx! {
        div {
            Welcome { subtitle: "Listings you manage and your referrals." }
        }
    }
}

#[component]
pub fn ServiceProviderDashboard() -> Element {
    rsx! {
        div {
            Welcome { subtitle: "Jobs assigned to you and your marketplace profile." }
        }
    }
}

#[component]
pub fn AdminDashboard() -> Element {
    rsx! {
        div {
            Welcome { subtitle: "Platform users, roles and activity." }
        }
    }
}
