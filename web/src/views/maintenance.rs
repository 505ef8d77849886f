use crate::use_problems;
use dioxus::prelude::*;
use jiff::Timestamp;
use types::maintenance::{
    MaintenanceRequest, ProviderQuery, RequestStatus, ServiceProvider, ServiceType,
};
use ui::{Badge, EmptyState, Loading, PageHeader};

fn status_kind(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "warning",
        RequestStatus::Assigned | RequestStatus::InProgress => "info",
        RequestStatus::Completed => "success",
        RequestStatus::Cancelled | RequestStatus::Unknown => "muted",
    }
}

fn provider_name(providers: &[ServiceProvider], id: Option<&str>) -> String {
    match id {
        None => "Unassigned".to_string(),
        Some(id) => providers
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Unknown provider".to_string()),
    }
}

#[component]
pub fn LandlordMaintenance() -> Element {
    let mut requests = use_signal(Vec::<MaintenanceRequest>::new);
    let mut providers = use_signal(Vec::<ServiceProvider>::new);
    let mut loading = use_signal(|| true);
    let mut selected = use_signal(|| None::<String>);
    let mut problems = use_problems();

    // Fetch requests and providers on mount
    use_effect(move || {
        spawn(async move {
            loading.set(true);

            let requests_result = api::list_maintenance_requests().await;
            let providers_result = api::list_service_providers().await;

            match (requests_result, providers_result) {
                (Ok(r), Ok(p)) => {
                    requests.set(r);
                    providers.set(p);
                }
                (Err(e), _) | (_, Err(e)) => {
                    problems.report(&e);
                }
            }
            loading.set(false);
        });
    });

    let selected_request = use_memo(move || {
        let id = selected()?;
        requests.read().iter().find(|r| r.id == id).cloned()
    });

    rsx! {
        div {
            PageHeader {
                title: "Maintenance",
                subtitle: "Review requests and assign a service provider.",
            }

            if *loading.read() {
                Loading { message: "Loading requests..." }
            } else if requests.read().is_empty() {
                EmptyState { message: "No maintenance requests." }
            } else {
                div { class: "grid grid-cols-3",
                    div { class: "card",
                        div { class: "card-header",
                            h2 { class: "card-title", "Requests" }
                        }
                        div { class: "table-container",
                            table {
                                thead {
                                    tr {
                                        th { "Request" }
                                        th { "Property" }
                                        th { "Type" }
                                        th { "Status" }
                                        th { "Provider" }
                                    }
                                }
                                tbody {
                                    for request in requests.read().iter() {
                                        {
                                            let request_id = request.id.clone();
                                            let is_selected = selected.read().as_deref() == Some(request.id.as_str());
                                            let property = match (&request.property_name, &request.unit) {
                                                (Some(p), Some(u)) => format!("{p} · {u}"),
                                                (Some(p), None) => p.clone(),
                                                (None, Some(u)) => u.clone(),
                                                (None, None) => "-".to_string(),
                                            };
                                            let assigned = provider_name(
                                                &providers.read(),
                                                request.assigned_provider_id.as_deref(),
                                            );
                                            rsx! {
                                                tr {
                                                    key: "{request.id}",
                                                    class: if is_selected { "selected" },
                                                    onclick: move |_| selected.set(Some(request_id.clone())),
                                                    td { "{request.title}" }
                                                    td { "{property}" }
                                                    td { "{request.service_type()}" }
                                                    td {
                                                        Badge {
                                                            kind: status_kind(request.status),
                                                            label: request.status.label(),
                                                        }
                                                    }
                                                    td { "{assigned}" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    if let Some(request) = selected_request() {
                        AssignPanel {
                            key: "{request.id}",
                            request,
                            providers: providers.read().clone(),
                            on_assigned: move |updated: MaintenanceRequest| {
                                let mut requests = requests.write();
                                if let Some(slot) = requests.iter_mut().find(|r| r.id == updated.id) {
                                    *slot = updated;
                                }
                            },
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Submitted(created_at: Timestamp) -> Element {
    let formatted = created_at.strftime("%b %d, %Y").to_string();

    rsx! {
        span { class: "text-muted", "Submitted {formatted}" }
    }
}

#[component]
fn AssignPanel(
    request: MaintenanceRequest,
    providers: Vec<ServiceProvider>,
    on_assigned: EventHandler<MaintenanceRequest>,
) -> Element {
    let mut problems = use_problems();
    let detected = request.service_type();
    let mut query = use_signal(|| ProviderQuery::for_request(&request));
    let mut assigning = use_signal(|| None::<String>);
    let mut confirm = use_signal(|| None::<ServiceProvider>);

    let ranked: Vec<ServiceProvider> = query.read().rank(&providers).into_iter().cloned().collect();
    let can_assign = request.can_assign();
    let request_id = request.id.clone();

    rsx! {
        div { class: "card",
            div { class: "card-header",
                h2 { class: "card-title", "{request.title}" }
            }
            div { class: "card-body",
                div { class: "form-group",
                    span { class: "form-label", "Description" }
                    div { class: "form-value", "{request.description}" }
                }
                div { class: "form-group",
                    span { class: "form-label", "Suggested service" }
                    div { class: "form-value", "{detected}" }
                    if let Some(created_at) = request.created_at {
                        Submitted { created_at }
                    }
                }

                div { class: "divider" }

                if !can_assign {
                    p { class: "text-muted",
                        "This request is {request.status.label().to_lowercase()} and can no longer be assigned."
                    }
                } else {
                    h3 { class: "section-header", "Find a provider" }
                    div { class: "form-group",
                        label { class: "form-label", r#for: "service_type", "Service" }
                        select {
                            id: "service_type",
                            class: "form-input",
                            onchange: move |e| {
                                let choice = ServiceType::ALL
                                    .into_iter()
                                    .find(|t| t.label() == e.value());
                                query.write().service_type = choice;
                            },
                            option { value: "", selected: query.read().service_type.is_none(), "Any service" }
                            for service_type in ServiceType::ALL {
                                option {
                                    key: "{service_type.label()}",
                                    value: service_type.label(),
                                    selected: query.read().service_type == Some(service_type),
                                    "{service_type}"
                                }
                            }
                        }
                    }
                    div { class: "form-group",
                        input {
                            class: "form-input",
                            r#type: "search",
                            placeholder: "Search by name or location",
                            value: "{query.read().search}",
                            oninput: move |e| query.write().search = e.value(),
                        }
                    }
                    div { class: "form-group",
                        label { class: "checkbox-label",
                            input {
                                r#type: "checkbox",
                                checked: query.read().available_only,
                                onchange: move |e| query.write().available_only = e.checked(),
                            }
                            span { "Available only" }
                        }
                    }

                    if ranked.is_empty() {
                        EmptyState { message: "No providers match." }
                    }
                    ul { class: "provider-list",
                        for provider in ranked {
                            {
                                let is_current = request.assigned_provider_id.as_deref() == Some(provider.id.as_str());
                                let is_assigning = assigning.read().as_deref() == Some(provider.id.as_str());
                                let rating = provider
                                    .rating
                                    .map(|r| format!("{r:.1} ★"))
                                    .unwrap_or_else(|| "Unrated".to_string());
                                let location = provider.location.clone().unwrap_or_default();
                                let chosen = provider.clone();
                                rsx! {
                                    li { key: "{provider.id}", class: "provider-list-item",
                                        div { class: "provider-info",
                                            span { class: "provider-name", "{provider.name}" }
                                            span { class: "text-muted", "{location} · {rating}" }
                                        }
                                        if is_current {
                                            Badge { kind: "info", label: "Assigned" }
                                        } else {
                                            button {
                                                class: "btn btn-primary",
                                                disabled: assigning.read().is_some(),
                                                onclick: move |_| confirm.set(Some(chosen.clone())),
                                                if is_assigning { "Assigning..." } else { "Assign" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        if let Some(provider) = confirm() {
            AssignConfirmModal {
                request_title: request.title.clone(),
                provider_name: provider.name.clone(),
                reassigning: request.assigned_provider_id.is_some(),
                on_close: move |_| confirm.set(None),
                on_confirm: {
                    let request_id = request_id.clone();
                    move |_| {
                        let request_id = request_id.clone();
                        let provider_id = provider.id.clone();
                        confirm.set(None);
                        spawn(async move {
                            assigning.set(Some(provider_id.clone()));
                            match api::assign_service_provider(request_id, provider_id).await {
                                Ok(updated) => on_assigned.call(updated),
                                Err(e) => problems.report(&e),
                            }
                            assigning.set(None);
                        });
                    }
                },
            }
        }
    }
}

#[component]
fn AssignConfirmModal(
    request_title: String,
    provider_name: String,
    reassigning: bool,
    on_close: EventHandler<()>,
    on_confirm: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "modal-overlay",
            onclick: move |_| on_close.call(()),
            div { class: "modal modal-sm",
                onclick: move |e| e.stop_propagation(),
                div { class: "modal-header",
                    h2 { class: "modal-title",
                        if reassigning { "Reassign Request" } else { "Assign Request" }
                    }
                    button {
                        class: "modal-close",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
                div { class: "modal-body",
                    p { "Send " strong { "{request_title}" } " to " strong { "{provider_name}" } "?" }
                    if reassigning {
                        p { class: "text-muted", "The current provider will be replaced." }
                    }
                }
                div { class: "modal-footer",
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| on_confirm.call(()),
                        "Assign"
                    }
                }
            }
        }
    }
}
