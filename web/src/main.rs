use dioxus::prelude::*;

mod views;

use types::{
    Access, AccessGate, CurrentUser, LANDLORD_AREA, Permission, Role, RouteRequirement, Session,
    User,
};
use views::{
    AdminDashboard, AgentDashboard, LandlordCaretakers, LandlordDashboard, LandlordFinance,
    LandlordMaintenance, LandlordProperties, LandlordReports, LandlordTenants, Login,
    ServiceProviderDashboard, TenantDashboard,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login?:error")]
    Login { error: Option<String> },
    #[route("/")]
    Home {},
    #[layout(AuthenticatedLayout)]
        #[route("/tenant/dashboard")]
        TenantDashboard {},
        #[route("/landlord/dashboard")]
        LandlordDashboard {},
        #[route("/landlord/properties")]
        LandlordProperties {},
        #[route("/landlord/tenants")]
        LandlordTenants {},
        #[route("/landlord/finance")]
        LandlordFinance {},
        #[route("/landlord/maintenance")]
        LandlordMaintenance {},
        #[route("/landlord/reports")]
        LandlordReports {},
        #[route("/landlord/caretakers")]
        LandlordCaretakers {},
        #[route("/agent/dashboard")]
        AgentDashboard {},
        #[route("/service-provider/dashboard")]
        ServiceProviderDashboard {},
        #[route("/admin/dashboard")]
        AdminDashboard {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl Route {
    pub fn login() -> Self {
        Route::Login { error: None }
    }

    /// The access policy of a protected route. Public routes have none.
    pub fn requirement(&self) -> Option<RouteRequirement> {
        let landlord_area = RouteRequirement::new(LANDLORD_AREA);

        let requirement = match self {
            Route::Login { .. } | Route::Home {} | Route::NotFound { .. } => return None,
            Route::TenantDashboard {} => RouteRequirement::new(&[Role::Tenant]),
            Route::LandlordDashboard {} => landlord_area,
            Route::LandlordProperties {} => landlord_area.with_permission(Permission::PROPERTY),
            Route::LandlordTenants {} => landlord_area.with_permission(Permission::TENANTS),
            Route::LandlordFinance {} => landlord_area.with_permission(Permission::FINANCE),
            Route::LandlordMaintenance {} => api::maintenance_requirement(),
            Route::LandlordReports {} => landlord_area.with_permission(Permission::REPORTS),
            Route::LandlordCaretakers {} => RouteRequirement::new(&[Role::Landlord]).landlord_only(),
            Route::AgentDashboard {} => RouteRequirement::new(&[Role::Agent]),
            Route::ServiceProviderDashboard {} => RouteRequirement::new(&[Role::ServiceProvider]),
            Route::AdminDashboard {} => RouteRequirement::new(&[Role::Admin]),
        };

        Some(requirement)
    }

    /// Resolve a redirect target from the access gate.
    pub fn from_path(path: &str) -> Self {
        path.parse().unwrap_or(Route::Home {})
    }
}

/// Every sidebar entry. Each viewer only sees the ones the gate lets through.
fn nav_entries() -> Vec<(Route, &'static str)> {
    vec![
        (Route::TenantDashboard {}, "Dashboard"),
        (Route::LandlordDashboard {}, "Dashboard"),
        (Route::AgentDashboard {}, "Dashboard"),
        (Route::ServiceProviderDashboard {}, "Dashboard"),
        (Route::AdminDashboard {}, "Dashboard"),
        (Route::LandlordProperties {}, "Properties"),
        (Route::LandlordTenants {}, "Tenants"),
        (Route::LandlordFinance {}, "Finance"),
        (Route::LandlordMaintenance {}, "Maintenance"),
        (Route::LandlordReports {}, "Reports"),
        (Route::LandlordCaretakers {}, "Caretakers"),
    ]
}

pub fn visible_nav(viewer: &Viewer) -> Vec<(Route, &'static str)> {
    let session = Session::Authenticated(viewer.user.clone());
    nav_entries()
        .into_iter()
        .filter(|(route, _)| {
            route
                .requirement()
                .is_some_and(|requirement| viewer.gate.allows(&session, &requirement))
        })
        .collect()
}

fn main() {
    #[cfg(feature = "server")]
    {
        server::init_tracing();
        dioxus::serve(|| async move {
            let routes = server::init().await?;

            Ok(dioxus::server::router(App).merge(routes))
        });
    }

    #[cfg(all(feature = "web", not(feature = "server")))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Rentit" }
        document::Link { rel: "icon", href: asset!("/assets/favicon.svg") }
        document::Link { rel: "stylesheet", href: asset!("/assets/main.css") }

        Router::<Route> {}
    }
}

#[component]
fn NavLink(to: Route, children: Element) -> Element {
    let current_route: Route = use_route();
    let is_active = current_route == to;

    rsx! {
        Link {
            to,
            class: if is_active { "active" },
            {children}
        }
    }
}

/// Turn the current-user request state into a session and the gate to judge it with.
///
/// Any failure to resolve the user counts as signed out.
pub fn resolve_session(
    state: Option<&Result<Option<CurrentUser>, ServerFnError>>,
) -> (Session, AccessGate) {
    match state {
        None => (Session::Loading, AccessGate::default()),
        Some(Ok(Some(current))) => (
            Session::Authenticated(current.user.clone()),
            AccessGate::new(current.policy),
        ),
        Some(Ok(None)) | Some(Err(_)) => (Session::Anonymous, AccessGate::default()),
    }
}

/// The signed-in user and the gate the server configured, for pages inside the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewer {
    pub user: User,
    pub gate: AccessGate,
}

impl Viewer {
    pub fn can_open(&self, route: &Route) -> bool {
        let session = Session::Authenticated(self.user.clone());
        route
            .requirement()
            .is_none_or(|requirement| self.gate.allows(&session, &requirement))
    }
}

pub fn use_viewer() -> Viewer {
    use_context::<Viewer>()
}

/// A failed server call, worded for the person using the page.
#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
    pub headline: String,
    /// The server's error chain, outermost first, minus the headline itself.
    pub causes: Vec<String>,
    /// Backtrace frames from this workspace, when the server sent any.
    pub frames: Option<String>,
}

impl Problem {
    pub fn from_server_error(error: &ServerFnError) -> Self {
        let ServerFnError::ServerError {
            message,
            code,
            details,
            ..
        } = error
        else {
            return Self {
                headline: headline(None, &error.to_string()),
                causes: vec![error.to_string()],
                frames: None,
            };
        };

        let detail = |key: &str| details.as_ref().and_then(|d| d.get(key));
        let headline = headline(Some(*code), message);
        let causes = detail("chain")
            .and_then(|chain| chain.as_array())
            .into_iter()
            .flatten()
            .filter_map(|cause| cause.as_str())
            .filter(|cause| *cause != headline)
            .map(String::from)
            .collect();
        let frames = detail("backtrace")
            .and_then(|trace| trace.as_str())
            .and_then(workspace_frames);

        Self {
            headline,
            causes,
            frames,
        }
    }
}

/// What to tell the user for a failure with this HTTP status.
fn headline(status: Option<u16>, message: &str) -> String {
    match status {
        Some(403) => "You don't have access to that.".to_string(),
        Some(404) => "That item no longer exists.".to_string(),
        Some(502..=504) => "The property service is unavailable. Try again shortly.".to_string(),
        None => "Could not reach the server. Check your connection.".to_string(),
        _ => message.to_string(),
    }
}

/// Backtrace lines from our own crates, or `None` when there are none.
fn workspace_frames(backtrace: &str) -> Option<String> {
    const CRATES: [&str; 4] = ["types::", "server::", "api::", "web::"];

    let frames: Vec<&str> = backtrace
        .lines()
        .filter(|line| CRATES.iter().any(|krate| line.contains(krate)))
        .collect();
    (!frames.is_empty()).then(|| frames.join("\n"))
}

/// The page-level problem slot, provided by the authenticated layout.
#[derive(Clone, Copy)]
pub struct Problems(Signal<Option<Problem>>);

impl Problems {
    /// Show a failed server call. A rejected session sends the user back to login.
    pub fn report(&mut self, error: &ServerFnError) {
        if let ServerFnError::ServerError { code: 401, .. } = error {
            navigator().push(Route::Login {
                error: Some("session-expired".to_string()),
            });
            return;
        }
        self.0.set(Some(Problem::from_server_error(error)));
    }

    pub fn dismiss(&mut self) {
        self.0.set(None);
    }
}

pub fn use_problems() -> Problems {
    use_context::<Problems>()
}

#[component]
fn ProblemBanner() -> Element {
    let mut problems = use_problems();
    let Some(problem) = problems.0.read().clone() else {
        return rsx! {};
    };
    let has_details = !problem.causes.is_empty() || problem.frames.is_some();

    rsx! {
        div { class: "problem-banner", role: "alert",
            div { class: "problem-banner-header",
                span { class: "problem-banner-headline", "{problem.headline}" }
                button {
                    class: "problem-banner-dismiss",
                    onclick: move |_| problems.dismiss(),
                    "×"
                }
            }
            if has_details {
                details { class: "problem-details",
                    summary { "Details" }
                    ul { class: "problem-causes",
                        for (i, cause) in problem.causes.iter().enumerate() {
                            li { key: "{i}", "{cause}" }
                        }
                    }
                    if let Some(frames) = &problem.frames {
                        pre { class: "problem-frames", "{frames}" }
                    }
                }
            }
        }
    }
}

/// Forwards `/` to the viewer's dashboard, or to login.
#[component]
fn Home() -> Element {
    let current = use_server_future(api::get_current_user)?;
    let (session, _) = resolve_session(current.read().as_ref());

    match session {
        Session::Loading => rsx! { ui::Loading {} },
        Session::Anonymous => {
            navigator().replace(Route::login());
            rsx! { ui::Loading { message: "Redirecting to login..." } }
        }
        Session::Authenticated(user) => match user.role.default_landing() {
            "/" => rsx! {
                div { class: "login-page",
                    div { class: "login-card",
                        h1 { class: "login-title", "No dashboard" }
                        p { "Your account's role ({user.role}) has no dashboard here." }
                        a { href: "/auth/logout", rel: "external", class: "btn btn-secondary", "Sign out" }
                    }
                }
            },
            landing => {
                navigator().replace(Route::from_path(landing));
                rsx! { ui::Loading { message: "Redirecting..." } }
            }
        },
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx! {
        div { class: "login-page",
            div { class: "login-card",
                h1 { class: "login-title", "Not found" }
                p { class: "text-muted", "Nothing lives at /{path}." }
                Link { to: Route::Home {}, class: "btn btn-primary", "Go to my dashboard" }
            }
        }
    }
}

#[component]
fn AuthenticatedLayout() -> Element {
    use_context_provider(|| Problems(Signal::new(None)));
    let route: Route = use_route();
    let current = use_server_future(api::get_current_user)?;

    let (session, gate) = resolve_session(current.read().as_ref());
    let decision = match route.requirement() {
        Some(requirement) => gate.decide(&session, &requirement),
        None => Access::Allow,
    };

    match (decision, session) {
        (Access::Pending, _) => rsx! { ui::Loading {} },
        (Access::Redirect(path), _) => {
            tracing::debug!(%route, path, "redirecting");
            navigator().replace(Route::from_path(path));
            rsx! { ui::Loading { message: "Redirecting..." } }
        }
        (Access::Allow, Session::Authenticated(user)) => {
            let viewer = Viewer { user, gate };
            rsx! {
                ViewerScope { key: "{viewer.user.id}", viewer }
            }
        }
        // Public routes never reach this layout.
        (Access::Allow, _) => rsx! { ui::Loading {} },
    }
}

#[component]
fn ViewerScope(viewer: Viewer) -> Element {
    use_context_provider(|| viewer.clone());

    let initial = viewer
        .user
        .name
        .chars()
        .next()
        .unwrap_or('?')
        .to_uppercase()
        .to_string();
    let nav = visible_nav(&viewer);

    rsx! {
        div { class: "app-layout",
            // Sidebar
            aside { class: "sidebar",
                div { class: "sidebar-header",
                    span { class: "sidebar-logo", "Rentit" }
                }
                nav { class: "sidebar-nav",
                    for (route, label) in nav {
                        NavLink { key: "{route}", to: route.clone(), "{label}" }
                    }
                }
                div { class: "sidebar-footer",
                    div { class: "sidebar-user",
                        div { class: "sidebar-avatar", "{initial}" }
                        div { class: "sidebar-user-info",
                            div { class: "sidebar-user-name", "{viewer.user.name}" }
                            div { class: "sidebar-user-role", "{viewer.user.role}" }
                        }
                    }
                    a { href: "/auth/logout", rel: "external", class: "sidebar-logout", "Sign out" }
                }
            }
            // Main content
            main { class: "main-content",
                ProblemBanner {}
                Outlet::<Route> {}
            }
        }
    }
}
