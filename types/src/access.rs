//! Route access decisions.
//!
//! [`AccessGate::decide`] is the only place that turns a [`Session`] and a
//! route's [`RouteRequirement`] into an outcome. It reads nothing else and has
//! no side effects, so the client layout and the server API share it.

use serde::{Deserialize, Serialize};

use crate::{Permission, Role, Session};

pub const LOGIN_PATH: &str = "/login";

/// Roles that may enter the landlord area.
pub const LANDLORD_AREA: &[Role] = &[Role::Landlord, Role::Caretaker];

/// Static access policy of one route or API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequirement {
    pub allowed_roles: &'static [Role],
    pub required_permission: Option<Permission>,
    pub landlord_only: bool,
}

impl RouteRequirement {
    pub const fn new(allowed_roles: &'static [Role]) -> Self {
        Self {
            allowed_roles,
            required_permission: None,
            landlord_only: false,
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.required_permission = Some(permission);
        self
    }

    pub fn landlord_only(mut self) -> Self {
        self.landlord_only = true;
        self
    }

    pub fn allows_role(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }
}

/// How caretakers are treated on landlord routes that need a permission.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaretakerPolicy {
    /// Caretakers get every landlord route without a permission check.
    #[default]
    Inherit,
    /// Caretakers must hold the route's permission, like other roles.
    Enforce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The session is still resolving; decide again once it settles.
    Pending,
    Allow,
    Redirect(&'static str),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AccessGate {
    pub caretaker_policy: CaretakerPolicy,
}

impl AccessGate {
    pub fn new(caretaker_policy: CaretakerPolicy) -> Self {
        Self { caretaker_policy }
    }

    pub fn decide(&self, session: &Session, requirement: &RouteRequirement) -> Access {
        let user = match session {
            Session::Loading => return Access::Pending,
            Session::Anonymous => return Access::Redirect(LOGIN_PATH),
            Session::Authenticated(user) => user,
        };
        let landing = Access::Redirect(user.role.default_landing());

        if requirement.landlord_only && user.role != Role::Landlord {
            return landing;
        }

        if user.role == Role::Caretaker && requirement.allows_role(Role::Landlord) {
            return match self.caretaker_policy {
                CaretakerPolicy::Inherit => Access::Allow,
                CaretakerPolicy::Enforce => match &requirement.required_permission {
                    Some(permission) if !user.permissions.contains(permission) => landing,
                    _ => Access::Allow,
                },
            };
        }

        if !requirement.allows_role(user.role) {
            return landing;
        }

        match &requirement.required_permission {
            None => Access::Allow,
            Some(permission) if user.has_permission(permission) => Access::Allow,
            Some(_) => landing,
        }
    }

    pub fn allows(&self, session: &Session, requirement: &RouteRequirement) -> bool {
        self.decide(session, requirement) == Access::Allow
    }
}
