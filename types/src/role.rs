use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The fixed category of a user. Determines the default dashboard and coarse access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Tenant,
    Landlord,
    Caretaker,
    Agent,
    ServiceProvider,
    Admin,
    /// Any role string this application does not recognize.
    Unknown,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Tenant,
        Role::Landlord,
        Role::Caretaker,
        Role::Agent,
        Role::ServiceProvider,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Landlord => "landlord",
            Role::Caretaker => "caretaker",
            Role::Agent => "agent",
            Role::ServiceProvider => "service-provider",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }

    /// Where a user of this role lands after login or a denied navigation.
    pub fn default_landing(&self) -> &'static str {
        match self {
            Role::Tenant => "/tenant/dashboard",
            Role::Landlord | Role::Caretaker => "/landlord/dashboard",
            Role::Agent => "/agent/dashboard",
            Role::ServiceProvider => "/service-provider/dashboard",
            Role::Admin => "/admin/dashboard",
            Role::Unknown => "/",
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "tenant" => Role::Tenant,
            "landlord" => Role::Landlord,
            "caretaker" => Role::Caretaker,
            "agent" => Role::Agent,
            // The backend has used both spellings.
            "service-provider" | "service_provider" => Role::ServiceProvider,
            "admin" => Role::Admin,
            _ => Role::Unknown,
        })
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        let Ok(role) = s.parse();
        role
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fine-grained capability tag, scoped mainly to landlord and caretaker areas.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const PROPERTY: Permission = Permission(Cow::Borrowed("property"));
    pub const TENANTS: Permission = Permission(Cow::Borrowed("tenants"));
    pub const FINANCE: Permission = Permission(Cow::Borrowed("finance"));
    pub const MAINTENANCE: Permission = Permission(Cow::Borrowed("maintenance"));
    pub const REPORTS: Permission = Permission(Cow::Borrowed("reports"));

    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
