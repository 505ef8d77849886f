use std::collections::BTreeSet;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use crate::{CaretakerPolicy, Permission, Role};

pub const SESSION_COOKIE_NAME: &str = "rentit_session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
}

impl User {
    /// Landlords implicitly hold every permission.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.role == Role::Landlord || self.permissions.contains(permission)
    }
}

/// Authentication state as seen by the access gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Resolution is still in flight.
    Loading,
    Anonymous,
    Authenticated(User),
}

impl Session {
    /// Normalize the `(is_loading, is_authenticated, user)` triple a session
    /// provider tracks. Authenticated without a user counts as anonymous.
    pub fn from_parts(is_loading: bool, is_authenticated: bool, user: Option<User>) -> Self {
        match (is_loading, is_authenticated, user) {
            (true, _, _) => Session::Loading,
            (false, true, Some(user)) => Session::Authenticated(user),
            _ => Session::Anonymous,
        }
    }
}

/// What the server tells the client about the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user: User,
    pub policy: CaretakerPolicy,
}

/// Server-side session payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user: User,
    #[serde(serialize_with = "reveal")]
    pub access_token: SecretString,
}

/// The token only ever lands in the encrypted session store, so it is written out in full.
fn reveal<S: Serializer>(token: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(token.expose_secret())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn caretaker() -> User {
        User {
            id: "u-1".into(),
            name: "Cara".into(),
            email: "cara@example.com".into(),
            role: Role::Caretaker,
            permissions: [Permission::PROPERTY].into(),
        }
    }

    #[test]
    fn loading_wins_over_everything() {
        assert_eq!(
            Session::from_parts(true, true, Some(caretaker())),
            Session::Loading
        );
    }

    #[test]
    fn authenticated_without_user_is_anonymous() {
        assert_eq!(Session::from_parts(false, true, None), Session::Anonymous);
        assert_eq!(
            Session::from_parts(false, false, Some(caretaker())),
            Session::Anonymous
        );
    }

    #[test]
    fn landlord_holds_every_permission() {
        let mut user = caretaker();
        assert!(user.has_permission(&Permission::PROPERTY));
        assert!(!user.has_permission(&Permission::FINANCE));

        user.role = Role::Landlord;
        user.permissions.clear();
        assert!(user.has_permission(&Permission::FINANCE));
    }

    #[test]
    fn user_from_backend_json() {
        let user: User = serde_json::from_str(
            r#"{"id": "42", "role": "service_provider", "permissions": ["maintenance"]}"#,
        )
        .unwrap();

        assert_eq!(user.role, Role::ServiceProvider);
        assert!(user.permissions.contains(&Permission::MAINTENANCE));
        assert!(user.name.is_empty());
    }

    #[test]
    fn user_data_keeps_token() {
        let data = UserData {
            user: caretaker(),
            access_token: "tok".to_string().into(),
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: UserData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.access_token.expose_secret(), "tok");
        assert_eq!(back.user, data.user);
    }
}
