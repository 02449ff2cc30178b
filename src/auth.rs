/// Sessions and the edit capability check.
///
/// A `Session` is created once by the application (CLI or endpoint) and
/// passed by reference to whatever needs the token or the current user.
/// There is no ambient session state.
///
/// Every "may this user change that thing" question goes through
/// `can_edit`. Views and handlers must not re-derive role booleans.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Users and sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administers every municipality.
    SuperAdmin,
    /// Administers one municipality.
    Admin,
    /// Read-only dashboard user with personal alert subscriptions.
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: Role,
    /// Municipality the user belongs to. SuperAdmins usually have none.
    pub municipality_id: Option<String>,
}

/// Authenticated (or not yet authenticated) application session.
#[derive(Debug, Clone)]
pub struct Session {
    token: Option<String>,
    user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user,
        }
    }

    /// Session without a bearer token; backend calls will be refused.
    pub fn anonymous(user: User) -> Self {
        Self { token: None, user }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn can_edit(&self, resource: &Resource) -> bool {
        can_edit(&self.user, resource)
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Anything an admin panel can change, reduced to the facts the
/// authorization decision needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Municipality {
        id: String,
    },
    /// Includes the station's admin-adjustable min/max reference levels.
    Station {
        municipality_id: String,
    },
    User {
        id: String,
        role: Role,
        municipality_id: Option<String>,
    },
    /// A threshold alert subscription owned by `owner_id`.
    Subscription {
        owner_id: String,
    },
}

// ---------------------------------------------------------------------------
// Capability check
// ---------------------------------------------------------------------------

fn same_municipality(user: &User, municipality_id: Option<&str>) -> bool {
    match (user.municipality_id.as_deref(), municipality_id) {
        (Some(mine), Some(theirs)) => mine == theirs,
        _ => false,
    }
}

/// Decides whether `user` may modify `resource`.
///
/// - SuperAdmin: everything.
/// - Admin: its own municipality, stations in it, non-SuperAdmin users in
///   it, and its own subscriptions.
/// - Viewer: its own user record and its own subscriptions.
pub fn can_edit(user: &User, resource: &Resource) -> bool {
    if user.role == Role::SuperAdmin {
        return true;
    }

    match resource {
        Resource::Subscription { owner_id } => *owner_id == user.id,
        Resource::User { id, .. } if *id == user.id => true,
        _ if user.role == Role::Viewer => false,

        Resource::Municipality { id } => same_municipality(user, Some(id.as_str())),
        Resource::Station { municipality_id } => {
            same_municipality(user, Some(municipality_id.as_str()))
        }
        Resource::User { role, municipality_id, .. } => {
            *role != Role::SuperAdmin && same_municipality(user, municipality_id.as_deref())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
