use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taskpro_core::AppError;

/// Role held by exactly one identity at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including user and system administration.
    Admin,
    /// Team-wide task access and reporting.
    Manager,
    /// Works on the tasks assigned to them.
    User,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::Admin, Role::Manager, Role::User];

        ALL
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "user" => Ok(Self::User),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

/// Named capability of the form `<resource>:<action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    /// Create new tasks.
    TasksCreate,
    /// Read tasks the actor is involved in.
    TasksRead,
    /// Update tasks the actor owns.
    TasksUpdate,
    /// Delete tasks the actor owns.
    TasksDelete,
    /// Assign tasks to other identities.
    TasksAssign,
    /// Read every task.
    TasksReadAll,
    /// Update every task.
    TasksUpdateAll,
    /// Delete every task.
    TasksDeleteAll,
    /// List identities.
    UsersRead,
    /// Update other identities.
    UsersUpdate,
    /// Create identities on behalf of others.
    UsersCreate,
    /// Delete identities.
    UsersDelete,
    /// Change the role of an identity.
    UsersManageRoles,
    /// View reports.
    ReportsView,
    /// Export reports.
    ReportsExport,
    /// Change system settings.
    SystemSettings,
}

impl Permission {
    /// Returns the transport and storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TasksCreate => "tasks:create",
            Self::TasksRead => "tasks:read",
            Self::TasksUpdate => "tasks:update",
            Self::TasksDelete => "tasks:delete",
            Self::TasksAssign => "tasks:assign",
            Self::TasksReadAll => "tasks:read-all",
            Self::TasksUpdateAll => "tasks:update-all",
            Self::TasksDeleteAll => "tasks:delete-all",
            Self::UsersRead => "users:read",
            Self::UsersUpdate => "users:update",
            Self::UsersCreate => "users:create",
            Self::UsersDelete => "users:delete",
            Self::UsersManageRoles => "users:manage-roles",
            Self::ReportsView => "reports:view",
            Self::ReportsExport => "reports:export",
            Self::SystemSettings => "system:settings",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::TasksCreate,
            Permission::TasksRead,
            Permission::TasksUpdate,
            Permission::TasksDelete,
            Permission::TasksAssign,
            Permission::TasksReadAll,
            Permission::TasksUpdateAll,
            Permission::TasksDeleteAll,
            Permission::UsersRead,
            Permission::UsersUpdate,
            Permission::UsersCreate,
            Permission::UsersDelete,
            Permission::UsersManageRoles,
            Permission::ReportsView,
            Permission::ReportsExport,
            Permission::SystemSettings,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

impl Serialize for Permission {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(value.as_str()).map_err(|error| serde::de::Error::custom(error.message()))
    }
}
