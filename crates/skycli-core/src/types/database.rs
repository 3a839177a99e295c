//! Database scope selection.

use std::fmt;

/// Identifier of the shared public database.
pub const PUBLIC_DATABASE_ID: &str = "_public";

/// Identifier of the per-user private database.
pub const PRIVATE_DATABASE_ID: &str = "_private";

/// Which logical database a command operates on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DatabaseScope {
    /// The shared database visible to every user.
    #[default]
    Public,
    /// The database owned by the authenticated user.
    Private,
}

impl DatabaseScope {
    /// Resolve the scope from the `--private` flag.
    pub fn from_private_flag(private: bool) -> Self {
        if private {
            DatabaseScope::Private
        } else {
            DatabaseScope::Public
        }
    }

    /// Returns the database identifier attached to requests in this scope.
    pub fn database_id(&self) -> &'static str {
        match self {
            DatabaseScope::Public => PUBLIC_DATABASE_ID,
            DatabaseScope::Private => PRIVATE_DATABASE_ID,
        }
    }
}

impl fmt::Display for DatabaseScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseScope::Public => f.write_str("public"),
            DatabaseScope::Private => f.write_str("private"),
        }
    }
}
