//! User roles and the capabilities they can be granted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The single role every user holds.
///
/// Stored and serialized as its short code (`ADMIN`, `BAYI`, `KURUM`,
/// `OGRETMEN`, `OGRENCI`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "BAYI")]
    Dealer,
    #[serde(rename = "KURUM")]
    Institution,
    #[serde(rename = "OGRETMEN")]
    Teacher,
    #[serde(rename = "OGRENCI")]
    Student,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Dealer,
        Role::Institution,
        Role::Teacher,
        Role::Student,
    ];

    /// Storage code, at most 10 characters.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Dealer => "BAYI",
            Role::Institution => "KURUM",
            Role::Teacher => "OGRETMEN",
            Role::Student => "OGRENCI",
        }
    }

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Dealer => "Bayi",
            Role::Institution => "Kurum",
            Role::Teacher => "Ogretmen",
            Role::Student => "Ogrenci",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string is not one of the five role codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}', expected one of ADMIN, BAYI, KURUM, OGRETMEN, OGRENCI")]
pub struct UnknownRoleError(pub String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.code() == s)
            .ok_or_else(|| UnknownRoleError(s.to_owned()))
    }
}

/// Something a user may be allowed to do.
///
/// The role → capability mapping lives in the module's policy layer; this
/// enum is only the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageUsers,
    ManageTaxonomy,
    ManageQuestions,
    CreateTests,
    ManageCredits,
    HoldCredits,
}
