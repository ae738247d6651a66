//! Identity records: accounts, roles, and profile sub-documents.

use crate::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an identity.
///
/// Immutable after creation. Admins host events; students register for
/// them. Authorization is explicit role-tag dispatch over this set, not
/// inheritance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A student who discovers and registers for events.
    Student,
    /// An admin (host) identity that owns events.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => f.write_str("student"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

impl FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            other => Err(crate::Error::Validation {
                reason: format!("unknown role: {other}"),
            }),
        }
    }
}

/// Academic details attached to a student identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    /// Branch of study.
    #[serde(default)]
    pub branch: String,
    /// Year of study.
    #[serde(default)]
    pub year: String,
    /// University registration number.
    #[serde(default)]
    pub university_reg_no: String,
}

/// College details attached to an admin (host) identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeDetails {
    /// Display name of the college.
    #[serde(default)]
    pub college_name: String,
    /// Public website.
    #[serde(default)]
    pub website: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

/// Field-level patch for [`StudentDetails`].
///
/// `None` fields keep their prior values on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetailsPatch {
    /// New branch, if provided.
    pub branch: Option<String>,
    /// New year, if provided.
    pub year: Option<String>,
    /// New registration number, if provided.
    pub university_reg_no: Option<String>,
}

/// Field-level patch for [`CollegeDetails`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeDetailsPatch {
    /// New college name, if provided.
    pub college_name: Option<String>,
    /// New website, if provided.
    pub website: Option<String>,
    /// New description, if provided.
    pub description: Option<String>,
}

/// A role-specific profile patch.
///
/// The profile service rejects patches that do not match the caller's
/// role before any write happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfilePatch {
    /// Patch for the student sub-document.
    Student(StudentDetailsPatch),
    /// Patch for the college sub-document.
    College(CollegeDetailsPatch),
}

impl StudentDetails {
    /// Merge the provided fields of `patch` into `self`.
    pub fn merge(&mut self, patch: StudentDetailsPatch) {
        if let Some(branch) = patch.branch {
            self.branch = branch;
        }
        if let Some(year) = patch.year {
            self.year = year;
        }
        if let Some(reg_no) = patch.university_reg_no {
            self.university_reg_no = reg_no;
        }
    }
}

impl CollegeDetails {
    /// Merge the provided fields of `patch` into `self`.
    pub fn merge(&mut self, patch: CollegeDetailsPatch) {
        if let Some(name) = patch.college_name {
            self.college_name = name;
        }
        if let Some(website) = patch.website {
            self.website = website;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}

/// A user account.
///
/// The password hash never serializes; responses that expose an identity
/// go through dedicated DTOs in the web crate anyway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email, unique across all identities (compared case-insensitively).
    pub email: String,
    /// Argon2-encoded password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role, immutable after creation.
    pub role: Role,
    /// Student sub-document, populated via profile update only.
    pub student_details: Option<StudentDetails>,
    /// College sub-document, populated via profile update only.
    pub college_details: Option<CollegeDetails>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Apply a role-appropriate profile patch in place.
    ///
    /// Role gating happens in the profile service; this merge assumes the
    /// patch already matches the identity's role.
    pub fn apply_patch(&mut self, patch: ProfilePatch) {
        match patch {
            ProfilePatch::Student(p) => {
                self.student_details.get_or_insert_with(Default::default).merge(p);
            }
            ProfilePatch::College(p) => {
                self.college_details.get_or_insert_with(Default::default).merge(p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Identity {
        Identity {
            id: UserId::new(),
            name: "Alice".to_string(),
            email: "alice@example.edu".to_string(),
            password_hash: String::new(),
            role: Role::Student,
            student_details: None,
            college_details: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn role_parses_lowercase_tags() {
        assert_eq!("student".parse(), Ok(Role::Student));
        assert_eq!("admin".parse(), Ok(Role::Admin));
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn partial_patch_keeps_sibling_fields() {
        let mut identity = student();
        identity.student_details = Some(StudentDetails {
            branch: "CSE".to_string(),
            year: "2".to_string(),
            university_reg_no: "U123".to_string(),
        });

        identity.apply_patch(ProfilePatch::Student(StudentDetailsPatch {
            branch: Some("ECE".to_string()),
            ..Default::default()
        }));

        let details = identity.student_details.as_ref().map(Clone::clone);
        assert_eq!(
            details,
            Some(StudentDetails {
                branch: "ECE".to_string(),
                year: "2".to_string(),
                university_reg_no: "U123".to_string(),
            })
        );
    }

    #[test]
    fn patch_on_empty_sub_document_starts_from_defaults() {
        let mut identity = student();
        identity.apply_patch(ProfilePatch::Student(StudentDetailsPatch {
            year: Some("3".to_string()),
            ..Default::default()
        }));

        let details = identity.student_details.clone().unwrap_or_default();
        assert_eq!(details.year, "3");
        assert_eq!(details.branch, "");
    }

    #[test]
    fn password_hash_never_serializes() {
        let mut identity = student();
        identity.password_hash = "secret-hash".to_string();
        let json = serde_json::to_string(&identity).unwrap_or_default();
        assert!(!json.contains("secret-hash"));
    }
}
