//! Organizational-unit containers partitioning users and groups.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Container a user entry lives in, one OU under the user base DN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserCategory {
    /// Service and machine accounts; exempt from the member username rule.
    System,
    /// Ordinary members.
    Member,
    /// Guests and external collaborators.
    External,
}

impl UserCategory {
    pub fn from_name(name: &str) -> Result<UserCategory, ValidationError> {
        match name {
            "system" => Ok(UserCategory::System),
            "member" => Ok(UserCategory::Member),
            "external" => Ok(UserCategory::External),
            _ => Err(ValidationError::new(
                "category",
                "unknown",
                format!("unknown user category: {name}"),
            )),
        }
    }

    /// OU value under the user base DN.
    pub fn ou(&self) -> &'static str {
        match self {
            UserCategory::System => "system",
            UserCategory::Member => "member",
            UserCategory::External => "external",
        }
    }
}

impl std::fmt::Display for UserCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ou())
    }
}

/// Container a group entry lives in, one OU under the group base DN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupCategory {
    /// Primary login groups.
    Primary,
    /// Supplementary groups; role groups live here.
    Supplementary,
    /// Everything else.
    Additional,
}

impl GroupCategory {
    pub fn from_name(name: &str) -> Result<GroupCategory, ValidationError> {
        match name {
            "primary" => Ok(GroupCategory::Primary),
            "supplementary" => Ok(GroupCategory::Supplementary),
            "additional" => Ok(GroupCategory::Additional),
            _ => Err(ValidationError::new(
                "category",
                "unknown",
                format!("unknown group category: {name}"),
            )),
        }
    }

    /// OU value under the group base DN.
    pub fn ou(&self) -> &'static str {
        match self {
            GroupCategory::Primary => "primary",
            GroupCategory::Supplementary => "supplementary",
            GroupCategory::Additional => "additional",
        }
    }
}

impl std::fmt::Display for GroupCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ou())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_category_round_trip() {
        for name in ["system", "member", "external"] {
            assert_eq!(UserCategory::from_name(name).unwrap().ou(), name);
        }
        assert!(UserCategory::from_name("guest").is_err());
    }

    #[test]
    fn group_category_round_trip() {
        for name in ["primary", "supplementary", "additional"] {
            assert_eq!(GroupCategory::from_name(name).unwrap().ou(), name);
        }
        assert!(GroupCategory::from_name("misc").is_err());
    }
}
