#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Casing applied to generated keys and file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum NameCase {
    /// Keep the database name as-is.
    #[default]
    Preserve,
    Camel,
}

impl NameCase {
    pub fn from_camel_flag(camel_case: bool) -> Self {
        if camel_case {
            NameCase::Camel
        } else {
            NameCase::Preserve
        }
    }

    /// Returns true when names are kept as-is.
    pub fn is_preserve(self) -> bool {
        matches!(self, NameCase::Preserve)
    }

    /// Returns true when camel case.
    pub fn is_camel(self) -> bool {
        matches!(self, NameCase::Camel)
    }

    pub fn apply(self, name: &str) -> String {
        automate_naming::field_name(name, self.is_camel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_follows_case() {
        assert_eq!(NameCase::Preserve.apply("user_post"), "user_post");
        assert_eq!(NameCase::Camel.apply("user_post"), "userPost");
        assert_eq!(NameCase::from_camel_flag(true), NameCase::Camel);
        assert_eq!(NameCase::from_camel_flag(false), NameCase::Preserve);
    }
}
