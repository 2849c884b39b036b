use crate::error::ConfigError;

/// Package name the midway templates import from.
pub const MIDWAY_PACKAGE: &str = "midway";
/// Alias selected by the `@ali/midway` output type.
pub const ALI_MIDWAY_PACKAGE: &str = "@ali/midway";

/// Output dialect, each variant carrying its own options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDialect {
    JavaScript,
    TypeScript(TypeScriptOptions),
    Egg,
    Midway(MidwayOptions),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeScriptOptions {
    /// Prepend `// @ts-nocheck` to model files.
    pub ts_no_check: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MidwayOptions {
    pub ts_no_check: bool,
    /// Replaces the `midway` import source when set.
    pub package_alias: Option<String>,
}

impl OutputDialect {
    /// Resolve a configured output type name.
    ///
    /// `ts_no_check` is ignored by the JavaScript dialects.
    pub fn from_name(
        name: &str,
        ts_no_check: bool,
        package_alias: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(alias) = package_alias
            && alias.trim().is_empty()
        {
            return Err(ConfigError::EmptyPackageAlias);
        }

        let dialect = match name {
            "js" | "javascript" => OutputDialect::JavaScript,
            "ts" | "typescript" => OutputDialect::TypeScript(TypeScriptOptions { ts_no_check }),
            "egg" => OutputDialect::Egg,
            "midway" => OutputDialect::Midway(MidwayOptions {
                ts_no_check,
                package_alias: package_alias.map(str::to_string),
            }),
            ALI_MIDWAY_PACKAGE => OutputDialect::Midway(MidwayOptions {
                ts_no_check,
                package_alias: Some(package_alias.unwrap_or(ALI_MIDWAY_PACKAGE).to_string()),
            }),
            other => return Err(ConfigError::UnsupportedDialect(other.to_string())),
        };

        if package_alias.is_some() && !matches!(dialect, OutputDialect::Midway(_)) {
            return Err(ConfigError::PackageAliasUnsupported(name.to_string()));
        }

        Ok(dialect)
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputDialect::JavaScript => "js",
            OutputDialect::TypeScript(_) => "ts",
            OutputDialect::Egg => "egg",
            OutputDialect::Midway(_) => "midway",
        }
    }

    /// Whether the dialect emits TypeScript (and a definition artifact).
    pub fn is_typed(&self) -> bool {
        matches!(self, OutputDialect::TypeScript(_) | OutputDialect::Midway(_))
    }

    pub fn type_check_suppressed(&self) -> bool {
        match self {
            OutputDialect::TypeScript(opts) => opts.ts_no_check,
            OutputDialect::Midway(opts) => opts.ts_no_check,
            OutputDialect::JavaScript | OutputDialect::Egg => false,
        }
    }

    pub fn package_alias(&self) -> Option<&str> {
        match self {
            OutputDialect::Midway(opts) => opts.package_alias.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("js", OutputDialect::JavaScript)]
    #[case("javascript", OutputDialect::JavaScript)]
    #[case("ts", OutputDialect::TypeScript(TypeScriptOptions { ts_no_check: false }))]
    #[case("egg", OutputDialect::Egg)]
    #[case("midway", OutputDialect::Midway(MidwayOptions::default()))]
    #[case("@ali/midway", OutputDialect::Midway(MidwayOptions { ts_no_check: false, package_alias: Some("@ali/midway".into()) }))]
    fn resolves_known_names(#[case] name: &str, #[case] expected: OutputDialect) {
        assert_eq!(OutputDialect::from_name(name, false, None).unwrap(), expected);
    }

    #[test]
    fn unknown_name_is_a_configuration_error() {
        assert_eq!(
            OutputDialect::from_name("python", false, None),
            Err(ConfigError::UnsupportedDialect("python".into()))
        );
    }

    #[test]
    fn package_alias_only_for_midway() {
        assert_eq!(
            OutputDialect::from_name("ts", false, Some("@corp/midway")),
            Err(ConfigError::PackageAliasUnsupported("ts".into()))
        );
        let dialect = OutputDialect::from_name("midway", false, Some("@corp/midway")).unwrap();
        assert_eq!(dialect.package_alias(), Some("@corp/midway"));
        assert_eq!(
            OutputDialect::from_name("midway", false, Some("  ")),
            Err(ConfigError::EmptyPackageAlias)
        );
    }

    #[test]
    fn explicit_alias_wins_over_ali_preset() {
        let dialect = OutputDialect::from_name("@ali/midway", false, Some("@corp/midway")).unwrap();
        assert_eq!(dialect.package_alias(), Some("@corp/midway"));
        assert_eq!(dialect.name(), "midway");
    }

    #[test]
    fn ts_no_check_only_for_typed_dialects() {
        assert!(OutputDialect::from_name("ts", true, None).unwrap().type_check_suppressed());
        assert!(OutputDialect::from_name("midway", true, None).unwrap().type_check_suppressed());
        assert!(!OutputDialect::from_name("js", true, None).unwrap().type_check_suppressed());
        assert!(!OutputDialect::from_name("egg", true, None).unwrap().type_check_suppressed());
    }
}
