use automate_config::OutputDialect;

/// Built-in template sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    JavaScript,
    Egg,
    TypeScript,
    TypeScriptDefinition,
    Midway,
    MidwayDb,
}

impl TemplateId {
    pub fn name(self) -> &'static str {
        match self {
            TemplateId::JavaScript => "javascript",
            TemplateId::Egg => "egg",
            TemplateId::TypeScript => "typescript",
            TemplateId::TypeScriptDefinition => "typescript.d",
            TemplateId::Midway => "midway",
            TemplateId::MidwayDb => "db",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            TemplateId::JavaScript => include_str!("../templates/javascript.js"),
            TemplateId::Egg => include_str!("../templates/egg.js"),
            TemplateId::TypeScript => include_str!("../templates/typescript.ts"),
            TemplateId::TypeScriptDefinition => include_str!("../templates/typescript.d.ts"),
            TemplateId::Midway => include_str!("../templates/midway.ts"),
            TemplateId::MidwayDb => include_str!("../templates/db.ts"),
        }
    }
}

/// Placeholder bound to the model in every model template.
pub const MODEL_PLACEHOLDER: &str = "UserModel";
/// Interface whose body receives one property per attribute.
pub const ATTRIBUTES_PLACEHOLDER: &str = "IUserAttributes";
pub const MODEL_INTERFACE_PLACEHOLDER: &str = "IUserModel";
pub const MODEL_STATIC_PLACEHOLDER: &str = "IUserModelStatic";

/// Shared bootstrap artifact emitted once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bootstrap {
    pub template: TemplateId,
    pub file_name: &'static str,
}

/// Everything the synthesizer needs to know about one output dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectDriver {
    pub model_template: TemplateId,
    pub model_extension: &'static str,
    /// `.d.ts` companion with the attribute interfaces.
    pub definition_template: Option<TemplateId>,
    pub bootstrap: Option<Bootstrap>,
    /// Rewrite the `id` of `providerWrapper(...)` registrations.
    pub wraps_provider: bool,
    /// Replacement for the `midway` import source.
    pub package_alias: Option<String>,
    pub ts_no_check: bool,
}

pub fn driver(dialect: &OutputDialect) -> DialectDriver {
    match dialect {
        OutputDialect::JavaScript => DialectDriver {
            model_template: TemplateId::JavaScript,
            model_extension: "js",
            definition_template: None,
            bootstrap: None,
            wraps_provider: false,
            package_alias: None,
            ts_no_check: false,
        },
        OutputDialect::Egg => DialectDriver {
            model_template: TemplateId::Egg,
            model_extension: "js",
            definition_template: None,
            bootstrap: None,
            wraps_provider: false,
            package_alias: None,
            ts_no_check: false,
        },
        OutputDialect::TypeScript(opts) => DialectDriver {
            model_template: TemplateId::TypeScript,
            model_extension: "ts",
            definition_template: Some(TemplateId::TypeScriptDefinition),
            bootstrap: None,
            wraps_provider: false,
            package_alias: None,
            ts_no_check: opts.ts_no_check,
        },
        OutputDialect::Midway(opts) => DialectDriver {
            model_template: TemplateId::Midway,
            model_extension: "ts",
            definition_template: Some(TemplateId::TypeScriptDefinition),
            bootstrap: Some(Bootstrap {
                template: TemplateId::MidwayDb,
                file_name: "db.ts",
            }),
            wraps_provider: true,
            package_alias: opts.package_alias.clone(),
            ts_no_check: opts.ts_no_check,
        },
    }
}

impl DialectDriver {
    pub fn model_path(&self, file_name: &str) -> String {
        format!("{}.{}", file_name, self.model_extension)
    }

    pub fn definition_path(&self, file_name: &str) -> String {
        format!("{}.d.ts", file_name)
    }
}
