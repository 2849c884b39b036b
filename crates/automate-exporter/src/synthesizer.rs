use std::collections::HashSet;
use std::path::PathBuf;

use automate_config::GenerateOptions;
use automate_core::{ArtifactKind, GeneratedArtifact, ModelDefinition};
use automate_naming::{definition_prefix, is_binding_identifier, model_identifier};
use automate_template::ast::Module;
use automate_template::lexer::Comment;
use automate_template::{fold_module, parse_module, print_module, rename, RenameError, Rule};
use tracing::{debug, warn};

use crate::dialect::{
    driver, DialectDriver, TemplateId, ATTRIBUTES_PLACEHOLDER, MODEL_INTERFACE_PLACEHOLDER,
    MODEL_PLACEHOLDER, MODEL_STATIC_PLACEHOLDER,
};
use crate::encode::{attribute_members, attributes_object, indexes_array};
use crate::error::ExportError;
use crate::report::{Diagnostic, GenerationReport, TableFailure};
use crate::rules::{
    AttributesRule, DefineRule, InterfaceRule, OptionsRule, PackageAliasRule,
    ProviderWrapperRule,
};

/// Artifacts and diagnostics produced for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOutput {
    pub model: GeneratedArtifact,
    pub definition: Option<GeneratedArtifact>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TableOutput {
    pub fn artifacts(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        std::iter::once(&self.model).chain(self.definition.as_ref())
    }
}

/// Parsed templates for one dialect, shared by every table of a run.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    driver: DialectDriver,
    model: Module,
    definition: Option<Module>,
    bootstrap: Option<Module>,
}

fn parse_template(id: TemplateId) -> Result<Module, ExportError> {
    parse_module(id.source()).map_err(|source| ExportError::Template {
        template: id.name(),
        source,
    })
}

impl Synthesizer {
    pub fn new(options: &GenerateOptions) -> Result<Self, ExportError> {
        let driver = driver(&options.output);
        let model = parse_template(driver.model_template)?;
        let definition = driver.definition_template.map(parse_template).transpose()?;
        let bootstrap = driver
            .bootstrap
            .map(|b| parse_template(b.template))
            .transpose()?;
        Ok(Self {
            driver,
            model,
            definition,
            bootstrap,
        })
    }

    pub fn driver(&self) -> &DialectDriver {
        &self.driver
    }

    /// Render the model (and definition) artifact of one table.
    pub fn synthesize(&self, definition: &ModelDefinition) -> Result<TableOutput, ExportError> {
        let table = definition.table_name.as_str();
        let identifier = model_identifier(&definition.model_name);
        if !is_binding_identifier(&identifier) {
            return Err(ExportError::InvalidIdentifier {
                table: table.to_string(),
                identifier,
            });
        }

        let mut diagnostics = Vec::new();
        let model_path = self.driver.model_path(&definition.model_file_name);

        let attributes = AttributesRule {
            attributes: attributes_object(definition, &mut diagnostics),
        };
        let options = OptionsRule {
            table_name: definition.table_name.clone(),
            comment: definition.table_comment.clone().unwrap_or_default(),
            indexes: indexes_array(&definition.indexes),
        };
        let define = DefineRule {
            model_name: definition.model_name.clone(),
        };
        let provider = ProviderWrapperRule {
            model_name: definition.model_name.clone(),
        };
        let alias = self
            .driver
            .package_alias
            .as_ref()
            .map(|alias| PackageAliasRule {
                alias: alias.clone(),
            });

        let mut rules: Vec<&dyn Rule> = vec![&attributes, &options, &define];
        if self.driver.wraps_provider {
            rules.push(&provider);
        }
        if let Some(alias) = &alias {
            rules.push(alias);
        }

        let mut module = self.rewrite(
            &self.model,
            &rules,
            &[(MODEL_PLACEHOLDER, identifier)],
            Some(table),
            &model_path,
            &mut diagnostics,
        )?;
        if self.driver.ts_no_check {
            annotate_ts_no_check(&mut module);
        }
        let model = GeneratedArtifact::new(
            model_path,
            print_module(&module),
            ArtifactKind::Model,
        );

        let definition_artifact = match &self.definition {
            Some(template) => {
                let path = self.driver.definition_path(&definition.model_file_name);
                let interface = InterfaceRule {
                    interface: ATTRIBUTES_PLACEHOLDER,
                    members: attribute_members(definition),
                };
                let prefix = definition_prefix(table);
                let renames = [
                    (ATTRIBUTES_PLACEHOLDER, format!("{}Attributes", prefix)),
                    (MODEL_INTERFACE_PLACEHOLDER, format!("{}Model", prefix)),
                    (MODEL_STATIC_PLACEHOLDER, format!("{}ModelStatic", prefix)),
                ];
                let rules: [&dyn Rule; 1] = [&interface];
                let module = self.rewrite(
                    template,
                    &rules,
                    &renames,
                    Some(table),
                    &path,
                    &mut diagnostics,
                )?;
                Some(GeneratedArtifact::new(
                    path,
                    print_module(&module),
                    ArtifactKind::Definition,
                ))
            }
            None => None,
        };

        debug!(
            table,
            model = %definition.model_name,
            diagnostics = diagnostics.len(),
            "synthesized table"
        );

        Ok(TableOutput {
            model,
            definition: definition_artifact,
            diagnostics,
        })
    }

    /// The dialect's shared bootstrap artifact, if it has one.
    pub fn bootstrap(&self) -> Result<Option<(GeneratedArtifact, Vec<Diagnostic>)>, ExportError> {
        let Some((entry, template)) = self.driver.bootstrap.zip(self.bootstrap.as_ref()) else {
            return Ok(None);
        };
        let mut diagnostics = Vec::new();
        let alias = self
            .driver
            .package_alias
            .as_ref()
            .map(|alias| PackageAliasRule {
                alias: alias.clone(),
            });
        let rules: Vec<&dyn Rule> = alias.iter().map(|r| r as &dyn Rule).collect();
        let module = self.rewrite(
            template,
            &rules,
            &[],
            None,
            entry.file_name,
            &mut diagnostics,
        )?;
        let artifact =
            GeneratedArtifact::new(entry.file_name, print_module(&module), ArtifactKind::Model);
        Ok(Some((artifact, diagnostics)))
    }

    /// Fold, then rename. Missing anchors and undeclared placeholders are
    /// recorded and the affected text stays as in the template; a rename
    /// that would collide with a name already in scope fails the artifact.
    fn rewrite(
        &self,
        template: &Module,
        rules: &[&dyn Rule],
        renames: &[(&str, String)],
        table: Option<&str>,
        artifact: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Module, ExportError> {
        let outcome = fold_module(template, rules);
        for anchor in outcome.unmatched(rules) {
            diagnostics.push(Diagnostic::AnchorNotFound {
                table: table.map(str::to_string),
                artifact: artifact.to_string(),
                anchor: anchor.to_string(),
            });
        }

        let mut module = outcome.module;
        for (from, to) in renames {
            if *from == to.as_str() {
                continue;
            }
            match rename(&module, from, to) {
                Ok(renamed) => module = renamed,
                Err(RenameError::Undeclared(_)) => {
                    diagnostics.push(Diagnostic::AnchorNotFound {
                        table: table.map(str::to_string),
                        artifact: artifact.to_string(),
                        anchor: from.to_string(),
                    });
                }
                Err(source @ RenameError::Collision { .. }) => {
                    return Err(ExportError::NameCollision {
                        table: table.unwrap_or(artifact).to_string(),
                        artifact: artifact.to_string(),
                        source,
                    });
                }
            }
        }
        Ok(module)
    }
}

/// `// @ts-nocheck` as the first leading comment of the module.
fn annotate_ts_no_check(module: &mut Module) {
    if let Some(first) = module.items.first_mut() {
        first.comments.insert(0, Comment::line(" @ts-nocheck"));
    }
}

/// Artifact slots already taken in one run.
#[derive(Debug, Default)]
struct ClaimedPaths(HashSet<(ArtifactKind, PathBuf)>);

impl ClaimedPaths {
    fn claim(&mut self, artifact: &GeneratedArtifact) {
        self.0
            .insert((artifact.artifact_kind, artifact.relative_path.clone()));
    }

    /// Claim every artifact of `output`, or none when one is already taken.
    fn claim_table(&mut self, table: &str, output: TableOutput) -> Result<TableOutput, ExportError> {
        if let Some(taken) = output.artifacts().find(|artifact| {
            self.0
                .contains(&(artifact.artifact_kind, artifact.relative_path.clone()))
        }) {
            return Err(ExportError::DuplicatePath {
                table: table.to_string(),
                path: taken.relative_path.display().to_string(),
            });
        }
        for artifact in output.artifacts() {
            self.claim(artifact);
        }
        Ok(output)
    }
}

/// Render every definition. Template parse errors abort the run; a table
/// that fails, or whose files another table or the bootstrap already
/// produce, is recorded and the others proceed.
pub fn generate(
    definitions: &[ModelDefinition],
    options: &GenerateOptions,
) -> Result<GenerationReport, ExportError> {
    let synthesizer = Synthesizer::new(options)?;
    let mut report = GenerationReport::default();
    let mut definition_artifacts = Vec::new();

    let bootstrap = synthesizer.bootstrap()?;
    let mut claimed = ClaimedPaths::default();
    if let Some((artifact, _)) = &bootstrap {
        claimed.claim(artifact);
    }

    for definition in definitions {
        let table = definition.table_name.as_str();
        let result = synthesizer
            .synthesize(definition)
            .and_then(|output| claimed.claim_table(table, output));
        match result {
            Ok(output) => {
                report.artifacts.push(output.model);
                definition_artifacts.extend(output.definition);
                report.diagnostics.extend(output.diagnostics);
            }
            Err(err) => {
                warn!(table, error = %err, "table skipped");
                report.failures.push(TableFailure {
                    table: table.to_string(),
                    error: err.to_string(),
                });
            }
        }
    }
    report.artifacts.extend(definition_artifacts);

    if let Some((artifact, diagnostics)) = bootstrap {
        report.artifacts.push(artifact);
        report.diagnostics.extend(diagnostics);
    }

    for diagnostic in &report.diagnostics {
        warn!("{}", diagnostic);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use automate_config::{MidwayOptions, NameCase, NamingOptions, OutputDialect, TypeScriptOptions};
    use automate_core::{ColumnDescriptor, IndexField, RawIndex, TableSchema};
    use automate_definition::assemble;
    use insta::assert_snapshot;
    use rstest::rstest;

    fn index(name: &str, primary: bool, unique: bool, fields: &[&str]) -> RawIndex {
        RawIndex {
            name: name.to_string(),
            primary,
            unique,
            method: None,
            fields: fields.iter().map(|f| IndexField::from(*f)).collect(),
        }
    }

    fn user() -> TableSchema {
        TableSchema::default()
            .column(
                "id",
                ColumnDescriptor::new("INT(11) UNSIGNED")
                    .not_null()
                    .with_auto_increment(true),
            )
            .column(
                "name",
                ColumnDescriptor::new("VARCHAR(100)")
                    .not_null()
                    .with_comment("user name"),
            )
            .index(index("PRIMARY", true, true, &["id"]))
            .index(index("uk_name", false, true, &["name"]))
    }

    fn user_post() -> TableSchema {
        TableSchema::default()
            .column("id", ColumnDescriptor::new("INT(11)").not_null())
            .column("title", ColumnDescriptor::new("VARCHAR(255)").not_null())
            .column("created_at", ColumnDescriptor::new("DATETIME"))
            .index(index("PRIMARY", true, true, &["id"]))
    }

    fn options(output: OutputDialect, camel: bool) -> GenerateOptions {
        GenerateOptions::new(output).with_naming(NamingOptions {
            field_case: NameCase::from_camel_flag(camel),
            file_case: NameCase::Preserve,
            omit_model_suffix: false,
        })
    }

    fn render(tables: &[(&str, TableSchema)], options: &GenerateOptions) -> GenerationReport {
        let definitions: Vec<ModelDefinition> = tables
            .iter()
            .map(|(name, table)| assemble(name, table, options).unwrap())
            .collect();
        generate(&definitions, options).unwrap()
    }

    fn text<'a>(report: &'a GenerationReport, path: &str) -> &'a str {
        &report
            .artifact(path)
            .unwrap_or_else(|| panic!("missing artifact {}", path))
            .source_text
    }

    #[test]
    fn javascript_model_for_user() {
        let report = render(&[("user", user())], &options(OutputDialect::JavaScript, false));
        assert!(report.is_clean(), "{:?}", report);
        assert_eq!(report.artifacts.len(), 1);
        assert_snapshot!(text(&report, "user.js"));
    }

    #[test]
    fn egg_model_for_user_post() {
        let report = render(&[("user_post", user_post())], &options(OutputDialect::Egg, true));
        assert!(report.is_clean(), "{:?}", report);
        assert_snapshot!(text(&report, "user_post.js"));
    }

    #[test]
    fn egg_model_renames_placeholder() {
        let report = render(&[("user_post", user_post())], &options(OutputDialect::Egg, true));
        let out = text(&report, "user_post.js");
        assert!(out.starts_with("module.exports = app => {\n  const DataTypes = app.Sequelize;\n"));
        assert!(out.contains("const UserPostModel = sequelize.define(\"userPostModel\", attributes, options);"));
        assert!(out.contains("return UserPostModel;"));
        assert!(out.contains("createdAt: {"));
        assert!(!out.contains("UserModel"));
    }

    #[test]
    fn attribute_key_equal_to_placeholder_is_kept() {
        let table = TableSchema::default().column("UserModel", ColumnDescriptor::new("int"));
        let report = render(&[("post", table)], &options(OutputDialect::JavaScript, false));
        let out = text(&report, "post.js");
        assert!(out.contains("    UserModel: {\n"));
        assert!(out.contains("field: \"UserModel\""));
        assert!(out.contains("const PostModel = sequelize.define(\"post_model\""));
        assert!(out.contains("return PostModel;"));
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn typescript_ts_nocheck_annotation(#[case] ts_no_check: bool) {
        let output = OutputDialect::TypeScript(TypeScriptOptions { ts_no_check });
        let report = render(&[("user", user())], &options(output, false));
        let out = text(&report, "user.ts");
        assert_eq!(out.starts_with("// @ts-nocheck\n"), ts_no_check);
        assert!(out.contains("import { Sequelize, DataTypes } from \"sequelize\";\n\nexport default function (sequelize: Sequelize) {\n"));
        // definition files are never annotated
        assert!(!text(&report, "user.d.ts").contains("@ts-nocheck"));
    }

    #[test]
    fn typescript_definition_artifact() {
        let output = OutputDialect::TypeScript(TypeScriptOptions::default());
        let report = render(&[("user_post", user_post())], &options(output, true));
        assert_eq!(
            report.artifacts.iter().map(|a| a.relative_path.to_string_lossy().into_owned()).collect::<Vec<_>>(),
            vec!["user_post.ts", "user_post.d.ts"]
        );
        let definition = report.artifact("user_post.d.ts").unwrap();
        assert_eq!(definition.artifact_kind, ArtifactKind::Definition);
        assert_snapshot!(definition.source_text);
    }

    #[test]
    fn unique_not_null_string_is_required_in_definition() {
        let output = OutputDialect::TypeScript(TypeScriptOptions::default());
        let report = render(&[("user", user())], &options(output, false));
        let model = text(&report, "user.ts");
        assert!(model.contains(
            "    name: {\n      type: DataTypes.STRING(100),\n      allowNull: false,\n"
        ));
        assert!(model.contains("      unique: \"uk_name\"\n"));
        assert!(model.contains("indexes: []"));
        assert!(text(&report, "user.d.ts").contains("  id: number;\n  name: string;\n}"));
    }

    #[test]
    fn midway_emits_models_definitions_and_db() {
        let output = OutputDialect::Midway(MidwayOptions {
            ts_no_check: false,
            package_alias: Some("@ali/midway".into()),
        });
        let report = render(
            &[("user", user()), ("user_post", user_post())],
            &options(output, false),
        );
        assert!(report.is_clean(), "{:?}", report.diagnostics);
        let paths: Vec<String> = report
            .artifacts
            .iter()
            .map(|a| a.relative_path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            paths,
            vec!["user.ts", "user_post.ts", "user.d.ts", "user_post.d.ts", "db.ts"]
        );

        assert_snapshot!("midway_user_post_model", text(&report, "user_post.ts"));
        assert_snapshot!("midway_db_bootstrap", text(&report, "db.ts"));
    }

    #[test]
    fn midway_without_alias_keeps_package() {
        let output = OutputDialect::Midway(MidwayOptions::default());
        let report = render(&[("user", user())], &options(output, false));
        assert!(text(&report, "user.ts").contains("from \"midway\";"));
        assert!(report.is_clean());
    }

    #[test]
    fn failing_table_does_not_block_siblings() {
        let options = options(OutputDialect::JavaScript, false);
        let good = assemble("user", &user(), &options).unwrap();
        let mut bad = good.clone();
        bad.table_name = "1st".into();
        bad.model_name = "1st_model".into();
        bad.model_file_name = "1st".into();

        let report = generate(&[bad, good], &options).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].table, "1st");
        assert_eq!(report.artifacts.len(), 1);
        assert!(report.artifact("user.js").is_some());
    }

    #[test]
    fn unknown_column_type_is_reported_not_fatal() {
        let table = TableSchema::default().column("payload", ColumnDescriptor::new("blob"));
        let report = render(&[("doc", table)], &options(OutputDialect::JavaScript, false));
        assert!(report.failures.is_empty());
        assert!(text(&report, "doc.js").contains("type: blob,"));
        assert!(matches!(
            &report.diagnostics[..],
            [Diagnostic::UnrecognizedColumnType { table, attribute, .. }] if table == "doc" && attribute == "payload"
        ));
    }

    #[test]
    fn generation_is_deterministic() {
        let output = OutputDialect::Midway(MidwayOptions::default());
        let options = options(output, true);
        let first = render(&[("user", user()), ("user_post", user_post())], &options);
        let second = render(&[("user", user()), ("user_post", user_post())], &options);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_anchor_is_a_diagnostic() {
        let synthesizer = Synthesizer::new(&options(OutputDialect::JavaScript, false)).unwrap();
        let template = parse_module("const other = {};").unwrap();
        let rules: [&dyn Rule; 1] = [&DefineRule {
            model_name: "x".into(),
        }];
        let mut diagnostics = Vec::new();
        let module = synthesizer.rewrite(
            &template,
            &rules,
            &[(MODEL_PLACEHOLDER, "XModel".to_string())],
            Some("x"),
            "x.js",
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(module, template);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| matches!(d, Diagnostic::AnchorNotFound { .. })));
    }

    fn naming(file_case: NameCase, omit_model_suffix: bool) -> NamingOptions {
        NamingOptions {
            field_case: NameCase::Preserve,
            file_case,
            omit_model_suffix,
        }
    }

    #[rstest]
    #[case(OutputDialect::JavaScript, "js")]
    #[case(OutputDialect::Egg, "js")]
    #[case(OutputDialect::TypeScript(TypeScriptOptions::default()), "ts")]
    #[case(OutputDialect::Midway(MidwayOptions::default()), "ts")]
    fn model_identifier_bound_by_template_fails_table(
        #[case] output: OutputDialect,
        #[case] extension: &str,
    ) {
        let options = GenerateOptions::new(output).with_naming(naming(NameCase::Preserve, true));
        let report = render(&[("data_types", user_post()), ("user", user())], &options);

        assert_eq!(report.failures.len(), 1, "{:?}", report.failures);
        assert_eq!(report.failures[0].table, "data_types");
        assert!(
            report.failures[0]
                .error
                .contains("`DataTypes` is already bound where `UserModel` would be renamed"),
            "{}",
            report.failures[0].error
        );
        assert!(report.artifact(&format!("data_types.{}", extension)).is_none());
        assert!(report.artifact("data_types.d.ts").is_none());

        let user = text(&report, &format!("user.{}", extension));
        assert!(user.contains("  const User = "));
        assert!(user.contains("  return User;\n"));
    }

    #[test]
    fn midway_table_named_db_keeps_bootstrap() {
        let output = OutputDialect::Midway(MidwayOptions::default());
        let report = render(&[("db", user()), ("user", user_post())], &options(output, false));

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].table, "db");
        assert_eq!(
            report.failures[0].error,
            "table `db`: `db.ts` is already generated in this run"
        );
        let paths: Vec<String> = report
            .artifacts
            .iter()
            .map(|a| a.relative_path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(paths, vec!["user.ts", "user.d.ts", "db.ts"]);
        assert!(text(&report, "db.ts").contains("id: \"DB\""));
        assert!(report.artifact("db.d.ts").is_none());
    }

    #[test]
    fn camel_file_names_colliding_keep_first_table() {
        let options = GenerateOptions::new(OutputDialect::TypeScript(TypeScriptOptions::default()))
            .with_naming(naming(NameCase::Camel, false));
        let report = render(&[("user_post", user_post()), ("userPost", user())], &options);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].table, "userPost");
        assert!(report.failures[0].error.contains("`userPost.ts`"));
        let paths: Vec<String> = report
            .artifacts
            .iter()
            .map(|a| a.relative_path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(paths, vec!["userPost.ts", "userPost.d.ts"]);
        assert!(text(&report, "userPost.ts").contains("tableName: \"user_post\""));
        assert!(text(&report, "userPost.d.ts").contains("  title: string;\n"));
    }
}
