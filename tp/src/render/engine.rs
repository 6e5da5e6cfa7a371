//! Handlebars-backed template renderer

use std::path::{Path, PathBuf};

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, JsonTruthy, Output, RenderContext, RenderError,
    RenderErrorReason, Renderable, ScopedJson, StringOutput, Template, no_escape,
};
use tracing::{debug, info};

use super::helpers::{HelperFn, HelperRegistry};
use crate::error::{TexplateError, one_line};
use crate::input::Namespace;

/// What happens when a template references a key the namespace lacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyPolicy {
    /// Fail the render with an undefined-variable error
    #[default]
    Error,
    /// Render the reference as an empty value
    Blank,
}

/// A compiled template, immutable once parsed
#[derive(Debug, Clone)]
pub struct TemplateProgram {
    path: PathBuf,
    template: Template,
}

impl TemplateProgram {
    /// Path the template was read from, used in diagnostics
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Parses templates and executes them against a namespace
pub struct Renderer {
    hbs: Handlebars<'static>,
    policy: MissingKeyPolicy,
}

impl Renderer {
    /// Build a renderer from an explicit helper set and missing-key policy
    pub fn new(helpers: &HelperRegistry, policy: MissingKeyPolicy) -> Self {
        debug!(helpers = helpers.len(), ?policy, "Renderer::new: called");
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(policy == MissingKeyPolicy::Error);
        hbs.register_escape_fn(no_escape);
        if policy == MissingKeyPolicy::Error {
            // built-in conditionals treat a missing key as false even in strict mode
            hbs.register_helper("if", Box::new(StrictConditional { positive: true }));
            hbs.register_helper("unless", Box::new(StrictConditional { positive: false }));
        }
        for (name, func) in helpers.iter() {
            hbs.register_helper(name, Box::new(FnHelper { name, func, policy }));
        }
        Self { hbs, policy }
    }

    /// Renderer with the standard helpers that fails on missing keys
    pub fn strict() -> Self {
        Self::new(&HelperRegistry::standard(), MissingKeyPolicy::Error)
    }

    pub fn policy(&self) -> MissingKeyPolicy {
        self.policy
    }

    /// Check the template text and compile it into a program
    pub fn parse(&self, path: &Path, source: &str) -> Result<TemplateProgram, TexplateError> {
        debug!(?path, len = source.len(), "Renderer::parse: called");
        let template = Template::compile(source).map_err(|e| TexplateError::TemplateSyntax {
            path: path.to_path_buf(),
            reason: one_line(&e.to_string()),
        })?;
        Ok(TemplateProgram {
            path: path.to_path_buf(),
            template,
        })
    }

    /// Execute a parsed program against the namespace
    pub fn execute(&self, program: &TemplateProgram, namespace: &Namespace) -> Result<String, TexplateError> {
        debug!(path = ?program.path, vars = namespace.len(), "Renderer::execute: called");
        let rendered = self
            .render_program(program, namespace)
            .map_err(|e| execution_error(&program.path, e))?;
        info!("Rendered template {} ({} bytes)", program.path.display(), rendered.len());
        Ok(rendered)
    }

    /// Parse and execute in one step
    pub fn render(&self, path: &Path, source: &str, namespace: &Namespace) -> Result<String, TexplateError> {
        let program = self.parse(path, source)?;
        self.execute(&program, namespace)
    }

    fn render_program(&self, program: &TemplateProgram, namespace: &Namespace) -> Result<String, RenderError> {
        let ctx = Context::wraps(namespace)?;
        let mut rc = RenderContext::new(None);
        let mut out = StringOutput::new();
        program.template.render(&self.hbs, &ctx, &mut rc, &mut out)?;
        Ok(out.into_string()?)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::strict()
    }
}

fn execution_error(path: &Path, err: RenderError) -> TexplateError {
    match err.reason() {
        RenderErrorReason::MissingVariable(variable) => {
            debug!(?variable, "execution_error: missing variable");
            TexplateError::UndefinedVariable {
                path: path.to_path_buf(),
                variable: variable.clone(),
            }
        }
        _ => TexplateError::TemplateExecution {
            path: path.to_path_buf(),
            reason: one_line(&err.to_string()),
        },
    }
}

/// `if`/`unless` that reject a condition naming a missing key
struct StrictConditional {
    positive: bool,
}

impl HelperDef for StrictConditional {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let name = if self.positive { "if" } else { "unless" };
        let param = h.param(0).ok_or(RenderErrorReason::ParamNotFoundForIndex(name, 0))?;
        if param.is_value_missing() {
            return Err(RenderErrorReason::MissingVariable(param.relative_path().cloned()).into());
        }

        let include_zero = h
            .hash_get("includeZero")
            .and_then(|v| v.value().as_bool())
            .unwrap_or(false);
        let branch = if param.value().is_truthy(include_zero) == self.positive {
            h.template()
        } else {
            h.inverse()
        };
        match branch {
            Some(t) => t.render(r, ctx, rc, out),
            None => Ok(()),
        }
    }
}

/// Adapts a registry function to the Handlebars helper interface
struct FnHelper {
    name: &'static str,
    func: HelperFn,
    policy: MissingKeyPolicy,
}

impl HelperDef for FnHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let mut args = Vec::with_capacity(h.params().len());
        for param in h.params() {
            if param.is_value_missing() && self.policy == MissingKeyPolicy::Error {
                return Err(RenderErrorReason::MissingVariable(param.relative_path().cloned()).into());
            }
            args.push(param.value().clone());
        }

        let value = (self.func)(&args).map_err(|e| RenderErrorReason::Other(format!("{}: {}", self.name, e)))?;
        Ok(ScopedJson::Derived(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn namespace(value: serde_json::Value) -> Namespace {
        match value {
            serde_json::Value::Object(map) => Namespace::from(map),
            other => panic!("test namespace must be a mapping, got {other}"),
        }
    }

    fn render(source: &str, vars: serde_json::Value) -> Result<String, TexplateError> {
        Renderer::strict().render(Path::new("template.yml"), source, &namespace(vars))
    }

    #[test]
    fn test_substitutes_variable() {
        let out = render("template_key: {{ input_key }}", json!({"input_key": "input_value"})).unwrap();
        assert_eq!(out, "template_key: input_value");
    }

    #[test]
    fn test_no_html_escaping() {
        let out = render("{{ value }}", json!({"value": "<a & b>"})).unwrap();
        assert_eq!(out, "<a & b>");
    }

    #[test]
    fn test_template_without_references_ignores_namespace() {
        assert_eq!(render("plain: text\n", json!({})).unwrap(), "plain: text\n");
    }

    #[test]
    fn test_missing_variable_is_error() {
        let err = render("{{ foo }}", json!({})).unwrap_err();
        match err {
            TexplateError::UndefinedVariable { path, variable } => {
                assert_eq!(path, PathBuf::from("template.yml"));
                assert_eq!(variable.as_deref(), Some("foo"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_nested_field_is_error() {
        let err = render("{{ server.port }}", json!({"server": {"host": "h"}})).unwrap_err();
        assert!(matches!(err, TexplateError::UndefinedVariable { .. }));
    }

    #[test]
    fn test_missing_helper_argument_is_error() {
        let err = render("{{ trim whitespace }}", json!({})).unwrap_err();
        assert!(matches!(err, TexplateError::UndefinedVariable { .. }));
    }

    fn assert_undefined(result: Result<String, TexplateError>, expected: Option<&str>) {
        match result {
            Err(TexplateError::UndefinedVariable { path, variable }) => {
                assert_eq!(path, PathBuf::from("template.yml"));
                assert_eq!(variable.as_deref(), expected);
            }
            other => panic!("expected undefined variable, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_in_if_is_error() {
        assert_undefined(render("{{#if missing}}x{{/if}}y", json!({})), Some("missing"));
        assert_undefined(render("{{#if enabeld}}on{{else}}off{{/if}}", json!({"enabled": true})), Some("enabeld"));
    }

    #[test]
    fn test_missing_key_in_unless_is_error() {
        assert_undefined(render("{{#unless missing}}x{{/unless}}y", json!({})), Some("missing"));
    }

    #[test]
    fn test_missing_nested_key_in_if_is_error() {
        assert_undefined(render("{{#if a.b}}x{{/if}}y", json!({"a": {}})), Some("a.b"));
    }

    #[test]
    fn test_missing_key_in_each_and_with_is_error() {
        assert_undefined(render("{{#each missing}}x{{/each}}", json!({})), Some("missing"));
        assert_undefined(render("{{#with missing}}x{{/with}}", json!({})), Some("missing"));
    }

    #[test]
    fn test_conditionals_on_present_keys() {
        let vars = json!({"on": true, "off": false, "zero": 0, "nested": {"flag": "yes"}});
        assert_eq!(render("{{#if on}}a{{else}}b{{/if}}", vars.clone()).unwrap(), "a");
        assert_eq!(render("{{#if off}}a{{else}}b{{/if}}", vars.clone()).unwrap(), "b");
        assert_eq!(render("{{#unless off}}a{{else}}b{{/unless}}", vars.clone()).unwrap(), "a");
        assert_eq!(render("{{#if zero}}a{{else}}b{{/if}}", vars.clone()).unwrap(), "b");
        assert_eq!(render("{{#if zero includeZero=true}}a{{else}}b{{/if}}", vars.clone()).unwrap(), "a");
        assert_eq!(render("{{#if nested.flag}}{{ nested.flag }}{{/if}}", vars).unwrap(), "yes");
    }

    #[test]
    fn test_blank_policy_keeps_lenient_conditionals() {
        let renderer = Renderer::new(&HelperRegistry::standard(), MissingKeyPolicy::Blank);
        let out = renderer
            .render(Path::new("t"), "{{#if missing}}x{{else}}y{{/if}}", &Namespace::new())
            .unwrap();
        assert_eq!(out, "y");
    }

    #[test]
    fn test_missing_lookup_has_no_variable_name() {
        let err = render("{{lookup this \"nope\"}}", json!({"key": "value"})).unwrap_err();
        match err {
            TexplateError::UndefinedVariable { variable, .. } => assert_eq!(variable, None),
            other => panic!("unexpected error: {other:?}"),
        }
        let msg = render("{{lookup this \"nope\"}}", json!({})).unwrap_err().to_string();
        assert!(!msg.contains("'unknown'"));
    }

    #[test]
    fn test_program_executes_against_many_namespaces() {
        let renderer = Renderer::strict();
        let program = renderer.parse(Path::new("t"), "hello {{ name }}").unwrap();
        assert_eq!(program.path(), Path::new("t"));

        let first = renderer.execute(&program, &namespace(json!({"name": "a"}))).unwrap();
        let second = renderer.execute(&program, &namespace(json!({"name": "b"}))).unwrap();
        assert_eq!((first.as_str(), second.as_str()), ("hello a", "hello b"));
    }

    #[test]
    fn test_blank_policy_renders_empty() {
        let renderer = Renderer::new(&HelperRegistry::standard(), MissingKeyPolicy::Blank);
        let out = renderer
            .render(Path::new("t"), "[{{ foo }}][{{ upper foo }}]", &Namespace::new())
            .unwrap();
        assert_eq!(out, "[][]");
    }

    #[test]
    fn test_syntax_error() {
        let err = render("{{", json!({})).unwrap_err();
        match err {
            TexplateError::TemplateSyntax { path, reason } => {
                assert_eq!(path, PathBuf::from("template.yml"));
                assert!(!reason.contains('\n'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_helpers_available() {
        let out = render("trimmed: {{ trim whitespace }}", json!({"whitespace": "   value   "})).unwrap();
        assert_eq!(out, "trimmed: value");
    }

    #[test]
    fn test_cidrhost_with_negative_literal() {
        let out = render(
            "{{ cidrhost cidr1 0 }} {{ cidrhost cidr3 -1 }}",
            json!({"cidr1": "10.0.0.0/24", "cidr3": "10.2.2.128/25"}),
        )
        .unwrap();
        assert_eq!(out, "10.0.0.0 10.2.2.255");
    }

    #[test]
    fn test_has_key_in_loop() {
        let source = "{{#each array}}[{{ key }}{{#if (hasKey this \"other_key\")}}+{{/if}}]{{/each}}";
        let out = render(source, json!({"array": [{"key": "a"}, {"key": "b", "other_key": 1}]})).unwrap();
        assert_eq!(out, "[a][b+]");
    }

    #[test]
    fn test_helper_failure_is_execution_error() {
        let err = render("{{ cidrhost net 1 }}", json!({"net": "garbage"})).unwrap_err();
        match err {
            TexplateError::TemplateExecution { reason, .. } => assert!(reason.contains("cidrhost")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_registry_has_no_helpers() {
        let renderer = Renderer::new(&HelperRegistry::new(), MissingKeyPolicy::Error);
        let err = renderer
            .render(Path::new("t"), "{{ trim \" x \" }}", &Namespace::new())
            .unwrap_err();
        assert!(matches!(err, TexplateError::TemplateExecution { .. }));
    }

    #[test]
    fn test_default_helper() {
        let out = render("{{ default \"fallback\" name }}", json!({"name": ""})).unwrap();
        assert_eq!(out, "fallback");
    }

    proptest! {
        #[test]
        fn prop_text_without_expressions_is_unchanged(text in "[a-zA-Z0-9 :,.\n-]{0,64}") {
            let out = Renderer::strict().render(Path::new("t"), &text, &Namespace::new()).unwrap();
            prop_assert_eq!(out, text);
        }
    }
}
