//! Directive expression evaluation.
//!
//! Expressions are evaluated once per directive for the full ordered variant
//! list; the engine itself never interprets expression syntax. The
//! production backend embeds MiniJinja; tests inject [`StaticEvaluator`],
//! an in-memory fake with canned responses.

use std::collections::HashMap;

use minijinja::{Environment, State, UndefinedBehavior};

use crate::config::VariantConfig;

/// Renders a directive expression into per-variant text.
///
/// One call serves all variants at once; returned blocks correspond to
/// `configs` by position. Implementations must be stateless across calls —
/// no directive's evaluation may depend on another's, so directives could
/// be evaluated in any order or in parallel.
pub trait Evaluator {
    /// Renders `expr` once per config. The error string is the backend's
    /// raw diagnostic; the pipeline attaches the source line number.
    fn evaluate(&self, expr: &str, configs: &[VariantConfig]) -> Result<Vec<String>, String>;
}

/// MiniJinja-backed evaluator.
///
/// Each directive expression is a MiniJinja template rendered against
/// [`VariantConfig::context`]. Undefined behavior is [`Chainable`]: a
/// missing optional attribute (or any attribute of one) renders as empty
/// text, never a hard failure — directives only fail when they are
/// syntactically broken or explicitly raise.
///
/// Because a directive is one source line, the two-character sequence `\n`
/// in an expression denotes a line break in the rendered block. The escape
/// is decoded in the template text before rendering, not in attribute
/// values interpolated into it.
///
/// [`Chainable`]: UndefinedBehavior::Chainable
///
/// # Example
///
/// ```rust
/// use monomorph::{Evaluator, JinjaEvaluator, VariantConfig};
///
/// let evaluator = JinjaEvaluator::new();
/// let configs = [
///     VariantConfig::new("long", "Long"),
///     VariantConfig::new("Object", "").object_kind(),
/// ];
/// let rendered = evaluator
///     .evaluate(r#"{{ equals("a", "b") }}"#, &configs)
///     .unwrap();
/// assert_eq!(rendered, ["a == b", "a.equals(b)"]);
/// ```
pub struct JinjaEvaluator {
    env: Environment<'static>,
}

impl JinjaEvaluator {
    /// Creates an evaluator with the standard helpers registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        register_helpers(&mut env);
        Self { env }
    }

    /// Mutable access to the underlying environment, for registering
    /// additional helper functions or filters before the first evaluation.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for JinjaEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for JinjaEvaluator {
    fn evaluate(&self, expr: &str, configs: &[VariantConfig]) -> Result<Vec<String>, String> {
        let template = expr.replace("\\n", "\n");
        configs
            .iter()
            .map(|config| {
                self.env
                    .render_str(&template, config.context())
                    .map_err(|err| format!("{} (variant `{}`)", err, config.display_name))
            })
            .collect()
    }
}

/// Registers the helper functions available to directive expressions.
///
/// Helpers are pluggable: anything registered on the environment before the
/// first evaluation is visible to every directive, so new helpers never
/// require scanner changes.
pub fn register_helpers(env: &mut Environment<'static>) {
    // Equality check: method form for object kinds, operator form for value
    // kinds. Which form applies is read from the variant's `object` flag.
    env.add_function("equals", |state: &State, a: String, b: String| -> String {
        if is_object_kind(state) {
            format!("{}.equals({})", a, b)
        } else {
            format!("{} == {}", a, b)
        }
    });

    // Narrowing cast: an explicit unsafe-cast call for object kinds, the
    // bare expression for value kinds.
    env.add_function("cast_unsafe", |state: &State, expr: String| -> String {
        if is_object_kind(state) {
            format!("castUnsafe({})", expr)
        } else {
            expr
        }
    });
}

fn is_object_kind(state: &State) -> bool {
    state
        .lookup("object")
        .map_or(false, |value| value.is_true())
}

/// In-memory evaluator for tests: maps expression text to canned
/// per-variant blocks, bypassing template syntax entirely. Unknown
/// expressions fail, which makes accidental extra evaluations visible.
#[derive(Debug, Default)]
pub struct StaticEvaluator {
    responses: HashMap<String, Vec<String>>,
}

impl StaticEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the canned per-variant blocks for one expression.
    pub fn with_response<S: Into<String>>(
        mut self,
        expr: impl Into<String>,
        blocks: impl IntoIterator<Item = S>,
    ) -> Self {
        self.responses
            .insert(expr.into(), blocks.into_iter().map(Into::into).collect());
        self
    }
}

impl Evaluator for StaticEvaluator {
    fn evaluate(&self, expr: &str, configs: &[VariantConfig]) -> Result<Vec<String>, String> {
        let blocks = self
            .responses
            .get(expr)
            .ok_or_else(|| format!("no canned response for expression {:?}", expr))?;
        if blocks.len() != configs.len() {
            return Err(format!(
                "canned response has {} block(s) for {} variant(s)",
                blocks.len(),
                configs.len()
            ));
        }
        Ok(blocks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_kind() -> VariantConfig {
        VariantConfig::new("long", "Long").with_snippet("lambda", "(v) -> (long) v")
    }

    fn object_kind() -> VariantConfig {
        VariantConfig::new("Object", "")
            .object_kind()
            .with_snippet("generic", "<V>")
    }

    #[test]
    fn test_renders_once_per_config_in_order() {
        let evaluator = JinjaEvaluator::new();
        let rendered = evaluator
            .evaluate("{{ display }}Map", &[value_kind(), object_kind()])
            .unwrap();
        assert_eq!(rendered, ["LongMap", "Map"]);
    }

    #[test]
    fn test_snippets_are_reachable_by_name() {
        let evaluator = JinjaEvaluator::new();
        let rendered = evaluator.evaluate("{{ lambda }}", &[value_kind()]).unwrap();
        assert_eq!(rendered, ["(v) -> (long) v"]);
    }

    #[test]
    fn test_missing_attribute_renders_empty() {
        let evaluator = JinjaEvaluator::new();
        let rendered = evaluator
            .evaluate("x{{ generic }}y", &[value_kind(), object_kind()])
            .unwrap();
        assert_eq!(rendered, ["xy", "x<V>y"]);
    }

    #[test]
    fn test_equals_helper_polymorphism() {
        let evaluator = JinjaEvaluator::new();
        let rendered = evaluator
            .evaluate(
                r#"{{ equals("this.values[idx]", "value") }}"#,
                &[value_kind(), object_kind()],
            )
            .unwrap();
        assert_eq!(
            rendered,
            [
                "this.values[idx] == value",
                "this.values[idx].equals(value)"
            ]
        );
    }

    #[test]
    fn test_cast_unsafe_helper_polymorphism() {
        let evaluator = JinjaEvaluator::new();
        let rendered = evaluator
            .evaluate(
                r#"{{ cast_unsafe("this.values[idx]") }}"#,
                &[value_kind(), object_kind()],
            )
            .unwrap();
        assert_eq!(
            rendered,
            ["this.values[idx]", "castUnsafe(this.values[idx])"]
        );
    }

    #[test]
    fn test_newline_escape_becomes_line_break() {
        let evaluator = JinjaEvaluator::new();
        let rendered = evaluator
            .evaluate(r"@Override\npublic {{ type }} get() {", &[value_kind()])
            .unwrap();
        assert_eq!(rendered, ["@Override\npublic long get() {"]);
    }

    #[test]
    fn test_conditional_expressions_select_per_kind() {
        let evaluator = JinjaEvaluator::new();
        let rendered = evaluator
            .evaluate(
                "{% if object %}@SuppressWarnings{% endif %}",
                &[value_kind(), object_kind()],
            )
            .unwrap();
        assert_eq!(rendered, ["", "@SuppressWarnings"]);
    }

    #[test]
    fn test_syntax_error_names_the_variant() {
        let evaluator = JinjaEvaluator::new();
        let err = evaluator
            .evaluate("{{ unclosed", &[value_kind()])
            .unwrap_err();
        assert!(err.contains("Long"), "diagnostic should name the variant: {}", err);
    }

    #[test]
    fn test_static_evaluator_round_trips_canned_blocks() {
        let evaluator = StaticEvaluator::new().with_response("expr", ["a", "b"]);
        let rendered = evaluator
            .evaluate("expr", &[value_kind(), object_kind()])
            .unwrap();
        assert_eq!(rendered, ["a", "b"]);
    }

    #[test]
    fn test_static_evaluator_rejects_unknown_and_miscounted() {
        let evaluator = StaticEvaluator::new().with_response("expr", ["a"]);
        assert!(evaluator.evaluate("other", &[value_kind()]).is_err());
        assert!(evaluator
            .evaluate("expr", &[value_kind(), object_kind()])
            .is_err());
    }
}
