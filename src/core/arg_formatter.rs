//! # Argument Formatter
//!
//! Turns configuration values into argument-vector fragments. Each formatter is a
//! small, closed rule (`Flag`, `Single`, `Repeated`) parameterised by an ordered
//! list of templates. Templates understand exactly two placeholders: `{v}` for the
//! value and `{k}` for the key of a mapping entry. There is no general-purpose
//! format evaluator.
//!
//! ```
//! use dcsh::core::arg_formatter::ArgFormat;
//!
//! let labels = ArgFormat::repeated(&["--label", "{k}={v}"]);
//! let value: serde_yaml::Value = serde_yaml::from_str("{env: prod}").unwrap();
//! assert_eq!(labels.format(&value), vec!["--label", "env=prod"]);
//! ```

use crate::core::commons::{is_truthy, key, render_value, untagged};
use serde_yaml::{Mapping, Value};

const VALUE_PLACEHOLDER: &str = "{v}";
const KEY_PLACEHOLDER: &str = "{k}";

/// A value-shape-dependent formatting rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgFormat {
    /// Emits every template when the value is truthy, nothing otherwise.
    Flag(Vec<&'static str>),
    /// Always emits every template.
    Single(Vec<&'static str>),
    /// Emits every template once per mapping entry or sequence element.
    Repeated(Vec<&'static str>),
}

/// An ordered field-to-formatter table. Its order, not the data's, decides the
/// order of the produced arguments.
pub type ArgMap = Vec<(&'static str, ArgFormat)>;

impl ArgFormat {
    /// A `Flag` rule over `templates`.
    pub fn flag(templates: &[&'static str]) -> Self {
        Self::Flag(templates.to_vec())
    }

    /// A `Single` rule over `templates`.
    pub fn single(templates: &[&'static str]) -> Self {
        Self::Single(templates.to_vec())
    }

    /// A `Repeated` rule over `templates`.
    pub fn repeated(templates: &[&'static str]) -> Self {
        Self::Repeated(templates.to_vec())
    }

    /// Formats one configuration value into zero or more arguments.
    pub fn format(&self, value: &Value) -> Vec<String> {
        match self {
            Self::Flag(templates) => {
                if is_truthy(value) {
                    emit(templates, None, value)
                } else {
                    Vec::new()
                }
            }
            Self::Single(templates) => emit(templates, None, value),
            Self::Repeated(templates) => match untagged(value) {
                Value::Null => Vec::new(),
                Value::Mapping(map) => map
                    .iter()
                    .flat_map(|(k, v)| emit(templates, Some(k), v))
                    .collect(),
                Value::Sequence(items) => items
                    .iter()
                    .flat_map(|item| emit(templates, None, item))
                    .collect(),
                scalar => emit(templates, None, scalar),
            },
        }
    }
}

/// Substitutes `{k}` and `{v}` in a single template.
///
/// `{k}` is only replaced when a key is supplied; otherwise it stays literal.
/// The template is scanned once, so placeholders inside substituted text are
/// never expanded.
pub fn substitute(template: &str, entry_key: Option<&Value>, value: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);
        if let Some(after) = tail.strip_prefix(VALUE_PLACEHOLDER) {
            out.push_str(&render_value(value));
            rest = after;
        } else if let (Some(k), Some(after)) = (entry_key, tail.strip_prefix(KEY_PLACEHOLDER)) {
            out.push_str(&render_value(k));
            rest = after;
        } else {
            out.push('{');
            rest = tail.strip_prefix('{').unwrap_or_default();
        }
    }
    out.push_str(rest);
    out
}

fn emit(templates: &[&'static str], entry_key: Option<&Value>, value: &Value) -> Vec<String> {
    templates
        .iter()
        .map(|template| substitute(template, entry_key, value))
        .collect()
}

/// Builds an argument vector from `data`, visiting fields in `arg_map` order.
///
/// Fields absent from `data` contribute nothing.
pub fn build(arg_map: &[(&'static str, ArgFormat)], data: &Mapping) -> Vec<String> {
    let mut args = Vec::new();
    for (field, formatter) in arg_map {
        if let Some(value) = data.get(key(field)) {
            args.extend(formatter.format(value));
        }
    }
    args
}
