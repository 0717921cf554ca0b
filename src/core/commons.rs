// Helpers shared by the formatter, the merge engine and the compiler.

use serde_yaml::Value;

/// Builds a YAML mapping key from a string.
pub fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

/// Strips YAML tags (`!foo value`) so callers only ever see plain values.
pub fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

/// Truthiness of a configuration value.
///
/// `null`, `false`, `0`, the empty string and empty collections are falsy;
/// everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match untagged(value) {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(_) => true,
    }
}

/// Renders a value as a single argument string.
///
/// Scalars render verbatim, `null` renders empty and collections fall back to
/// their YAML text.
pub fn render_value(value: &Value) -> String {
    match untagged(value) {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Returns true for strings, numbers, booleans and null.
pub fn is_scalar(value: &Value) -> bool {
    !matches!(untagged(value), Value::Sequence(_) | Value::Mapping(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_truthiness_follows_value_shape() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&yaml("false")));
        assert!(!is_truthy(&yaml("0")));
        assert!(!is_truthy(&yaml("''")));
        assert!(!is_truthy(&yaml("[]")));
        assert!(!is_truthy(&yaml("{}")));

        assert!(is_truthy(&yaml("true")));
        assert!(is_truthy(&yaml("1")));
        assert!(is_truthy(&yaml("web")));
        assert!(is_truthy(&yaml("[a]")));
        assert!(is_truthy(&yaml("{a: 1}")));
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(render_value(&Value::Null), "");
        assert_eq!(render_value(&yaml("true")), "true");
        assert_eq!(render_value(&yaml("8080")), "8080");
        assert_eq!(render_value(&yaml("'80:80'")), "80:80");
    }

    #[test]
    fn test_tagged_values_are_unwrapped() {
        let value = yaml("!env HOME");
        assert_eq!(render_value(&value), "HOME");
        assert!(is_truthy(&value));
        assert!(is_scalar(&value));
    }
}
