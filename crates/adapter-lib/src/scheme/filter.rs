//! Filter expression primitives
//!
//! The backend grammar is flat: clauses are joined with a literal `AND` and
//! a disjunction over literals is only expressible as `one_of(...)`, which
//! cannot be nested and accepts at most [`ONE_OF_MAX`] arguments.

use crate::error::{Result, TranslateError};

/// Maximum number of arguments accepted by `one_of()`
pub const ONE_OF_MAX: usize = 100;

/// Quote a literal, escaping backslashes and double quotes
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

pub fn join_filters<S: AsRef<str>>(clauses: &[S]) -> String {
    clauses
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" AND ")
}

pub fn equals(label: &str, value: &str) -> String {
    format!("{} = {}", label, quote(value))
}

pub fn not_equals(label: &str, value: &str) -> String {
    format!("{} != {}", label, quote(value))
}

pub fn starts_with(label: &str, prefix: &str) -> String {
    format!("{} = starts_with({})", label, quote(prefix))
}

pub fn one_of<S: AsRef<str>>(label: &str, values: &[S]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote(v.as_ref())).collect();
    format!("{} = one_of({})", label, quoted.join(","))
}

/// Match `label` against any of `values`
///
/// A single value renders as plain equality. An empty list would produce a
/// vacuous clause, so it is refused as a broken precondition.
pub fn label_in<S: AsRef<str>>(label: &str, values: &[S]) -> Result<String> {
    match values.len() {
        0 => Err(TranslateError::InvariantViolation(format!(
            "filter for {} built from an empty value list",
            label
        ))),
        1 => Ok(equals(label, values[0].as_ref())),
        n if n > ONE_OF_MAX => Err(TranslateError::InvariantViolation(format!(
            "filter for {} built from {} values, one_of accepts at most {}",
            label, n, ONE_OF_MAX
        ))),
        _ => Ok(one_of(label, values)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("pod-a"), "\"pod-a\"");
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_clause_rendering() {
        assert_eq!(equals("metric.type", "x"), "metric.type = \"x\"");
        assert_eq!(not_equals("resource.label.pod_id", ""), "resource.label.pod_id != \"\"");
        assert_eq!(
            starts_with("metric.type", "custom.googleapis.com/"),
            "metric.type = starts_with(\"custom.googleapis.com/\")"
        );
        assert_eq!(
            one_of("resource.type", &["k8s_pod", "k8s_node"]),
            "resource.type = one_of(\"k8s_pod\",\"k8s_node\")"
        );
    }

    #[test]
    fn test_join_filters() {
        assert_eq!(join_filters(&["a = \"1\"", "b = \"2\""]), "a = \"1\" AND b = \"2\"");
    }

    #[test]
    fn test_label_in_single_value_uses_equality() {
        assert_eq!(
            label_in("resource.label.node_name", &["n1"]).unwrap(),
            "resource.label.node_name = \"n1\""
        );
    }

    #[test]
    fn test_label_in_multiple_values_uses_one_of() {
        assert_eq!(
            label_in("resource.label.node_name", &["n1", "n2"]).unwrap(),
            "resource.label.node_name = one_of(\"n1\",\"n2\")"
        );
    }

    #[test]
    fn test_label_in_refuses_empty_and_oversized_lists() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            label_in("resource.label.pod_name", &empty),
            Err(TranslateError::InvariantViolation(_))
        ));

        let names: Vec<String> = (0..=ONE_OF_MAX).map(|i| format!("p{}", i)).collect();
        assert!(matches!(
            label_in("resource.label.pod_name", &names),
            Err(TranslateError::InvariantViolation(_))
        ));
    }
}
