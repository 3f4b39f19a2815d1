//! Declarative request validation.
//!
//! A [`Schema`] is plain data: one [`FieldSpec`] per accepted field, each with
//! a [`Rule`] and an optional [`Coerce`] step. [`validate`] interprets it
//! against a JSON object and reports every failing field at once.

use serde_json::{Map, Number, Value};

/// Constraint a field value must satisfy.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// A string of at least `min_len` characters.
    Text { min_len: usize },
    /// A whole number within the optional bounds.
    Integer { min: Option<i64>, max: Option<i64> },
    /// A string equal to one of `allowed`.
    OneOf { allowed: &'static [&'static str] },
    /// An array whose items are all drawn from `allowed`.
    List {
        allowed: &'static [&'static str],
        non_empty: bool,
    },
}

/// Normalization applied before the rule is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coerce {
    #[default]
    None,
    /// Digit strings (query parameters) become numbers.
    Integer,
    /// `"a, b"` becomes `["a", "b"]`; null or absent becomes `[]`.
    CsvList,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: Rule,
    pub coerce: Coerce,
}

impl FieldSpec {
    pub const fn new(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            coerce: Coerce::None,
        }
    }

    pub const fn coerce(mut self, coerce: Coerce) -> Self {
        self.coerce = coerce;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldSpec],
}

/// Whether absent fields are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every field must be present.
    Full,
    /// Only present fields are checked.
    Partial,
}

/// Coerce and check `input` against `schema`.
///
/// Returns an object holding only the schema's fields, coerced, or the list
/// of failure messages. Null counts as absent.
pub fn validate(schema: &Schema, input: Value, mode: Mode) -> Result<Value, Vec<String>> {
    let Value::Object(mut object) = input else {
        return Err(vec!["request body must be a JSON object".to_string()]);
    };

    let mut output = Map::new();
    let mut messages = Vec::new();

    for spec in schema.fields {
        let raw = object.remove(spec.name).filter(|value| !value.is_null());
        let value = match (raw, spec.coerce) {
            (None, Coerce::CsvList) if mode == Mode::Full => Some(Value::Array(Vec::new())),
            (Some(value), coerce) => Some(apply_coercion(value, coerce)),
            (None, _) => None,
        };

        match value {
            Some(value) => {
                let value = whole_integer(spec.rule, value);
                let before = messages.len();
                check(spec, &value, &mut messages);
                if messages.len() == before {
                    output.insert(spec.name.to_string(), value);
                }
            }
            None if mode == Mode::Full => messages.extend(constraint_messages(spec)),
            None => {}
        }
    }

    if messages.is_empty() {
        Ok(Value::Object(output))
    } else {
        Err(messages)
    }
}

fn apply_coercion(value: Value, coerce: Coerce) -> Value {
    match (coerce, value) {
        (Coerce::Integer, Value::String(text)) => match text.trim().parse::<i64>() {
            Ok(number) => Value::Number(Number::from(number)),
            Err(_) => Value::String(text),
        },
        (Coerce::CsvList, Value::String(text)) => Value::Array(
            text.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        ),
        (_, value) => value,
    }
}

/// `2025.0` is accepted as `2025` for integer fields.
fn whole_integer(rule: Rule, value: Value) -> Value {
    let Rule::Integer { .. } = rule else {
        return value;
    };
    match value.as_f64() {
        Some(number)
            if value.as_i64().is_none()
                && number.fract() == 0.0
                && number >= i64::MIN as f64
                && number < i64::MAX as f64 =>
        {
            Value::Number(Number::from(number as i64))
        }
        _ => value,
    }
}

fn check(spec: &FieldSpec, value: &Value, messages: &mut Vec<String>) {
    let name = spec.name;
    match spec.rule {
        Rule::Text { min_len } => match value.as_str() {
            Some(text) if text.chars().count() < min_len => messages.push(format!(
                "{name} must be longer than or equal to {min_len} characters"
            )),
            Some(_) => {}
            None => messages.push(format!("{name} must be a string")),
        },
        Rule::Integer { min, max } => match value.as_i64() {
            Some(number) => {
                if let Some(min) = min.filter(|min| number < *min) {
                    messages.push(format!("{name} must not be less than {min}"));
                }
                if let Some(max) = max.filter(|max| number > *max) {
                    messages.push(format!("{name} must not be greater than {max}"));
                }
            }
            None => messages.push(format!("{name} must be an integer number")),
        },
        Rule::OneOf { allowed } => {
            if !value.as_str().is_some_and(|text| allowed.contains(&text)) {
                messages.push(format!(
                    "{name} must be one of the following values: {}",
                    allowed.join(", ")
                ));
            }
        }
        Rule::List { allowed, non_empty } => match value.as_array() {
            Some(items) => {
                if non_empty && items.is_empty() {
                    messages.push(format!("{name} should not be empty"));
                }
                let all_allowed = items
                    .iter()
                    .all(|item| item.as_str().is_some_and(|text| allowed.contains(&text)));
                if !all_allowed {
                    messages.push(format!(
                        "each value in {name} must be one of the following values: {}",
                        allowed.join(", ")
                    ));
                }
            }
            None => messages.push(format!("{name} must be an array")),
        },
    }
}

/// Messages reported for a required field that is missing entirely.
fn constraint_messages(spec: &FieldSpec) -> Vec<String> {
    let name = spec.name;
    match spec.rule {
        Rule::Text { min_len } if min_len > 0 => vec![
            format!("{name} must be longer than or equal to {min_len} characters"),
            format!("{name} must be a string"),
        ],
        Rule::Text { .. } => vec![format!("{name} must be a string")],
        Rule::Integer { .. } => vec![format!("{name} must be an integer number")],
        Rule::OneOf { allowed } => vec![format!(
            "{name} must be one of the following values: {}",
            allowed.join(", ")
        )],
        Rule::List { .. } => vec![format!("{name} must be an array")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLORS: &[&str] = &["Red", "Green", "Blue"];

    const PALETTE: Schema = Schema {
        fields: &[
            FieldSpec::new("name", Rule::Text { min_len: 3 }),
            FieldSpec::new(
                "size",
                Rule::Integer {
                    min: Some(1),
                    max: Some(10),
                },
            )
            .coerce(Coerce::Integer),
            FieldSpec::new(
                "colors",
                Rule::List {
                    allowed: COLORS,
                    non_empty: true,
                },
            )
            .coerce(Coerce::CsvList),
            FieldSpec::new("accent", Rule::OneOf { allowed: COLORS }),
        ],
    };

    #[test]
    fn test_valid_input_passes_and_is_coerced() {
        let output = validate(
            &PALETTE,
            json!({"name": "warm", "size": "4", "colors": "Red, Blue", "accent": "Green", "extra": 1}),
            Mode::Full,
        )
        .unwrap();

        assert_eq!(
            output,
            json!({"name": "warm", "size": 4, "colors": ["Red", "Blue"], "accent": "Green"})
        );
    }

    #[test]
    fn test_all_failures_are_reported() {
        let messages = validate(
            &PALETTE,
            json!({"name": "ab", "size": 11, "colors": [], "accent": "Pink"}),
            Mode::Full,
        )
        .unwrap_err();

        assert_eq!(
            messages,
            vec![
                "name must be longer than or equal to 3 characters",
                "size must not be greater than 10",
                "colors should not be empty",
                "accent must be one of the following values: Red, Green, Blue",
            ]
        );
    }

    #[test]
    fn test_absent_list_becomes_empty_in_full_mode() {
        let messages = validate(
            &PALETTE,
            json!({"name": "warm", "size": 2, "accent": "Red"}),
            Mode::Full,
        )
        .unwrap_err();
        assert_eq!(messages, vec!["colors should not be empty"]);
    }

    #[test]
    fn test_partial_mode_checks_present_fields_only() {
        let output = validate(&PALETTE, json!({"size": "3"}), Mode::Partial).unwrap();
        assert_eq!(output, json!({"size": 3}));

        let messages = validate(&PALETTE, json!({"colors": ["Teal"]}), Mode::Partial).unwrap_err();
        assert_eq!(
            messages,
            vec!["each value in colors must be one of the following values: Red, Green, Blue"]
        );
    }

    #[test]
    fn test_wrong_types_are_reported() {
        let messages = validate(
            &PALETTE,
            json!({"name": 12, "size": "many", "colors": 3}),
            Mode::Partial,
        )
        .unwrap_err();
        assert_eq!(
            messages,
            vec![
                "name must be a string",
                "size must be an integer number",
                "colors must be an array",
            ]
        );
    }

    #[test]
    fn test_missing_required_fields() {
        let messages = validate(&PALETTE, json!({"colors": "Red"}), Mode::Full).unwrap_err();
        assert_eq!(
            messages,
            vec![
                "name must be longer than or equal to 3 characters",
                "name must be a string",
                "size must be an integer number",
                "accent must be one of the following values: Red, Green, Blue",
            ]
        );
    }

    #[test]
    fn test_integral_float_counts_as_integer() {
        let output = validate(&PALETTE, json!({"size": 4.0}), Mode::Partial).unwrap();
        assert_eq!(output, json!({"size": 4}));
        assert!(output["size"].is_i64());

        let messages = validate(&PALETTE, json!({"size": 4.5}), Mode::Partial).unwrap_err();
        assert_eq!(messages, vec!["size must be an integer number"]);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let messages = validate(&PALETTE, json!([1, 2]), Mode::Partial).unwrap_err();
        assert_eq!(messages, vec!["request body must be a JSON object"]);
    }
}
