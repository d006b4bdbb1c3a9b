//! Descriptor-driven validation of insert payloads.
//!
//! Payloads arrive as JSON objects. Each field declared on the
//! [`EntityDescriptor`] is type-checked, run through its rules and defaulted in
//! a single pass. Keys the descriptor does not declare are dropped, so callers
//! can never smuggle managed fields (`id`, `likes`, timestamps) into a record.

use serde_json::{Map, Value};

use crate::{
    errors::{ValidationError, ValidationIssue, ValidationResult},
    types::{EntityDescriptor, FieldDescriptor, FieldType, ValidationRule},
    validators::{is_valid_email, is_valid_url, is_valid_utc_datetime},
};

fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_matches(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::String => value.is_string(),
        FieldType::Number | FieldType::Integer => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
    }
}

fn is_integral(value: &Value) -> bool {
    match value {
        Value::Number(number) => {
            number.is_i64() || number.is_u64() || number.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
        }
        _ => false,
    }
}

/// Converts an integral float into an exact JSON integer, or `None` when it falls outside `i64`/`u64`.
fn integer_from_float(float: f64) -> Option<Value> {
    if !float.is_finite() || float.fract() != 0.0 {
        return None;
    }
    if (0.0..u64::MAX as f64).contains(&float) {
        Some(Value::from(float as u64))
    } else if (i64::MIN as f64..0.0).contains(&float) {
        Some(Value::from(float as i64))
    } else {
        None
    }
}

/// Integral floats such as `3.0` are rewritten as integers so they decode into integer record fields.
fn normalize_integer(field: &FieldDescriptor, value: Value) -> Value {
    if field.field_type != FieldType::Integer {
        return value;
    }
    let integral = match &value {
        Value::Number(number) if !number.is_i64() && !number.is_u64() => number.as_f64().and_then(integer_from_float),
        _ => None,
    };
    integral.unwrap_or(value)
}

fn validate_rule_on_value(field_name: &str, rule: &ValidationRule, value: &Value, issues: &mut Vec<ValidationIssue>) {
    match rule {
        ValidationRule::Length { min, max } => {
            if let Some(len) = value.as_str().map(|s| s.encode_utf16().count()) {
                if let Some(min_len) = min
                    && len < *min_len
                {
                    issues.push(ValidationIssue::new(
                        field_name,
                        "validation.length",
                        format!("length must be at least {}", min_len),
                    ));
                }
                if let Some(max_len) = max
                    && len > *max_len
                {
                    issues.push(ValidationIssue::new(
                        field_name,
                        "validation.length",
                        format!("length must be at most {}", max_len),
                    ));
                }
            }
        }
        ValidationRule::Range { min, max } => {
            if let Some(candidate) = value.as_f64() {
                if let Some(lower) = min
                    && candidate < *lower
                {
                    issues.push(ValidationIssue::new(
                        field_name,
                        "validation.range",
                        format!("value must be at least {}", lower),
                    ));
                }
                if let Some(upper) = max
                    && candidate > *upper
                {
                    issues.push(ValidationIssue::new(
                        field_name,
                        "validation.range",
                        format!("value must be at most {}", upper),
                    ));
                }
            }
        }
        ValidationRule::Positive => {
            if let Some(candidate) = value.as_f64()
                && candidate <= 0.0
            {
                issues.push(ValidationIssue::new(
                    field_name,
                    "validation.range",
                    "value must be greater than 0",
                ));
            }
        }
        ValidationRule::Email => {
            if let Some(candidate) = value.as_str()
                && !is_valid_email(candidate)
            {
                issues.push(ValidationIssue::new(
                    field_name,
                    "validation.email",
                    "value must be a valid email address",
                ));
            }
        }
        ValidationRule::Url => {
            if let Some(candidate) = value.as_str()
                && !is_valid_url(candidate)
            {
                issues.push(ValidationIssue::new(field_name, "validation.url", "value must be a valid URL"));
            }
        }
        ValidationRule::DateTime => {
            if let Some(candidate) = value.as_str()
                && !is_valid_utc_datetime(candidate)
            {
                issues.push(ValidationIssue::new(
                    field_name,
                    "validation.datetime",
                    "value must be an ISO 8601 UTC datetime",
                ));
            }
        }
    }
}

/// Validates a value already known to be present for `field`.
pub fn validate_field_assignment(field: &FieldDescriptor, value: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if !type_matches(field.field_type, value) {
        issues.push(ValidationIssue::new(
            field.name,
            "validation.invalid_type",
            format!("expected {}, received {}", field.field_type.as_str(), describe_value(value)),
        ));
        return issues;
    }
    if field.field_type == FieldType::Integer && !is_integral(value) {
        issues.push(ValidationIssue::new(field.name, "validation.integer", "value must be an integer"));
        return issues;
    }
    if field.field_type == FieldType::Integer
        && let Value::Number(number) = value
        && !number.is_i64()
        && !number.is_u64()
        && number.as_f64().and_then(integer_from_float).is_none()
    {
        issues.push(ValidationIssue::new(
            field.name,
            "validation.range",
            "value is outside the integer range",
        ));
        return issues;
    }
    for rule in &field.validations {
        validate_rule_on_value(field.name, rule, value, &mut issues);
    }
    issues
}

/// Validates `payload` against `descriptor` and returns the normalized object
/// with defaults filled in and undeclared keys removed.
pub fn validate_payload(descriptor: &EntityDescriptor, payload: Value) -> ValidationResult<Map<String, Value>> {
    let Value::Object(mut object) = payload else {
        return Err(ValidationError::single(
            "__entity",
            "validation.invalid_type",
            format!("expected object for {} payload", descriptor.entity),
        ));
    };

    let mut issues = Vec::new();
    let mut normalized = Map::new();
    for field in &descriptor.fields {
        match object.remove(field.name) {
            Some(value) => {
                let field_issues = validate_field_assignment(field, &value);
                if field_issues.is_empty() {
                    normalized.insert(field.name.to_string(), normalize_integer(field, value));
                } else {
                    issues.extend(field_issues);
                }
            }
            None => {
                if let Some(default) = &field.default {
                    normalized.insert(field.name.to_string(), default.clone());
                } else if !field.optional {
                    issues.push(ValidationIssue::new(field.name, "validation.required", "field is required"));
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(normalized)
    } else {
        Err(ValidationError::new(issues))
    }
}
