use serde_json::Value;

/// Declarative shape of one insertable entity: its fields, their types, rules and defaults.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    pub entity: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    pub fn new(entity: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { entity, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub field_type: FieldType,
    pub optional: bool,
    /// Value substituted when the field is omitted. A field with a default is never required.
    pub default: Option<Value>,
    pub validations: Vec<ValidationRule>,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            optional: false,
            default: None,
            validations: Vec::new(),
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.validations.push(rule);
        self
    }

    pub fn length(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.rule(ValidationRule::Length { min, max })
    }

    pub fn range(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.rule(ValidationRule::Range { min, max })
    }

    /// Integer strictly greater than zero.
    pub fn positive(self) -> Self {
        self.rule(ValidationRule::Positive)
    }

    pub fn email(self) -> Self {
        self.rule(ValidationRule::Email)
    }

    pub fn url(self) -> Self {
        self.rule(ValidationRule::Url)
    }

    pub fn datetime(self) -> Self {
        self.rule(ValidationRule::DateTime)
    }

    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
}

impl FieldType {
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationRule {
    Length { min: Option<usize>, max: Option<usize> },
    Range { min: Option<f64>, max: Option<f64> },
    Positive,
    Email,
    Url,
    /// RFC 3339 timestamp in UTC.
    DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaulted_fields_are_not_required() {
        let field = FieldDescriptor::boolean("verified").default_value(false);
        assert!(!field.is_required());
        assert!(FieldDescriptor::string("name").is_required());
        assert!(!FieldDescriptor::string("bio").optional().is_required());
    }

    #[test]
    fn field_lookup_by_name() {
        let descriptor = EntityDescriptor::new(
            "sample",
            vec![FieldDescriptor::string("name").length(Some(1), Some(100))],
        );
        let field = descriptor.field("name").expect("field should exist");
        assert_eq!(
            field.validations,
            vec![ValidationRule::Length {
                min: Some(1),
                max: Some(100)
            }]
        );
        assert!(descriptor.field("missing").is_none());
    }
}
