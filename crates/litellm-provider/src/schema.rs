//! Attribute schemas for the provider block, resources and data sources.

use litellm_core::{ValidationError, ValidationResult};
use serde::Serialize;
use serde_json::Value;

use crate::state::ResourceData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Int,
    Float,
    Bool,
    /// Ordered list of strings.
    List,
    /// Unordered set of strings.
    Set,
    /// Map of string to string.
    Map,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Int => "int",
            AttributeType::Float => "float",
            AttributeType::Bool => "bool",
            AttributeType::List => "list(string)",
            AttributeType::Set => "set(string)",
            AttributeType::Map => "map(string)",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Int => value.is_i64() || value.is_u64(),
            AttributeType::Float => value.is_number(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::List | AttributeType::Set => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            AttributeType::Map => value
                .as_object()
                .is_some_and(|entries| entries.values().all(Value::is_string)),
        }
    }
}

/// Checks a present, correctly typed value.
pub type Validator = fn(&str, &Value) -> ValidationResult<()>;

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub force_new: bool,
    /// Server-managed value whose drift is never reported.
    pub suppress_diff: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_default: Option<&'static str>,
    #[serde(skip)]
    pub validator: Option<Validator>,
}

impl Attribute {
    fn new(name: &'static str, ty: AttributeType) -> Self {
        Self {
            name,
            ty,
            description: "",
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            force_new: false,
            suppress_diff: false,
            default: None,
            env_default: None,
            validator: None,
        }
    }

    pub fn required(name: &'static str, ty: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::new(name, ty)
        }
    }

    pub fn optional(name: &'static str, ty: AttributeType) -> Self {
        Self {
            optional: true,
            ..Self::new(name, ty)
        }
    }

    /// Set only by the provider, never by configuration.
    pub fn computed(name: &'static str, ty: AttributeType) -> Self {
        Self {
            computed: true,
            ..Self::new(name, ty)
        }
    }

    /// Optional in configuration, filled from the server when omitted.
    pub fn optional_computed(name: &'static str, ty: AttributeType) -> Self {
        Self {
            optional: true,
            computed: true,
            ..Self::new(name, ty)
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn suppress_diff(mut self) -> Self {
        self.suppress_diff = true;
        self
    }

    pub fn env_default(mut self, variable: &'static str) -> Self {
        self.env_default = Some(variable);
        self
    }

    pub fn validate_with(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    fn check(&self, value: Option<&Value>) -> ValidationResult<()> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            if self.required {
                return Err(ValidationError::MissingAttribute(self.name.to_string()));
            }
            return Ok(());
        };
        if !self.ty.accepts(value) {
            return Err(ValidationError::TypeMismatch {
                attribute: self.name.to_string(),
                expected: self.ty.as_str(),
            });
        }
        if self.required && value.as_str() == Some("") {
            return Err(ValidationError::MissingAttribute(self.name.to_string()));
        }
        match self.validator {
            Some(validate) => validate(self.name, value),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Every problem found in `data`; empty when valid.
    pub fn validate(&self, data: &ResourceData) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = data
            .attributes()
            .keys()
            .filter(|name| self.attribute(name).is_none())
            .map(|name| ValidationError::UnknownAttribute(name.clone()))
            .collect();

        errors.extend(
            self.attributes
                .iter()
                .filter_map(|attr| attr.check(data.attributes().get(attr.name)).err()),
        );
        errors
    }

    /// Fill unset attributes that declare a default.
    pub fn apply_defaults(&self, data: &mut ResourceData) {
        for attr in &self.attributes {
            if let Some(default) = &attr.default {
                if !data.contains(attr.name) {
                    data.set(attr.name, default.clone());
                }
            }
        }
    }

    pub fn force_new_attributes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|a| a.force_new)
            .map(|a| a.name)
    }
}

/// Schemas of everything the provider exposes, as printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: std::collections::BTreeMap<String, Schema>,
    pub data_sources: std::collections::BTreeMap<String, Schema>,
}

/// Validator accepting only the listed string values.
pub fn one_of(name: &str, value: &Value, allowed: &[&str]) -> ValidationResult<()> {
    let raw = value.as_str().unwrap_or_default();
    if allowed.contains(&raw) {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        attribute: name.to_string(),
        message: format!("expected one of {}, got `{raw}`", allowed.join(", ")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_dashes(name: &str, value: &Value) -> ValidationResult<()> {
        if value.as_str().is_some_and(|s| s.contains('-')) {
            return Err(ValidationError::InvalidValue {
                attribute: name.to_string(),
                message: "dashes are not allowed".to_string(),
            });
        }
        Ok(())
    }

    fn schema() -> Schema {
        Schema::new(vec![
            Attribute::required("name", AttributeType::String).validate_with(no_dashes),
            Attribute::optional("limit", AttributeType::Int),
            Attribute::optional("enabled", AttributeType::Bool).default_value(true),
            Attribute::optional("tags", AttributeType::Set),
            Attribute::computed("created_at", AttributeType::String).suppress_diff(),
        ])
    }

    #[test]
    fn test_valid_data() {
        let data = ResourceData::from_value(json!({
            "name": "alpha",
            "limit": 10,
            "tags": ["a"],
            "created_at": "2024-01-01"
        }))
        .unwrap();
        assert!(schema().validate(&data).is_empty());
    }

    #[test]
    fn test_collects_every_problem() {
        let data = ResourceData::from_value(json!({
            "limit": "ten",
            "tags": [1],
            "colour": "red"
        }))
        .unwrap();

        let errors = schema().validate(&data);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::UnknownAttribute("colour".to_string())));
        assert!(errors.contains(&ValidationError::MissingAttribute("name".to_string())));
        assert!(errors.contains(&ValidationError::TypeMismatch {
            attribute: "limit".to_string(),
            expected: "int",
        }));
    }

    #[test]
    fn test_validator_runs_on_present_values() {
        let data = ResourceData::new().with("name", "a-b");
        let errors = schema().validate(&data);
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidValue { attribute, .. }] if attribute == "name"
        ));
    }

    #[test]
    fn test_apply_defaults_keeps_explicit_values() {
        let schema = schema();
        let mut data = ResourceData::new().with("name", "alpha");
        schema.apply_defaults(&mut data);
        assert_eq!(data.bool("enabled"), Some(true));

        let mut data = ResourceData::new().with("enabled", false);
        schema.apply_defaults(&mut data);
        assert_eq!(data.bool("enabled"), Some(false));
    }

    #[test]
    fn test_one_of() {
        assert!(one_of("role", &json!("admin"), &["admin", "user"]).is_ok());
        assert!(one_of("role", &json!("owner"), &["admin", "user"]).is_err());
    }
}
