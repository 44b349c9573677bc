//! Operation registry.
//!
//! Every operation the gateway can dispatch is described once, as static data,
//! and looked up by name. The router never special-cases an operation; anything
//! operation-specific lives in its [`OperationSpec`].

mod catalog;

use crate::error::DispatchError;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use strum::{Display, IntoStaticStr};

/// HTTP verb used by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Where the declared fields of an operation travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParamPlacement {
    Query,
    Body,
    Path,
}

/// JSON-Schema type advertised for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
}

/// One declared input of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub required: bool,
    /// Allowed values, empty when unconstrained
    pub allowed: &'static [&'static str],
}

/// Cross-field rules that cannot be expressed as a plain `required` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// `field` is required when `when` is present and equal to `equals`.
    RequiredWhen {
        field: &'static str,
        when: &'static str,
        equals: &'static str,
    },
}

/// Static description of one exchange operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    /// Path relative to the base URL, with `{field}` placeholders
    pub path_template: &'static str,
    pub placement: ParamPlacement,
    pub requires_auth: bool,
    pub fields: &'static [FieldSpec],
    /// What the operation is doing, used to frame error text. May contain `{field}` placeholders.
    pub action: &'static str,
    pub constraints: &'static [Constraint],
}

impl OperationSpec {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    /// Placeholder names in `path_template`, in order of appearance.
    pub fn path_placeholders(&self) -> Vec<&'static str> {
        placeholders(self.path_template)
    }

    /// JSON-Schema object describing the operation's arguments.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| {
                let kind: &'static str = field.kind.into();
                let mut property = json!({
                    "type": kind,
                    "description": field.description,
                });
                if !field.allowed.is_empty() {
                    property["enum"] = json!(field.allowed);
                }
                (field.name.to_string(), property)
            })
            .collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        let required: Vec<&str> = self.required_fields().collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    fn validate(&self) -> Result<(), DispatchError> {
        let malformed = |reason: String| {
            Err(DispatchError::MalformedSchema(format!("{}: {reason}", self.name)))
        };

        let mut seen = HashSet::new();
        for field in self.fields {
            if !seen.insert(field.name) {
                return malformed(format!("field '{}' declared twice", field.name));
            }
        }

        let path_fields = self.path_placeholders();
        for placeholder in &path_fields {
            if self.field(placeholder).is_none() {
                return malformed(format!("path placeholder '{placeholder}' is not a declared field"));
            }
        }
        if self.placement == ParamPlacement::Path {
            for field in self.fields {
                if !path_fields.contains(&field.name) {
                    return malformed(format!("path field '{}' missing from template", field.name));
                }
                if !field.required {
                    return malformed(format!("path field '{}' must be required", field.name));
                }
            }
        }

        for constraint in self.constraints {
            let Constraint::RequiredWhen { field, when, .. } = constraint;
            for name in [field, when] {
                if self.field(name).is_none() {
                    return malformed(format!("constraint names undeclared field '{name}'"));
                }
            }
        }
        Ok(())
    }
}

/// `{name}` placeholders of a template, in order of appearance.
pub(crate) fn placeholders(template: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else { break };
        found.push(&after[..end]);
        rest = &after[end + 1..];
    }
    found
}

/// Immutable name → spec table, built once at startup.
#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<OperationSpec>,
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    /// Build a registry, rejecting inconsistent catalogues.
    pub fn new(specs: impl IntoIterator<Item = OperationSpec>) -> Result<Self, DispatchError> {
        let specs: Vec<OperationSpec> = specs.into_iter().collect();
        let mut by_name = HashMap::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            spec.validate()?;
            if by_name.insert(spec.name, index).is_some() {
                return Err(DispatchError::MalformedSchema(format!(
                    "operation '{}' registered twice",
                    spec.name
                )));
            }
        }
        Ok(Self { specs, by_name })
    }

    /// The Revolut X catalogue.
    pub fn revolutx() -> Result<Self, DispatchError> {
        Self::new(catalog::OPERATIONS.iter().copied())
    }

    pub fn lookup(&self, name: &str) -> Result<&OperationSpec, DispatchError> {
        self.by_name
            .get(name)
            .map(|&index| &self.specs[index])
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))
    }

    /// Specs in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
