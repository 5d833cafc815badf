use serde::{Deserialize, Serialize};

use crate::classfile::FieldType;
use crate::collector::DeclaredMethod;

/// Summary of a single method. Two descriptions are the same entry when every field
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MethodDescription {
    pub name: String,
    pub return_type: String,
    pub arg_types: Vec<String>,
    pub annotations: Vec<String>,
    pub modifiers: String,
}

impl MethodDescription {
    /// Whether `modifiers` carries the `public` keyword as a whole token.
    pub fn is_public(&self) -> bool {
        self.modifiers.split_whitespace().any(|m| m == "public")
    }
}

pub fn describe(method: &DeclaredMethod) -> MethodDescription {
    let info = &method.method;
    MethodDescription {
        name: info.name.clone(),
        return_type: info.descriptor.return_type.runtime_name(),
        arg_types: info
            .descriptor
            .parameters
            .iter()
            .map(FieldType::runtime_name)
            .collect(),
        annotations: info.annotations.iter().map(ToString::to_string).collect(),
        modifiers: info.access_flags.modifier_string(),
    }
}
