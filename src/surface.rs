//! Public API extraction: collect, describe, filter, serialize.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;
use crate::classfile::ClassFile;
use crate::classpath::{ClassPath, ClassSource};
use crate::collector::{ChainLink, MethodCollector, OBJECT};
use crate::describer::{MethodDescription, describe};

/// Substring that marks compiler-generated lambda bodies such as `lambda$run$0`.
pub const DEFAULT_SYNTHETIC_MARKER: &str = "lambda";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectOptions {
    /// Binary name of the type every class inherits from.
    pub root_class: String,
    /// Methods whose name contains this are left out.
    pub synthetic_marker: String,
}

impl Default for InspectOptions {
    fn default() -> Self {
        InspectOptions {
            root_class: OBJECT.to_string(),
            synthetic_marker: DEFAULT_SYNTHETIC_MARKER.to_string(),
        }
    }
}

/// The type's binary name mapped to its public method descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicApi(IndexMap<String, IndexSet<MethodDescription>>);

impl PublicApi {
    pub fn new(type_name: impl Into<String>, methods: IndexSet<MethodDescription>) -> Self {
        let mut map = IndexMap::with_capacity(1);
        map.insert(type_name.into(), methods);
        PublicApi(map)
    }

    pub fn methods_of(&self, type_name: &str) -> Option<&IndexSet<MethodDescription>> {
        self.0.get(type_name)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct Inspector<'s, S: ClassSource + ?Sized> {
    collector: MethodCollector<'s, S>,
    synthetic_marker: String,
}

impl<'s, S: ClassSource + ?Sized> Inspector<'s, S> {
    pub fn new(source: &'s S, options: &InspectOptions) -> Result<Self> {
        Ok(Inspector {
            collector: MethodCollector::new(source, &options.root_class)?,
            synthetic_marker: options.synthetic_marker.clone(),
        })
    }

    /// Keeps a description iff it is public and not a synthetic lambda body.
    pub fn is_exposed(&self, description: &MethodDescription) -> bool {
        description.is_public()
            && (self.synthetic_marker.is_empty()
                || !description.name.contains(&self.synthetic_marker))
    }

    pub fn public_api(&self, class: &ClassFile) -> Result<PublicApi> {
        let collected = self.collector.collect(class)?;
        let total = collected.len();

        let methods: IndexSet<MethodDescription> = collected
            .iter()
            .map(describe)
            .filter(|description| self.is_exposed(description))
            .collect();

        debug!(
            class = %class.this_class,
            collected = total,
            public = methods.len(),
            "described public api"
        );

        Ok(PublicApi::new(class.this_class.clone(), methods))
    }

    pub fn describe_public(&self, class: &ClassFile) -> Result<String> {
        self.public_api(class)?.to_json()
    }

    pub fn superclass_chain(&self, class: &ClassFile) -> Result<Vec<ChainLink>> {
        self.collector.chain(class)
    }
}

/// Loads `class_name` from `classpath` and describes it with default options.
pub fn describe_public(class_name: &str, classpath: &ClassPath) -> Result<String> {
    let class = classpath.load_class(class_name)?;
    Inspector::new(classpath, &InspectOptions::default())?.describe_public(&class)
}
