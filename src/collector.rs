//! Gathers every method a class declares or inherits through its superclass chain.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::classfile::{ClassFile, MethodInfo};
use crate::classpath::ClassSource;
use crate::error::malformed_error;
use crate::{Error, Result};

pub const OBJECT: &str = "java.lang.Object";

/// Public methods of `java.lang.Object`, used when the root class itself is not on
/// the class path.
const OBJECT_PUBLIC_METHODS: [(&str, &str); 9] = [
    ("getClass", "()"),
    ("hashCode", "()"),
    ("equals", "(Ljava/lang/Object;)"),
    ("toString", "()"),
    ("notify", "()"),
    ("notifyAll", "()"),
    ("wait", "()"),
    ("wait", "(J)"),
    ("wait", "(JI)"),
];

/// Method name plus parameter descriptor. Return type and modifiers are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub name: String,
    pub parameters: String,
}

impl Signature {
    pub fn of(method: &MethodInfo) -> Self {
        Signature {
            name: method.name.clone(),
            parameters: method.descriptor.parameter_descriptor(),
        }
    }
}

/// A method together with the class that declares it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredMethod {
    pub declaring_class: String,
    pub method: MethodInfo,
}

impl DeclaredMethod {
    pub fn signature(&self) -> Signature {
        Signature::of(&self.method)
    }
}

/// One step of a superclass chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    pub class_name: String,
    /// `false` for a root class that is not on the class path.
    pub resolved: bool,
    pub declared_methods: usize,
    pub public_methods: usize,
}

pub struct MethodCollector<'s, S: ClassSource + ?Sized> {
    source: &'s S,
    root_class: String,
    root: Option<ClassFile>,
    exclusions: HashSet<Signature>,
}

impl<'s, S: ClassSource + ?Sized> MethodCollector<'s, S> {
    /// Resolves the root class once and fixes the exclusion set for the collector's
    /// lifetime.
    ///
    /// The exclusion set holds the signatures of the root's public methods. When
    /// the root is `java.lang.Object` and it is not on the class path, a built-in
    /// table is used instead. Any other root must be resolvable.
    pub fn new(source: &'s S, root_class: &str) -> Result<Self> {
        let root = source.find_class(root_class)?;

        let exclusions: HashSet<Signature> = match &root {
            Some(root) => root
                .declared_methods()
                .filter(|method| method.is_public())
                .map(Signature::of)
                .collect(),
            None if root_class == OBJECT => OBJECT_PUBLIC_METHODS
                .iter()
                .map(|(name, parameters)| Signature {
                    name: name.to_string(),
                    parameters: parameters.to_string(),
                })
                .collect(),
            None => return Err(Error::ClassNotFound(root_class.to_string())),
        };

        debug!(
            root = root_class,
            on_class_path = root.is_some(),
            exclusions = exclusions.len(),
            "computed root exclusion set"
        );

        Ok(MethodCollector {
            source,
            root_class: root_class.to_string(),
            root,
            exclusions,
        })
    }

    pub fn is_excluded(&self, method: &DeclaredMethod) -> bool {
        self.exclusions.contains(&method.signature())
    }

    /// All methods declared on `class` and its superclasses, superclass methods first,
    /// minus those matching a root method signature.
    pub fn collect(&self, class: &ClassFile) -> Result<Vec<DeclaredMethod>> {
        let mut visiting = HashSet::new();
        let mut methods = IndexMap::new();
        self.collect_into(class, &mut visiting, &mut methods)?;
        Ok(methods.into_values().collect())
    }

    fn collect_into(
        &self,
        class: &ClassFile,
        visiting: &mut HashSet<String>,
        methods: &mut IndexMap<(String, String, String), DeclaredMethod>,
    ) -> Result<()> {
        if !visiting.insert(class.this_class.clone()) {
            return Err(malformed_error!(
                "superclass cycle through {}",
                class.this_class
            ));
        }

        if let Some(superclass) = self.superclass(class)? {
            trace!(class = %class.this_class, superclass = %superclass.this_class, "descending");
            self.collect_into(&superclass, visiting, methods)?;
        }

        for method in class.declared_methods() {
            let key = (
                class.this_class.clone(),
                method.name.clone(),
                method.descriptor.to_string(),
            );
            methods.entry(key).or_insert_with(|| DeclaredMethod {
                declaring_class: class.this_class.clone(),
                method: method.clone(),
            });
        }

        methods.retain(|_, method| {
            let excluded = self.is_excluded(method);
            if excluded {
                trace!(
                    class = %method.declaring_class,
                    method = %method.method.name,
                    "excluded by root signature"
                );
            }
            !excluded
        });

        Ok(())
    }

    /// The next class up the chain, or `None` at the top.
    ///
    /// Interfaces have no superclass. The root class ends every chain, whether or
    /// not it is on the class path and whatever it extends itself; any other
    /// missing superclass is an error.
    fn superclass(&self, class: &ClassFile) -> Result<Option<ClassFile>> {
        if class.is_interface() || class.this_class == self.root_class {
            return Ok(None);
        }
        let Some(name) = class.super_class.as_deref() else {
            return Ok(None);
        };

        if name == self.root_class {
            return Ok(self.root.clone());
        }
        self.source.load_class(name).map(Some)
    }

    /// The superclass chain from `class` up to the root, with method counts per class.
    pub fn chain(&self, class: &ClassFile) -> Result<Vec<ChainLink>> {
        let mut links = vec![link_for(class)];
        let mut seen = HashSet::from([class.this_class.clone()]);
        let mut current = class.clone();

        while let Some(superclass) = self.superclass(&current)? {
            if !seen.insert(superclass.this_class.clone()) {
                return Err(malformed_error!(
                    "superclass cycle through {}",
                    superclass.this_class
                ));
            }
            links.push(link_for(&superclass));
            current = superclass;
        }

        if !current.is_interface() && current.this_class != self.root_class {
            if let Some(name) = current.super_class.as_deref() {
                links.push(ChainLink {
                    class_name: name.to_string(),
                    resolved: false,
                    declared_methods: 0,
                    public_methods: 0,
                });
            }
        }

        Ok(links)
    }
}

fn link_for(class: &ClassFile) -> ChainLink {
    ChainLink {
        class_name: class.this_class.clone(),
        resolved: true,
        declared_methods: class.declared_methods().count(),
        public_methods: class.declared_methods().filter(|m| m.is_public()).count(),
    }
}
