use bitflags::bitflags;

bitflags! {
    /// Class access and property flags (JVMS table 4.1-B)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClassAccess: u16 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Declared final
        const FINAL = 0x0010;
        /// Treat superclass methods specially for invokespecial
        const SUPER = 0x0020;
        /// Is an interface
        const INTERFACE = 0x0200;
        /// Declared abstract
        const ABSTRACT = 0x0400;
        /// Not present in source
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface
        const ANNOTATION = 0x2000;
        /// Declared as an enum class
        const ENUM = 0x4000;
        /// Is a module, not a class or interface
        const MODULE = 0x8000;
    }
}

bitflags! {
    /// Method access and property flags (JVMS table 4.6-A)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodAccess: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        /// Compiler-generated bridge method
        const BRIDGE = 0x0040;
        /// Declared with variable arity
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        /// Not present in source
        const SYNTHETIC = 0x1000;
    }
}

/// Keyword order used by the runtime when printing modifiers.
const METHOD_KEYWORDS: [(MethodAccess, &str); 9] = [
    (MethodAccess::PUBLIC, "public"),
    (MethodAccess::PROTECTED, "protected"),
    (MethodAccess::PRIVATE, "private"),
    (MethodAccess::ABSTRACT, "abstract"),
    (MethodAccess::STATIC, "static"),
    (MethodAccess::FINAL, "final"),
    (MethodAccess::SYNCHRONIZED, "synchronized"),
    (MethodAccess::NATIVE, "native"),
    (MethodAccess::STRICT, "strictfp"),
];

impl MethodAccess {
    /// Space-separated modifier keywords, e.g. `"public static final"`.
    ///
    /// Bridge, varargs and synthetic bits have no keyword and are left out.
    pub fn modifier_string(self) -> String {
        METHOD_KEYWORDS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, keyword)| *keyword)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_keywords_in_canonical_order() {
        let flags = MethodAccess::FINAL | MethodAccess::STATIC | MethodAccess::PUBLIC;
        assert_eq!(flags.modifier_string(), "public static final");

        let flags = MethodAccess::NATIVE | MethodAccess::PROTECTED | MethodAccess::SYNCHRONIZED;
        assert_eq!(flags.modifier_string(), "protected synchronized native");
    }

    #[test]
    fn omits_flags_without_keywords() {
        let flags = MethodAccess::PUBLIC
            | MethodAccess::BRIDGE
            | MethodAccess::VARARGS
            | MethodAccess::SYNTHETIC;
        assert_eq!(flags.modifier_string(), "public");
    }

    #[test]
    fn package_private_is_empty() {
        assert_eq!(MethodAccess::empty().modifier_string(), "");
    }
}
