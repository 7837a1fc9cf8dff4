use bitflags::bitflags;
use serde::ser::{Serialize, SerializeMap, Serializer};

bitflags! {
    /// Flags carried by every reflection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ReflectionFlags: u32 {
        const PRIVATE = 1 << 0;
        const PROTECTED = 1 << 1;
        const PUBLIC = 1 << 2;
        const STATIC = 1 << 3;
        const EXPORT_ASSIGNMENT = 1 << 4;
        const EXTERNAL = 1 << 5;
        const OPTIONAL = 1 << 6;
        const DEFAULT_VALUE = 1 << 7;
        const REST = 1 << 8;
        const ABSTRACT = 1 << 9;
        const CONST = 1 << 10;
        const LET = 1 << 11;
        const READONLY = 1 << 12;
    }
}

const FLAG_NAMES: &[(ReflectionFlags, &str)] = &[
    (ReflectionFlags::PRIVATE, "isPrivate"),
    (ReflectionFlags::PROTECTED, "isProtected"),
    (ReflectionFlags::PUBLIC, "isPublic"),
    (ReflectionFlags::STATIC, "isStatic"),
    (ReflectionFlags::EXPORT_ASSIGNMENT, "isExportAssignment"),
    (ReflectionFlags::EXTERNAL, "isExternal"),
    (ReflectionFlags::OPTIONAL, "isOptional"),
    (ReflectionFlags::DEFAULT_VALUE, "hasDefaultValue"),
    (ReflectionFlags::REST, "isRest"),
    (ReflectionFlags::ABSTRACT, "isAbstract"),
    (ReflectionFlags::CONST, "isConst"),
    (ReflectionFlags::LET, "isLet"),
    (ReflectionFlags::READONLY, "isReadonly"),
];

/// Serialized as `{"isPrivate": true, ...}` listing only the set flags.
impl Serialize for ReflectionFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let set: Vec<&str> = FLAG_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        let mut map = serializer.serialize_map(Some(set.len()))?;
        for name in set {
            map.serialize_entry(name, &true)?;
        }
        map.end()
    }
}
