//! Flag sets reported by the semantic source.
//!
//! Bit values follow the checker's own numbering so that a real checker can
//! hand its raw masks through `from_bits_retain` without translation.

use bitflags::bitflags;

bitflags! {
    /// Declaration kinds contributing to a symbol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const FUNCTION_SCOPED_VARIABLE = 1 << 0;
        const BLOCK_SCOPED_VARIABLE = 1 << 1;
        const PROPERTY = 1 << 2;
        const ENUM_MEMBER = 1 << 3;
        const FUNCTION = 1 << 4;
        const CLASS = 1 << 5;
        const INTERFACE = 1 << 6;
        const CONST_ENUM = 1 << 7;
        const REGULAR_ENUM = 1 << 8;
        const VALUE_MODULE = 1 << 9;
        const NAMESPACE_MODULE = 1 << 10;
        const TYPE_LITERAL = 1 << 11;
        const OBJECT_LITERAL = 1 << 12;
        const METHOD = 1 << 13;
        const CONSTRUCTOR = 1 << 14;
        const GET_ACCESSOR = 1 << 15;
        const SET_ACCESSOR = 1 << 16;
        const SIGNATURE = 1 << 17;
        const TYPE_PARAMETER = 1 << 18;
        const TYPE_ALIAS = 1 << 19;
        const EXPORT_VALUE = 1 << 20;
        const ALIAS = 1 << 21;
        const PROTOTYPE = 1 << 22;
        const EXPORT_STAR = 1 << 23;
        const OPTIONAL = 1 << 24;
        const TRANSIENT = 1 << 25;
        const ASSIGNMENT = 1 << 26;
        const MODULE_EXPORTS = 1 << 27;

        const VARIABLE = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        const ENUM = Self::REGULAR_ENUM.bits() | Self::CONST_ENUM.bits();
        const MODULE = Self::VALUE_MODULE.bits() | Self::NAMESPACE_MODULE.bits();
        const ACCESSOR = Self::GET_ACCESSOR.bits() | Self::SET_ACCESSOR.bits();
        const CLASS_MEMBER = Self::METHOD.bits() | Self::ACCESSOR.bits() | Self::PROPERTY.bits();
        const MODULE_MEMBER = Self::VARIABLE.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::ENUM.bits()
            | Self::MODULE.bits()
            | Self::TYPE_ALIAS.bits()
            | Self::ALIAS.bits();
    }
}

impl SymbolFlags {
    /// Iterate the individual bits that are set, lowest first.
    ///
    /// Unlike `iter()`, composite names such as `VARIABLE` are never yielded.
    pub fn single_bits(self) -> impl Iterator<Item = SymbolFlags> {
        let bits = self.bits();
        (0..u32::BITS)
            .map(|shift| 1u32 << shift)
            .filter(move |bit| bits & bit != 0)
            .map(SymbolFlags::from_bits_retain)
    }
}

bitflags! {
    /// Syntactic modifiers on a declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u32 {
        const EXPORT = 1 << 0;
        const AMBIENT = 1 << 1;
        const PUBLIC = 1 << 2;
        const PRIVATE = 1 << 3;
        const PROTECTED = 1 << 4;
        const STATIC = 1 << 5;
        const READONLY = 1 << 6;
        const ABSTRACT = 1 << 7;
        const ASYNC = 1 << 8;
        const DEFAULT = 1 << 9;
        const CONST = 1 << 11;
    }
}

bitflags! {
    /// Node-level flags. Only the variable-list bits are consulted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        const LET = 1 << 0;
        const CONST = 1 << 1;
    }
}

bitflags! {
    /// Flags the checker computes for synthesized (transient) symbols.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CheckFlags: u32 {
        const INSTANTIATED = 1 << 0;
        const SYNTHETIC_PROPERTY = 1 << 1;
        const SYNTHETIC_METHOD = 1 << 2;
        const READONLY = 1 << 3;
    }
}

bitflags! {
    /// Per-position flags of a tuple target.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ElementFlags: u32 {
        const REQUIRED = 1 << 0;
        const OPTIONAL = 1 << 1;
        const REST = 1 << 2;
        const VARIADIC = 1 << 3;

        const VARIABLE = Self::REST.bits() | Self::VARIADIC.bits();
    }
}
