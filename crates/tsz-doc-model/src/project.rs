//! The project root and reflection registry.
//!
//! `ProjectReflection` owns every reflection of a conversion run in an arena
//! indexed by [`ReflectionId`]. Ids are handed out in registration order and
//! never reused: removing a reflection leaves an empty slot behind.
//!
//! It also owns the symbol↔reflection index. The first reflection registered
//! for a symbol is its canonical owner; later registrations for the same
//! symbol do not overwrite the mapping.

use crate::kind::ReflectionKind;
use crate::reflection::{Reflection, ReflectionId};
use crate::types::{ReferenceTarget, ReferenceType};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::trace;
use tsz_doc_source::SymbolId;

#[derive(Clone, Debug)]
pub struct ProjectReflection {
    reflections: Vec<Option<Reflection>>,
    symbol_to_reflection: FxHashMap<SymbolId, ReflectionId>,
    reflection_to_symbol: FxHashMap<ReflectionId, SymbolId>,
}

impl ProjectReflection {
    pub fn new(name: impl Into<String>) -> Self {
        let mut root = Reflection::project(name);
        root.id = ReflectionId::ROOT;
        Self {
            reflections: vec![Some(root)],
            symbol_to_reflection: FxHashMap::default(),
            reflection_to_symbol: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.get(ReflectionId::ROOT).map_or("", |root| root.name.as_str())
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Assign the next id to `reflection` and store it.
    ///
    /// When `symbol` is given and not yet mapped, the pair is recorded in
    /// both directions.
    pub fn register_reflection(
        &mut self,
        mut reflection: Reflection,
        symbol: Option<SymbolId>,
    ) -> ReflectionId {
        let id = ReflectionId(self.reflections.len() as u32);
        reflection.id = id;
        trace!(id = id.0, name = %reflection.name, kind = ?reflection.kind, "register reflection");
        self.reflections.push(Some(reflection));
        if let Some(symbol) = symbol {
            self.link_symbol(id, symbol);
        }
        id
    }

    /// Record `symbol` ↔ `id` unless the symbol already has an owner.
    ///
    /// Returns whether the mapping was recorded.
    pub fn link_symbol(&mut self, id: ReflectionId, symbol: SymbolId) -> bool {
        if self.symbol_to_reflection.contains_key(&symbol) {
            return false;
        }
        self.symbol_to_reflection.insert(symbol, id);
        self.reflection_to_symbol.insert(id, symbol);
        true
    }

    pub fn reflection_from_symbol(&self, symbol: SymbolId) -> Option<ReflectionId> {
        self.symbol_to_reflection.get(&symbol).copied()
    }

    pub fn symbol_from_reflection(&self, id: ReflectionId) -> Option<SymbolId> {
        self.reflection_to_symbol.get(&id).copied()
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn get(&self, id: ReflectionId) -> Option<&Reflection> {
        self.reflections.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: ReflectionId) -> Option<&mut Reflection> {
        self.reflections.get_mut(id.index())?.as_mut()
    }

    pub fn root(&self) -> Option<&Reflection> {
        self.get(ReflectionId::ROOT)
    }

    pub fn contains(&self, id: ReflectionId) -> bool {
        self.get(id).is_some()
    }

    /// Live reflections in id order.
    pub fn reflections(&self) -> impl Iterator<Item = &Reflection> {
        self.reflections.iter().flatten()
    }

    /// Number of live reflections, the root included.
    pub fn len(&self) -> usize {
        self.reflections().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    pub fn kind_of(&self, id: ReflectionId) -> Option<ReflectionKind> {
        self.get(id).map(|reflection| reflection.kind)
    }

    pub fn children(&self, id: ReflectionId) -> &[ReflectionId] {
        self.get(id).map_or(&[][..], |reflection| reflection.children())
    }

    // =========================================================================
    // Tree edits
    // =========================================================================

    /// Append `child` to `parent`'s children.
    ///
    /// Only the project and declarations hold children; for any other parent
    /// nothing happens and `false` is returned.
    pub fn add_child(&mut self, parent: ReflectionId, child: ReflectionId) -> bool {
        use crate::reflection::ReflectionData;
        let Some(reflection) = self.get_mut(parent) else {
            return false;
        };
        match &mut reflection.data {
            ReflectionData::Project(data) => data.children.push(child),
            ReflectionData::Declaration(data) => data.children.push(child),
            _ => return false,
        }
        true
    }

    /// Remove `id` and everything it owns.
    ///
    /// The reflection is detached from its parent's owning lists and its
    /// symbol mappings are dropped. Returns the number of reflections removed.
    pub fn remove_reflection(&mut self, id: ReflectionId) -> usize {
        if id == ReflectionId::ROOT || !self.contains(id) {
            return 0;
        }
        if let Some(parent) = self.get(id).and_then(|reflection| reflection.parent) {
            self.detach(parent, id);
        }

        let mut removed = 0;
        let mut seen = FxHashSet::default();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(reflection) = self.reflections.get_mut(current.index()).and_then(Option::take)
            else {
                continue;
            };
            stack.extend(reflection.owned_reflections());
            if let Some(symbol) = self.reflection_to_symbol.remove(&current) {
                if self.symbol_to_reflection.get(&symbol) == Some(&current) {
                    self.symbol_to_reflection.remove(&symbol);
                }
            }
            removed += 1;
        }
        trace!(id = id.0, removed, "removed reflection");
        removed
    }

    fn detach(&mut self, parent: ReflectionId, child: ReflectionId) {
        use crate::reflection::ReflectionData;
        let Some(reflection) = self.get_mut(parent) else {
            return;
        };
        match &mut reflection.data {
            ReflectionData::Project(data) => data.children.retain(|c| *c != child),
            ReflectionData::Declaration(data) => {
                data.children.retain(|c| *c != child);
                data.signatures.retain(|c| *c != child);
                data.type_parameters.retain(|c| *c != child);
                for slot in [
                    &mut data.index_signature,
                    &mut data.get_signature,
                    &mut data.set_signature,
                ] {
                    if *slot == Some(child) {
                        *slot = None;
                    }
                }
            }
            ReflectionData::Signature(data) => {
                data.parameters.retain(|c| *c != child);
                data.type_parameters.retain(|c| *c != child);
            }
            _ => {}
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn child_by_name(&self, parent: ReflectionId, name: &str) -> Option<ReflectionId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|child| self.get(*child).is_some_and(|r| r.name == name))
    }

    /// Resolve a dotted path such as `"Foo.bar"` from the root.
    pub fn find(&self, path: &str) -> Option<ReflectionId> {
        path.split('.')
            .try_fold(ReflectionId::ROOT, |current, part| {
                self.child_by_name(current, part)
            })
    }

    /// Dotted name from the outermost non-project ancestor, e.g. `Foo.bar`.
    pub fn full_name(&self, id: ReflectionId) -> String {
        let mut parts = Vec::new();
        let mut current = self.get(id);
        while let Some(reflection) = current {
            if reflection.kind == ReflectionKind::Project {
                break;
            }
            parts.push(reflection.name.as_str());
            current = reflection.parent.and_then(|parent| self.get(parent));
        }
        parts.reverse();
        parts.join(".")
    }

    // =========================================================================
    // References
    // =========================================================================

    pub fn resolve_target(&self, target: ReferenceTarget) -> Option<ReflectionId> {
        match target {
            ReferenceTarget::Reflection(id) => self.contains(id).then_some(id),
            ReferenceTarget::Symbol(symbol) => self.reflection_from_symbol(symbol),
            ReferenceTarget::Broken => None,
        }
    }

    pub fn resolve_reference(&self, reference: &ReferenceType) -> Option<ReflectionId> {
        self.resolve_target(reference.target)
    }

    /// Follow reference reflections until a non-reference is reached.
    pub fn resolve_alias_deep(&self, id: ReflectionId) -> Option<ReflectionId> {
        let mut seen = FxHashSet::default();
        let mut current = id;
        loop {
            if !seen.insert(current) {
                return None;
            }
            let reflection = self.get(current)?;
            match reflection.as_reference() {
                Some(data) => current = self.resolve_target(data.target)?,
                None => return Some(current),
            }
        }
    }

    /// Reference equality with symbol targets resolved through this project.
    pub fn reference_equals(&self, a: &ReferenceType, b: &ReferenceType) -> bool {
        let same_target = match (a.target, b.target) {
            (ReferenceTarget::Broken, ReferenceTarget::Broken) => a.name == b.name,
            (ReferenceTarget::Broken, _) | (_, ReferenceTarget::Broken) => false,
            (x, y) if x == y => true,
            (x, y) => match (self.resolve_target(x), self.resolve_target(y)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        };
        same_target && a.type_arguments == b.type_arguments
    }
}

/// Serialized as `{ "name", "reflections": [...] }` with live reflections in id order.
impl Serialize for ProjectReflection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let reflections: Vec<&Reflection> = self.reflections().collect();
        let mut state = serializer.serialize_struct("ProjectReflection", 2)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("reflections", &reflections)?;
        state.end()
    }
}
