use crate::{Kind, LifetimeState};

/// Handle into a [`VarArena`]. Cheap to copy, stable for the lifetime of the
/// owning [`crate::Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

impl VarId {
    fn new(index: usize) -> Self {
        VarId(u32::try_from(index).unwrap_or(u32::MAX))
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A place: a root binding or a projection thereof.
///
/// `reference_to` / `referenced_by` are arena indices, not owning pointers —
/// see the module doc on [`crate`] for why that matters for cyclic graphs.
#[derive(Debug, Clone)]
pub struct VarSlot {
    pub name: String,
    pub type_name: String,
    pub kind: Kind,
    pub lifetime_state: LifetimeState,
    pub reference_to: Option<VarId>,
    /// Every variable whose `reference_to` currently points here. Stale
    /// back-references (left over from a since-overwritten `reference_to`)
    /// are tolerated — traversal only ever follows forward `reference_to`
    /// edges, so a stale entry here is simply never visited as live.
    pub referenced_by: Vec<VarId>,
    /// Projection key (e.g. `"0"`, `"1"`, a field name) to child. A linear
    /// `Vec` rather than a `HashMap`: real places rarely carry more than a
    /// handful of live projections.
    pub children: Vec<(String, VarId)>,
}

impl VarSlot {
    fn new(name: String, type_name: String) -> Self {
        let kind = Kind::classify(&type_name);
        VarSlot {
            name,
            type_name,
            kind,
            lifetime_state: LifetimeState::Alive,
            reference_to: None,
            referenced_by: Vec::new(),
            children: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.lifetime_state = LifetimeState::Alive;
        self.reference_to = None;
        self.referenced_by.clear();
    }

    /// Rewrite this slot's type, reclassifying `kind` from the new text.
    /// Used when the same child projection is observed with a different
    /// type across different enumerated paths (spec.md §9 Open Question).
    pub fn retype(&mut self, new_type_name: impl Into<String>) {
        self.type_name = new_type_name.into();
        self.kind = Kind::classify(&self.type_name);
    }
}

/// Per-[`crate::Function`] arena owning every [`VarSlot`] the function
/// mentions.
#[derive(Debug, Clone, Default)]
pub struct VarArena {
    slots: Vec<VarSlot>,
}

impl VarArena {
    pub fn new() -> Self {
        VarArena::default()
    }

    pub fn alloc(&mut self, name: impl Into<String>, type_name: impl Into<String>) -> VarId {
        let id = VarId::new(self.slots.len());
        self.slots.push(VarSlot::new(name.into(), type_name.into()));
        id
    }

    pub fn get(&self, id: VarId) -> &VarSlot {
        &self.slots[id.index()]
    }

    pub fn get_mut(&mut self, id: VarId) -> &mut VarSlot {
        &mut self.slots[id.index()]
    }

    pub fn child(&self, parent: VarId, key: &str) -> Option<VarId> {
        self.get(parent)
            .children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, id)| *id)
    }

    pub fn add_child(&mut self, parent: VarId, key: impl Into<String>, child: VarId) {
        self.get_mut(parent).children.push((key.into(), child));
    }

    /// Resets every slot's lifetime state and edges to their initial values,
    /// leaving `kind`, `type_name`, and `children` untouched. Spec.md §8
    /// property 2 (reset purity).
    pub fn reset_all(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }

    /// Set `from.reference_to = to`, and if `to` is present append `from` to
    /// `to.referenced_by`. Mirrors the `set_reference` helper in the
    /// reference implementation.
    pub fn set_reference(&mut self, from: VarId, to: Option<VarId>) {
        self.get_mut(from).reference_to = to;
        if let Some(to) = to {
            self.get_mut(to).referenced_by.push(from);
        }
    }

    /// Lifetime-end marker: sticky once `Forgot`.
    pub fn terminate(&mut self, id: VarId) {
        if self.get(id).lifetime_state != LifetimeState::Forgot {
            self.get_mut(id).lifetime_state = LifetimeState::Terminated;
        }
    }

    /// Assignment revival: a destination place is brought back to `Alive`
    /// unconditionally before its source is evaluated (spec.md §8 property 4).
    pub fn revive(&mut self, id: VarId) {
        self.get_mut(id).lifetime_state = LifetimeState::Alive;
    }

    /// Recursively forgets `id` and every descendant reachable through
    /// `children`, as `mem::forget` does on its single operand.
    pub fn forget_recursive(&mut self, id: VarId) {
        let children: Vec<VarId> = self.get(id).children.iter().map(|(_, c)| *c).collect();
        for child in children {
            self.forget_recursive(child);
        }
        self.get_mut(id).lifetime_state = LifetimeState::Forgot;
    }

    /// True if `id` is a pointer currently pointing at a terminated
    /// referent. `Reference` kind is deliberately excluded: spec.md §4.4/§4.5
    /// and the original `Variable.is_dangling_pointer` both restrict this
    /// check to `Pointer` only.
    pub fn is_dangling(&self, id: VarId) -> bool {
        let slot = self.get(id);
        if slot.kind != Kind::Pointer {
            return false;
        }
        match slot.reference_to {
            Some(referent) => self.get(referent).lifetime_state == LifetimeState::Terminated,
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_classifies_kind() {
        let mut arena = VarArena::new();
        let id = arena.alloc("_1", "*const i32");
        assert_eq!(arena.get(id).kind, Kind::Pointer);
    }

    #[test]
    fn reset_all_restores_alive_and_clears_edges() {
        let mut arena = VarArena::new();
        let a = arena.alloc("_1", "i32");
        let b = arena.alloc("_2", "*const i32");
        arena.set_reference(b, Some(a));
        arena.terminate(a);

        assert_eq!(arena.get(a).lifetime_state, LifetimeState::Terminated);
        assert!(arena.is_dangling(b));

        arena.reset_all();

        assert_eq!(arena.get(a).lifetime_state, LifetimeState::Alive);
        assert_eq!(arena.get(b).reference_to, None);
        assert!(arena.get(a).referenced_by.is_empty());
        assert!(!arena.is_dangling(b));
    }

    #[test]
    fn forget_is_sticky_against_terminate() {
        let mut arena = VarArena::new();
        let a = arena.alloc("_1", "i32");
        arena.forget_recursive(a);
        arena.terminate(a);
        assert_eq!(arena.get(a).lifetime_state, LifetimeState::Forgot);
    }

    #[test]
    fn forget_recurses_into_children() {
        let mut arena = VarArena::new();
        let parent = arena.alloc("_1", "MyStruct");
        let child = arena.alloc("0", "i32");
        arena.add_child(parent, "0", child);

        arena.forget_recursive(parent);

        assert_eq!(arena.get(parent).lifetime_state, LifetimeState::Forgot);
        assert_eq!(arena.get(child).lifetime_state, LifetimeState::Forgot);
    }

    #[test]
    fn revive_overrides_terminated() {
        let mut arena = VarArena::new();
        let a = arena.alloc("_1", "i32");
        arena.terminate(a);
        arena.revive(a);
        assert_eq!(arena.get(a).lifetime_state, LifetimeState::Alive);
    }

    #[test]
    fn dangling_requires_pointer_kind() {
        let mut arena = VarArena::new();
        let a = arena.alloc("_1", "i32");
        let b = arena.alloc("_2", "MyStruct");
        arena.set_reference(b, Some(a));
        arena.terminate(a);
        // b is Object, not Pointer, so it cannot be "dangling".
        assert!(!arena.is_dangling(b));
    }

    #[test]
    fn reference_kind_is_never_dangling() {
        let mut arena = VarArena::new();
        let a = arena.alloc("_1", "i32");
        let b = arena.alloc("_2", "&i32");
        arena.set_reference(b, Some(a));
        arena.terminate(a);
        // b is Reference, not Pointer: spec.md and the original restrict
        // dangling-pointer detection to Pointer kind only.
        assert!(!arena.is_dangling(b));
    }
}
