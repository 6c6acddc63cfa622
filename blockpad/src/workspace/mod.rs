pub mod instance;

use std::collections::HashMap;

use crate::catalog::{BlockTemplate, slot_default};

pub use instance::{BlockId, BlockInstance};

/// The container slot new blocks are appended into: the body or else-body
/// of a specific placed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertTarget {
    pub owner: BlockId,
    /// True for the else-sequence, false for the body.
    pub alternate: bool,
}

/// The live editing state: the forest of placed blocks plus the current
/// insertion cursor. Owns id allocation; build one per editing session.
#[derive(Debug, Default)]
pub struct Workspace {
    roots: Vec<BlockInstance>,
    selection: Option<InsertTarget>,
    next_id: u64,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace::default()
    }

    /// Top-level blocks, in order.
    pub fn roots(&self) -> &[BlockInstance] {
        &self.roots
    }

    /// Total number of live blocks, counting every body and else-body.
    pub fn len(&self) -> usize {
        self.roots.iter().map(BlockInstance::subtree_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Build a new instance from a template: fresh id, slot values seeded
    /// from the default table. Allocation only; the caller decides where
    /// (and whether) to insert it.
    pub fn instantiate(&mut self, template: &BlockTemplate) -> BlockInstance {
        self.instantiate_with(template, std::iter::empty::<(&str, &str)>())
    }

    /// Like [`instantiate`](Self::instantiate), with per-slot overrides
    /// applied after defaulting.
    pub fn instantiate_with<'a>(
        &mut self,
        template: &BlockTemplate,
        overrides: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> BlockInstance {
        self.next_id += 1;
        let mut slot_values: HashMap<String, String> = template
            .pattern
            .slot_names()
            .iter()
            .map(|name| (name.clone(), slot_default(name).to_string()))
            .collect();
        for (name, value) in overrides {
            slot_values.insert(name.to_string(), value.to_string());
        }
        BlockInstance {
            id: BlockId(self.next_id),
            kind: template.kind.clone(),
            pattern: template.pattern.clone(),
            slot_values,
            accepts_body: template.accepts_body,
            has_alternate_body: template.has_alternate_body,
            body: Vec::new(),
            alternate_body: Vec::new(),
        }
    }

    /// Append at the current cursor, or at the root when no cursor is set.
    /// A stale cursor (owner no longer in the forest, or a slot the owner
    /// doesn't have) degrades to root-level insertion rather than dropping
    /// the block.
    pub fn insert_at_cursor(&mut self, block: BlockInstance) {
        if let Some(target) = self.selection {
            if let Some(slot) = self.container_mut(target.owner, target.alternate) {
                slot.push(block);
                return;
            }
        }
        self.roots.push(block);
    }

    /// Append to the root sequence, ignoring the cursor.
    pub fn insert_at_root(&mut self, block: BlockInstance) {
        self.roots.push(block);
    }

    /// Depth-first lookup, body before else-body.
    pub fn find(&self, id: BlockId) -> Option<&BlockInstance> {
        find_in(&self.roots, id)
    }

    pub fn find_mut(&mut self, id: BlockId) -> Option<&mut BlockInstance> {
        find_in_mut(&mut self.roots, id)
    }

    /// Detach the block with `id` from wherever it lives, returning the
    /// whole subtree with descendants intact. `None` if no block has that
    /// id.
    pub fn remove(&mut self, id: BlockId) -> Option<BlockInstance> {
        detach_in(&mut self.roots, id)
    }

    /// Relocate a block to the root sequence at `index`, clamped to the
    /// valid range. Returns false (and changes nothing) when the id is
    /// absent.
    pub fn move_to_root(&mut self, id: BlockId, index: usize) -> bool {
        let Some(block) = self.remove(id) else {
            return false;
        };
        let index = index.min(self.roots.len());
        self.roots.insert(index, block);
        true
    }

    /// Relocate a block into the named container. Validated before
    /// anything is detached: a missing block, a missing or incapable
    /// container, or a target inside the moved subtree all leave the
    /// forest untouched and return false.
    pub fn move_into(&mut self, id: BlockId, owner: BlockId, alternate: bool) -> bool {
        let Some(moving) = self.find(id) else {
            return false;
        };
        // The target must not travel with the subtree: that would detach it
        // from the root with no way back.
        if moving.subtree_contains(owner) {
            return false;
        }
        match self.find(owner) {
            Some(target) if has_container(target, alternate) => {}
            _ => return false,
        }
        let Some(block) = self.remove(id) else {
            return false;
        };
        let slot = self
            .container_mut(owner, alternate)
            .expect("container owner verified before detach");
        slot.push(block);
        true
    }

    /// Point the insertion cursor at a container slot. Replaces any prior
    /// selection outright.
    pub fn set_selection(&mut self, owner: BlockId, alternate: bool) {
        self.selection = Some(InsertTarget { owner, alternate });
    }

    /// Clear the cursor; insertion reverts to the root sequence.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<InsertTarget> {
        self.selection
    }

    /// Edit one slot of a placed block. Returns false when the id is
    /// absent.
    pub fn set_slot_value(&mut self, id: BlockId, slot: &str, value: &str) -> bool {
        match self.find_mut(id) {
            Some(block) => {
                block.set_slot(slot, value);
                true
            }
            None => false,
        }
    }

    /// Full-workspace reset: drop every block. The cursor is only ever
    /// cleared explicitly; left dangling here it degrades like any other
    /// stale cursor.
    pub fn clear(&mut self) {
        self.roots.clear();
    }

    fn container_mut(&mut self, owner: BlockId, alternate: bool) -> Option<&mut Vec<BlockInstance>> {
        let block = self.find_mut(owner)?;
        if !has_container(block, alternate) {
            return None;
        }
        if alternate {
            Some(&mut block.alternate_body)
        } else {
            Some(&mut block.body)
        }
    }
}

/// Whether `block` actually owns the requested container slot. Keeps the
/// else-body-only-when-capable invariant structural.
fn has_container(block: &BlockInstance, alternate: bool) -> bool {
    if alternate {
        block.has_alternate_body
    } else {
        block.accepts_body
    }
}

fn find_in(seq: &[BlockInstance], id: BlockId) -> Option<&BlockInstance> {
    for block in seq {
        if block.id == id {
            return Some(block);
        }
        for slot in block.child_slots() {
            if let Some(found) = find_in(slot, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut(seq: &mut [BlockInstance], id: BlockId) -> Option<&mut BlockInstance> {
    for block in seq.iter_mut() {
        if block.id == id {
            return Some(block);
        }
        for slot in block.child_slots_mut() {
            if let Some(found) = find_in_mut(slot, id) {
                return Some(found);
            }
        }
    }
    None
}

fn detach_in(seq: &mut Vec<BlockInstance>, id: BlockId) -> Option<BlockInstance> {
    if let Some(pos) = seq.iter().position(|block| block.id == id) {
        return Some(seq.remove(pos));
    }
    for block in seq.iter_mut() {
        for slot in block.child_slots_mut() {
            if let Some(found) = detach_in(slot, id) {
                return Some(found);
            }
        }
    }
    None
}
