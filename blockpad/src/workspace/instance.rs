use std::collections::HashMap;
use std::fmt;

use crate::catalog::pattern::Pattern;

/// Identifier of a placed block. Assigned monotonically by the owning
/// [`Workspace`](crate::workspace::Workspace); stable for the instance's
/// lifetime and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// A live block placed in the workspace forest.
///
/// Template data is copied at creation: editing a catalog after placing
/// blocks never changes what is already on the canvas.
#[derive(Debug, Clone)]
pub struct BlockInstance {
    pub id: BlockId,
    /// Kind of the template this instance was created from.
    pub kind: String,
    /// Statement pattern, copied from the template in parsed form.
    pub pattern: Pattern,
    /// Current slot values, independently editable per instance.
    pub slot_values: HashMap<String, String>,
    /// Whether this block may hold child statements.
    pub accepts_body: bool,
    /// Whether this block carries an else-sequence.
    pub has_alternate_body: bool,
    /// Child statements, in order.
    pub body: Vec<BlockInstance>,
    /// Else-branch statements. Stays empty unless `has_alternate_body`.
    pub alternate_body: Vec<BlockInstance>,
}

impl BlockInstance {
    /// Render this block's own statement line from its pattern and current
    /// slot values.
    pub fn statement(&self) -> String {
        self.pattern.render(&self.slot_values)
    }

    /// Set one slot value.
    pub fn set_slot(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.slot_values.insert(name.into(), value.into());
    }

    /// The two child sequences, body first. Every traversal goes through
    /// this, so "search the body, then the else-body, then recurse" is
    /// written once.
    pub fn child_slots(&self) -> [&Vec<BlockInstance>; 2] {
        [&self.body, &self.alternate_body]
    }

    pub(crate) fn child_slots_mut(&mut self) -> [&mut Vec<BlockInstance>; 2] {
        [&mut self.body, &mut self.alternate_body]
    }

    /// True if `id` names this block or any of its descendants.
    pub fn subtree_contains(&self, id: BlockId) -> bool {
        self.id == id
            || self
                .child_slots()
                .into_iter()
                .any(|slot| slot.iter().any(|child| child.subtree_contains(id)))
    }

    /// Number of blocks in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .child_slots()
            .into_iter()
            .map(|slot| slot.iter().map(BlockInstance::subtree_len).sum::<usize>())
            .sum::<usize>()
    }
}
