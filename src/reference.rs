use std::fmt::{Display, Formatter};

/// Handle to a canonical node owned by a unique table.
///
/// A reference is only meaningful for the table generation that vended it.
/// Each `reset` starts a new generation, and dereferencing a handle from an
/// older generation panics instead of silently aliasing a different node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeRef {
    index: u32,
    generation: u32,
}

impl NodeRef {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Return the arena slot of the node.
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Return the raw arena slot.
    pub const fn id(self) -> u32 {
        self.index
    }

    /// Return the generation of the table this reference was created in.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.index)
    }
}
