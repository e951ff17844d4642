mod arena;
mod handle;
mod node;
mod raw_linked_tree;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use node::{Node, leftmost};
pub(crate) use raw_linked_tree::RawLinkedTree;
