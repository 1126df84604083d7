mod arena;
mod handle;
mod node;
mod raw_rb_tree_map;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use node::Node;
pub(crate) use raw_rb_tree_map::RawRbTreeMap;
