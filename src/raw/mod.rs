mod arena;
mod handle;
mod metrics;
mod node;
mod raw_rbtree_map;

pub(crate) use handle::Handle;
pub(crate) use node::Node;
pub(crate) use raw_rbtree_map::RawRedBlackTreeMap;
