mod arena;
mod handle;
mod iter;
mod node;
mod raw_rb_tree;

pub(crate) use iter::RawIter;
pub(crate) use raw_rb_tree::RawRbTree;
