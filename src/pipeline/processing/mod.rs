// Pipeline processing: relation graph, grouping, and title matching

pub mod graph;
pub mod grouping;
pub mod matcher;
pub mod policy;
pub mod selector;
pub mod text;
