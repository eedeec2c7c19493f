// Brand resolution pipeline: relation grouping and title matching

pub mod processing;

pub use processing::grouping::{build_group_index, BrandGroup, GroupClusterer, GroupIndex};
pub use processing::selector::{BrandMatch, MatchSelector};
