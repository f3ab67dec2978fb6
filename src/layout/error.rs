use thiserror::Error;

use crate::layout::partition::RegionId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("region {0} already exists on this display")]
    DuplicateRegion(RegionId),
    #[error("region {0} not found")]
    RegionNotFound(RegionId),
    #[error("split weight {0} is outside (0, 1)")]
    InvalidWeight(f32),
}
