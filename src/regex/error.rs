use thiserror::Error;

use crate::region::RegionError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid regex")]
    InvalidPattern,
    #[error(transparent)]
    Region(#[from] RegionError),
}
