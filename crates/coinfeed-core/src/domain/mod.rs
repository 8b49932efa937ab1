//! 시세 피드 도메인 모델.

mod snapshot;
mod symbol_table;
mod ticker;

pub use snapshot::*;
pub use symbol_table::*;
pub use ticker::*;
