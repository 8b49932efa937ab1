//! 피드 전반에서 사용되는 공통 타입.

mod coin;
mod decimal;

pub use coin::*;
pub use decimal::*;
