//! CLI 명령어 구현 모듈.

pub mod output;
pub mod replay;
pub mod symbols;
pub mod watch;
