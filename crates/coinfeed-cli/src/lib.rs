//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 실시간 시세 감시 (`watch`)
//! - 내장 심볼 매핑 조회 (`symbols`)
//! - 녹화된 스트림 프레임 재생 (`replay`)

pub mod commands;
