//! 녹화된 스트림 프레임 재생.
//!
//! 한 줄에 하나의 결합 스트림 프레임(JSON)이 담긴 파일을 채널 전송 계층으로
//! 클라이언트에 흘려 넣고, 최종 스냅샷을 돌려줍니다. 잘못된 줄과 매핑되지 않은
//! 심볼은 실시간 스트림과 똑같이 버려집니다.

use anyhow::{Context, Result};
use coinfeed_core::{PriceSnapshot, StreamConfig, SymbolTable};
use coinfeed_stream::{ChannelTransport, LivePrices, TickerStreamClient};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::info;

/// 재생 결과.
#[derive(Debug)]
pub struct ReplaySummary {
    /// 재생한 프레임(비어 있지 않은 줄) 수
    pub frames: usize,
    /// 티커로 파싱된 프레임 수
    pub events: usize,
    /// 최종 스냅샷
    pub snapshot: PriceSnapshot,
}

/// 파일을 읽어 재생합니다.
pub async fn replay_file(path: &Path) -> Result<ReplaySummary> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read replay file: {}", path.display()))?;
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    replay_frames(lines).await
}

/// 프레임 목록을 재생합니다.
pub async fn replay_frames(lines: Vec<String>) -> Result<ReplaySummary> {
    let transport = Arc::new(ChannelTransport::new());
    let sender = transport.accept();

    let table = SymbolTable::builtin();
    let client = Arc::new(TickerStreamClient::new(
        StreamConfig::default(),
        table.exchange_symbols(),
        transport,
    ));

    let events = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&events);
    client.add_message_listener(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // 스트림 끝(연결 닫힘)까지 모든 프레임이 처리된 뒤 알림
    let finished = Arc::new(Notify::new());
    let notify = Arc::clone(&finished);
    client.add_disconnect_listener(move || notify.notify_one());

    let live = LivePrices::new(Arc::clone(&client));

    let mut frames = 0;
    for line in lines.into_iter().filter(|line| !line.trim().is_empty()) {
        frames += 1;
        sender.send_text(line);
    }
    sender.close();

    finished.notified().await;
    client.disconnect();

    let summary = ReplaySummary {
        frames,
        events: events.load(Ordering::SeqCst),
        snapshot: live.snapshot(),
    };
    info!(
        frames = summary.frames,
        events = summary.events,
        coins = summary.snapshot.len(),
        "Replay finished"
    );
    Ok(summary)
}
