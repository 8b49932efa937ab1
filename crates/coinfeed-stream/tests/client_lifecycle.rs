//! 재연결 정책 및 리스너 분배 통합 테스트.
//!
//! tokio 가상 시간(`start_paused`)과 채널 전송 계층으로 실제 대기 없이 검증합니다.

use coinfeed_core::{ExchangeSymbol, StreamConfig};
use coinfeed_stream::{ChannelTransport, ConnectionState, TickerStreamClient};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BTC_FRAME: &str = r#"{"stream":"btcusdt@ticker","data":{"e":"24hrTicker","E":1717171717000,"s":"BTCUSDT","c":"67000.5","p":"-120.5","P":"-0.18","q":"2500000000"}}"#;

fn new_client(transport: &Arc<ChannelTransport>) -> TickerStreamClient {
    let transport: Arc<ChannelTransport> = Arc::clone(transport);
    TickerStreamClient::new(
        StreamConfig::default(),
        vec![ExchangeSymbol::new("btcusdt"), ExchangeSymbol::new("ethusdt")],
        transport,
    )
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// 연결 시도 사이의 간격(초, 반올림).
fn gaps_in_secs(transport: &ChannelTransport) -> Vec<u64> {
    transport
        .open_attempts()
        .windows(2)
        .map(|pair| {
            let gap = pair[1].at - pair[0].at;
            (gap.as_millis() as u64 + 500) / 1000
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn linear_backoff_gives_up_after_five_attempts() {
    let transport = Arc::new(ChannelTransport::new());
    for _ in 0..10 {
        transport.refuse("connection refused");
    }
    let client = new_client(&transport);

    client.connect();
    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(transport.open_count(), 6);
    assert_eq!(gaps_in_secs(&transport), vec![3, 6, 9, 12, 15]);
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert_eq!(client.reconnect_attempts(), 5);
}

#[tokio::test(start_paused = true)]
async fn successful_open_resets_attempt_counter() {
    let transport = Arc::new(ChannelTransport::new());
    transport.refuse("first failure");
    transport.refuse("second failure");
    let sender = transport.accept();
    let second_sender = transport.accept();
    let client = new_client(&transport);

    client.connect();
    // 0s 실패, 3s 실패, 9s 성공
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(client.state(), ConnectionState::Connected);
    assert_eq!(client.reconnect_attempts(), 0);

    // 연결 이후 끊기면 다시 첫 번째 지연(3초)부터 시작
    let closed_at = tokio::time::Instant::now();
    sender.close();
    settle().await;
    assert_eq!(client.reconnect_attempts(), 1);
    tokio::time::sleep(Duration::from_secs(4)).await;

    assert_eq!(client.state(), ConnectionState::Connected);
    let attempts = transport.open_attempts();
    assert_eq!(attempts.len(), 4);
    assert_eq!(gaps_in_secs(&transport)[..2], [3, 6]);
    let delay = attempts[3].at - closed_at;
    assert!(delay >= Duration::from_secs(3) && delay < Duration::from_millis(3100));
    drop(second_sender);
}

#[tokio::test(start_paused = true)]
async fn manual_connect_resets_backoff() {
    let transport = Arc::new(ChannelTransport::new());
    transport.refuse("down");
    transport.refuse("down");
    let _sender = transport.accept();
    let client = new_client(&transport);

    client.connect();
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(client.reconnect_attempts(), 2);

    client.disconnect();
    client.connect();
    settle().await;

    assert_eq!(client.state(), ConnectionState::Connected);
    assert_eq!(client.reconnect_attempts(), 0);
    assert_eq!(transport.open_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn manual_connect_after_giving_up_restarts_backoff() {
    let transport = Arc::new(ChannelTransport::new());
    for _ in 0..8 {
        transport.refuse("down");
    }
    let client = new_client(&transport);

    client.connect();
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(transport.open_count(), 6);
    assert_eq!(client.reconnect_attempts(), 5);

    let restarted_at = tokio::time::Instant::now();
    client.connect();
    settle().await;
    assert_eq!(transport.open_count(), 7);
    assert_eq!(client.reconnect_attempts(), 1);

    tokio::time::sleep(Duration::from_secs(4)).await;

    let attempts = transport.open_attempts();
    assert_eq!(attempts.len(), 8);
    let delay = attempts[7].at - attempts[6].at;
    assert!(delay >= Duration::from_secs(3) && delay < Duration::from_millis(3100));
    assert!(attempts[6].at - restarted_at < Duration::from_millis(100));
    assert_eq!(client.reconnect_attempts(), 2);
}

#[tokio::test(start_paused = true)]
async fn message_listeners_fan_out_in_order() {
    let transport = Arc::new(ChannelTransport::new());
    let sender = transport.accept();
    let client = new_client(&transport);

    let calls = Arc::new(Mutex::new(Vec::new()));
    let first_calls = Arc::clone(&calls);
    let first = client.add_message_listener(move |event| {
        first_calls
            .lock()
            .unwrap()
            .push(format!("first:{}", event.symbol));
    });
    let second_calls = Arc::clone(&calls);
    client.add_message_listener(move |event| {
        second_calls
            .lock()
            .unwrap()
            .push(format!("second:{}", event.symbol));
    });

    client.connect();
    settle().await;
    sender.send_text(BTC_FRAME);
    settle().await;

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["first:btcusdt".to_string(), "second:btcusdt".to_string()]
    );

    assert!(client.remove_message_listener(first));
    sender.send_text(BTC_FRAME);
    settle().await;

    assert_eq!(calls.lock().unwrap().len(), 3);
    assert_eq!(calls.lock().unwrap()[2], "second:btcusdt");
}

#[tokio::test(start_paused = true)]
async fn listener_may_unregister_itself_during_dispatch() {
    let transport = Arc::new(ChannelTransport::new());
    let sender = transport.accept();
    let client = Arc::new(new_client(&transport));

    let hits = Arc::new(AtomicUsize::new(0));
    let id_slot = Arc::new(Mutex::new(None));

    let weak = Arc::downgrade(&client);
    let slot = Arc::clone(&id_slot);
    let counter = Arc::clone(&hits);
    let id = client.add_message_listener(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        if let (Some(client), Some(id)) = (weak.upgrade(), *slot.lock().unwrap()) {
            client.remove_message_listener(id);
        }
    });
    *id_slot.lock().unwrap() = Some(id);

    client.connect();
    settle().await;
    sender.send_text(BTC_FRAME);
    sender.send_text(BTC_FRAME);
    settle().await;

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn disconnect_listener_fires_on_remote_close() {
    let transport = Arc::new(ChannelTransport::new());
    let sender = transport.accept();
    let client = new_client(&transport);

    let disconnects = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&disconnects);
    client.add_disconnect_listener(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    client.connect();
    settle().await;
    assert!(client.is_connected());

    sender.close();
    settle().await;

    assert_eq!(disconnects.load(Ordering::SeqCst), 1);
    assert!(!client.is_connected());
    assert_eq!(client.state(), ConnectionState::Disconnected);
}
