//! 클라이언트 내장 리스너 레지스트리.
//!
//! 메시지/연결/연결 해제/에러 이벤트마다 독립된 순서 있는 리스너 목록을 가집니다.
//! 등록 시 발급되는 `ListenerId`로 해제하므로, 호출자가 원래 클로저를 보관할
//! 필요가 없습니다. 중복 제거는 하지 않습니다.
//!
//! 호출은 항상 목록의 스냅샷을 떠서 잠금 밖에서 수행합니다. 따라서 리스너가
//! 호출 중에 다른 리스너를 추가/제거해도 교착되지 않으며, 호출 중 추가된
//! 리스너는 다음 이벤트부터 호출됩니다.

use coinfeed_core::TickerEvent;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::StreamError;

/// 티커 메시지 리스너.
pub type MessageListener = dyn Fn(&TickerEvent) + Send + Sync;

/// 연결 성공 리스너.
pub type ConnectListener = dyn Fn() + Send + Sync;

/// 연결 해제 리스너.
pub type DisconnectListener = dyn Fn() + Send + Sync;

/// 에러 리스너.
pub type ErrorListener = dyn Fn(&StreamError) + Send + Sync;

/// 리스너 등록 토큰.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// 등록 순서를 유지하는 리스너 목록.
struct Listeners<F: ?Sized> {
    entries: Vec<(ListenerId, Arc<F>)>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> Listeners<F> {
    fn push(&mut self, id: ListenerId, listener: Arc<F>) {
        self.entries.push((id, listener));
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    fn snapshot(&self) -> Vec<Arc<F>> {
        self.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
    }

    fn ids(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// 이벤트 종류별 리스너 레지스트리.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    message: Listeners<MessageListener>,
    connect: Listeners<ConnectListener>,
    disconnect: Listeners<DisconnectListener>,
    error: Listeners<ErrorListener>,
    /// 현재 연결 세션에 대해 이미 호출된 연결 리스너
    connect_notified: HashSet<ListenerId>,
}

impl ListenerRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    /// 메시지 리스너를 추가합니다.
    pub fn add_message_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&TickerEvent) + Send + Sync + 'static,
    {
        let id = self.issue_id();
        self.message.push(id, Arc::new(listener));
        id
    }

    /// 연결 리스너를 추가합니다.
    pub fn add_connect_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.issue_id();
        self.connect.push(id, Arc::new(listener));
        id
    }

    /// 연결 해제 리스너를 추가합니다.
    pub fn add_disconnect_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.issue_id();
        self.disconnect.push(id, Arc::new(listener));
        id
    }

    /// 에러 리스너를 추가합니다.
    pub fn add_error_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&StreamError) + Send + Sync + 'static,
    {
        let id = self.issue_id();
        self.error.push(id, Arc::new(listener));
        id
    }

    /// 메시지 리스너를 제거합니다. 해당 토큰이 없으면 `false`.
    pub fn remove_message_listener(&mut self, id: ListenerId) -> bool {
        self.message.remove(id)
    }

    /// 연결 리스너를 제거합니다.
    pub fn remove_connect_listener(&mut self, id: ListenerId) -> bool {
        self.connect_notified.remove(&id);
        self.connect.remove(id)
    }

    /// 연결 해제 리스너를 제거합니다.
    pub fn remove_disconnect_listener(&mut self, id: ListenerId) -> bool {
        self.disconnect.remove(id)
    }

    /// 에러 리스너를 제거합니다.
    pub fn remove_error_listener(&mut self, id: ListenerId) -> bool {
        self.error.remove(id)
    }

    /// 등록 순서대로의 메시지 리스너 스냅샷.
    pub fn message_listeners(&self) -> Vec<Arc<MessageListener>> {
        self.message.snapshot()
    }

    /// 등록 순서대로의 연결 해제 리스너 스냅샷.
    pub fn disconnect_listeners(&self) -> Vec<Arc<DisconnectListener>> {
        self.disconnect.snapshot()
    }

    /// 등록 순서대로의 에러 리스너 스냅샷.
    pub fn error_listeners(&self) -> Vec<Arc<ErrorListener>> {
        self.error.snapshot()
    }

    /// 새 연결 세션을 시작하고 모든 연결 리스너를 반환합니다.
    ///
    /// 반환된 리스너는 이 세션에 대해 호출된 것으로 기록됩니다.
    pub fn begin_connect_session(&mut self) -> Vec<Arc<ConnectListener>> {
        self.connect_notified = self.connect.ids().collect();
        self.connect.snapshot()
    }

    /// 현재 세션에 대해 아직 호출되지 않은 연결 리스너를 반환하고 호출된 것으로 기록합니다.
    ///
    /// 이미 연결된 뒤에 등록한 구독자에게 연결 상태를 알리는 데 사용됩니다.
    pub fn pending_connect_listeners(&mut self) -> Vec<Arc<ConnectListener>> {
        let pending: Vec<Arc<ConnectListener>> = self
            .connect
            .entries
            .iter()
            .filter(|(id, _)| !self.connect_notified.contains(id))
            .map(|(_, l)| Arc::clone(l))
            .collect();
        self.connect_notified.extend(self.connect.ids());
        pending
    }

    /// 전체 등록된 리스너 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.message.len() + self.connect.len() + self.disconnect.len() + self.error.len()
    }

    /// 등록된 리스너가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
