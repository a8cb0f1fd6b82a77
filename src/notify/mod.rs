//! Toast 通知总线
//!
//! 显式注册/注销的发布订阅总线，取代视图层的全局可变订阅列表：
//! 订阅句柄在 Drop 时自动注销；同一时刻最多一条可见 toast，
//! 新 toast 会顶替当前的；每条 toast 到时自动消失。
//!
//! 所有面向用户的错误（认证、注册提交）最终都落到这里，
//! 不做重试，也不向外升级。

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::mpsc;

/// 默认自动消失时长
const DEFAULT_AUTO_DISMISS: Duration = Duration::from_secs(4);

/// 订阅通道容量；订阅方消费不及时时丢弃事件
const SUBSCRIBER_CAPACITY: usize = 32;

/// Toast 级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// 单条 toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
}

/// 推送给订阅方的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent {
    Shown(Toast),
    Dismissed(u64),
}

struct BusInner {
    subscribers: RwLock<HashMap<u64, mpsc::Sender<ToastEvent>>>,
    /// 当前可见的 toast（最多一条）
    visible: Mutex<Option<Toast>>,
    next_toast_id: AtomicU64,
    next_subscriber_id: AtomicU64,
    auto_dismiss: Duration,
}

/// Toast 总线（可克隆共享）
#[derive(Clone)]
pub struct ToastBus {
    inner: Arc<BusInner>,
}

/// 订阅句柄；Drop 时从总线注销
pub struct ToastSubscription {
    id: u64,
    inner: Arc<BusInner>,
    receiver: mpsc::Receiver<ToastEvent>,
}

impl ToastBus {
    pub fn new() -> Self {
        Self::with_auto_dismiss(DEFAULT_AUTO_DISMISS)
    }

    pub fn with_auto_dismiss(auto_dismiss: Duration) -> Self {
        Self {
            inner: Arc::new(BusInner {
                subscribers: RwLock::new(HashMap::new()),
                visible: Mutex::new(None),
                next_toast_id: AtomicU64::new(1),
                next_subscriber_id: AtomicU64::new(1),
                auto_dismiss,
            }),
        }
    }

    /// 注册订阅者
    pub fn subscribe(&self) -> ToastSubscription {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::SeqCst);
        self.inner.subscribers.write().insert(id, tx);
        ToastSubscription {
            id,
            inner: self.inner.clone(),
            receiver: rx,
        }
    }

    /// 发布 toast，返回其 ID
    ///
    /// 已有可见 toast 时先将其顶替下线，并安排本条的自动消失
    pub fn publish(&self, level: ToastLevel, message: impl Into<String>) -> u64 {
        let toast = Toast {
            id: self.inner.next_toast_id.fetch_add(1, Ordering::SeqCst),
            level,
            message: message.into(),
        };
        let id = toast.id;

        {
            let mut visible = self.inner.visible.lock();
            if let Some(old) = visible.take() {
                self.broadcast(ToastEvent::Dismissed(old.id));
            }
            *visible = Some(toast.clone());
        }
        self.broadcast(ToastEvent::Shown(toast));

        // 到时自动消失；若已被新 toast 顶替则不再重复下线
        let inner = self.inner.clone();
        let delay = self.inner.auto_dismiss;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            Self::dismiss_inner(&inner, id);
        });

        id
    }

    /// 手动关闭指定 toast
    pub fn dismiss(&self, id: u64) {
        Self::dismiss_inner(&self.inner, id);
    }

    /// 当前可见的 toast
    pub fn visible(&self) -> Option<Toast> {
        self.inner.visible.lock().clone()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    fn dismiss_inner(inner: &Arc<BusInner>, id: u64) {
        let mut visible = inner.visible.lock();
        if visible.as_ref().is_some_and(|t| t.id == id) {
            *visible = None;
            drop(visible);
            Self::broadcast_to(inner, ToastEvent::Dismissed(id));
        }
    }

    fn broadcast(&self, event: ToastEvent) {
        Self::broadcast_to(&self.inner, event);
    }

    fn broadcast_to(inner: &Arc<BusInner>, event: ToastEvent) {
        let subscribers = inner.subscribers.read();
        for (id, tx) in subscribers.iter() {
            if tx.try_send(event.clone()).is_err() {
                tracing::warn!("toast 订阅者 #{} 通道已满或已关闭，事件被丢弃", id);
            }
        }
    }
}

impl Default for ToastBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastSubscription {
    /// 接收下一条事件；总线关闭时返回 None
    pub async fn recv(&mut self) -> Option<ToastEvent> {
        self.receiver.recv().await
    }
}

impl Drop for ToastSubscription {
    fn drop(&mut self) {
        self.inner.subscribers.write().remove(&self.id);
    }
}
