//! 优雅退出协调
//!
//! 监听 SIGINT/SIGTERM（Windows 下为 Ctrl+C），通知 axum 停止接收新连接，
//! 并给在途请求留出配置的超时时间。

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;
use tracing::{debug, info};

/// 退出原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// 用户中断信号 (Ctrl+C)
    Interrupt,
    /// 终止信号 (SIGTERM)
    Terminate,
}

/// 优雅退出错误类型
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("信号设置失败: {0}")]
    SignalSetup(String),
}

#[derive(Debug)]
struct Inner {
    notify: Notify,
    /// 第一次触发的原因；`Some` 即表示已进入退出流程
    reason: Mutex<Option<ShutdownReason>>,
}

/// 优雅退出管理器；克隆后共享同一状态
#[derive(Debug, Clone)]
pub struct ShutdownManager {
    inner: Arc<Inner>,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                notify: Notify::new(),
                reason: Mutex::new(None),
            }),
        }
    }

    fn reason_slot(&self) -> MutexGuard<'_, Option<ShutdownReason>> {
        self.inner
            .reason
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_shutting_down(&self) -> bool {
        self.reason_slot().is_some()
    }

    /// 触发退出；只有第一次调用生效
    pub fn trigger_shutdown(&self, reason: ShutdownReason) {
        {
            let mut slot = self.reason_slot();
            if slot.is_some() {
                debug!("重复的退出信号被忽略: {:?}", reason);
                return;
            }
            *slot = Some(reason);
        }

        info!("触发优雅退出: {:?}", reason);
        self.inner.notify.notify_waiters();
    }

    /// 等待退出信号；已触发时立即返回
    pub async fn wait_for_shutdown(&self) -> ShutdownReason {
        loop {
            // 先登记等待再检查状态，避免错过检查与等待之间的通知
            let notified = self.inner.notify.notified();
            let current = *self.reason_slot();
            if let Some(reason) = current {
                return reason;
            }
            notified.await;
        }
    }

    /// 启动信号监听任务
    pub fn start_signal_handler(&self) -> Result<(), ShutdownError> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigint = signal(SignalKind::interrupt())
                .map_err(|e| ShutdownError::SignalSetup(e.to_string()))?;
            let mut sigterm = signal(SignalKind::terminate())
                .map_err(|e| ShutdownError::SignalSetup(e.to_string()))?;

            let manager = self.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = sigint.recv() => manager.trigger_shutdown(ShutdownReason::Interrupt),
                    _ = sigterm.recv() => manager.trigger_shutdown(ShutdownReason::Terminate),
                }
            });
        }

        #[cfg(not(unix))]
        {
            let manager = self.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => manager.trigger_shutdown(ShutdownReason::Interrupt),
                    Err(e) => tracing::warn!("监听 Ctrl+C 信号失败: {}", e),
                }
            });
        }

        info!("信号处理器已启动");
        Ok(())
    }
}
