use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::theme::RenderTheme;

/// 徽章种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    Profile,
    Languages,
    LeetCode,
}

/// 缓存槽位的归属键：只有键完全一致才算命中。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderKey {
    pub kind: BadgeKind,
    pub identity: String,
    pub theme: RenderTheme,
}

impl RenderKey {
    pub fn new(kind: BadgeKind, identity: impl Into<String>, theme: RenderTheme) -> Self {
        Self {
            kind,
            identity: identity.into(),
            theme,
        }
    }
}

/// 最近一次渲染结果
#[derive(Debug, Clone)]
pub struct CachedArtifact {
    pub key: RenderKey,
    pub svg: Arc<str>,
    pub captured_at: Instant,
}

impl CachedArtifact {
    fn is_fresh_for(&self, key: &RenderKey, ttl: Duration) -> bool {
        self.key == *key && self.captured_at.elapsed() < ttl
    }
}

/// 单槽位、短 TTL 的 SVG 渲染缓存。
///
/// - 读路径：持读锁检查槽位，键一致且未过期则直接返回；
/// - 写路径：上游拉取在锁外进行，渲染与替换在写锁内完成，整体替换不做局部更新；
/// - 多个写者由写锁串行化，最后完成的渲染覆盖槽位；过期瞬间可能出现重复重算，不做合并。
///
/// 槽位只有一个：不同身份/主题的请求会相互覆盖，但不会读到别人的结果。
pub struct RenderCache {
    slot: RwLock<Option<CachedArtifact>>,
    ttl: Duration,
}

impl RenderCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 读锁下查找新鲜的缓存项
    pub async fn lookup(&self, key: &RenderKey) -> Option<CachedArtifact> {
        let guard = self.slot.read().await;
        guard
            .as_ref()
            .filter(|a| a.is_fresh_for(key, self.ttl))
            .cloned()
    }

    /// 写锁下渲染并整体替换槽位
    pub async fn store_with<R>(&self, key: RenderKey, render: R) -> CachedArtifact
    where
        R: FnOnce() -> String,
    {
        let mut guard = self.slot.write().await;
        let artifact = CachedArtifact {
            key,
            svg: Arc::from(render()),
            captured_at: Instant::now(),
        };
        *guard = Some(artifact.clone());
        artifact
    }

    /// 命中则直接返回；否则执行 `fetch`（锁外）→ `render`（写锁内）并写回。
    ///
    /// `fetch` 失败时槽位保持不变，错误原样返回给调用方。
    pub async fn get_or_render<T, E, F, Fut, R>(
        &self,
        key: RenderKey,
        fetch: F,
        render: R,
    ) -> Result<CachedArtifact, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: FnOnce(T) -> String,
    {
        if let Some(hit) = self.lookup(&key).await {
            tracing::debug!("徽章缓存命中: {:?} {}", key.kind, key.identity);
            return Ok(hit);
        }

        tracing::debug!("徽章缓存未命中，重新渲染: {:?} {}", key.kind, key.identity);
        let data = fetch().await?;
        Ok(self.store_with(key, move || render(data)).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::image::theme::AccentColor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(identity: &str) -> RenderKey {
        RenderKey::new(BadgeKind::Profile, identity, RenderTheme::default())
    }

    async fn render_counted(
        cache: &RenderCache,
        key: RenderKey,
        calls: &AtomicUsize,
    ) -> CachedArtifact {
        cache
            .get_or_render(
                key,
                || async {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Ok::<_, std::convert::Infallible>(n)
                },
                |n| format!("<svg data-render=\"{n}\"/>"),
            )
            .await
            .expect("infallible")
    }

    #[tokio::test]
    async fn reads_within_ttl_are_identical() {
        let cache = RenderCache::new(Duration::from_secs(5));
        let calls = AtomicUsize::new(0);

        let first = render_counted(&cache, key("alice"), &calls).await;
        let second = render_counted(&cache, key("alice"), &calls).await;
        let third = render_counted(&cache, key("alice"), &calls).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.svg.as_bytes(), second.svg.as_bytes());
        assert_eq!(second.svg.as_bytes(), third.svg.as_bytes());
        assert_eq!(first.captured_at, third.captured_at);
    }

    #[tokio::test]
    async fn stale_entry_triggers_exactly_one_recompute() {
        let cache = RenderCache::new(Duration::from_millis(50));
        let calls = AtomicUsize::new(0);

        let first = render_counted(&cache, key("alice"), &calls).await;
        tokio::time::sleep(Duration::from_millis(80)).await;
        let second = render_counted(&cache, key("alice"), &calls).await;
        let third = render_counted(&cache, key("alice"), &calls).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(second.captured_at > first.captured_at);
        assert_eq!(second.captured_at, third.captured_at);
        assert_ne!(first.svg, second.svg);
    }

    #[tokio::test]
    async fn different_identity_or_theme_is_a_miss_and_overwrites() {
        let cache = RenderCache::new(Duration::from_secs(5));
        let calls = AtomicUsize::new(0);

        render_counted(&cache, key("alice"), &calls).await;
        let bob = render_counted(&cache, key("bob"), &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(bob.key.identity, "bob");

        // 单槽位：alice 已被 bob 覆盖
        assert!(cache.lookup(&key("alice")).await.is_none());

        let blue = RenderKey::new(
            BadgeKind::Profile,
            "bob",
            RenderTheme {
                foreground: AccentColor::Blue,
                ..RenderTheme::default()
            },
        );
        render_counted(&cache, blue, &calls).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_slot_untouched() {
        let cache = RenderCache::new(Duration::from_millis(30));
        let calls = AtomicUsize::new(0);
        let first = render_counted(&cache, key("alice"), &calls).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let res = cache
            .get_or_render(
                key("alice"),
                || async { Err::<u32, &str>("upstream down") },
                |_| unreachable!("render must not run after a failed fetch"),
            )
            .await;
        assert_eq!(res.unwrap_err(), "upstream down");

        let slot = cache.slot.read().await;
        let kept = slot.as_ref().expect("slot kept");
        assert_eq!(kept.captured_at, first.captured_at);
    }

    #[tokio::test]
    async fn concurrent_writers_are_serialized() {
        let cache = Arc::new(RenderCache::new(Duration::from_millis(0)));
        let mut tasks = Vec::new();
        for i in 0..8 {
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                cache
                    .store_with(key("alice"), move || format!("<svg id=\"{i}\"/>"))
                    .await
            }));
        }
        for t in tasks {
            let artifact = t.await.expect("join");
            assert!(artifact.svg.starts_with("<svg id="));
        }
        let slot = cache.slot.read().await;
        assert!(slot.is_some());
    }
}
