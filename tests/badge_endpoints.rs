mod common;

use std::time::Duration;

use axum::http::StatusCode;

use common::{SLOW_UPSTREAM_DELAY, build, get, spawn_upstream, test_config};

const SVG: &str = "image/svg+xml; charset=utf-8";

#[tokio::test]
async fn alice_languages_badge_uses_default_theme_and_row_height() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    let resp = get(&app, "/api/languages/svg?username=alice").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.content_type(), SVG);

    let svg = resp.text();
    // 两种语言：100 + 2 × 40
    assert!(svg.contains(r#"width="500" height="180""#), "{svg}");
    assert!(svg.contains("rgb(243, 69, 69)"), "default accent should be red");
    assert!(svg.contains("#0A0A0A"), "default background should be black");
    assert!(svg.contains("@alice's Languages"));
    assert!(svg.find(">Rust<").unwrap() < svg.find(">Go<").unwrap());
}

#[tokio::test]
async fn tied_languages_keep_upstream_order() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    let svg = get(&app, "/api/languages/svg?username=tie").await.text();
    let go = svg.find(">Go<").expect("Go row");
    let rust = svg.find(">Rust<").expect("Rust row");
    let python = svg.find(">Python<").expect("Python row");
    assert!(go < rust && rust < python, "{svg}");
}

#[tokio::test]
async fn profile_badge_shows_trailing_week() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    let resp = get(&app, "/api/stats/svg?username=octo&color=blue&background=white").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.content_type(), SVG);

    let svg = resp.text();
    assert_eq!(svg.matches("data-date=").count(), 7);
    assert!(svg.contains(r#"data-date="2024-06-04""#));
    assert!(svg.contains(r#"data-date="2024-06-10""#));
    assert!(!svg.contains(r#"data-date="2024-06-03""#));
    assert!(svg.contains("rgb(59, 130, 246)"));
    assert!(svg.contains("#FFFFFF"));
    assert!(svg.contains("#E5E5E5"));
}

#[tokio::test]
async fn leetcode_badge_renders_ranking() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    let svg = get(&app, "/api/leetcode/svg?username=alice").await.text();
    assert!(svg.contains("#12345"));
    assert!(svg.contains("300 / 3200"));
    assert!(svg.contains("50.0%"));

    let fresh = get(&app, "/api/leetcode/svg?username=fresh").await;
    assert_eq!(fresh.status, StatusCode::OK);
    let svg = fresh.text();
    assert!(svg.contains("#N/A"));
    assert!(!svg.contains("NaN"));
}

#[tokio::test]
async fn repeated_badge_within_ttl_is_served_from_cache() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    let first = get(&app, "/api/languages/svg?username=alice").await;
    let second = get(&app, "/api/languages/svg?username=alice").await;

    assert_eq!(upstream.calls.repos(), 1);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn stale_badge_is_recomputed_once() {
    let upstream = spawn_upstream().await;
    let mut cfg = test_config(upstream.addr);
    cfg.render_cache.ttl_ms = 100;
    let app = build(&cfg);

    get(&app, "/api/stats/svg?username=octo").await;
    assert_eq!(upstream.calls.graphql(), 1);

    tokio::time::sleep(Duration::from_millis(150)).await;
    get(&app, "/api/stats/svg?username=octo").await;
    get(&app, "/api/stats/svg?username=octo").await;
    assert_eq!(upstream.calls.graphql(), 2);
}

#[tokio::test]
async fn different_user_or_theme_never_reuses_cached_badge() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    let alice = get(&app, "/api/languages/svg?username=alice").await.text();
    let tie = get(&app, "/api/languages/svg?username=tie").await.text();
    assert_eq!(upstream.calls.repos(), 2);
    assert!(tie.contains("@tie's Languages"));
    assert!(!tie.contains("@alice"));

    let green = get(&app, "/api/languages/svg?username=tie&color=green").await.text();
    assert_eq!(upstream.calls.repos(), 3);
    assert!(green.contains("rgb(34, 197, 94)"));
    assert_ne!(alice, green);
}

#[tokio::test]
async fn json_routes_bypass_badge_cache() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    get(&app, "/api/languages/svg?username=alice").await;
    get(&app, "/api/languages?username=alice").await;
    get(&app, "/api/languages?username=alice").await;
    assert_eq!(upstream.calls.repos(), 3);
}

#[tokio::test]
async fn badge_upstream_failure_is_json_500_and_not_cached() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    let resp = get(&app, "/api/languages/svg?username=broken").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.content_type().starts_with("application/json"));
    assert_eq!(resp.json()["code"], "UPSTREAM_FAILURE");

    get(&app, "/api/languages/svg?username=broken").await;
    assert_eq!(upstream.calls.repos(), 2);
}

#[tokio::test]
async fn leetcode_badge_requires_username_without_default() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    let resp = get(&app, "/api/leetcode/svg").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(upstream.calls.leetcode(), 0);
}

#[tokio::test]
async fn concurrent_badge_requests_all_succeed() {
    let upstream = spawn_upstream().await;
    let app = build(&test_config(upstream.addr));

    let mut tasks = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        let user = if i % 2 == 0 { "alice" } else { "tie" };
        tasks.push(tokio::spawn(async move {
            let resp = get(&app, &format!("/api/languages/svg?username={user}")).await;
            (user, resp)
        }));
    }
    for t in tasks {
        let (user, resp) = t.await.expect("join");
        assert_eq!(resp.status, StatusCode::OK);
        let svg = resp.text();
        assert!(svg.ends_with("</svg>"));
        assert!(
            svg.contains(&format!("@{user}'s Languages")),
            "{user} got someone else's badge: {svg}"
        );
    }
}

#[tokio::test]
async fn abandoned_badge_request_still_fills_cache() {
    let upstream = spawn_upstream().await;
    let mut cfg = test_config(upstream.addr);
    cfg.render_cache.ttl_ms = 5_000;
    let app = build(&cfg);

    // 客户端在上游返回前放弃请求
    let dropped = tokio::time::timeout(
        Duration::from_millis(50),
        get(&app, "/api/languages/svg?username=slow"),
    )
    .await;
    assert!(dropped.is_err());

    tokio::time::sleep(SLOW_UPSTREAM_DELAY * 2).await;
    let resp = get(&app, "/api/languages/svg?username=slow").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.text().contains("@slow's Languages"));
    assert_eq!(upstream.calls.repos(), 1);
}
