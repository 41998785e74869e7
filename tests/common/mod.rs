#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{self, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

use realm_stats::{AppConfig, AppState, build_app};

pub const TEST_TOKEN: &str = "test-token";

/// 用户 `slow` 的仓库列表响应延迟
pub const SLOW_UPSTREAM_DELAY: Duration = Duration::from_millis(300);

/// 假上游各端点被调用的次数
#[derive(Clone, Default)]
pub struct Calls {
    pub graphql: Arc<AtomicUsize>,
    pub repos: Arc<AtomicUsize>,
    pub leetcode: Arc<AtomicUsize>,
}

impl Calls {
    pub fn graphql(&self) -> usize {
        self.graphql.load(Ordering::SeqCst)
    }
    pub fn repos(&self) -> usize {
        self.repos.load(Ordering::SeqCst)
    }
    pub fn leetcode(&self) -> usize {
        self.leetcode.load(Ordering::SeqCst)
    }
}

pub struct FakeUpstream {
    pub addr: SocketAddr,
    pub calls: Calls,
}

fn contributions_payload() -> Value {
    // 2024-06-01 .. 2024-06-10，第 i 天贡献 i 次，分两周返回
    let days: Vec<Value> = (1..=10)
        .map(|d| {
            json!({
                "contributionCount": d - 1,
                "date": format!("2024-06-{d:02}"),
                "weekday": 0,
            })
        })
        .collect();
    let (first, second) = days.split_at(4);
    json!({
        "data": {
            "user": {
                "contributionsCollection": {
                    "totalCommitContributions": 40,
                    "totalPullRequestContributions": 5,
                    "totalIssueContributions": 3,
                    "contributionCalendar": {
                        "totalContributions": 45,
                        "weeks": [
                            { "contributionDays": second },
                            { "contributionDays": first },
                        ]
                    }
                }
            }
        }
    })
}

async fn github_graphql(
    State(calls): State<Calls>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    calls.graphql.fetch_add(1, Ordering::SeqCst);

    let expected = format!("Bearer {TEST_TOKEN}");
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized || headers.get(header::USER_AGENT).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match body["variables"]["login"].as_str().unwrap_or_default() {
        "ghost" => Json(json!({
            "data": { "user": null },
            "errors": [{ "message": "Could not resolve to a User with the login of 'ghost'." }]
        }))
        .into_response(),
        "broken" => (StatusCode::BAD_GATEWAY, "upstream exploded").into_response(),
        _ => Json(contributions_payload()).into_response(),
    }
}

async fn github_repos(State(calls): State<Calls>, Path(login): Path<String>) -> Response {
    calls.repos.fetch_add(1, Ordering::SeqCst);
    if login == "slow" {
        tokio::time::sleep(SLOW_UPSTREAM_DELAY).await;
    }

    let langs: Vec<Option<&str>> = match login.as_str() {
        "alice" => vec![Some("Rust"), Some("Rust"), Some("Go"), None],
        // Go 与 Rust 各 5 个、Python 2 个；Python 最先出现
        "tie" => {
            let mut v = vec![Some("Python"), Some("Python")];
            for _ in 0..5 {
                v.push(Some("Go"));
                v.push(Some("Rust"));
            }
            v
        }
        "empty" => Vec::new(),
        "garbled" => return (StatusCode::OK, "not json").into_response(),
        "broken" => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => vec![Some("TypeScript")],
    };
    let repos: Vec<Value> = langs
        .into_iter()
        .enumerate()
        .map(|(i, l)| json!({ "name": format!("repo-{i}"), "language": l }))
        .collect();
    Json(Value::Array(repos)).into_response()
}

async fn leetcode_graphql(State(calls): State<Calls>, Json(body): Json<Value>) -> Response {
    calls.leetcode.fetch_add(1, Ordering::SeqCst);
    assert_eq!(body["operationName"], "userSessionProgress");

    let payload = match body["variables"]["username"].as_str().unwrap_or_default() {
        "nobody" => json!({
            "data": { "allQuestionsCount": [], "matchedUser": null },
            "errors": [{ "message": "That user does not exist." }]
        }),
        "fresh" => json!({
            "data": {
                "allQuestionsCount": [],
                "matchedUser": {
                    "profile": { "ranking": 0 },
                    "submitStats": { "acSubmissionNum": [], "totalSubmissionNum": [] }
                }
            }
        }),
        _ => json!({
            "data": {
                "allQuestionsCount": [
                    { "difficulty": "All", "count": 3200 },
                    { "difficulty": "Easy", "count": 800 },
                    { "difficulty": "Medium", "count": 1700 },
                    { "difficulty": "Hard", "count": 700 }
                ],
                "matchedUser": {
                    "profile": { "ranking": 12345 },
                    "submitStats": {
                        "acSubmissionNum": [
                            { "difficulty": "All", "count": 300, "submissions": 400 },
                            { "difficulty": "Easy", "count": 150, "submissions": 200 },
                            { "difficulty": "Medium", "count": 120, "submissions": 160 },
                            { "difficulty": "Hard", "count": 30, "submissions": 40 }
                        ],
                        "totalSubmissionNum": [
                            { "difficulty": "All", "count": 320, "submissions": 800 },
                            { "difficulty": "Easy", "count": 155, "submissions": 300 },
                            { "difficulty": "Medium", "count": 130, "submissions": 350 },
                            { "difficulty": "Hard", "count": 35, "submissions": 150 }
                        ]
                    }
                }
            }
        }),
    };
    Json(payload).into_response()
}

pub async fn spawn_upstream() -> FakeUpstream {
    let calls = Calls::default();
    let app = Router::new()
        .route("/graphql", post(github_graphql))
        .route("/users/:login/repos", routing::get(github_repos))
        .route("/leetcode/graphql", post(leetcode_graphql))
        .with_state(calls.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake upstream");
    });

    FakeUpstream { addr, calls }
}

pub fn test_config(upstream: SocketAddr) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.github.token = TEST_TOKEN.to_string();
    cfg.github.default_username = "alice".to_string();
    cfg.github.graphql_endpoint = format!("http://{upstream}/graphql");
    cfg.github.rest_base_url = format!("http://{upstream}");
    cfg.leetcode.graphql_endpoint = format!("http://{upstream}/leetcode/graphql");
    cfg.leetcode.timeout_secs = 2;
    cfg
}

pub fn build(cfg: &AppConfig) -> Router {
    let state = AppState::from_config(cfg).expect("build app state");
    build_app(state, cfg)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("utf8 body")
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("call app");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}
