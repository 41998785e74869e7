pub mod github;
pub mod health;
pub mod image;
pub mod leetcode;
pub mod metrics;
pub(crate) mod upstream;

use crate::error::AppError;

/// 用户名最大长度（GitHub 上限为 39，留出余量给 LeetCode）
const MAX_IDENTITY_LEN: usize = 64;

fn is_valid_identity(v: &str) -> bool {
    !v.is_empty()
        && v.len() <= MAX_IDENTITY_LEN
        && v.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// 解析请求中的用户名：显式传参优先，其次配置的默认用户。
///
/// 两者皆无或包含非法字符时返回 400。用户名会拼进上游 URL 路径，
/// 因此只接受字母数字、`-` 与 `_`。
pub(crate) fn resolve_identity(
    requested: Option<&str>,
    fallback: Option<&str>,
) -> Result<String, AppError> {
    let candidate = requested
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| fallback.map(str::trim).filter(|v| !v.is_empty()))
        .ok_or_else(|| AppError::Validation("缺少 username 参数".to_string()))?;

    if !is_valid_identity(candidate) {
        return Err(AppError::Validation(format!(
            "username 含非法字符: {candidate}"
        )));
    }
    Ok(candidate.to_string())
}
