use serde::{Deserialize, Serialize};

/// LeetCode 解题统计（规范化后的形态）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JudgeStats {
    pub total_solved: u32,
    pub total_questions: u32,
    pub easy_solved: u32,
    pub medium_solved: u32,
    pub hard_solved: u32,
    /// 通过率（0-100），无提交时为 0
    #[schema(example = 63.5)]
    pub acceptance_rate: f64,
    /// 全站排名；未知时为 null
    pub ranking: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DifficultyBucket {
    All,
    Easy,
    Medium,
    Hard,
    Other,
}

impl DifficultyBucket {
    fn parse(raw: &str) -> Self {
        match raw {
            "All" => Self::All,
            "Easy" => Self::Easy,
            "Medium" => Self::Medium,
            "Hard" => Self::Hard,
            _ => Self::Other,
        }
    }
}

// ---------------- 上游响应结构 ----------------

#[derive(Debug, Deserialize)]
pub(crate) struct SessionProgressData {
    #[serde(rename = "allQuestionsCount", default)]
    pub all_questions_count: Vec<QuestionCount>,
    #[serde(rename = "matchedUser")]
    pub matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionCount {
    pub difficulty: String,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MatchedUser {
    #[serde(default)]
    pub profile: Option<UserProfile>,
    pub submit_stats: SubmitStats,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserProfile {
    #[serde(default)]
    pub ranking: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitStats {
    #[serde(default)]
    pub ac_submission_num: Vec<SubmissionCount>,
    #[serde(default)]
    pub total_submission_num: Vec<SubmissionCount>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionCount {
    pub difficulty: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub submissions: u64,
}

/// 优先取 "All" 分桶，否则对各难度求和（避免 All 与分桶重复累计）
fn all_or_sum<T>(
    items: &[T],
    bucket: impl Fn(&T) -> DifficultyBucket,
    value: impl Fn(&T) -> u64,
) -> u64 {
    if let Some(all) = items.iter().find(|i| bucket(*i) == DifficultyBucket::All) {
        return value(all);
    }
    items
        .iter()
        .filter(|i| {
            matches!(
                bucket(*i),
                DifficultyBucket::Easy | DifficultyBucket::Medium | DifficultyBucket::Hard
            )
        })
        .map(value)
        .fold(0u64, u64::saturating_add)
}

impl SessionProgressData {
    /// 转换为规范化统计；`matchedUser` 为 null（用户不存在）时返回 None。
    pub(crate) fn into_judge_stats(self) -> Option<JudgeStats> {
        let user = self.matched_user?;
        let mut stats = JudgeStats::default();

        for ac in &user.submit_stats.ac_submission_num {
            match DifficultyBucket::parse(&ac.difficulty) {
                DifficultyBucket::Easy => stats.easy_solved = ac.count,
                DifficultyBucket::Medium => stats.medium_solved = ac.count,
                DifficultyBucket::Hard => stats.hard_solved = ac.count,
                DifficultyBucket::All | DifficultyBucket::Other => {}
            }
        }
        // 总解题数取三个分桶之和，容忍上游字段不一致
        stats.total_solved = stats
            .easy_solved
            .saturating_add(stats.medium_solved)
            .saturating_add(stats.hard_solved);

        let total_questions = all_or_sum(
            &self.all_questions_count,
            |q| DifficultyBucket::parse(&q.difficulty),
            |q| u64::from(q.count),
        );
        stats.total_questions = u32::try_from(total_questions).unwrap_or(u32::MAX);

        let accepted = all_or_sum(
            &user.submit_stats.ac_submission_num,
            |s| DifficultyBucket::parse(&s.difficulty),
            |s| s.submissions,
        );
        let total = all_or_sum(
            &user.submit_stats.total_submission_num,
            |s| DifficultyBucket::parse(&s.difficulty),
            |s| s.submissions,
        );
        stats.acceptance_rate = acceptance_rate(accepted, total);

        stats.ranking = user
            .profile
            .and_then(|p| p.ranking)
            .filter(|r| *r > 0)
            .and_then(|r| u32::try_from(r).ok());

        Some(stats)
    }
}

/// 通过率（0-100）；total 为 0 时定义为 0
pub fn acceptance_rate(accepted: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    accepted as f64 / total as f64 * 100.0
}
