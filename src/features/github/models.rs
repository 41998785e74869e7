use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// 单日贡献
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DayContribution {
    /// 日期（YYYY-MM-DD）
    #[schema(value_type = String, example = "2024-06-01")]
    pub date: NaiveDate,
    /// 当日贡献数
    pub count: u32,
    /// 星期（0=周日 … 6=周六），由 date 推导
    pub weekday: u8,
}

impl DayContribution {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self {
            date,
            count,
            weekday: weekday_from_sunday(date),
        }
    }
}

pub(crate) fn weekday_from_sunday(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// GitHub 贡献统计（规范化后的形态）
///
/// 字段名保持 snake_case，与既有调用方约定一致。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProfileStats {
    pub total_contributions: u32,
    pub total_commits: u32,
    pub total_pull_requests: u32,
    pub total_issues: u32,
    /// 按日期升序排列的每日贡献
    pub contributions_by_day: Vec<DayContribution>,
}

/// 仓库语言直方图：保留上游列表中语言首次出现的顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageHistogram {
    entries: Vec<(String, u32)>,
}

impl LanguageHistogram {
    /// 由仓库主语言列表构建；空语言不计入分子和分母。
    pub fn from_languages<'a, I>(languages: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut hist = Self::default();
        for lang in languages.into_iter().flatten() {
            let lang = lang.trim();
            if lang.is_empty() {
                continue;
            }
            match hist.entries.iter_mut().find(|(name, _)| name == lang) {
                Some((_, count)) => *count += 1,
                None => hist.entries.push((lang.to_string(), 1)),
            }
        }
        hist
    }

    /// 参与统计的仓库总数
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, c)| *c).sum()
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------- 上游响应结构 ----------------

#[derive(Debug, Deserialize)]
pub(crate) struct UserData {
    pub user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserNode {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContributionsCollection {
    pub total_commit_contributions: u32,
    pub total_pull_request_contributions: u32,
    pub total_issue_contributions: u32,
    pub contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContributionCalendar {
    pub total_contributions: u32,
    #[serde(default)]
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContributionWeek {
    #[serde(default)]
    pub contribution_days: Vec<ContributionDayNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContributionDayNode {
    pub contribution_count: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub weekday: Option<u8>,
}

/// REST 仓库列表中的单项（只关心主语言）
#[derive(Debug, Deserialize)]
pub(crate) struct RepoSummary {
    #[serde(default)]
    pub language: Option<String>,
}

impl ContributionsCollection {
    /// 展平 weeks → days，并校正 weekday、按日期升序排列。
    pub(crate) fn into_profile_stats(self) -> ProfileStats {
        let mut days: Vec<DayContribution> = self
            .contribution_calendar
            .weeks
            .into_iter()
            .flat_map(|w| w.contribution_days)
            .map(|d| {
                let day = DayContribution::new(d.date, d.contribution_count);
                if let Some(upstream) = d.weekday
                    && upstream != day.weekday
                {
                    tracing::debug!(
                        "GitHub weekday 与日期不一致: {} upstream={} derived={}",
                        d.date,
                        upstream,
                        day.weekday
                    );
                }
                day
            })
            .collect();
        days.sort_by_key(|d| d.date);

        ProfileStats {
            total_contributions: self.contribution_calendar.total_contributions,
            total_commits: self.total_commit_contributions,
            total_pull_requests: self.total_pull_request_contributions,
            total_issues: self.total_issue_contributions,
            contributions_by_day: days,
        }
    }
}
