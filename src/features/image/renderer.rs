use crate::features::github::models::ProfileStats;
use crate::features::leetcode::models::JudgeStats;
use crate::features::metrics::engine::{
    self, LanguageShare, RECENT_WINDOW_DAYS, difficulty_percent, trailing_window,
};

use super::theme::RenderTheme;

/// 画布固定宽度
pub const CANVAS_WIDTH: u32 = 500;
/// 语言徽章基础高度（标题 + 上下留白）
pub const LANG_BASE_HEIGHT: u32 = 100;
/// 语言徽章每行高度
pub const LANG_ROW_HEIGHT: u32 = 40;
/// 进度条满格宽度
const BAR_MAX_WIDTH: f64 = 440.0;

const PROFILE_HEIGHT: u32 = 400;
const JUDGE_HEIGHT: u32 = 450;
/// 最近活跃柱状图的满格高度
const ACTIVITY_BAR_MAX: f64 = 100.0;
const ACTIVITY_COLUMN_STEP: usize = 60;

const FONT_STACK: &str = "'Inter', 'Segoe UI', Ubuntu, Sans-Serif";
const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const EASY_CSS: &str = "rgb(0, 184, 163)";
const MEDIUM_CSS: &str = "rgb(255, 192, 30)";
const HARD_CSS: &str = "rgb(255, 55, 95)";

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// 语言徽章高度 = 基础高度 + 语言数 × 行高
pub fn language_badge_height(language_count: usize) -> u32 {
    LANG_BASE_HEIGHT + language_count as u32 * LANG_ROW_HEIGHT
}

fn bar_width(percentage: f64) -> f64 {
    BAR_MAX_WIDTH * (percentage.clamp(0.0, 100.0) / 100.0)
}

fn day_name(weekday: u8) -> &'static str {
    DAY_NAMES[usize::from(weekday) % DAY_NAMES.len()]
}

/// 外框：背景圆角矩形 + 主题色描边
fn frame_rect(height: u32, theme: &RenderTheme) -> String {
    format!(
        r#"<rect x="0" y="0" width="{CANVAS_WIDTH}" height="{height}" fill="{bg}" rx="12" ry="12" stroke="{fg}" stroke-width="3" stroke-opacity="0.7"/>"#,
        bg = theme.background.css(),
        fg = theme.foreground.css(),
    )
}

fn svg_open(height: u32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg width="{CANVAS_WIDTH}" height="{height}" viewBox="0 0 {CANVAS_WIDTH} {height}" xmlns="http://www.w3.org/2000/svg">"#
    )
}

// ---------------- 语言占比 ----------------

/// 渲染仓库语言占比徽章。行按占比降序（稳定）排列，标签保留一位小数。
pub fn render_languages_svg(
    username: &str,
    shares: &[LanguageShare],
    theme: &RenderTheme,
) -> String {
    let rows = engine::sort_by_share_desc(shares.to_vec());
    let height = language_badge_height(rows.len());
    let fg = theme.foreground.css();

    let mut svg = String::with_capacity(2048 + rows.len() * 512);
    svg.push_str(&svg_open(height));
    svg.push_str(&format!(
        r#"
<style>
    .title {{ font: 600 18px {FONT_STACK}; fill: {fg}; }}
    .lang-text {{ font: 400 14px {FONT_STACK}; fill: {fg}; opacity: 0.9; }}
    .percentage-text {{ font: 500 14px {FONT_STACK}; fill: {fg}; opacity: 0.9; }}
    .bar-bg {{ fill: {track}; }}
    .bar {{ fill: {fg}; opacity: 0.8; }}
</style>
"#,
        track = theme.background.bar_track_css(),
    ));
    svg.push_str(&frame_rect(height, theme));
    svg.push_str(&format!(
        r#"
<g transform="translate(30, 35)">
    <text x="0" y="0" class="title">@{}'s Languages</text>
    <g transform="translate(0, 30)">"#,
        escape_xml(username)
    ));

    for (i, row) in rows.iter().enumerate() {
        svg.push_str(&format!(
            r#"
        <g transform="translate(0, {y})">
            <text x="0" y="0" class="lang-text">{name}</text>
            <text x="{BAR_MAX_WIDTH}" y="0" class="percentage-text" text-anchor="end">{pct:.1}%</text>
            <g transform="translate(0, 10)">
                <rect x="0" y="0" width="{BAR_MAX_WIDTH}" height="8" rx="4" class="bar-bg"/>
                <rect x="0" y="0" width="{w:.1}" height="8" rx="4" class="bar"/>
            </g>
        </g>"#,
            y = i as u32 * LANG_ROW_HEIGHT,
            name = escape_xml(&row.name),
            pct = row.percentage,
            w = bar_width(row.percentage),
        ));
    }

    svg.push_str("\n    </g>\n</g>\n</svg>");
    svg
}

// ---------------- GitHub 贡献概览 ----------------

/// 渲染贡献概览徽章：四项汇总 + 最近 7 天柱状图。
///
/// 柱高以整段日历中的单日最大值为满格，零值至少保留 1px 以便可见。
pub fn render_profile_svg(
    username: &str,
    stats: &ProfileStats,
    theme: &RenderTheme,
) -> String {
    let fg = theme.foreground.css();
    let max_count = stats
        .contributions_by_day
        .iter()
        .map(|d| d.count)
        .max()
        .unwrap_or(0);

    let mut svg = String::with_capacity(6144);
    svg.push_str(&svg_open(PROFILE_HEIGHT));
    svg.push_str(&format!(
        r#"
<style>
    .title {{ font: 600 18px {FONT_STACK}; fill: {fg}; }}
    .stat {{ font: 500 14px {FONT_STACK}; fill: {fg}; opacity: 0.9; }}
    .stat-title {{ font: 400 14px {FONT_STACK}; fill: {fg}; opacity: 0.8; }}
    .contribution-bar {{ fill: {fg}; opacity: 0.8; }}
    .contribution-bar-bg {{ fill: {track}; }}
    .day-text {{ font: 400 12px {FONT_STACK}; fill: {fg}; opacity: 0.7; }}
    .count-text {{ font: 500 12px {FONT_STACK}; fill: {fg}; opacity: 0.9; }}
</style>
"#,
        track = theme.background.bar_track_css(),
    ));
    svg.push_str(&frame_rect(PROFILE_HEIGHT, theme));

    svg.push_str(&format!(
        r#"
<g transform="translate(30, 35)">
    <text x="0" y="0" class="title">@{user}</text>
    <g transform="translate(0, 40)">
        <text x="0" y="0" class="stat-title">Total Contributions</text>
        <text x="160" y="0" class="stat">{contrib}</text>
        <text x="0" y="30" class="stat-title">Total Commits</text>
        <text x="160" y="30" class="stat">{commits}</text>
        <text x="0" y="60" class="stat-title">Pull Requests</text>
        <text x="160" y="60" class="stat">{prs}</text>
        <text x="0" y="90" class="stat-title">Issues</text>
        <text x="160" y="90" class="stat">{issues}</text>
    </g>
    <g transform="translate(0, 170)">
        <text x="0" y="0" class="stat-title">Last {RECENT_WINDOW_DAYS} Days</text>
        <g transform="translate(0, 20)">"#,
        user = escape_xml(username),
        contrib = stats.total_contributions,
        commits = stats.total_commits,
        prs = stats.total_pull_requests,
        issues = stats.total_issues,
    ));

    for (i, day) in trailing_window(&stats.contributions_by_day, RECENT_WINDOW_DAYS)
        .iter()
        .enumerate()
    {
        let ratio = if max_count == 0 {
            0.0
        } else {
            f64::from(day.count) / f64::from(max_count)
        };
        let bar_height = (ratio * ACTIVITY_BAR_MAX).max(1.0);
        svg.push_str(&format!(
            r#"
            <g transform="translate({x}, 0)">
                <rect x="0" y="0" width="50" height="{ACTIVITY_BAR_MAX}" class="contribution-bar-bg" rx="6" ry="6"/>
                <rect x="0" y="{top:.1}" width="50" height="{bar_height:.1}" class="contribution-bar" rx="6" ry="6"/>
                <text x="25" y="125" class="count-text" text-anchor="middle">{count}</text>
                <text x="25" y="145" class="day-text" text-anchor="middle" data-date="{date}">{name}</text>
            </g>"#,
            x = i * ACTIVITY_COLUMN_STEP,
            top = ACTIVITY_BAR_MAX - bar_height,
            count = day.count,
            date = day.date,
            name = day_name(day.weekday),
        ));
    }

    svg.push_str("\n        </g>\n    </g>\n</g>\n</svg>");
    svg
}

// ---------------- LeetCode ----------------

fn difficulty_row(y: u32, label: &str, css: &str, solved: u32, total_questions: u32) -> String {
    let w = bar_width(difficulty_percent(solved, total_questions));
    format!(
        r#"
        <g transform="translate(0, {y})">
            <text class="stat-title" style="fill: {css}">{label}</text>
            <text x="430" y="0" class="stat" text-anchor="end">{solved}</text>
            <rect x="0" y="10" width="{BAR_MAX_WIDTH}" height="8" rx="4" class="progress-bar-bg"/>
            <rect x="0" y="10" width="{w:.1}" height="8" rx="4" style="fill: {css}; opacity: 0.8;"/>
        </g>"#
    )
}

/// 渲染 LeetCode 解题徽章：排名、总进度、分难度进度与通过率。
pub fn render_judge_svg(
    username: &str,
    stats: &JudgeStats,
    theme: &RenderTheme,
) -> String {
    let fg = theme.foreground.css();
    let ranking = stats
        .ranking
        .map(|r| r.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let total_w = bar_width(difficulty_percent(stats.total_solved, stats.total_questions));

    let mut svg = String::with_capacity(6144);
    svg.push_str(&svg_open(JUDGE_HEIGHT));
    svg.push_str(&format!(
        r#"
<style>
    .title {{ font: 600 18px {FONT_STACK}; fill: {fg}; }}
    .stat {{ font: 500 14px {FONT_STACK}; fill: {fg}; opacity: 0.9; }}
    .stat-title {{ font: 400 14px {FONT_STACK}; fill: {fg}; opacity: 0.8; }}
    .rank {{ font: 700 24px {FONT_STACK}; fill: {fg}; opacity: 0.9; }}
    .progress-bar-bg {{ fill: {track}; opacity: 0.2; }}
    .progress-bar {{ fill: {fg}; opacity: 0.8; }}
</style>
"#,
        track = theme.background.bar_track_css(),
    ));
    svg.push_str(&frame_rect(JUDGE_HEIGHT, theme));

    svg.push_str(&format!(
        r#"
<g transform="translate(25, 35)">
    <text x="0" y="0" class="title">@{user}'s LeetCode Stats</text>
    <g transform="translate(0, 55)">
        <text class="stat-title">Ranking</text>
        <text x="0" y="25" class="rank">#{ranking}</text>
    </g>
    <g transform="translate(0, 120)">
        <text class="stat-title">Total Progress</text>
        <text x="430" y="0" class="stat" text-anchor="end">{solved} / {total}</text>
        <rect x="0" y="10" width="{BAR_MAX_WIDTH}" height="10" rx="5" class="progress-bar-bg"/>
        <rect x="0" y="10" width="{total_w:.1}" height="10" rx="5" class="progress-bar"/>
    </g>
    <g transform="translate(0, 175)">
        <text class="stat-title">Problems Solved</text>"#,
        user = escape_xml(username),
        solved = stats.total_solved,
        total = stats.total_questions,
    ));
    svg.push_str(&difficulty_row(30, "Easy", EASY_CSS, stats.easy_solved, stats.total_questions));
    svg.push_str(&difficulty_row(
        75,
        "Medium",
        MEDIUM_CSS,
        stats.medium_solved,
        stats.total_questions,
    ));
    svg.push_str(&difficulty_row(120, "Hard", HARD_CSS, stats.hard_solved, stats.total_questions));
    svg.push_str(&format!(
        r#"
    </g>
    <g transform="translate(0, 350)">
        <text class="stat-title">Acceptance Rate</text>
        <text x="430" y="0" class="stat" text-anchor="end">{:.1}%</text>
    </g>
</g>
</svg>"#,
        stats.acceptance_rate
    ));
    svg
}
