use serde::Serialize;

/// 徽章前景（强调）色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AccentColor {
    #[default]
    Red,
    Blue,
    LightBlue,
    Green,
    Yellow,
    Orange,
    Purple,
    Pink,
    White,
    Black,
}

impl AccentColor {
    /// 解析颜色标识（忽略大小写）；未知值回退为默认红色而不是报错。
    pub fn from_token(token: &str) -> Self {
        const ALL: [AccentColor; 10] = [
            AccentColor::Red,
            AccentColor::Blue,
            AccentColor::LightBlue,
            AccentColor::Green,
            AccentColor::Yellow,
            AccentColor::Orange,
            AccentColor::Purple,
            AccentColor::Pink,
            AccentColor::White,
            AccentColor::Black,
        ];
        let token = token.trim();
        ALL.into_iter()
            .find(|c| c.token().eq_ignore_ascii_case(token))
            .unwrap_or_default()
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::LightBlue => "lightBlue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::White => "white",
            Self::Black => "black",
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Self::Red => "rgb(243, 69, 69)",
            Self::Blue => "rgb(59, 130, 246)",
            Self::LightBlue => "rgb(14, 165, 233)",
            Self::Green => "rgb(34, 197, 94)",
            Self::Yellow => "rgb(234, 179, 8)",
            Self::Orange => "rgb(249, 115, 22)",
            Self::Purple => "rgb(168, 85, 247)",
            Self::Pink => "rgb(236, 72, 153)",
            Self::White => "rgb(255, 255, 255)",
            Self::Black => "rgb(0, 0, 0)",
        }
    }
}

/// 徽章背景色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundColor {
    #[default]
    Black,
    Neutral,
    White,
}

impl BackgroundColor {
    /// 解析背景标识（忽略大小写）；未知值回退为默认黑色。
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "neutral" => Self::Neutral,
            "white" => Self::White,
            _ => Self::Black,
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Self::Black => "#0A0A0A",
            Self::Neutral => "#171717",
            Self::White => "#FFFFFF",
        }
    }

    /// 进度条底槽颜色：白底用浅灰，其余用深灰
    pub fn bar_track_css(self) -> &'static str {
        match self {
            Self::White => "#E5E5E5",
            Self::Black | Self::Neutral => "#171717",
        }
    }
}

/// 解析后的渲染主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderTheme {
    pub foreground: AccentColor,
    pub background: BackgroundColor,
}

impl RenderTheme {
    /// 由可选的查询参数解析主题；缺省或无法识别时使用默认值。
    pub fn resolve(color: Option<&str>, background: Option<&str>) -> Self {
        Self {
            foreground: color.map(AccentColor::from_token).unwrap_or_default(),
            background: background.map(BackgroundColor::from_token).unwrap_or_default(),
        }
    }
}
