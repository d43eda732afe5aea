//! Prompt composition: the closed style set, topic validation and the
//! instruction templates for both app variants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RemixError, Result};
use crate::record::ActionRecord;

pub const DEFAULT_MAX_TOPIC_CHARS: usize = 500;
pub const DEFAULT_TOPIC: &str = "过年回家被催婚，想发疯";

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    SurpriseMe,
    Absurd,
    Bleak,
    Violent,
    Romantic,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Style::SurpriseMe,
        Style::Absurd,
        Style::Bleak,
        Style::Violent,
        Style::Romantic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Style::SurpriseMe => "surprise_me",
            Style::Absurd => "absurd",
            Style::Bleak => "bleak",
            Style::Violent => "violent",
            Style::Romantic => "romantic",
        }
    }

    /// Display label; this is the text interpolated into the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Style::SurpriseMe => "随机 (Surprise Me)",
            Style::Absurd => "荒诞/黑色幽默",
            Style::Bleak => "压抑/冷酷",
            Style::Violent => "暴力美学",
            Style::Romantic => "浪漫/唯美",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = RemixError;

    /// Accepts either the id (`absurd`, case-insensitive) or the exact label.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Style::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s) || style.label() == s)
            .ok_or_else(|| RemixError::InvalidStyle(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// Free-text topic that passed the presence and length checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    /// Length is counted in characters, not bytes.
    pub fn parse(raw: &str, max_chars: usize) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(RemixError::TopicRequired);
        }
        let len = raw.chars().count();
        if len > max_chars {
            return Err(RemixError::TopicTooLong { len, max: max_chars });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// PromptVariant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    /// Topic and style only.
    #[default]
    Classic,
    /// Adds the image prompt and emotion tags, and exposes the difficulty filter.
    Visual,
}

impl PromptVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptVariant::Classic => "classic",
            PromptVariant::Visual => "visual",
        }
    }

    pub fn default_temperature(self) -> f32 {
        match self {
            PromptVariant::Classic => 0.9,
            PromptVariant::Visual => 0.8,
        }
    }

    pub fn has_difficulty_filter(self) -> bool {
        matches!(self, PromptVariant::Visual)
    }
}

impl fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PromptComposer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer {
    pub variant: PromptVariant,
}

impl PromptComposer {
    pub fn new(variant: PromptVariant) -> Self {
        Self { variant }
    }

    /// Interpolate the record, topic and style into the variant's template.
    pub fn compose(&self, record: &ActionRecord, topic: &Topic, style: Style) -> String {
        match self.variant {
            PromptVariant::Classic => classic_prompt(record, topic.as_str(), style.label()),
            PromptVariant::Visual => visual_prompt(record, topic.as_str(), style.label()),
        }
    }
}

fn classic_prompt(record: &ActionRecord, topic: &str, style: &str) -> String {
    format!(
        r#"Role: 你是一位先锋短视频导演。

Task: 将用户给定的【话题】强行植入到指定的【动作符号】中，生成一个“闪剧”拍摄方案。

Input Data:
- 话题/情绪: "{topic}"
- 风格倾向: "{style}"
- 基础动作符号: "{name}"
- 动作视觉描述: "{visual}"
- 原始道具建议: "{props}"

Step-by-Step Thinking:
1. **符号解码：** 先分析这个“基础动作”的经典之处（Iconic Element）在哪里？（比如：如果是泰坦尼克号，经典在于双臂张开；如果是无间道，经典在于指头）。
2. **错位重组：** 保持这个“经典动作”不变，但把里面的道具和人物动机，替换成"{topic}"相关的元素。
3. **穷鬼化：** 所有特效必须用廉价生活用品模拟。

Output Format (Markdown):
请直接输出脚本卡片内容：

### 🎬 剧名：[结合话题起个怪名字]

**👁️ 视觉符号 (The Hook):**
[一句话描述这是什么动作的变体，例如：致敬《无间道》天台，但拿的是辣条]

**🎥 单镜头调度:**
[详细描述画面。谁？在哪里？做了什么？必须保留原动作的经典特征！]

**🛠️ 穷鬼特效/道具:**
*   **核心道具:** [...替换为生活用品]
*   **操作:** [...如何使用]

**🎭 演员状态:**
[面瘫/极度夸张/抽搐]
"#,
        name = record.name,
        visual = record.visual_description,
        props = record.props,
    )
}

fn visual_prompt(record: &ActionRecord, topic: &str, style: &str) -> String {
    let emotions = if record.emotions.is_empty() {
        "无".to_string()
    } else {
        record.emotion_tags()
    };
    format!(
        r#"Role: 你是一位先锋短视频导演，擅长用一个镜头讲完一个故事。

Task: 将用户给定的【话题】强行植入到指定的【动作符号】中，生成一个可以直接开拍的“闪剧”分镜方案。

Input Data:
- 话题/情绪: "{topic}"
- 风格倾向: "{style}"
- 基础动作符号: "{name}"
- 动作视觉描述: "{visual}"
- 原始道具建议: "{props}"
- 拍摄难度: "{difficulty}"
- 原始画面提示 (MJ Prompt): "{mj_prompt}"
- 原始情绪标签: "{emotions}"

Step-by-Step Thinking:
1. **符号解码：** 结合画面提示，找出这个“基础动作”最经典的构图和姿态（Iconic Element）。
2. **情绪错位：** 原始情绪是“{emotions}”，把它翻转或放大，服务于"{topic}"。
3. **错位重组：** 保持经典构图不变，把道具和人物动机替换成"{topic}"相关的元素。
4. **穷鬼化：** 所有特效必须用廉价生活用品模拟，难度不得超过“{difficulty}”。

Output Format (Markdown):
请直接输出脚本卡片内容：

### 🎬 剧名：[结合话题起个怪名字]

**👁️ 视觉符号 (The Hook):**
[一句话描述这是什么动作的变体]

**🖼️ 画面构图:**
[景别、机位、光线，参考原始画面提示]

**🎥 单镜头调度:**
[详细描述画面。谁？在哪里？做了什么？必须保留原动作的经典特征！]

**🛠️ 穷鬼特效/道具:**
*   **核心道具:** [...替换为生活用品]
*   **操作:** [...如何使用]

**🎭 演员状态:**
[面瘫/极度夸张/抽搐]

**🎨 生图提示词 (English):**
[一行英文 Midjourney 提示词，描述重混后的画面]
"#,
        name = record.name,
        visual = record.visual_description,
        props = record.props,
        difficulty = record.difficulty,
        mj_prompt = record.mj_prompt,
    )
}
