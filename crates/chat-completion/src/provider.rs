use serde::{Deserialize, Serialize};

/// OpenAI-compatible completion providers with known endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    DeepSeek,
    OpenAi,
    SiliconFlow,
}

impl Provider {
    pub fn base_url(self) -> &'static str {
        match self {
            Provider::DeepSeek => "https://api.deepseek.com",
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::SiliconFlow => "https://api.siliconflow.cn/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::DeepSeek => "deepseek-chat",
            Provider::OpenAi => "gpt-4o-mini",
            Provider::SiliconFlow => "deepseek-ai/DeepSeek-V3",
        }
    }
}
