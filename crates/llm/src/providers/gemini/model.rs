use strum::{Display, EnumString};

#[derive(Debug, EnumString, Display, Clone)]
pub enum GeminiModel {
    #[strum(serialize = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,
    #[strum(serialize = "gemini-2.5-flash")]
    Gemini25Flash,
    #[strum(serialize = "gemini-2.5-pro")]
    Gemini25Pro,
}
