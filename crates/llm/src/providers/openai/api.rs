use strum::{Display, EnumString};

/// Endpoint paths relative to the provider base URL (which already carries
/// the `/v1` segment, matching both the hosted API and LM Studio).
#[derive(Debug, EnumString, Display, Clone)]
pub enum OpenAIAPI {
    #[strum(serialize = "chat/completions")]
    ChatCompletion,
}
