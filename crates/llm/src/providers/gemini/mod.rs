pub mod llm;
pub mod message;
pub mod model;

pub use llm::Gemini;
pub use model::GeminiModel;
