pub mod calc;
pub mod clock;
pub mod remote;
pub mod translate;

pub use calc::Calculate;
pub use clock::CurrentTime;
pub use remote::{AgentDirectory, AgentEndpoint, AskTranslatorAgent, ListAvailableAgents};
pub use translate::{TranslateToEnglish, TranslateToJapanese};
