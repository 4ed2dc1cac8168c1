pub mod audio;
pub mod protocol;
pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{GenerativeProvider, LLMError, Result};
pub use providers::GeminiProvider;
pub use types::{GenerativeRequest, GenerativeResponse, InlineMedia, OutputKind};
