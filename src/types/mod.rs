//! Public types for the tabmonitor API.

mod message;
mod options;
mod response;

pub use message::{ContentPart, ImageUrl, Message, MessageContent, Role, jpeg_data_url};
pub use options::ChatOptions;
pub use response::{AnalysisResult, ChatResponse, FinishReason, Usage};
