//! Prompts sent to the analysis provider.

use crate::types::{Message, jpeg_data_url};

const URL_SYSTEM_PROMPT: &str = "You are a financial research assistant. \
Given a web page URL, determine whether the site belongs to a publicly traded company. \
If it does, report the company name, stock ticker symbol and exchange, list its recent SEC \
filings (10-K, 10-Q, 8-K, Forms 3-4-5, Schedule 13D) and summarize key financial information. \
If it does not, say so and describe what kind of site it is. \
Answer in Markdown with short sections.";

const SCREENSHOT_PROMPT: &str = "You are an AI assistant that analyzes screenshots of webpages. \
Describe what you see in this image in detail, including text content, \
layout, and visual elements. Be thorough but concise.";

/// Text returned for screenshots when no live analysis is available.
pub const SCREENSHOT_FALLBACK_TEXT: &str = "I can see a webpage displayed in a browser window. \
The page contains text content, navigation elements, and possibly images. \
The layout appears to be structured with headers and content sections. \
This analysis is a mock response - when using the real Groq API, you'll receive a detailed \
description of the actual content visible in the screenshot.";

/// Messages asking for a stock-research analysis of `url`.
pub fn url_messages(url: &str) -> Vec<Message> {
    vec![
        Message::system(URL_SYSTEM_PROMPT),
        Message::user(format!("Analyze this website: {url}")),
    ]
}

/// Messages asking for a description of a screenshot.
///
/// Vision models reject system messages alongside images, so the
/// instructions travel in the single user message.
pub fn screenshot_messages(base64_image: &str) -> Vec<Message> {
    vec![Message::user_with_image(
        SCREENSHOT_PROMPT,
        jpeg_data_url(base64_image),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn url_prompt_mentions_url() {
        let messages = url_messages("https://www.nvidia.com/page");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(
            messages[1]
                .content
                .as_text()
                .unwrap()
                .contains("https://www.nvidia.com/page")
        );
    }

    #[test]
    fn screenshot_prompt_is_single_multimodal_user_message() {
        let messages = screenshot_messages("aGVsbG8=");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0].content.has_image());
    }
}
