//! Content-generation requests and prompt templating.

use std::fmt::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{CompletionRequest, Message};

/// Kind of content to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentType {
    /// Short fragment (a few paragraphs).
    Snippet,
    /// Full page.
    Page,
}

impl ContentType {
    /// Output token budget for this content type.
    #[must_use]
    pub fn max_tokens(self) -> u32 {
        match self {
            Self::Snippet => 500,
            Self::Page => 2000,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Snippet => "snippet",
            Self::Page => "page",
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snippet" => Ok(Self::Snippet),
            "page" => Ok(Self::Page),
            other => Err(format!(
                "unknown content type '{other}' (expected 'snippet' or 'page')"
            )),
        }
    }
}

/// Writing profile: the system prompt, used verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub prompt: String,
}

/// Request to generate a piece of content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub categories: Vec<String>,
    pub profile: Profile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_instructions: Option<String>,
}

impl ContentRequest {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content_type: ContentType,
        profile_prompt: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content_type,
            categories: Vec::new(),
            profile: Profile {
                prompt: profile_prompt.into(),
            },
            word_count: None,
            extra_instructions: None,
        }
    }

    /// User prompt templated from title, type, categories and options.
    #[must_use]
    pub fn user_prompt(&self) -> String {
        let mut prompt = format!(
            "Write a {} titled \"{}\".",
            self.content_type.noun(),
            self.title.trim()
        );

        let categories: Vec<&str> = self
            .categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if !categories.is_empty() {
            write!(prompt, "\nCategories: {}.", categories.join(", ")).unwrap();
        }
        if let Some(words) = self.word_count {
            write!(prompt, "\nTarget length: about {words} words.").unwrap();
        }
        if let Some(extra) = self.extra_instructions.as_deref().map(str::trim)
            && !extra.is_empty()
        {
            write!(prompt, "\nAdditional instructions: {extra}").unwrap();
        }
        prompt.push_str(
            "\nRespond with HTML only, using <h2>-<h4>, <p>, <ul>, <ol>, <blockquote>, \
             <table> and <code> elements. Do not wrap the answer in Markdown fences.",
        );
        prompt
    }

    /// Completion request: profile prompt as system message, templated user
    /// prompt, and the content type's token budget.
    #[must_use]
    pub fn to_completion_request(&self) -> CompletionRequest {
        CompletionRequest::new(vec![
            Message::system(self.profile.prompt.clone()),
            Message::user(self.user_prompt()),
        ])
        .with_max_tokens(self.content_type.max_tokens())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::types::Role;

    #[test]
    fn test_max_tokens_per_type() {
        assert_eq!(ContentType::Snippet.max_tokens(), 500);
        assert_eq!(ContentType::Page.max_tokens(), 2000);
    }

    #[test]
    fn test_parse_content_type() {
        assert_eq!("PAGE".parse::<ContentType>(), Ok(ContentType::Page));
        assert!("essay".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_minimal_user_prompt() {
        let request = ContentRequest::new("Rust ownership", ContentType::Snippet, "You write docs.");
        let prompt = request.user_prompt();
        assert!(prompt.starts_with("Write a snippet titled \"Rust ownership\"."));
        assert!(!prompt.contains("Categories"));
        assert!(!prompt.contains("Target length"));
    }

    #[test]
    fn test_full_user_prompt() {
        let mut request = ContentRequest::new("Intro", ContentType::Page, "p");
        request.categories = vec!["rust".to_owned(), " ".to_owned(), "memory".to_owned()];
        request.word_count = Some(800);
        request.extra_instructions = Some("Use examples.".to_owned());

        let prompt = request.user_prompt();
        assert!(prompt.contains("\nCategories: rust, memory."));
        assert!(prompt.contains("\nTarget length: about 800 words."));
        assert!(prompt.contains("\nAdditional instructions: Use examples."));
    }

    #[test]
    fn test_completion_request_shape() {
        let request = ContentRequest::new("T", ContentType::Page, "Be a technical writer.");
        let completion = request.to_completion_request();

        assert_eq!(completion.max_tokens, Some(2000));
        assert_eq!(completion.messages.len(), 2);
        assert_eq!(completion.messages[0].role, Role::System);
        assert_eq!(completion.messages[0].content, "Be a technical writer.");
        assert_eq!(completion.messages[1].role, Role::User);
    }

    #[test]
    fn test_request_wire_shape() {
        let json = r#"{"title":"T","type":"SNIPPET","profile":{"prompt":"p"}}"#;
        let request: ContentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.content_type, ContentType::Snippet);
        assert!(request.categories.is_empty());
    }
}
