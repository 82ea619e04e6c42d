//! `scribe generate` command implementation.

use std::path::PathBuf;

use clap::Args;
use scribe_document::parse;
use scribe_provider::{ContentRequest, ContentType};
use tracing::info;

use super::ProviderArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    #[command(flatten)]
    providers: ProviderArgs,

    /// Title of the content to generate.
    #[arg(long)]
    title: String,

    /// Content type: snippet or page.
    #[arg(long = "type", default_value = "snippet")]
    content_type: ContentType,

    /// Writing profile prompt, used as the system message.
    #[arg(long, conflicts_with = "prompt_file")]
    prompt: Option<String>,

    /// File containing the writing profile prompt.
    #[arg(long)]
    prompt_file: Option<PathBuf>,

    /// Category tag (repeatable).
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Approximate target length in words.
    #[arg(long)]
    words: Option<u32>,

    /// Additional instructions appended to the prompt.
    #[arg(long)]
    instructions: Option<String>,

    /// Print the generated content as a JSON document instead of HTML.
    #[arg(long)]
    json: bool,
}

impl GenerateArgs {
    /// Generate content through the provider factory and print it.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.providers.load_config()?;
        let factory = super::build_factory(&config)?;

        let profile = match (&self.prompt, &self.prompt_file) {
            (Some(prompt), _) => prompt.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => {
                return Err(CliError::Validation(
                    "either --prompt or --prompt-file is required".to_owned(),
                ));
            }
        };

        let mut request = ContentRequest::new(self.title, self.content_type, profile.trim());
        request.categories = self.categories;
        request.word_count = self.words;
        request.extra_instructions = self.instructions;

        let response = factory.generate_content(&request).await?;
        info!(
            provider = %response.provider_name,
            model = %response.model,
            "Content generated"
        );

        if self.json {
            output.emit(&parse(&response.content).to_json()?)?;
        } else {
            output.emit(&response.content)?;
        }

        let tokens = response
            .usage
            .map(|usage| format!(", {} tokens", usage.total_tokens))
            .unwrap_or_default();
        output.success(&format!(
            "Generated by {} ({}{tokens})",
            response.provider_name, response.model
        ));
        Ok(())
    }
}
