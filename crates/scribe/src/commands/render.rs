//! `scribe render` command implementation.

use std::path::PathBuf;

use clap::Args;
use scribe_document::{Document, to_clean_html, to_styled_html};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// JSON document file (`-` for stdin).
    input: PathBuf,

    /// Emit plain semantic HTML instead of themed inline styles.
    #[arg(long)]
    clean: bool,
}

impl RenderArgs {
    /// Serialize a JSON document to HTML on stdout.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let json = super::read_input(&self.input)?;
        let document = Document::from_json(&json)?;

        let html = if self.clean {
            to_clean_html(&document)
        } else {
            to_styled_html(&document)
        };
        Output::new().emit(&html)?;
        Ok(())
    }
}
