//! `scribe convert` command implementation.

use std::path::PathBuf;

use clap::Args;
use scribe_document::HtmlParser;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// HTML file to parse (`-` for stdin).
    input: PathBuf,

    /// Pretty-print the JSON document.
    #[arg(long)]
    pretty: bool,
}

impl ConvertArgs {
    /// Parse HTML and print the document tree as JSON.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let html = super::read_input(&self.input)?;
        let document = HtmlParser::new().parse(&html);

        let json = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            document.to_json()?
        };
        Output::new().emit(&json)?;
        Ok(())
    }
}
