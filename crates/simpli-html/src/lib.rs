//! Simpli HTML Parser
//!
//! HTML5 parsing built on html5ever, producing `simpli_dom` documents and
//! fragments for `innerHTML`-style replacement.

mod error;
mod parser;

pub use error::HtmlError;
pub use parser::HtmlParser;

use simpli_dom::Document;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}
