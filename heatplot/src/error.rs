//! Module containing the universal heatplot error type
use thiserror::Error;

/// Universal error type for heatplot
#[derive(Error, Debug)]
pub enum Error {
    /// The formula has no equation bound to it
    #[error("no equation bound")]
    NoEquation,

    /// The input text is not a valid equation
    #[error("invalid formula {text:?}")]
    Parse {
        /// The offending input text
        text: String,

        /// Grammar diagnostics from the parser
        #[source]
        source: Box<pest::error::Error<crate::parse::Rule>>,
    },
}
