//! Line ending selection for printed output.

use serde::{Deserialize, Serialize};

/// Line ending used when printing bundles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewLineKind {
    /// Whatever the host platform uses.
    #[default]
    Platform,
    #[serde(alias = "lf")]
    LineFeed,
    #[serde(alias = "crlf")]
    CarriageReturnLineFeed,
}

impl NewLineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NewLineKind::LineFeed => "\n",
            NewLineKind::CarriageReturnLineFeed => "\r\n",
            NewLineKind::Platform => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}
