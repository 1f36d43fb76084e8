//! Output size selection for daily series requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much history a daily series request asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputSize {
    /// The latest ~100 data points.
    Compact,
    /// The full available history.
    #[default]
    Full,
}

impl OutputSize {
    /// Returns the query parameter value for this size.
    #[must_use]
    pub const fn as_param(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}
