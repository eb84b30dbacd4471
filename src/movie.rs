use core::fmt;

use serde::Deserialize;

/// A movie record. Rows are matched to fields by the `Title` and `Year`
/// column names, so column order in the input does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Movie {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: i32,
}

impl Movie {
    pub fn new(title: impl Into<String>, year: i32) -> Self {
        Self {
            title: title.into(),
            year,
        }
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}
