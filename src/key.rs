//! Series keys derived from release file names.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// `[group] Title - NN <anything>`; the title is the second capture.
static EPISODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(.+)\] (.+) - (\d+) .*").expect("episode pattern is valid")
});

/// Grouping key shared by every episode of a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesKey(String);

impl SeriesKey {
    /// Derive the key for `file_name`.
    ///
    /// Names following the `[group] Title - NN ...` convention key on
    /// `Title`; anything else is its own series and keys on the whole name.
    pub fn from_file_name(file_name: &str) -> Self {
        let key = EPISODE_PATTERN
            .captures(file_name)
            .and_then(|caps| caps.get(2))
            .map_or(file_name, |title| title.as_str());
        Self(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
