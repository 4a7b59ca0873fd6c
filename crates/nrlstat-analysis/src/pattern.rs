use std::fmt;

use regex::Regex;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid filename pattern '{pattern}': {source}")]
pub struct PatternError {
    pattern: String,
    source: regex::Error,
}

/// A shell-style filename wildcard (`*` matches any run of characters, `?`
/// exactly one), matched against file names only, never against directories.
#[derive(Debug, Clone)]
pub struct FilenamePattern {
    glob: String,
    regex: Regex,
}

impl FilenamePattern {
    /// Compiles a wildcard pattern such as `ground_only_*.csv`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nrlstat_analysis::pattern::FilenamePattern;
    ///
    /// let pattern = FilenamePattern::new("ground_only_*.csv").unwrap();
    /// assert!(pattern.matches("ground_only_aodv_1.csv"));
    /// assert!(!pattern.matches("dual_layer_aodv_1.csv"));
    /// assert!(!pattern.matches("ground_only_aodv_1.csv.bak"));
    /// ```
    pub fn new(glob: &str) -> Result<Self, PatternError> {
        let mut source = String::with_capacity(glob.len() + 8);
        source.push('^');
        let mut literal = String::new();
        for ch in glob.chars() {
            match ch {
                '*' | '?' => {
                    source.push_str(&regex::escape(&literal));
                    literal.clear();
                    source.push_str(if ch == '*' { ".*" } else { "." });
                }
                _ => literal.push(ch),
            }
        }
        source.push_str(&regex::escape(&literal));
        source.push('$');

        let regex = Regex::new(&source).map_err(|source| PatternError {
            pattern: glob.to_owned(),
            source,
        })?;
        Ok(Self {
            glob: glob.to_owned(),
            regex,
        })
    }

    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.glob
    }
}

impl fmt::Display for FilenamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.glob, f)
    }
}
