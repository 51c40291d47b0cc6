//! Command sources.
//!
//! Commands come either from the indented code blocks of a documentation
//! file or from every line of a plain input file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SourceError};

/// Leading whitespace that marks a documentation line as a command.
pub const CODE_INDENT: &str = "    ";

/// Where the replayed command lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    /// Lines starting with four spaces, everything else skipped.
    Document(PathBuf),

    /// Every line, blank ones included.
    Verbatim(PathBuf),
}

impl CommandSource {
    pub fn path(&self) -> &Path {
        match self {
            CommandSource::Document(path) | CommandSource::Verbatim(path) => path,
        }
    }

    /// Read the file and select its command lines, in file order.
    pub fn load(&self) -> Result<Vec<String>> {
        let path = self.path();
        let text = fs::read_to_string(path).map_err(|source| SourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let commands = match self {
            CommandSource::Document(_) => extract_indented(&text),
            CommandSource::Verbatim(_) => split_verbatim(&text),
        };
        log::debug!("{} commands from {}", commands.len(), path.display());
        Ok(commands)
    }
}

/// Lines that start with at least four spaces.
///
/// Tabs do not count as indentation. A line consisting only of four or
/// more spaces is selected and ends up as an empty command.
pub fn extract_indented(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.starts_with(CODE_INDENT))
        .map(str::to_string)
        .collect()
}

/// Every line of `text`.
pub fn split_verbatim(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indented_lines_only() {
        let text = "Intro text\n    1 2 +\nExplanation\n    . cr\n";
        assert_eq!(extract_indented(text), ["    1 2 +", "    . cr"]);
    }

    #[test]
    fn test_indent_threshold() {
        let text = concat!(
            "   three\n",
            "    four\n",
            "        eight\n",
            "\tTab\n",
            "\n",
            "  \n",
            "no indent\n",
        );
        assert_eq!(extract_indented(text), ["    four", "        eight"]);
    }

    #[test]
    fn test_crlf_document() {
        let text = "# Title\r\n    : sq dup * ;\r\n\r\n    5 sq .\r\n";
        assert_eq!(extract_indented(text), ["    : sq dup * ;", "    5 sq ."]);
    }

    #[test]
    fn test_verbatim_keeps_blank_lines() {
        let text = "1 2 +\n\n  . cr\n";
        assert_eq!(split_verbatim(text), ["1 2 +", "", "  . cr"]);
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("forthcon-source-{}.md", std::process::id()));
        fs::write(&path, "Words:\n    words\nverbatim\n").unwrap();

        let document = CommandSource::Document(path.clone()).load().unwrap();
        let verbatim = CommandSource::Verbatim(path.clone()).load().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(document, ["    words"]);
        assert_eq!(verbatim, ["Words:", "    words", "verbatim"]);
    }

    #[test]
    fn test_missing_file() {
        let err = CommandSource::Verbatim(PathBuf::from("/nonexistent/forth.fs"))
            .load()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Source(SourceError::Unreadable { .. })
        ));
    }
}
