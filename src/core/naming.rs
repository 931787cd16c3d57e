// src/core/naming.rs

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SEPARATOR_RUN_RE: Regex = Regex::new(r"[-_.\s]+").unwrap();
}

/// Converts a command-line flag into a parameter name.
///
/// The flag is lower-cased, one leading `--` or `-` is removed and every run of
/// dashes, underscores, dots or whitespace collapses into a single underscore.
///
/// ```
/// use argsmith::core::naming::flag_namify;
///
/// assert_eq!(flag_namify("--output-file"), "output_file");
/// assert_eq!(flag_namify("-SHORT__option"), "short_option");
/// ```
pub fn flag_namify(flag: &str) -> String {
    let flag = flag.to_lowercase();

    let stripped = flag
        .strip_prefix("--")
        .or_else(|| flag.strip_prefix('-'))
        .unwrap_or(&flag);

    SEPARATOR_RUN_RE.replace_all(stripped, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcases_all_characters() {
        assert_eq!(flag_namify("-SHORT-option"), "short_option");
    }

    #[test]
    fn test_replaces_dashes_dots_and_spaces() {
        assert_eq!(flag_namify("-short-option"), "short_option");
        assert_eq!(flag_namify("-short.option"), "short_option");
        assert_eq!(flag_namify("-short option"), "short_option");
    }

    #[test]
    fn test_collapses_repeated_separators() {
        assert_eq!(flag_namify("-short__option"), "short_option");
        assert_eq!(flag_namify("--group--directories..first"), "group_directories_first");
    }

    #[test]
    fn test_namifies_short_and_long_options() {
        assert_eq!(flag_namify("-v"), "v");
        assert_eq!(flag_namify("--long-option"), "long_option");
        assert_eq!(flag_namify("plain"), "plain");
    }
}
