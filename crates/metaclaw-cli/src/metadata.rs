// Metadata parsing for --meta flag
//
// Artifact metadata is a flat string map, so keys are taken verbatim:
// `org.opencontainers.source=...` is a single key, not a nested object.

use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

/// Parses a list of key=value strings into a metadata map.
///
/// Later occurrences of a key replace earlier ones.
///
/// # Examples
/// ```
/// use metaclaw_cli::metadata::parse_metadata;
///
/// let args = vec!["owner=search-team".to_string(), "entrypoint=main.py".to_string()];
/// let result = parse_metadata(&args).unwrap();
/// assert_eq!(result["owner"], "search-team");
/// ```
pub fn parse_metadata(args: &[String]) -> Result<BTreeMap<String, String>> {
    let mut metadata = BTreeMap::new();

    for arg in args {
        let (key, value) = parse_key_value(arg)?;
        metadata.insert(key, value);
    }

    Ok(metadata)
}

/// Merges parsed `--meta` pairs over an existing metadata map.
pub fn merge_metadata(
    base: Option<BTreeMap<String, String>>,
    args: &[String],
) -> Result<Option<BTreeMap<String, String>>> {
    if args.is_empty() {
        return Ok(base);
    }
    let mut merged = base.unwrap_or_default();
    merged.extend(parse_metadata(args)?);
    Ok(Some(merged))
}

/// Parses a single "key=value" string.
fn parse_key_value(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg.split_once('=').ok_or_else(|| {
        anyhow!(
            "Invalid metadata format: '{}'. Expected 'key=value'",
            arg
        )
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Empty key in metadata: '{}'", arg));
    }

    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_simple_key_value() {
        let result = parse_metadata(&args(&["owner=search-team", "entrypoint=main.py"])).unwrap();

        assert_eq!(result["owner"], "search-team");
        assert_eq!(result["entrypoint"], "main.py");
    }

    #[test]
    fn test_dotted_keys_stay_flat() {
        let result = parse_metadata(&args(&["org.opencontainers.source=https://x"])).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result["org.opencontainers.source"], "https://x");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_metadata(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_value_with_equals_sign() {
        let result = parse_metadata(&args(&["equation=a=b+c"])).unwrap();

        assert_eq!(result["equation"], "a=b+c");
    }

    #[test]
    fn test_last_value_wins() {
        let result = parse_metadata(&args(&["channel=beta", "channel=stable"])).unwrap();

        assert_eq!(result["channel"], "stable");
    }

    #[test]
    fn test_invalid_format_no_equals() {
        let result = parse_metadata(&args(&["no_equals_sign"]));

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Expected 'key=value'"));
    }

    #[test]
    fn test_invalid_format_empty_key() {
        let result = parse_metadata(&args(&["  =value"]));

        assert!(result.unwrap_err().to_string().contains("Empty key"));
    }

    #[test]
    fn test_whitespace_trimming() {
        let result = parse_metadata(&args(&["  key  =  value  "])).unwrap();

        assert_eq!(result["key"], "value");
    }

    #[test]
    fn test_merge_over_existing() {
        let base = BTreeMap::from([
            ("owner".to_string(), "search-team".to_string()),
            ("channel".to_string(), "beta".to_string()),
        ]);

        let merged = merge_metadata(Some(base.clone()), &args(&["channel=stable"]))
            .unwrap()
            .unwrap();
        assert_eq!(merged["owner"], "search-team");
        assert_eq!(merged["channel"], "stable");

        assert_eq!(merge_metadata(Some(base.clone()), &[]).unwrap(), Some(base));
        assert_eq!(merge_metadata(None, &[]).unwrap(), None);
    }
}
