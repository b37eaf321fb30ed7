//! Generator configuration.
//!
//! Options arrive as `key[=value]` pairs, usually written comma-separated after `--gen`
//! (`package_prefix=github.com/acme/,skip_remote`).

use idlgo_core::lang::runtime;

use super::errors::{GenResult, GenerateError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Prepended to every generated import path of an included program.
    pub package_prefix: String,
    /// Import path of the Go runtime library.
    pub thrift_import: String,
    /// Output module override; replaces every program's namespace.
    pub package: Option<String>,
    /// Emit unexported `read`/`write` codec methods.
    pub read_write_private: bool,
    pub ignore_initialisms: bool,
    /// Do not emit the `-remote` command-line units.
    pub skip_remote: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            package_prefix: String::new(),
            thrift_import: runtime::DEFAULT_IMPORT_PATH.to_string(),
            package: None,
            read_write_private: false,
            ignore_initialisms: false,
            skip_remote: false,
        }
    }
}

impl GeneratorOptions {
    /// Build options from `(key, value)` pairs; an unrecognized key fails immediately.
    pub fn from_pairs<'a, I>(pairs: I) -> GenResult<Self>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            let value = value.unwrap_or("");
            match key {
                "package_prefix" => options.package_prefix = value.to_string(),
                "thrift_import" => options.thrift_import = value.to_string(),
                "package" => options.package = Some(value.to_string()).filter(|p| !p.is_empty()),
                "read_write_private" => options.read_write_private = true,
                "ignore_initialisms" => options.ignore_initialisms = true,
                "skip_remote" => options.skip_remote = true,
                other => return Err(GenerateError::UnknownOption(other.to_string())),
            }
        }
        Ok(options)
    }

    /// Parse a comma-separated `key[=value]` list.
    pub fn parse(spec: &str) -> GenResult<Self> {
        Self::from_pairs(
            spec.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| match item.split_once('=') {
                    Some((key, value)) => (key.trim(), Some(value.trim())),
                    None => (item, None),
                }),
        )
    }

    /// Name of the generated decode method.
    pub fn read_method(&self) -> &'static str {
        if self.read_write_private { "read" } else { "Read" }
    }

    /// Name of the generated encode method.
    pub fn write_method(&self) -> &'static str {
        if self.read_write_private { "write" } else { "Write" }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::parse("").unwrap();
        assert_eq!(options.thrift_import, "github.com/apache/thrift/lib/go/thrift");
        assert_eq!(options.read_method(), "Read");
        assert!(!options.skip_remote);
    }

    #[test]
    fn test_parse_values_and_flags() {
        let options =
            GeneratorOptions::parse("package_prefix=github.com/acme/, skip_remote,read_write_private,package=api")
                .unwrap();
        assert_eq!(options.package_prefix, "github.com/acme/");
        assert_eq!(options.package.as_deref(), Some("api"));
        assert!(options.skip_remote);
        assert_eq!(options.write_method(), "write");
    }

    #[test]
    fn test_unknown_option_fails() {
        let err = GeneratorOptions::parse("skip_remote,frobnicate=1").unwrap_err();
        assert_eq!(err.to_string(), "unknown option go:frobnicate");
    }
}
