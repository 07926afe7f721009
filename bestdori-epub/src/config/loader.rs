//! Settings loader
//!
//! 1. Read the YAML settings file, if one was given
//! 2. Apply command-line overrides
//! 3. Validate

use std::path::Path;

use crate::cli::args::{BuildArgs, SourceArgs};
use crate::config::schema::Settings;
use crate::error::ConfigError;

/// Reads settings from `path`, or returns defaults when there is none.
///
/// # Errors
///
/// Returns `ConfigError::MissingFile` if the file does not exist and
/// `ConfigError::ParseError` if it is not a valid settings document.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    // An empty file is an empty mapping, not an error.
    if raw.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Applies data-source overrides.
fn apply_source(settings: &mut Settings, args: &SourceArgs) {
    if let Some(ref base_url) = args.base_url {
        settings.base_url.clone_from(base_url);
    }
    if let Some(region) = args.region {
        settings.region = region;
    }
    if let Some(ref timeout) = args.timeout {
        settings.timeout.clone_from(timeout);
    }
}

/// Loads and validates settings for commands that only read the mirror.
///
/// # Errors
///
/// Returns a `ConfigError` if loading or validation fails.
pub fn settings_for_source(
    path: Option<&Path>,
    args: &SourceArgs,
) -> Result<Settings, ConfigError> {
    let mut settings = load_settings(path)?;
    apply_source(&mut settings, args);
    settings.validate()?;
    Ok(settings)
}

/// Loads and validates settings for `build`.
///
/// Exclusions from the command line are added to those in the file.
///
/// # Errors
///
/// Returns a `ConfigError` if loading or validation fails.
pub fn settings_for_build(path: Option<&Path>, args: &BuildArgs) -> Result<Settings, ConfigError> {
    let mut settings = load_settings(path)?;
    apply_source(&mut settings, &args.source);

    if let Some(ref dir) = args.cache_dir {
        settings.cache_dir.clone_from(dir);
    }
    if let Some(ref dir) = args.output_dir {
        settings.output_dir.clone_from(dir);
    }
    if let Some(format) = args.format {
        settings.format = format;
    }
    if let Some(ref pandoc) = args.pandoc {
        settings.pandoc.clone_from(pandoc);
    }
    if args.pandoc_args.is_some() {
        settings.pandoc_args.clone_from(&args.pandoc_args);
    }
    settings
        .exclude_events
        .extend(args.exclude_events.iter().copied());
    settings
        .exclude_scenarios
        .extend(args.exclude_scenarios.iter().cloned());
    settings.legacy_separators |= args.legacy_separators;

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use bestdori_epub_core::Region;

    use super::*;
    use crate::config::schema::BookFormat;

    fn write_settings(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_no_file_gives_defaults() {
        assert_eq!(load_settings(None).unwrap(), Settings::default());
    }

    #[test]
    fn test_missing_file() {
        let err = load_settings(Some(Path::new("/nonexistent/bestdori-epub.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = write_settings("\n");
        assert_eq!(load_settings(Some(file.path())).unwrap(), Settings::default());
    }

    #[test]
    fn test_parse_error_names_file() {
        let file = write_settings("region: [jp\n");
        let err = load_settings(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = write_settings("region: jp\noutput_dir: books\nexclude_events: [1]\n");
        let args = BuildArgs {
            source: SourceArgs {
                region: Some(Region::Kr),
                ..SourceArgs::default()
            },
            format: Some(BookFormat::Markdown),
            exclude_events: vec![2],
            ..BuildArgs::default()
        };
        let settings = settings_for_build(Some(file.path()), &args).unwrap();
        assert_eq!(settings.region, Region::Kr);
        assert_eq!(settings.output_dir, PathBuf::from("books"));
        assert_eq!(settings.format, BookFormat::Markdown);
        assert_eq!(settings.exclude_events.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_legacy_flag_or_file() {
        let file = write_settings("legacy_separators: true\n");
        let settings = settings_for_build(Some(file.path()), &BuildArgs::default()).unwrap();
        assert!(settings.legacy_separators);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = SourceArgs {
            timeout: Some("eventually".to_string()),
            ..SourceArgs::default()
        };
        assert!(settings_for_source(None, &args).is_err());
    }
}
