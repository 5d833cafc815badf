use colored::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::collector::OBJECT;
use crate::surface::{DEFAULT_SYNTHETIC_MARKER, InspectOptions};
use crate::{ClassPath, Error, Result};

pub const CONFIG_FILE: &str = "jdesc.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_classpath")]
    pub classpath: Vec<PathBuf>,
    #[serde(default = "default_root_class")]
    pub root_class: String,
    #[serde(default = "default_synthetic_marker")]
    pub synthetic_marker: String,
}

fn default_classpath() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

fn default_root_class() -> String {
    OBJECT.to_string()
}

fn default_synthetic_marker() -> String {
    DEFAULT_SYNTHETIC_MARKER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classpath: default_classpath(),
            root_class: default_root_class(),
            synthetic_marker: default_synthetic_marker(),
        }
    }
}

impl Config {
    /// Reads `jdesc.toml` from the working directory, falling back to defaults with a
    /// warning if it cannot be read or parsed.
    pub fn load() -> Self {
        let config_path = PathBuf::from(CONFIG_FILE);

        if config_path.exists() {
            match fs::read_to_string(&config_path) {
                Ok(content) => match Config::parse(&content) {
                    Ok(config) => {
                        return config;
                    }
                    Err(e) => {
                        eprintln!("{} Failed to parse {}: {}", "⚠️".yellow(), CONFIG_FILE, e);
                        eprintln!("   Using default configuration");
                    }
                },
                Err(e) => {
                    eprintln!("{} Failed to read {}: {}", "⚠️".yellow(), CONFIG_FILE, e);
                    eprintln!("   Using default configuration");
                }
            }
        }

        Config::default()
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if config.root_class.trim().is_empty() {
            return Err(Error::Config("root_class must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Puts `entries` ahead of the configured class path so they shadow it.
    pub fn with_leading_classpath(mut self, entries: Vec<PathBuf>) -> Self {
        self.classpath.splice(0..0, entries);
        self
    }

    pub fn class_path(&self) -> ClassPath {
        ClassPath::from_paths(self.classpath.iter().cloned())
    }

    pub fn inspect_options(&self) -> InspectOptions {
        InspectOptions {
            root_class: self.root_class.clone(),
            synthetic_marker: self.synthetic_marker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassPathEntry;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn reads_every_field() {
        let config = Config::parse(
            r#"
            classpath = ["out", "lib/guava.jar"]
            root_class = "kotlin.Any"
            synthetic_marker = "$lambda"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.class_path().entries(),
            [
                ClassPathEntry::Directory("out".into()),
                ClassPathEntry::Jar("lib/guava.jar".into()),
            ]
        );
        assert_eq!(
            config.inspect_options(),
            InspectOptions {
                root_class: "kotlin.Any".into(),
                synthetic_marker: "$lambda".into(),
            }
        );
    }

    #[test]
    fn leading_entries_shadow_configured_ones() {
        let config = Config::parse("classpath = [\"out\", \"lib/guava.jar\"]")
            .unwrap()
            .with_leading_classpath(vec!["patch.jar".into(), "build".into()]);

        assert_eq!(
            config.class_path().entries(),
            [
                ClassPathEntry::Jar("patch.jar".into()),
                ClassPathEntry::Directory("build".into()),
                ClassPathEntry::Directory("out".into()),
                ClassPathEntry::Jar("lib/guava.jar".into()),
            ]
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::parse("classpath = 3"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::parse("root_class = \"  \""),
            Err(Error::Config(_))
        ));
    }
}
