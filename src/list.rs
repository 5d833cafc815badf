//! Lists classes visible on the class path.

use colored::*;
use regex::Regex;

use jdesc::{ClassPath, Error, Result};

/// Class names on `classpath`, optionally narrowed to those matching `pattern`.
pub fn matching_classes(classpath: &ClassPath, pattern: Option<&str>) -> Result<Vec<String>> {
    let names = classpath.list_classes()?;

    let Some(pattern) = pattern else {
        return Ok(names);
    };
    let regex = Regex::new(pattern)
        .map_err(|e| Error::Config(format!("invalid pattern '{}': {}", pattern, e)))?;

    Ok(names.into_iter().filter(|name| regex.is_match(name)).collect())
}

pub fn list_classes(classpath: &ClassPath, pattern: Option<&str>, verbose: bool) -> Result<()> {
    if verbose {
        for entry in classpath.entries() {
            eprintln!("  {} {}", "•".cyan(), entry.path().display());
        }
    }

    let names = matching_classes(classpath, pattern)?;
    if names.is_empty() {
        eprintln!("{} No classes found", "ℹ️".blue());
        return Ok(());
    }

    for name in &names {
        match name.rsplit_once('.') {
            Some((package, simple)) => println!("{}.{}", package.dimmed(), simple.green()),
            None => println!("{}", name.green()),
        }
    }
    eprintln!(
        "\n{} Total: {} class(es)",
        "✓".green(),
        names.len().to_string().bold()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn classpath_with(names: &[&str]) -> (tempfile::TempDir, ClassPath) {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            let path = dir.path().join(format!("{}.class", name.replace('.', "/")));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            // Listing only looks at file names, not contents.
            fs::write(path, b"").unwrap();
        }
        let classpath = ClassPath::from_paths([dir.path()]);
        (dir, classpath)
    }

    #[test]
    fn lists_everything_without_a_pattern() {
        let (_dir, classpath) = classpath_with(&["b.Two", "a.One"]);
        assert_eq!(matching_classes(&classpath, None).unwrap(), ["a.One", "b.Two"]);
    }

    #[test]
    fn filters_by_regex() {
        let (_dir, classpath) =
            classpath_with(&["com.example.UserService", "com.example.User", "org.Other"]);
        assert_eq!(
            matching_classes(&classpath, Some(r"^com\..*Service$")).unwrap(),
            ["com.example.UserService"]
        );
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let (_dir, classpath) = classpath_with(&[]);
        assert!(matches!(
            matching_classes(&classpath, Some("(unclosed")),
            Err(Error::Config(_))
        ));
    }
}
