use colored::*;
use std::{
    fs,
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
};

use jdesc::classpath::read_class_file;
use jdesc::{ClassFile, ClassPath, ClassSource, Config, Inspector, Result};

use crate::syntax::highlight_json;

#[derive(Debug)]
pub struct DescribeContext {
    pub config: Config,
    pub classpath: ClassPath,
    pub verbose: bool,
    pub color: bool,
}

/// A `.class` file on disk is read directly; anything else is a binary name looked
/// up on the class path.
pub fn resolve_class(classpath: &ClassPath, target: &str) -> Result<ClassFile> {
    let path = Path::new(target);
    if target.ends_with(".class") && path.is_file() {
        return read_class_file(path);
    }
    classpath.load_class(target)
}

pub fn describe_class(ctx: &DescribeContext, target: &str, output: Option<&PathBuf>) -> Result<()> {
    let class = resolve_class(&ctx.classpath, target)?;

    if ctx.verbose {
        eprintln!(
            "{} Describing {} (class file version {}.{})",
            "🔍".cyan(),
            class.this_class.green(),
            class.major_version,
            class.minor_version
        );
    }

    let inspector = Inspector::new(&ctx.classpath, &ctx.config.inspect_options())?;
    let json = inspector.describe_public(&class)?;

    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))?;
            eprintln!(
                "{} Wrote public API of {} to {}",
                "✅".green(),
                class.this_class.green(),
                path.display()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            if ctx.color && stdout.is_terminal() {
                writeln!(stdout, "{}", highlight_json(&json))?;
            } else {
                writeln!(stdout, "{}", json)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_target_is_looked_up_by_name() {
        let classpath = ClassPath::default();
        let result = resolve_class(&classpath, "does/not/Exist.class");
        assert!(matches!(result, Err(jdesc::Error::ClassNotFound(_))));
    }

    #[test]
    fn writes_json_to_the_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("api.json");
        let ctx = DescribeContext {
            config: Config::default(),
            classpath: ClassPath::default(),
            verbose: false,
            color: false,
        };

        // A hand-written minimal class: public class Empty extends Object, no members.
        let class_path = dir.path().join("Empty.class");
        let mut bytes = vec![0xCA, 0xFE, 0xBA, 0xBE, 0, 0, 0, 61, 0, 5];
        bytes.extend_from_slice(&[1, 0, 5]);
        bytes.extend_from_slice(b"Empty");
        bytes.extend_from_slice(&[7, 0, 1]);
        bytes.extend_from_slice(&[1, 0, 16]);
        bytes.extend_from_slice(b"java/lang/Object");
        bytes.extend_from_slice(&[7, 0, 3]);
        bytes.extend_from_slice(&[0, 0x21, 0, 2, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0]);
        fs::write(&class_path, bytes).unwrap();

        describe_class(&ctx, class_path.to_str().unwrap(), Some(&output)).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "{\n  \"Empty\": []\n}\n"
        );
    }
}
