use colored::*;
use std::{fs, path::Path};

use jdesc::config::CONFIG_FILE;
use jdesc::{Error, Result};

const TEMPLATE: &str = r#"# jdesc Configuration File

# Directories and .jar files searched for classes, in order
# Defaults to "." (current directory)
classpath = ["."]

# Type every class inherits from. Methods with the same name and
# parameter types as one of its public methods are left out.
root_class = "java.lang.Object"

# Methods whose name contains this text are treated as compiler-generated
synthetic_marker = "lambda"
"#;

pub fn init_config(force: bool) -> Result<()> {
    write_template(Path::new(CONFIG_FILE), force)?;

    eprintln!("{} Created {}", "✅".green(), CONFIG_FILE);
    eprintln!("\n{}", "Configuration file created with defaults:".cyan());
    eprintln!("  {} classpath = [\".\"]", "•".blue());
    eprintln!("  {} root_class = \"java.lang.Object\"", "•".blue());
    eprintln!("  {} synthetic_marker = \"lambda\"", "•".blue());
    eprintln!(
        "\n{}",
        format!("Edit {} to point at your compiled classes.", CONFIG_FILE).cyan()
    );

    Ok(())
}

fn write_template(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        )));
    }
    fs::write(path, TEMPLATE)?;
    Ok(())
}
