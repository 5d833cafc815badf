use colored::*;

use jdesc::{ChainLink, ClassFile, ClassSource, InspectOptions, Inspector, Result};

/// Renders a superclass chain, the inspected class first, each ancestor one level deeper.
pub fn render_chain(links: &[ChainLink]) -> Vec<String> {
    links
        .iter()
        .enumerate()
        .map(|(indent, link)| {
            let counts = if link.resolved {
                format!(
                    "({} methods, {} public)",
                    link.declared_methods, link.public_methods
                )
                .dimmed()
                .to_string()
            } else {
                "(not on class path)".yellow().to_string()
            };

            if indent == 0 {
                format!("{} {} {}", "📦".cyan(), link.class_name.bold().green(), counts)
            } else {
                format!(
                    "{}{} {} {}",
                    "  ".repeat(indent - 1),
                    "└─".blue(),
                    link.class_name.green(),
                    counts
                )
            }
        })
        .collect()
}

pub fn show_tree<S: ClassSource + ?Sized>(
    source: &S,
    options: &InspectOptions,
    class: &ClassFile,
) -> Result<()> {
    let inspector = Inspector::new(source, options)?;
    let links = inspector.superclass_chain(class)?;

    println!("{} Superclass chain:\n", "📊".cyan());
    for line in render_chain(&links) {
        println!("{}", line);
    }

    Ok(())
}
