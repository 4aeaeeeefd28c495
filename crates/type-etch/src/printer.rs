//! Terminal preview of extracted modules
//!
//! Prints each module with its exports and types as a colored tree: the
//! snippet of every symbol, its description and bullets, and its children
//! indented below it.
//!
//! # Example
//!
//! ```no_run
//! use type_etch::printer::ModulePrinter;
//! use type_etch::Module;
//!
//! let modules: Vec<Module> = vec![];
//! let printer = ModulePrinter::new(&modules, true);
//! printer.print_to_stdout();
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::extracted::{Extracted, Module};

/// Terminal module printer
pub struct ModulePrinter<'a> {
    /// Modules to print
    modules: &'a [Module],
    /// Whether to use colored output
    use_color: bool,
}

impl<'a> ModulePrinter<'a> {
    /// Create a new printer
    pub fn new(modules: &'a [Module], use_color: bool) -> Self {
        Self { modules, use_color }
    }

    /// Print directly to stdout
    pub fn print_to_stdout(&self) {
        let choice = if self.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        if let Err(e) = self.write_colored(&mut stdout) {
            tracing::error!("failed to print modules: {}", e);
        }
    }

    /// Write the preview to a WriteColor implementor
    pub fn write_colored<W: WriteColor>(&self, w: &mut W) -> io::Result<()> {
        for module in self.modules {
            w.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
            write!(w, "{}", module.name)?;
            w.reset()?;
            if module.exempt {
                self.write_gray(w, " (comment only)")?;
            }
            writeln!(w)?;

            for line in module.comment.lines().filter(|l| !l.trim().is_empty()).take(3) {
                self.write_gray(w, &format!("  {}\n", line.trim()))?;
            }

            for export in &module.exports {
                self.write_symbol(w, export, 1)?;
            }
            if !module.types.is_empty() {
                w.set_color(ColorSpec::new().set_bold(true))?;
                writeln!(w, "  Types")?;
                w.reset()?;
                for ty in &module.types {
                    self.write_symbol(w, ty, 2)?;
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }

    fn write_symbol<W: WriteColor>(&self, w: &mut W, item: &Extracted, indent: usize) -> io::Result<()> {
        let ind = Indent(indent);

        for (i, line) in item.snippet.lines().enumerate() {
            write!(w, "{}", ind)?;
            if i == 0 {
                w.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            }
            writeln!(w, "{}", line.replace('\t', "  "))?;
            w.reset()?;
        }

        if let Some(notice) = &item.deprecated {
            w.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            writeln!(w, "{}  deprecated: {}", ind, notice)?;
            w.reset()?;
        }

        if let Some(first) = item.comment.lines().next().filter(|l| !l.is_empty()) {
            self.write_gray(w, &format!("{}  {}\n", ind, first))?;
        }

        for bullet in &item.bullets {
            writeln!(w, "{}  {}", ind, bullet)?;
        }

        for child in &item.children {
            self.write_symbol(w, child, indent + 1)?;
        }

        Ok(())
    }

    fn write_gray<W: WriteColor>(&self, w: &mut W, s: &str) -> io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::White)).set_dimmed(true))?;
        write!(w, "{}", s)?;
        w.reset()
    }
}

impl Display for ModulePrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut plain = NoColor::new(Vec::new());
        self.write_colored(&mut plain).map_err(|_| std::fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&plain.into_inner()))
    }
}

/// Indentation helper
struct Indent(usize);

impl Display for Indent {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for _ in 0..self.0 {
            write!(f, "  ")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{mock_extracted, mock_extracted_with_children, mock_module};
    use termcolor::Buffer;

    fn modules() -> Vec<Module> {
        let child = mock_extracted("adapter", "adapter?: Adapter;");
        let mut kit = mock_extracted_with_children(
            "KitConfig",
            "interface KitConfig {/*…*/}",
            "Kit options",
            vec![child],
        );
        kit.bullets.push("- `x` y".to_string());
        vec![mock_module(
            "@sveltejs/kit",
            vec![mock_extracted("error", "function error(status: number): never;")],
            vec![kit],
        )]
    }

    #[test]
    fn test_printer_display() {
        let modules = modules();
        let output = ModulePrinter::new(&modules, false).to_string();

        assert!(output.starts_with("@sveltejs/kit\n"));
        assert!(output.contains("  function error(status: number): never;\n"));
        assert!(output.contains("  Types\n"));
        assert!(output.contains("    interface KitConfig {/*…*/}\n"));
        assert!(output.contains("      Kit options\n"));
        assert!(output.contains("      adapter?: Adapter;\n"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_colored_output() {
        let modules = modules();
        let mut buffer = Buffer::ansi();
        ModulePrinter::new(&modules, true)
            .write_colored(&mut buffer)
            .unwrap();

        let output = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(output.contains("\x1b["));
        assert!(output.contains("KitConfig"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(Indent(2).to_string(), "    ");
    }
}
