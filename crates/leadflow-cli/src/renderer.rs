//! Terminal rendering of the markdown produced by the core display types.
//!
//! Headers are printed verbatim in color so their `#` level stays visible;
//! the text between headers goes through termimad, which also lays out the
//! field diff tables of update activities.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Renders markdown either through termimad or as plain text.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.table.set_fg(Color::Grey);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    fn header_color(line: &str) -> &'static str {
        if line.starts_with("###") {
            "\x1b[36m"
        } else {
            "\x1b[34m"
        }
    }

    /// Prints `markdown` to stdout.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        let mut block = String::new();
        for line in markdown.lines() {
            if line.starts_with('#') {
                if !block.is_empty() {
                    self.skin.print_text(&block);
                    block.clear();
                }
                println!("{}{line}\x1b[0m", Self::header_color(line));
            } else {
                block.push_str(line);
                block.push('\n');
            }
        }
        if !block.is_empty() {
            self.skin.print_text(&block);
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
        assert!(renderer.render("# Leads\n\nNo leads found.\n").is_ok());
    }

    #[test]
    fn test_activity_headers_get_their_own_color() {
        assert_ne!(
            TerminalRenderer::header_color("### ➤ Status set to New"),
            TerminalRenderer::header_color("# Activity for lead 1")
        );
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().rich_enabled);
    }
}
