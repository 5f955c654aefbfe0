//! Colored output helpers for the terminal client.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::model::{Answer, Solution, SolutionDisplay};
use crate::views::solution_page::answer_text;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message to stderr
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Prompt for confirmation (returns true if user confirms)
    pub fn confirm(&self, message: &str) -> bool {
        if self.colored {
            print!(
                "  {} {} [y/N]: ",
                "?".bright_yellow().bold(),
                message.bright_white()
            );
        } else {
            print!("  [?] {} [y/N]: ", message);
        }

        io::stdout().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_ok() {
            let input = input.trim().to_lowercase();
            input == "y" || input == "yes"
        } else {
            false
        }
    }

    /// One answer: id, score, author and its text.
    pub fn answer(&self, answer: &Answer, mine: bool) {
        let line = format_answer_line(answer, mine);
        let body = answer_text(&answer.html);
        if self.colored {
            println!("    {}", line.bright_white());
            for text in body.lines() {
                println!("      {}", text.dimmed());
            }
        } else {
            println!("    {}", line);
            for text in body.lines() {
                println!("      {}", text);
            }
        }
    }

    /// A solution as it would appear on the page, honouring its display
    /// state.
    pub fn solution(&self, solution: &Solution, viewer_id: u64) {
        self.subheader(&solution.header());
        for answer in solution.displayed() {
            self.answer(answer, answer.can_edit(viewer_id));
        }
        match solution.display() {
            SolutionDisplay::FirstOnly => self.info(&format!(
                "{} more answer(s) hidden, use --all to show them",
                solution.answers().len() - 1
            )),
            SolutionDisplay::Hidden | SolutionDisplay::All => {}
        }
    }

    pub fn newline(&self) {
        println!();
    }
}

pub fn format_answer_line(answer: &Answer, mine: bool) -> String {
    format!(
        "#{} [{:+}] {}{} {}{}",
        answer.id,
        answer.votes,
        answer.username,
        if mine { " (you)" } else { "" },
        answer.timestamp.format("%Y-%m-%d %H:%M"),
        if answer.can_vote { "" } else { " (voted)" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::answer::fixtures::answer;

    #[test]
    fn test_output_new() {
        assert!(Output::new().colored);
        assert!(!Output::no_color().colored);
        assert!(Output::default().colored);
    }

    #[test]
    fn test_answer_line() {
        let mut a = answer(3, 9, 2);
        assert_eq!(format_answer_line(&a, false), "#3 [+2] user9 2017-10-01 12:00");
        a.can_vote = false;
        a.votes = -1;
        assert_eq!(
            format_answer_line(&a, true),
            "#3 [-1] user9 (you) 2017-10-01 12:00 (voted)"
        );
    }

    #[test]
    fn test_output_methods_no_panic() {
        let output = Output::no_color();
        let mut solution = Solution::new(1, "1a", vec![answer(1, 1, 2), answer(2, 2, 0)]);
        solution.toggle_show();

        output.success("test success");
        output.info("test info");
        output.warning("test warning");
        output.error("test error");
        output.header("Test Header");
        output.kv("key", "value");
        output.list_item("item");
        output.hint("hint message");
        output.command("some command");
        output.solution(&solution, 1);
        output.newline();
    }
}
