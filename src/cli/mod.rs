//! Terminal client for the exam-paper portal
//!
//! Uses clap for argument parsing and owo-colors for colored terminal output.
//! Every command is checked against the same route guards the browser app
//! uses before anything is sent.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::model::Vote;
use crate::types::AnswerId;
use crate::utils::config::DEFAULT_CONFIG_FILE;

/// Biblio - browse past exam papers and their answers from the terminal
#[derive(Parser, Debug)]
#[command(
    name = "biblio",
    version,
    about = "Biblio - past exam papers and answers from the terminal",
    after_help = "EXAMPLES:\n    \
                  biblio login ada --password hunter2    # Sign in\n    \
                  biblio papers cs                       # Find courses\n    \
                  biblio paper CS101 2019                # List a paper's questions\n    \
                  biblio answers CS101 2019 1a --all     # Read the answers to 1a\n    \
                  biblio watch CS101 2019 1a             # Follow 1a live"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        username: String,
        #[arg(short, long, env = "BIBLIO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create a student account and sign in
    Register {
        username: String,
        #[arg(short, long, env = "BIBLIO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// List courses with papers, optionally filtered
    Papers {
        filter: Option<String>,
    },

    /// Show a paper and its questions
    Paper {
        course: String,
        year: i32,

        /// Write the PDF to this path
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show the answers to one question
    Answers {
        course: String,
        year: i32,
        /// Question number as printed on the paper, e.g. 1a
        question: String,

        /// Show every answer, not just the top one
        #[arg(short, long)]
        all: bool,
    },

    /// Follow a paper live until Ctrl-C
    Watch {
        course: String,
        year: i32,
        /// Question to keep expanded
        question: Option<String>,
    },

    /// Vote on an answer
    Vote {
        course: String,
        year: i32,
        answer: AnswerId,
        /// up or down
        direction: Vote,
    },

    /// Post an answer to a question
    Answer {
        course: String,
        year: i32,
        question: String,
        /// Answer body (HTML allowed)
        #[arg(required_unless_present = "file")]
        html: Option<String>,
        /// Read the body from a file instead
        #[arg(short, long, conflicts_with = "html")]
        file: Option<PathBuf>,
    },

    /// Replace the body of one of your answers
    Edit {
        course: String,
        year: i32,
        answer: AnswerId,
        html: String,
    },

    /// Delete one of your answers
    DeleteAnswer {
        course: String,
        year: i32,
        answer: AnswerId,
    },

    /// Delete a paper (lecturers only)
    DeletePaper {
        course: String,
        year: i32,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Upload a paper (lecturers only)
    Upload {
        course: String,
        year: i32,
        /// PDF file of the paper
        pdf: PathBuf,

        #[arg(short, long, default_value = "")]
        title: String,

        /// Comma-separated question numbers, e.g. "1a, 1b, 2"
        #[arg(short, long, default_value = "")]
        questions: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
