//! Client-side data model: answers, per-question solutions, votes and papers.

pub mod answer;
pub mod paper;
pub mod solution;
pub mod vote;

pub use answer::Answer;
pub use paper::{EncodedPdf, Paper};
pub use solution::{Solution, SolutionDisplay};
pub use vote::Vote;
