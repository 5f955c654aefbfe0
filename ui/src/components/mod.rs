pub mod answer_card;
pub mod guard;
pub mod header;
pub mod loading;
pub mod solution_panel;

pub use answer_card::AnswerCard;
pub use guard::Guarded;
pub use header::Header;
pub use loading::LoadingSpinner;
pub use solution_panel::SolutionPanel;
