//! View state and orchestration for each page of the portal.
//!
//! Everything here is front-end agnostic: the browser app binds these types
//! to signals, the terminal client drives them directly.

pub mod search;
pub mod solution_page;
pub mod upload;

pub use search::{CourseCatalog, SearchForm};
pub use solution_page::{SolutionPage, SolutionPageController, Viewer};
pub use upload::{PaperUpload, UploadForm};
