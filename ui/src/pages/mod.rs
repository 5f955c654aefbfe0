pub mod login;
pub mod paper;
pub mod register;
pub mod search;
pub mod upload;
