pub mod api;
pub mod error;
pub mod openai;
pub mod serper;
