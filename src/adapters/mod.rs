pub mod document;
pub mod faker;
