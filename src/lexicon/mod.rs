pub mod dictionary;
pub mod tokenization;
