pub mod token;
pub mod validation;
