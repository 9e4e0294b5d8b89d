pub mod change_detection;
pub mod validation;
