use crate::domain::AppError;

/// Port for yes/no questions.
pub trait Prompter {
    /// Ask `question`; an empty answer selects `default`.
    fn confirm(&self, question: &str, default: bool) -> Result<bool, AppError>;
}
