use serde::{Deserialize, Serialize};

/// Surveys API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurveysConfig {
    /// Maximum survey title length in characters
    pub max_title_length: usize,
    /// Maximum question text length in characters
    pub max_question_length: usize,
    /// Maximum number of possible answers of a multiple choice question
    pub max_possible_answers: usize,
}

impl Default for SurveysConfig {
    fn default() -> Self {
        Self {
            max_title_length: 256,
            max_question_length: 1024,
            max_possible_answers: 20,
        }
    }
}
