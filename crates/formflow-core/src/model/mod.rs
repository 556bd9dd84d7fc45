pub mod option;
pub mod question;
pub mod section;

pub use option::{AnswerOption, canonical_value, options_for};
pub use question::{Question, QuestionType};
pub use section::Section;
