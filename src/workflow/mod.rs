pub mod question_wizard;
pub mod wizard_state;

pub use question_wizard::{QuestionWizard, WizardSettings};
pub use wizard_state::{ErrorState, RetryAction, WizardState};
