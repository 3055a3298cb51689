mod card;
mod ids;
mod progress;
mod session;

pub use card::{Card, CardType, CardTypeError};
pub use ids::CardId;
pub use progress::{AnswerResult, AnswerResultError, ProgressRecord};
pub use session::{SessionKind, SessionState, SessionStateError};
