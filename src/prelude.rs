pub use crate::cli::{command, notify, run::run_app};
pub use crate::domain::{
    contact::{self, Contact, ContactId, NewContact},
    search::{matches_term, search},
    store::{ContactStore, Stats, UpdateOutcome},
};
pub use crate::errors::AppError;
pub use crate::storage::{AuthApi, ContactApi, Credentials, Registration, TokenProvider};
