pub mod detail;
pub mod list;

use std::collections::HashSet;
use std::fmt::Display;

use crate::cli::notify::{Notice, Notifier};
use crate::prelude::{AppError, Contact, ContactStore, NewContact};

/// Ids with a request still outstanding. A second request for the same id
/// is dropped instead of queued.
#[derive(Debug, Default)]
pub struct InFlight {
    ids: HashSet<String>,
}

impl InFlight {
    /// Returns false if `id` is already in flight.
    pub fn begin(&mut self, id: impl Display) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn finish(&mut self, id: impl Display) {
        self.ids.remove(&id.to_string());
    }

    pub fn is_busy(&self, id: impl Display) -> bool {
        self.ids.contains(&id.to_string())
    }
}

fn favorite_message(now_favorite: bool) -> String {
    if now_favorite {
        "Contact added to favorites".to_string()
    } else {
        "Contact removed from favorites".to_string()
    }
}

fn delete_prompt(contact: &Contact) -> String {
    format!(
        "delete \"{}\"? This action cannot be undone",
        contact.full_name()
    )
}

/// Trims and validates form input, reporting problems through the notifier.
fn checked_form(form: &NewContact, notifier: &dyn Notifier) -> Result<NewContact, AppError> {
    let form = form.trimmed();

    if let Err(e) = form.validate() {
        let notice = match &e {
            AppError::Validation(detail) => Notice::validation_error(detail),
            other => Notice::from_error(other),
        };
        notifier.notify(notice);
        return Err(e);
    }
    Ok(form)
}
