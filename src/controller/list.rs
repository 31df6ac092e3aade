use std::fmt::Display;

use super::*;
use crate::prelude::{Stats, search};

/// Searchable list of every contact, as shown on the main screen.
///
/// The filtered view is recomputed after every mutation, whether it worked
/// or not, so it never drifts from the store.
pub struct ContactList<'a> {
    store: &'a mut ContactStore,
    notifier: &'a dyn Notifier,
    term: String,
    favorites_only: bool,
    filtered: Vec<Contact>,
    in_flight: InFlight,
    load_error: Option<String>,
}

impl<'a> ContactList<'a> {
    pub fn new(store: &'a mut ContactStore, notifier: &'a dyn Notifier) -> Self {
        let filtered = store.contacts().to_vec();
        Self {
            store,
            notifier,
            term: String::new(),
            favorites_only: false,
            filtered,
            in_flight: InFlight::default(),
            load_error: None,
        }
    }

    pub fn load(&mut self) -> Result<(), AppError> {
        self.load_error = None;

        if let Err(e) = self.store.refresh() {
            self.notifier.notify(Notice::from_error(&e));
            self.load_error = Some(e.to_string());
            return Err(e);
        }

        self.refilter();
        Ok(())
    }

    pub fn search(&mut self, term: &str) {
        self.term = term.to_lowercase();
        self.refilter();
    }

    pub fn clear_search(&mut self) {
        self.term.clear();
        self.refilter();
    }

    /// Restricts the view to favorites. The search term still applies.
    pub fn only_favorites(&mut self, only: bool) {
        self.favorites_only = only;
        self.refilter();
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn visible(&self) -> &[Contact] {
        &self.filtered
    }

    pub fn stats(&self) -> Stats {
        self.store.stats()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn has_contacts(&self) -> bool {
        !self.store.contacts().is_empty()
    }

    /// Contacts exist but the current search hides all of them.
    pub fn shows_no_results(&self) -> bool {
        self.has_contacts() && self.filtered.is_empty() && !self.term.trim().is_empty()
    }

    pub fn shows_empty_state(&self) -> bool {
        !self.has_contacts() && self.load_error.is_none()
    }

    #[doc(hidden)]
    pub fn in_flight(&mut self) -> &mut InFlight {
        &mut self.in_flight
    }

    pub fn create(&mut self, form: &NewContact) -> Result<Contact, AppError> {
        let form = checked_form(form, self.notifier)?;

        let created = self.store.create(&form);
        self.refilter();

        match created {
            Ok(contact) => {
                self.notifier.notify(Notice::created());
                Ok(contact)
            }
            Err(e) => {
                self.notifier.notify(Notice::from_error(&e));
                Err(e)
            }
        }
    }

    /// Asks for confirmation, then deletes. Returns true only when the
    /// contact is gone.
    pub fn delete(&mut self, id: impl Display) -> bool {
        let id = id.to_string();
        if !self.in_flight.begin(&id) {
            return false;
        }

        let confirmed = match self.store.contacts().iter().find(|c| c.has_id(&id)) {
            Some(contact) => self.notifier.confirm(&delete_prompt(contact)),
            None => self.notifier.confirm(&format!("delete contact {}", id)),
        };

        if !confirmed {
            self.in_flight.finish(&id);
            return false;
        }

        let deleted = self.store.delete(&id);
        self.in_flight.finish(&id);
        self.refilter();

        if deleted {
            self.notifier.notify(Notice::deleted());
        } else {
            self.notifier.notify(Notice::delete_failed());
        }
        deleted
    }

    pub fn toggle_favorite(&mut self, id: impl Display) -> bool {
        let id = id.to_string();
        if !self.in_flight.begin(&id) {
            return false;
        }

        let toggled = self.store.set_favorite(&id);
        self.in_flight.finish(&id);
        self.refilter();

        if !toggled {
            self.notifier.error("Error updating favorite");
            return false;
        }

        let now_favorite = self
            .store
            .contacts()
            .iter()
            .find(|c| c.has_id(&id))
            .is_some_and(|c| c.is_favorite);
        self.notifier.success(&favorite_message(now_favorite));
        true
    }

    /// Leaving the list empties the store; the next view refreshes it.
    pub fn teardown(self) {
        self.store.clear();
    }

    fn refilter(&mut self) {
        self.filtered = if self.favorites_only {
            let favorites: Vec<Contact> = self.store.favorites().into_iter().cloned().collect();
            search(&favorites, &self.term).into_iter().cloned().collect()
        } else {
            self.store.search(&self.term).into_iter().cloned().collect()
        };
    }
}
