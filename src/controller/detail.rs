use super::*;
use crate::prelude::UpdateOutcome;

/// One contact, addressed by the id taken from the command line. Doubles as
/// the new/edit form: without an id a submission creates a contact.
pub struct ContactDetail<'a> {
    store: &'a mut ContactStore,
    notifier: &'a dyn Notifier,
    route_id: Option<String>,
    contact: Option<Contact>,
    // Set for the length of a store call. Methods take `&mut self` and block,
    // so nothing in this crate can observe it set; it only guards callers
    // that hold the controller across an event loop.
    busy: bool,
}

impl<'a> ContactDetail<'a> {
    pub fn new(store: &'a mut ContactStore, notifier: &'a dyn Notifier) -> Self {
        Self {
            store,
            notifier,
            route_id: None,
            contact: None,
            busy: false,
        }
    }

    pub fn contact(&self) -> Option<&Contact> {
        self.contact.as_ref()
    }

    pub fn route_id(&self) -> Option<&str> {
        self.route_id.as_deref()
    }

    /// Loads the contact once. A miss is reported and not retried.
    pub fn load(&mut self, route_id: &str) -> Result<&Contact, AppError> {
        let route_id = route_id.trim();
        self.route_id = Some(route_id.to_string());

        if route_id.is_empty() {
            self.notifier.error("Invalid contact id");
            return Err(AppError::Validation("Invalid contact id".to_string()));
        }

        self.contact = self.store.get_by_id(route_id);

        match &self.contact {
            Some(contact) => Ok(contact),
            None => {
                self.notifier.error("Contact not found");
                Err(AppError::NotFound(format!("Contact {}", route_id)))
            }
        }
    }

    /// Creates or updates from the form and returns the id to show next.
    /// `Ok(None)` means a submission was already running.
    pub fn submit(&mut self, form: &NewContact) -> Result<Option<String>, AppError> {
        if self.busy {
            return Ok(None);
        }

        let form = checked_form(form, self.notifier)?;

        self.busy = true;
        let result = match self.route_id.clone() {
            Some(route_id) => self.save_edit(form, &route_id),
            None => self.save_new(&form),
        };
        self.busy = false;

        result.map(Some)
    }

    fn save_new(&mut self, form: &NewContact) -> Result<String, AppError> {
        match self.store.create(form) {
            Ok(created) => {
                self.notifier.notify(Notice::created());
                let id = created.id.to_string();
                self.contact = Some(created);
                Ok(id)
            }
            Err(e) => {
                self.notifier
                    .error("Error saving the contact. Please try again.");
                Err(e)
            }
        }
    }

    fn save_edit(&mut self, form: NewContact, route_id: &str) -> Result<String, AppError> {
        let Some(loaded) = &self.contact else {
            self.notifier.error("Contact not found");
            return Err(AppError::NotFound(format!("Contact {}", route_id)));
        };

        // Editing never changes the favorite flag; that has its own endpoint
        let mut edited = form.with_id(loaded.id);
        edited.is_favorite = loaded.is_favorite;

        match self.store.update(&edited) {
            UpdateOutcome::Rejected(status) => {
                self.notifier
                    .error("Error saving the contact. Please try again.");
                Err(AppError::api(status, "update rejected"))
            }
            outcome => {
                let notice = match &outcome {
                    UpdateOutcome::Saved(_) => Notice::updated(),
                    UpdateOutcome::Assumed(_) => Notice::saved(),
                    _ => Notice::saved_locally(),
                };
                self.notifier.notify(notice);

                let saved = outcome.into_contact();
                let id = saved
                    .as_ref()
                    .map(|c| c.id.to_string())
                    .unwrap_or_else(|| route_id.to_string());
                self.contact = saved;
                Ok(id)
            }
        }
    }

    pub fn toggle_favorite(&mut self) -> bool {
        if self.busy {
            return false;
        }
        let Some(id) = self.contact.as_ref().map(|c| c.id) else {
            return false;
        };

        self.busy = true;
        let toggled = self.store.set_favorite(id);
        self.busy = false;

        if !toggled {
            self.notifier.error("Error updating favorite");
            return false;
        }

        // The loaded copy may not live in the store, so mirror the flip here
        if let Some(contact) = self.contact.as_mut() {
            contact.is_favorite = !contact.is_favorite;
            self.notifier.success(&favorite_message(contact.is_favorite));
        }
        true
    }

    /// `Ok(false)` when there is nothing loaded or the user declined the
    /// prompt. A failed request is an error.
    pub fn delete(&mut self) -> Result<bool, AppError> {
        if self.busy {
            return Ok(false);
        }
        let Some(contact) = self.contact.as_ref() else {
            return Ok(false);
        };

        if !self.notifier.confirm(&delete_prompt(contact)) {
            return Ok(false);
        }

        let id = contact.id;
        self.busy = true;
        let deleted = self.store.delete(id);
        self.busy = false;

        if !deleted {
            self.notifier.notify(Notice::delete_failed());
            return Err(AppError::FailedRequest(format!(
                "could not delete contact {}",
                id
            )));
        }

        self.notifier.notify(Notice::deleted());
        self.contact = None;
        Ok(true)
    }
}
