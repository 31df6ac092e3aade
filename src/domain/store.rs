use std::fmt::Display;

use super::search::search;
use super::*;
use log::{debug, error, warn};

/// In-memory mirror of the logged in user's contacts.
///
/// Every mutation goes to the remote API first and is only applied locally
/// once the API has answered, except for `update`, which keeps the local copy
/// in step even when the request never reached the server.
pub struct ContactStore {
    contacts: Vec<Contact>,
    api: Box<dyn ContactApi>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub favorites: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The server returned the stored record.
    Saved(Contact),
    /// The server accepted the update without a JSON body; the submitted
    /// record is taken as stored.
    Assumed(Contact),
    /// No confirmed answer: the request failed before a status came back,
    /// or a success body could not be decoded. The local copy was replaced
    /// anyway so the view does not stall.
    Offline(Contact),
    /// Non-success status. Nothing changed locally.
    Rejected(u16),
}

impl UpdateOutcome {
    pub fn contact(&self) -> Option<&Contact> {
        match self {
            UpdateOutcome::Saved(c) | UpdateOutcome::Assumed(c) | UpdateOutcome::Offline(c) => {
                Some(c)
            }
            UpdateOutcome::Rejected(_) => None,
        }
    }

    pub fn into_contact(self) -> Option<Contact> {
        match self {
            UpdateOutcome::Saved(c) | UpdateOutcome::Assumed(c) | UpdateOutcome::Offline(c) => {
                Some(c)
            }
            UpdateOutcome::Rejected(_) => None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, UpdateOutcome::Saved(_) | UpdateOutcome::Assumed(_))
    }
}

impl ContactStore {
    pub fn new(api: Box<dyn ContactApi>) -> Self {
        Self {
            contacts: Vec::new(),
            api,
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn contains(&self, id: impl Display) -> bool {
        let id = id.to_string();
        self.contacts.iter().any(|c| c.has_id(&id))
    }

    pub fn favorites(&self) -> Vec<&Contact> {
        self.contacts.iter().filter(|c| c.is_favorite).collect()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total: self.contacts.len(),
            favorites: self.contacts.iter().filter(|c| c.is_favorite).count(),
        }
    }

    /// Drops the local copy. Called when the list view goes away.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    pub fn refresh(&mut self) -> Result<&[Contact], AppError> {
        let contacts = self
            .api
            .fetch_all()
            .inspect_err(|e| error!("fetching contacts failed: {}", e))?;

        debug!("fetched {} contacts", contacts.len());
        self.contacts = dedup_by_id(contacts);
        Ok(&self.contacts)
    }

    /// Cached entry when present, otherwise one remote lookup. A contact
    /// fetched this way is not added to the local collection.
    pub fn get_by_id(&self, id: impl Display) -> Option<Contact> {
        let id = id.to_string();

        if let Some(contact) = self.contacts.iter().find(|c| c.has_id(&id)) {
            return Some(contact.clone());
        }

        match self.api.fetch_one(&id) {
            Ok(contact) => Some(contact),
            Err(e) => {
                warn!("fetching contact {} failed: {}", id, e);
                None
            }
        }
    }

    pub fn create(&mut self, new_contact: &NewContact) -> Result<Contact, AppError> {
        let created = self
            .api
            .create(new_contact)
            .inspect_err(|e| error!("creating contact failed: {}", e))?;

        // one entry per id
        self.contacts.retain(|c| c.id != created.id);
        self.contacts.push(created.clone());
        Ok(created)
    }

    pub fn update(&mut self, contact: &Contact) -> UpdateOutcome {
        let outcome = match self.api.update(contact) {
            Ok(Some(saved)) => UpdateOutcome::Saved(saved),
            Ok(None) => UpdateOutcome::Assumed(contact.clone()),
            Err(AppError::Api { status, message }) => {
                error!("updating contact {} failed ({}): {}", contact.id, status, message);
                return UpdateOutcome::Rejected(status);
            }
            Err(e) => {
                warn!(
                    "updating contact {} failed, keeping local edit: {}",
                    contact.id, e
                );
                UpdateOutcome::Offline(contact.clone())
            }
        };

        if let Some(replacement) = outcome.contact() {
            self.replace(&contact.id.to_string(), replacement);
        }
        outcome
    }

    /// Flips the favorite flag. The endpoint toggles server-side, so the local
    /// flag is inverted rather than read back.
    pub fn set_favorite(&mut self, id: impl Display) -> bool {
        let id = id.to_string();

        if let Err(e) = self.api.toggle_favorite(&id) {
            error!("toggling favorite for contact {} failed: {}", id, e);
            return false;
        }

        for contact in self.contacts.iter_mut().filter(|c| c.has_id(&id)) {
            contact.is_favorite = !contact.is_favorite;
        }
        true
    }

    pub fn delete(&mut self, id: impl Display) -> bool {
        let id = id.to_string();

        if let Err(e) = self.api.delete(&id) {
            error!("deleting contact {} failed: {}", id, e);
            return false;
        }

        self.contacts.retain(|c| !c.has_id(&id));
        true
    }

    pub fn search(&self, term: &str) -> Vec<&Contact> {
        search(&self.contacts, term)
    }

    fn replace(&mut self, id: &str, replacement: &Contact) {
        for contact in self.contacts.iter_mut().filter(|c| c.has_id(id)) {
            *contact = replacement.clone();
        }
    }
}

fn dedup_by_id(contacts: Vec<Contact>) -> Vec<Contact> {
    let mut seen = std::collections::HashSet::new();
    contacts
        .into_iter()
        .filter(|c| seen.insert(c.id))
        .collect()
}
