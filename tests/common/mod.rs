#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use rusty_agenda::prelude::notify::{Notice, Notifier, Severity};
use rusty_agenda::prelude::*;

/// How the fake server answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Status(u16),
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateReply {
    /// 200 with the stored record as JSON
    Json,
    /// 200 with an empty body
    Empty,
}

/// Server side state shared between a test and the `MockApi` it boxed
/// into a store.
pub struct Remote {
    pub contacts: Vec<Contact>,
    pub next_id: ContactId,
    pub calls: Vec<String>,
    pub failure: Option<Failure>,
    pub update_reply: UpdateReply,
}

impl Remote {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(call)).count()
    }
}

#[derive(Clone)]
pub struct MockApi {
    pub remote: Rc<RefCell<Remote>>,
}

impl MockApi {
    pub fn new(contacts: Vec<Contact>) -> Self {
        let next_id = contacts.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            remote: Rc::new(RefCell::new(Remote {
                contacts,
                next_id,
                calls: Vec::new(),
                failure: None,
                update_reply: UpdateReply::Json,
            })),
        }
    }

    pub fn fail_with(&self, failure: Failure) {
        self.remote.borrow_mut().failure = Some(failure);
    }

    pub fn recover(&self) {
        self.remote.borrow_mut().failure = None;
    }

    pub fn reply_to_updates_with(&self, reply: UpdateReply) {
        self.remote.borrow_mut().update_reply = reply;
    }

    pub fn calls(&self, call: &str) -> usize {
        self.remote.borrow().count(call)
    }

    pub fn total_calls(&self) -> usize {
        self.remote.borrow().calls.len()
    }

    pub fn server_contact(&self, id: ContactId) -> Option<Contact> {
        self.remote
            .borrow()
            .contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    fn enter(&self, call: String) -> Result<(), AppError> {
        let mut remote = self.remote.borrow_mut();
        remote.calls.push(call);

        match remote.failure {
            Some(Failure::Status(status)) => Err(AppError::api(status, "scripted failure")),
            Some(Failure::Dropped) => Err(AppError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))),
            None => Ok(()),
        }
    }

    fn position(&self, id: &str) -> Result<usize, AppError> {
        self.remote
            .borrow()
            .contacts
            .iter()
            .position(|c| c.has_id(id))
            .ok_or_else(|| AppError::api(404, "Not Found"))
    }
}

impl ContactApi for MockApi {
    fn fetch_all(&self) -> Result<Vec<Contact>, AppError> {
        self.enter("fetch_all".to_string())?;
        Ok(self.remote.borrow().contacts.clone())
    }

    fn fetch_one(&self, id: &str) -> Result<Contact, AppError> {
        self.enter(format!("fetch_one {}", id))?;
        let index = self.position(id)?;
        Ok(self.remote.borrow().contacts[index].clone())
    }

    fn create(&self, contact: &NewContact) -> Result<Contact, AppError> {
        self.enter("create".to_string())?;

        let mut remote = self.remote.borrow_mut();
        let created = contact.clone().with_id(remote.next_id);
        remote.next_id += 1;
        remote.contacts.push(created.clone());
        Ok(created)
    }

    fn update(&self, contact: &Contact) -> Result<Option<Contact>, AppError> {
        self.enter(format!("update {}", contact.id))?;
        let index = self.position(&contact.id.to_string())?;

        let mut remote = self.remote.borrow_mut();
        remote.contacts[index] = contact.clone();

        match remote.update_reply {
            UpdateReply::Json => Ok(Some(contact.clone())),
            UpdateReply::Empty => Ok(None),
        }
    }

    fn toggle_favorite(&self, id: &str) -> Result<(), AppError> {
        self.enter(format!("toggle_favorite {}", id))?;
        let index = self.position(id)?;

        let mut remote = self.remote.borrow_mut();
        remote.contacts[index].is_favorite = !remote.contacts[index].is_favorite;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), AppError> {
        self.enter(format!("delete {}", id))?;
        let index = self.position(id)?;

        self.remote.borrow_mut().contacts.remove(index);
        Ok(())
    }
}

pub fn contact(id: ContactId, first_name: &str) -> Contact {
    NewContact::new(first_name, "600000000").with_id(id)
}

pub fn ana_and_bob() -> Vec<Contact> {
    vec![contact(1, "Ana"), contact(2, "Bob")]
}

pub fn store_with(contacts: Vec<Contact>) -> (ContactStore, MockApi) {
    let api = MockApi::new(contacts);
    (ContactStore::new(Box::new(api.clone())), api)
}

/// Collects notices instead of printing them and answers every
/// confirmation with a fixed value.
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<Notice>>,
    pub answer: bool,
    pub prompts: Cell<usize>,
}

impl RecordingNotifier {
    pub fn answering(answer: bool) -> Self {
        Self {
            notices: RefCell::new(Vec::new()),
            answer,
            prompts: Cell::new(0),
        }
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.borrow().last().cloned()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notices
            .borrow()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    fn confirm(&self, _prompt: &str) -> bool {
        self.prompts.set(self.prompts.get() + 1);
        self.answer
    }
}

/// Unsigned JWT whose `exp` claim lies `secs_from_now` seconds ahead.
pub fn jwt_expiring_in(secs_from_now: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + secs_from_now;
    let header = BASE64_URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = BASE64_URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"7","exp":{}}}"#, exp));
    format!("{}.{}.sig", header, payload)
}
