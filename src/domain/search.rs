use crate::prelude::Contact;

/// Local filter used by the list view and `ContactStore::search`.
///
/// Text fields are matched case-insensitively. The phone number is matched as
/// typed, so `"+34"` only finds numbers that literally contain `+34`.
pub fn matches_term(contact: &Contact, term: &str) -> bool {
    let term_lower = term.to_lowercase();

    [
        &contact.first_name,
        &contact.last_name,
        &contact.email,
        &contact.company,
        &contact.address,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&term_lower))
        || contact.number.contains(term)
}

pub fn search<'a>(contacts: &'a [Contact], term: &str) -> Vec<&'a Contact> {
    if term.trim().is_empty() {
        return contacts.iter().collect();
    }

    contacts.iter().filter(|c| matches_term(c, term)).collect()
}
