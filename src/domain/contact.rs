use std::fmt;

use super::*;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

pub type ContactId = i64;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,

    pub first_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_favorite: bool,
}

/// Creation payload: a contact the server has not assigned an id to yet.
/// Also used as the value of the edit form.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_favorite: bool,
}

pub enum ValidationReq {
    __,
}

impl ValidationReq {
    pub fn first_name_req() -> String {
        "First name and phone number are required fields".to_string()
    }

    pub fn number_req() -> String {
        "Phone number must contain at least 4 characters".to_string()
    }

    pub fn email_req() -> String {
        "Email can be empty, or must be a valid email. Must not exceed 254 characters".to_string()
    }
}

impl NewContact {
    pub fn new(first_name: &str, number: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            number: number.to_string(),
            ..Self::default()
        }
    }

    /// Trims every text field the way the forms do before submitting.
    /// Favorite state is never set from a form.
    pub fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            address: self.address.trim().to_string(),
            email: self.email.trim().to_string(),
            number: self.number.trim().to_string(),
            company: self.company.trim().to_string(),
            description: self.description.trim().to_string(),
            image: self.image.trim().to_string(),
            is_favorite: false,
        }
    }

    pub fn validate_first_name(&self) -> bool {
        !self.first_name.trim().is_empty()
    }

    pub fn validate_number(&self) -> bool {
        let number = self.number.trim();
        !number.is_empty() && number.chars().count() >= 4
    }

    pub fn validate_email(&self) -> Result<bool, AppError> {
        // Email can be empty
        // Or must contain '@' with a '.' somewhere after it
        // Not more than 254 characters
        let email = self.email.trim();
        let re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?;
        Ok(email.is_empty() || (re.is_match(email) && email.len() <= 254))
    }

    /// Caller-side validation. The store itself never validates.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.validate_first_name() || self.number.trim().is_empty() {
            return Err(AppError::Validation(ValidationReq::first_name_req()));
        }

        if !self.validate_number() {
            return Err(AppError::Validation(ValidationReq::number_req()));
        }

        if !self.validate_email()? {
            return Err(AppError::Validation(ValidationReq::email_req()));
        }

        Ok(())
    }

    pub fn with_id(self, id: ContactId) -> Contact {
        Contact {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            address: self.address,
            email: self.email,
            number: self.number,
            company: self.company,
            description: self.description,
            image: self.image,
            is_favorite: self.is_favorite,
        }
    }
}

impl From<&Contact> for NewContact {
    fn from(contact: &Contact) -> Self {
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            address: contact.address.clone(),
            email: contact.email.clone(),
            number: contact.number.clone(),
            company: contact.company.clone(),
            description: contact.description.clone(),
            image: contact.image.clone(),
            is_favorite: contact.is_favorite,
        }
    }
}

impl Contact {
    /// Ids coming from the command line are strings, the API hands out numbers.
    /// Both sides are compared through their textual form.
    pub fn has_id(&self, id: &str) -> bool {
        self.id.to_string() == id
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn initials(&self) -> String {
        let first = self.first_name.chars().next();
        let last = self.last_name.chars().next();

        first
            .into_iter()
            .chain(last)
            .flat_map(|c| c.to_uppercase())
            .collect()
    }

    pub fn has_contact_info(&self) -> bool {
        !(self.email.is_empty()
            && self.number.is_empty()
            && self.address.is_empty()
            && self.company.is_empty())
    }

    pub fn share_text(&self) -> String {
        let mut lines = vec![format!("Contact: {}", self.full_name())];

        let optional = [
            ("Company", &self.company),
            ("Email", &self.email),
            ("Phone", &self.number),
            ("Address", &self.address),
            ("Notes", &self.description),
        ];

        for (label, value) in optional {
            if !value.is_empty() {
                lines.push(format!("{}: {}", label, value));
            }
        }

        lines.join("\n")
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let favorite = if self.is_favorite { "yes" } else { "no" };
        write!(
            f,
            "Id: {}\n\
            Name: {}\n\
            Number: {}\n\
            Email: {}\n\
            Company: {}\n\
            Address: {}\n\
            Notes: {}\n\
            Favorite: {}",
            self.id,
            self.full_name(),
            format_phone_number(&self.number),
            self.email,
            self.company,
            self.address,
            self.description,
            favorite
        )
    }
}

pub fn format_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10]),
        11 => format!(
            "+{} ({}) {}-{}",
            &digits[0..1],
            &digits[1..4],
            &digits[4..7],
            &digits[7..11]
        ),
        _ => phone.to_string(),
    }
}

// The API sends `null` for fields that were never filled in.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
