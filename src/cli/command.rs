use clap::{Args, Parser, Subcommand};

use crate::prelude::NewContact;
use crate::storage::{remote::DEFAULT_API_URL, session::DEFAULT_TOKEN_PATH};

#[derive(Parser, Debug)]
#[command(name = "rusty-agenda", version, about = "Contact agenda backed by a remote API")]
pub struct Cli {
    /// Base URL of the agenda API
    #[arg(long, env = "AGENDA_API_URL", default_value_t = String::from(DEFAULT_API_URL))]
    pub api_url: String,

    /// File holding the session token between runs
    #[arg(long, env = "AGENDA_TOKEN_PATH", default_value_t = String::from(DEFAULT_TOKEN_PATH))]
    pub token_path: String,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommand and their flags
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and keep the session token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
    /// Forget the session token
    Logout,
    /// List contacts
    List {
        /// Only show contacts matching this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only show favorites
        #[arg(short, long)]
        favorites: bool,
    },
    /// Show one contact
    Show {
        #[arg(long)]
        id: String,
    },
    /// Add a new contact
    Add {
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Edit an existing contact
    /// Fields that are not given keep their current value
    Edit {
        #[arg(long)]
        id: String,

        #[command(flatten)]
        fields: ContactUpdate,
    },
    /// Delete a contact
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Add a contact to favorites, or remove it
    Favorite {
        #[arg(long)]
        id: String,
    },
    /// Print a contact card ready to share
    Share {
        #[arg(long)]
        id: String,
    },
    /// Number of contacts and favorites
    Stats,
}

#[derive(Args, Debug)]
pub struct ContactFields {
    /// Contact first name
    #[arg(long)]
    pub first_name: String,

    /// Contact phone number
    #[arg(long)]
    pub number: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub address: String,

    #[arg(long, default_value = "")]
    pub company: String,

    /// Free text notes
    #[arg(long, default_value = "")]
    pub description: String,

    /// Image URL
    #[arg(long, default_value = "")]
    pub image: String,
}

#[derive(Args, Debug)]
pub struct ContactUpdate {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub image: Option<String>,
}

impl From<ContactFields> for NewContact {
    fn from(fields: ContactFields) -> Self {
        NewContact {
            first_name: fields.first_name,
            last_name: fields.last_name,
            address: fields.address,
            email: fields.email,
            number: fields.number,
            company: fields.company,
            description: fields.description,
            image: fields.image,
            is_favorite: false,
        }
    }
}

impl ContactUpdate {
    /// Overlays the given fields on the current form value.
    pub fn apply(self, mut form: NewContact) -> NewContact {
        let overlays = [
            (self.first_name, &mut form.first_name),
            (self.number, &mut form.number),
            (self.last_name, &mut form.last_name),
            (self.email, &mut form.email),
            (self.address, &mut form.address),
            (self.company, &mut form.company),
            (self.description, &mut form.description),
            (self.image, &mut form.image),
        ];

        for (value, field) in overlays {
            if let Some(value) = value {
                *field = value;
            }
        }
        form
    }
}
