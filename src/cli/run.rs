use std::rc::Rc;

use crate::{
    controller::{detail::ContactDetail, list::ContactList},
    prelude::{
        AppError, Contact, ContactStore, NewContact,
        command::{Cli, Commands},
        notify::{Notifier, TerminalNotifier},
    },
    storage::{Credentials, Registration, remote::RemoteApi, session::Session},
};
use clap::Parser;
use dotenv::dotenv;
use log::debug;

pub fn run_app() -> Result<(), AppError> {
    dotenv().ok();
    let cli = Cli::parse();

    let notifier = TerminalNotifier::new(cli.yes);

    let session = Rc::new(Session::load(&cli.token_path)?);
    debug!("session token file: {}", session.path().display());
    if session.expire_if_stale()? {
        notifier.warning("Your session has expired, please log in again");
    }

    let api = RemoteApi::new(&cli.api_url, session.clone())?;
    debug!("using API at {}", api.base_url());

    match cli.command {
        Commands::Login { email, password } => {
            session.require_public()?;

            let credentials = Credentials { email, password };
            if !session.login(&api, &credentials) {
                return Err(AppError::Unauthorized(
                    "Invalid email or password".to_string(),
                ));
            }

            notifier.success("Logged in successfully");
            Ok(())
        }

        Commands::Register {
            first_name,
            last_name,
            email,
            password,
        } => {
            session.require_public()?;

            let registration = Registration {
                first_name,
                last_name,
                email,
                password,
            };
            session.register(&api, &registration)?;

            notifier.success("Account created, you can now log in");
            Ok(())
        }

        Commands::Logout => {
            session.logout()?;
            notifier.success("Logged out");
            Ok(())
        }

        // Everything below needs a logged in user
        command => {
            session.require_user()?;
            let mut store = ContactStore::new(Box::new(api));
            run_contact_command(command, &mut store, &notifier)
        }
    }
}

fn run_contact_command(
    command: Commands,
    store: &mut ContactStore,
    notifier: &dyn Notifier,
) -> Result<(), AppError> {
    match command {
        Commands::List { search, favorites } => {
            let mut list = ContactList::new(store, notifier);
            list.load()?;

            list.only_favorites(favorites);
            if let Some(term) = search {
                list.search(&term);
            }

            print_list(&list, favorites);

            list.teardown();
            Ok(())
        }

        Commands::Show { id } => {
            let mut detail = ContactDetail::new(store, notifier);
            let contact = detail.load(&id)?;

            println!("{}", contact);
            if !contact.has_contact_info() {
                println!("No contact information saved");
            }
            Ok(())
        }

        Commands::Add { fields } => {
            let mut detail = ContactDetail::new(store, notifier);

            if let Some(id) = detail.submit(&NewContact::from(fields))? {
                println!("Contact added successfully with id {}", id);
            }
            Ok(())
        }

        Commands::Edit { id, fields } => {
            let mut detail = ContactDetail::new(store, notifier);
            let current = NewContact::from(detail.load(&id)?);

            if let Some(id) = detail.submit(&fields.apply(current))? {
                println!("Contact {} updated successfully", id);
            }
            Ok(())
        }

        Commands::Delete { id } => {
            let mut detail = ContactDetail::new(store, notifier);
            detail.load(&id)?;

            if !detail.delete()? {
                notifier.info("Contact was not deleted");
            }
            Ok(())
        }

        Commands::Favorite { id } => {
            let mut detail = ContactDetail::new(store, notifier);
            detail.load(&id)?;

            if !detail.toggle_favorite() {
                return Err(AppError::FailedRequest(format!(
                    "could not toggle favorite for contact {}",
                    id
                )));
            }
            Ok(())
        }

        Commands::Share { id } => {
            let mut detail = ContactDetail::new(store, notifier);
            let contact = detail.load(&id)?;

            println!("{}", contact.share_text());
            Ok(())
        }

        Commands::Stats => {
            let mut list = ContactList::new(store, notifier);
            list.load()?;
            let stats = list.stats();

            println!("Total: {}", stats.total);
            println!("Favorites: {}", stats.favorites);
            list.teardown();
            Ok(())
        }

        Commands::Login { .. } | Commands::Register { .. } | Commands::Logout => Ok(()),
    }
}

fn print_list(list: &ContactList, favorites: bool) {
    if list.shows_empty_state() {
        println!("No contact yet");
        return;
    }
    if list.shows_no_results() {
        println!("Found no contact matching \"{}\"", list.term());
        return;
    }
    if favorites && list.visible().is_empty() {
        println!("No favorite contact yet");
        return;
    }

    for (mut i, c) in list.visible().iter().enumerate() {
        i += 1;
        println!("{}", listing_row(i, c));
    }

    let stats = list.stats();
    println!("\n{} contacts, {} favorites", stats.total, stats.favorites);
}

pub fn listing_row(i: usize, c: &Contact) -> String {
    let star = if c.is_favorite { "*" } else { " " };
    format!(
        "{i:>3}. {star} {:<2} {:<6} {:<24} {:15} {:^30} {:<15}",
        c.initials(),
        c.id,
        c.full_name(),
        c.number,
        c.email,
        c.company
    )
}
