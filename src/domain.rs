pub mod contact;
pub mod search;
pub mod store;

use crate::errors::AppError;
use crate::storage::ContactApi;
use contact::{Contact, NewContact};
