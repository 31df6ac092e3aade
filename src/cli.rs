pub mod command;
pub mod notify;
pub mod run;
