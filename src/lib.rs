pub mod cli;
pub mod controller;
pub mod domain;
pub mod errors;
pub mod prelude;
pub mod storage;
