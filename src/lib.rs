//! notekeeper - multi-user note-taking backend
//!
//! Users sign up and log in to receive a short-lived bearer token, then
//! create, list, update and delete notes that only they can see.

pub mod core;
