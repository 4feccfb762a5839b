//! HTTP gateway for the exercise tracker.
//!
//! Exposes user registration, user listing, exercise logging and log
//! queries over a [`tracker_store::UserStore`].

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
