//! Status checks for asynchronously sent account emails.
//!
//! After registration the site queues the verification email and redirects to
//! the login page with `?email=…&command=verification&async=true`. The
//! [`page::bootstrap()`] hook recognises that redirect, adds a status container
//! to the page and starts a [`services::StatusPoller`], which asks
//! `/accounts/api/check-email-status/` how the send is going until it settles.

pub mod config;
pub mod error;
pub mod models;
pub mod page;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;
