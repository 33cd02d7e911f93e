//! Loader/action pairs. `prepare_view` only reads, `handle_submission` runs
//! authorize, validate, persist and session refresh in that order.

pub mod lab_pizza;
pub mod login;
pub mod page_admin;
