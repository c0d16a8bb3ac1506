//! API request handlers

pub mod admin;
pub mod auth;
pub mod bulletins;
pub mod hr;
pub mod projects;
pub mod tasks;
pub mod teams;
