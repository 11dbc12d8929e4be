pub mod admin;
pub mod auth;
pub mod health;
pub mod reports;
pub mod tasks;
pub mod users;
