pub mod auth;
pub mod employees;
pub mod entities;
pub mod health;
pub mod public;
pub mod tenant;
pub mod users;
