pub mod auth;
pub mod document;
pub mod employee;
pub mod entity;
pub mod tenant;
pub mod user;
