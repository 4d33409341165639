pub mod auth_service;
pub mod employee_service;
pub mod employee_validator;
pub mod entity_repository;
pub mod permissions;
pub mod scoped;
pub mod tenant_service;
pub mod user_service;
