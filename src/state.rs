use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{CredentialHasher, DocumentStore};
use crate::domain::services::{
    auth_service::TokenService, employee_service::EmployeeService,
    entity_repository::EntityRepository, permissions::PermissionResolver,
    tenant_service::TenantService, user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub entities: Arc<EntityRepository>,
    pub employees: Arc<EmployeeService>,
    pub tenants: Arc<TenantService>,
    pub users: Arc<UserService>,
    pub permissions: Arc<PermissionResolver>,
    pub token_service: Arc<TokenService>,
}

impl AppState {
    /// Wires every service onto one shared store handle.
    pub fn new(config: Config, store: Arc<dyn DocumentStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        let deadline = config.store_timeout;
        let token_service = Arc::new(TokenService::new(&config));
        let permissions = Arc::new(PermissionResolver::new(store.clone(), deadline));
        let entities = Arc::new(EntityRepository::new(store.clone(), deadline));
        let users = Arc::new(UserService::new(
            store.clone(),
            deadline,
            hasher,
            token_service.clone(),
            permissions.clone(),
            config.token_ttl,
        ));
        let employees = Arc::new(EmployeeService::new(
            store.clone(),
            deadline,
            permissions.clone(),
            entities.clone(),
        ));
        let tenants = Arc::new(TenantService::new(store.clone(), deadline, permissions.clone(), users.clone()));

        Self {
            config,
            store,
            entities,
            employees,
            tenants,
            users,
            permissions,
            token_service,
        }
    }
}
