use std::sync::Arc;
use validator::Validate;

use crate::models::{CreateRoleRequest, Permission, Role, RoleResponse};
use crate::repositories::RoleRepository;
use crate::utils::error::AppError;
use crate::utils::parse_object_id;

pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";

const RESOURCES: [&str; 4] = ["users", "roles", "mentorships", "career-advice"];

/// Roles created at startup when missing.
pub fn default_roles() -> Vec<Role> {
    let grant = |actions: &[&str]| -> Vec<Permission> {
        RESOURCES
            .iter()
            .map(|resource| Permission::new(resource, actions))
            .collect()
    };

    vec![
        Role {
            id: None,
            name: ADMIN_ROLE.to_string(),
            permissions: grant(&["create", "read", "update", "delete"]),
        },
        Role {
            id: None,
            name: USER_ROLE.to_string(),
            permissions: grant(&["read"]),
        },
    ]
}

pub struct RolesService {
    roles: Arc<dyn RoleRepository>,
}

impl RolesService {
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    /// Names are not unique; two roles may share one.
    pub async fn create_role(&self, request: CreateRoleRequest) -> Result<RoleResponse, AppError> {
        request.validate()?;
        let role = self
            .roles
            .insert(Role {
                id: None,
                name: request.name,
                permissions: request.permissions,
            })
            .await?;

        log::info!("✅ Role created: {}", role.name);
        Ok(role.into())
    }

    pub async fn get_role_by_id(&self, role_id: &str) -> Result<RoleResponse, AppError> {
        let id = parse_object_id(role_id, "Invalid role ID format")?;
        self.roles
            .find_by_id(&id)
            .await?
            .map(RoleResponse::from)
            .ok_or_else(|| AppError::not_found(format!("Role with ID {} not found", role_id)))
    }

    pub async fn list_roles(&self) -> Result<Vec<RoleResponse>, AppError> {
        let roles = self.roles.list().await?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }

    /// Inserts each default role whose name is not taken yet. Returns how
    /// many were created.
    pub async fn seed_default_roles(&self) -> Result<usize, AppError> {
        let mut created = 0;
        for role in default_roles() {
            if self.roles.find_by_name(&role.name).await?.is_some() {
                log::debug!("Role '{}' already exists, skipping", role.name);
                continue;
            }
            log::info!("🌱 Seeding role '{}'", role.name);
            self.roles.insert(role).await?;
            created += 1;
        }
        Ok(created)
    }
}
