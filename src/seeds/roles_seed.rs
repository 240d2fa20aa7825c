use crate::services::RolesService;

/// Makes sure the default `admin` and `user` roles exist.
/// A failure is logged and startup continues.
pub async fn seed_default_roles(roles: &RolesService) {
    log::info!("📋 Roles: checking default roles...");

    match roles.seed_default_roles().await {
        Ok(0) => log::info!("📋 Roles: defaults already in DB, skipping seed"),
        Ok(created) => log::info!("   ✅ Inserted {} default roles", created),
        Err(e) => log::error!("   ❌ Failed to seed default roles: {}", e),
    }
}
