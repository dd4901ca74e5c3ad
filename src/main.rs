//! LMS Portal client
//!
//! Main application entry point

use anyhow::Context;
use tracing::{info, warn};

use lms_portal::{
    config::Settings,
    handlers::pages,
    state::AppContext,
    utils::{helpers::format_timestamp, logging},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("loading configuration")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", lms_portal::info());

    let ctx = AppContext::from_settings(settings).await?;

    // Restore a persisted session, or log in with credentials from the environment
    let restored = ctx.services.auth_service.restore().await?;
    if restored.is_none() {
        match (std::env::var("LMS_PORTAL_EMAIL"), std::env::var("LMS_PORTAL_PASSWORD")) {
            (Ok(email), Ok(password)) => {
                let user = ctx.services.auth_service.login(&email, &password).await?;
                info!(user = %user.display_name(), "Signed in");
            }
            _ => warn!("No stored session and no LMS_PORTAL_EMAIL/LMS_PORTAL_PASSWORD; continuing unauthenticated"),
        }
    }

    let page = pages::courses_page(&ctx).await;
    info!(
        courses = page.items.len(),
        status = ?page.status,
        gate = ?page.gate,
        location = ?ctx.navigation.current(),
        "Dashboard loaded"
    );

    for notice in ctx.notifications.active() {
        info!(
            level = ?notice.level,
            at = %format_timestamp(notice.created_at),
            message = %notice.message,
            "Pending notification"
        );
    }

    Ok(())
}
