use crate::{
    auth::{AuthConfig, TotpEngine},
    cli::{actions::Action, globals::GlobalArgs},
    opsboard,
};
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server {
            port,
            data_dir,
            totp_issuer,
        } => {
            let auth = AuthConfig::new(
                globals.access_password.clone(),
                TotpEngine::new(totp_issuer),
            );

            opsboard::new(port, &data_dir, auth).await?;
        }
    }

    Ok(())
}
