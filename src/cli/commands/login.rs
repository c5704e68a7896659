//! Login command.

use tokio::runtime::Runtime;

use crate::catalog::auth;
use crate::config::{self, ClientConfig};

/// Exchange credentials for a token and store it
pub fn cmd_login(rt: &Runtime, email: &str, password: &str, insecure: bool) -> anyhow::Result<()> {
    let mut config = config::load();
    if insecure {
        config.catalog.verify_tls = false;
    }

    let client_config = ClientConfig::from_catalog(&config.catalog, None);
    let token = rt.block_on(auth::login(&client_config, email, password))?;
    auth::save_token(&config.auth.token_path, &token)?;

    println!("Token saved to {:?}", config.auth.token_path);
    Ok(())
}
