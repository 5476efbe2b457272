use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let access_password = matches
        .get_one::<String>("access-password")
        .map(|s| SecretString::from(s.to_string()))
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --access-password"))?;

    let action = Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(3000),
        data_dir: matches
            .get_one::<PathBuf>("data-dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("data")),
        totp_issuer: matches
            .get_one::<String>("totp-issuer")
            .cloned()
            .unwrap_or_else(|| "opsboard".to_string()),
    };

    Ok((action, GlobalArgs::new(access_password)))
}
