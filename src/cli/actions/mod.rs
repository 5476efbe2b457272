pub mod server;

use std::path::PathBuf;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        data_dir: PathBuf,
        totp_issuer: String,
    },
}
