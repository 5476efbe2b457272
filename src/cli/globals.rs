use secrecy::SecretString;

/// Secrets and process-wide values that are not part of the action itself.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub access_password: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(access_password: SecretString) -> Self {
        Self { access_password }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(SecretString::from("hunter2".to_string()));
        assert_eq!(args.access_password.expose_secret(), "hunter2");
    }
}
