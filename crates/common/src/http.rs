use std::time::Duration;

use base64::Engine as _;
use reqwest::{Client, ClientBuilder};

use crate::error::{AppError, AppResult};

/// Build the outbound HTTP client with an explicit request timeout.
pub fn build_client(timeout: Duration) -> AppResult<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))
}

/// `Authorization` header value for HTTP Basic auth.
pub fn basic_authorization(login: &str, password: &str) -> String {
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{login}:{password}"));
    format!("Basic {token}")
}

#[cfg(test)]
mod tests {
    use super::basic_authorization;

    #[test]
    fn encodes_login_and_password() {
        assert_eq!(basic_authorization("login", "pass"), "Basic bG9naW46cGFzcw==");
    }
}
