use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Start building a client with the common settings.
pub fn builder(timeout: Duration) -> ClientBuilder {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
}
