//! Network presence advertisement
//!
//! The gateway starts an [`Advertiser`] once it is listening and stops it on
//! shutdown. Nothing else flows between discovery and the rest of the server.

/// DNS-SD service type clients browse for
pub const SERVICE_TYPE: &str = "_aviator._tcp";

/// Errors from an advertiser backend
#[derive(Debug, thiserror::Error)]
#[error("discovery error: {0}")]
pub struct DiscoveryError(pub String);

/// Announces the running gateway on the local network
pub trait Advertiser: Send + Sync {
    /// Begin advertising the gateway listening on `port`
    fn start(&self, port: u16) -> Result<(), DiscoveryError>;

    /// Withdraw the advertisement
    fn stop(&self);
}

/// Advertiser that only logs what it would announce
#[derive(Debug, Clone)]
pub struct LogAdvertiser {
    service_name: String,
}

impl LogAdvertiser {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Advertiser for LogAdvertiser {
    fn start(&self, port: u16) -> Result<(), DiscoveryError> {
        tracing::info!(
            "Advertising \"{}\" ({}) on port {}",
            self.service_name,
            SERVICE_TYPE,
            port
        );
        Ok(())
    }

    fn stop(&self) {
        tracing::info!("Withdrew advertisement \"{}\"", self.service_name);
    }
}

/// `Aviator At <hostname>`
pub fn default_service_name() -> String {
    format!("Aviator At {}", gethostname::gethostname().to_string_lossy())
}
