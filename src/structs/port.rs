use regex::Regex;
use std::fmt;

use super::traits::Verify;
use super::Result;

/// Supported port protocols
///
/// Http ports are routed by hostname through a shared ingress,
/// tcp and udp ports each need a dedicated service port.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortProtocol {
    Http,
    Tcp,
    Udp,
}

impl Default for PortProtocol {
    fn default() -> Self { PortProtocol::Tcp }
}

impl fmt::Display for PortProtocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PortProtocol::Http => write!(f, "http"),
            PortProtocol::Tcp => write!(f, "tcp"),
            PortProtocol::Udp => write!(f, "udp"),
        }
    }
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// Port declared on a container or sidecar
///
/// Either of `port` or `targetPort` can be left out, in which case the other one is used.
///
/// ```yaml
/// ports:
/// - port: 80
///   targetPort: 8080
///   protocol: http
///   hostname: api.example.com
///   publish: true
/// - targetPort: 5432
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(default, rename_all = "camelCase")]
pub struct PortDef {
    /// Port exposed on the service
    #[serde(skip_serializing_if = "is_zero")]
    pub port: u32,
    /// Port the process in the container listens on
    #[serde(skip_serializing_if = "is_zero")]
    pub target_port: u32,
    /// Port protocol (tcp when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<PortProtocol>,
    /// Hostname to route to this port (http only)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    /// Only open this port in development mode
    pub dev: bool,
    /// Publish this port even without a binding
    pub publish: bool,
}

impl PortDef {
    /// Fill in the implicit defaults
    ///
    /// Idempotent. After this `protocol` is always set, and `port` / `targetPort`
    /// are only zero if both were left out.
    pub fn complete(&self) -> PortDef {
        let mut port = self.clone();
        if port.target_port == 0 {
            port.target_port = port.port;
        }
        if port.port == 0 {
            port.port = port.target_port;
        }
        if port.protocol.is_none() {
            port.protocol = Some(PortProtocol::default());
        }
        port
    }

    /// The protocol of this port with defaults applied
    pub fn protocol(&self) -> PortProtocol {
        self.protocol.unwrap_or_default()
    }
}

/// Short human readable form, e.g. `80:8080/http` or `api.local:8080/http`
impl fmt::Display for PortDef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let target = self.complete().target_port;
        if !self.hostname.is_empty() {
            write!(f, "{}:", self.hostname)?;
        } else if self.port != 0 && self.port != target {
            write!(f, "{}:", self.port)?;
        }
        write!(f, "{}", target)?;
        if let Some(proto) = self.protocol {
            write!(f, "/{}", proto)?;
        }
        Ok(())
    }
}

/// Largest valid port number
pub const MAX_PORT: u32 = 65535;

/// Validate a hostname as a dns subdomain (optionally wildcarded)
pub(crate) fn verify_hostname(hostname: &str) -> Result<()> {
    let re = Regex::new(r"^(\*\.)?[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")?;
    if hostname.len() > 253 || !re.is_match(hostname) {
        bail!("Hostname '{}' is not a valid dns name", hostname);
    }
    Ok(())
}

impl Verify for PortDef {
    fn verify(&self) -> Result<()> {
        if self.port > MAX_PORT || self.target_port > MAX_PORT {
            bail!("Port {} is out of range (max {})", self, MAX_PORT);
        }
        if self.port == 0 && self.target_port == 0 {
            bail!("Port needs to define one of 'port' or 'targetPort'");
        }
        if !self.hostname.is_empty() {
            if self.protocol() != PortProtocol::Http {
                bail!("Port {} sets a hostname, but hostnames are only valid for http ports", self);
            }
            verify_hostname(&self.hostname)?;
        }
        Ok(())
    }
}
