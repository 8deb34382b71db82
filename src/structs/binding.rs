use super::port::{verify_hostname, PortProtocol, MAX_PORT};
use super::traits::Verify;
use super::Result;

/// Which ports get published when no binding mentions them
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    /// Nothing is published, bindings and `publish` flags included
    None,
    /// Only ports marked `publish` (or matched by a binding) are published
    Defaults,
    /// Every port is published
    All,
}

impl Default for PublishMode {
    fn default() -> Self { PublishMode::Defaults }
}

/// A user supplied publish override
///
/// Zero and empty fields are wildcards:
///
/// ```yaml
/// ports:
/// # publish every http port of the web service under this hostname
/// - targetServiceName: web
///   protocol: http
///   hostname: web.example.com
/// # publish the db port 5432 as 15432
/// - targetServiceName: db
///   targetPort: 5432
///   port: 15432
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PortBinding {
    /// Service these ports belong to (any service if empty)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_service_name: String,
    /// Protocol to match (any protocol if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<PortProtocol>,
    /// Port the container listens on (any port if zero)
    pub target_port: u32,
    /// Port to publish on (tcp and udp only)
    pub port: u32,
    /// Hostname to publish on (http only)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,

    /// Deprecated
    pub expose: bool,
    /// Deprecated
    pub publish: bool,
}

impl Verify for PortBinding {
    fn verify(&self) -> Result<()> {
        if self.port > MAX_PORT || self.target_port > MAX_PORT {
            bail!("Binding ports {}:{} are out of range (max {})", self.port, self.target_port, MAX_PORT);
        }
        if !self.hostname.is_empty() {
            if let Some(proto) = self.protocol {
                if proto != PortProtocol::Http {
                    bail!("Binding for hostname {} cannot use protocol {}", self.hostname, proto);
                }
            }
            verify_hostname(&self.hostname)?;
        }
        Ok(())
    }
}

/// A binding that has been matched to a service
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PortPublish {
    pub port: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<PortProtocol>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    pub target_port: u32,
}

impl PortPublish {
    /// Default the published port to the target port
    ///
    /// Leaves `protocol` and `targetPort` alone, an empty value there is a wildcard.
    pub fn complete(&self) -> PortPublish {
        let mut publish = self.clone();
        if publish.port == 0 {
            publish.port = publish.target_port;
        }
        publish
    }
}

impl From<&PortBinding> for PortPublish {
    fn from(b: &PortBinding) -> Self {
        PortPublish {
            port: b.port,
            protocol: b.protocol,
            hostname: b.hostname.clone(),
            target_port: b.target_port,
        }
    }
}

/// Link a router or service in this app to another service in the cluster
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceBinding {
    /// Name of the router or service inside the app
    pub target: String,
    /// Name of the service it resolves to
    pub service: String,
}

impl Verify for ServiceBinding {
    fn verify(&self) -> Result<()> {
        if self.target.is_empty() || self.service.is_empty() {
            bail!("Links need both a 'target' and a 'service'");
        }
        Ok(())
    }
}
