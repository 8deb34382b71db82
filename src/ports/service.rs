use k8s_openapi::api::core::v1::ServicePort;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;
use std::convert::TryFrom;

use super::{BindingTable, ErrorKind, PortDef, PortProtocol, Result};
use crate::structs::port::MAX_PORT;
use crate::Error;

/// A port on the kubernetes service of an app container
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePortEntry {
    /// Unique within the service, `<port>-<protocol>`
    pub name: String,
    pub port: u32,
    pub target_port: u32,
    pub protocol: PortProtocol,
}

impl From<&PortDef> for ServicePortEntry {
    fn from(p: &PortDef) -> Self {
        let p = p.complete();
        let protocol = p.protocol();
        ServicePortEntry {
            name: format!("{}-{}", p.port, protocol),
            port: p.port,
            target_port: p.target_port,
            protocol,
        }
    }
}

/// Kubernetes has no http protocol, it rides on tcp
///
/// Fails for port numbers that do not fit a kubernetes service port.
impl TryFrom<ServicePortEntry> for ServicePort {
    type Error = Error;

    fn try_from(e: ServicePortEntry) -> Result<Self> {
        if e.port > MAX_PORT || e.target_port > MAX_PORT {
            bail!("Service port {} maps {} to {}, ports can be at most {}", e.name, e.port, e.target_port, MAX_PORT);
        }
        let protocol = match e.protocol {
            PortProtocol::Udp => "UDP",
            PortProtocol::Http | PortProtocol::Tcp => "TCP",
        };
        Ok(ServicePort {
            name: Some(e.name),
            port: e.port as i32,
            target_port: Some(IntOrString::Int(e.target_port as i32)),
            protocol: Some(protocol.into()),
            ..Default::default()
        })
    }
}

impl BindingTable {
    /// Service ports for every listener, sorted by name
    ///
    /// Fails if a tcp/udp listener or an http hostname has more than one port bound,
    /// or if two different ports would end up on the same service port.
    pub fn service_ports(&self) -> Result<Vec<ServicePortEntry>> {
        let mut by_name: BTreeMap<String, (ServicePortEntry, String)> = BTreeMap::new();

        for (listen, ports) in self {
            if ports.len() > 1 && !listen.is_cluster_domain() {
                let names = ports.iter().map(|p| p.to_string()).collect::<Vec<_>>();
                bail!(ErrorKind::PortConflict(listen.to_string(), ports.len(), names));
            }
            for port in ports {
                let mut port = port.complete();
                if listen.port != 0 {
                    port.port = listen.port;
                }
                let entry = ServicePortEntry::from(&port);
                let desc = port.to_string();
                match by_name.get(&entry.name) {
                    Some((existing, _)) if *existing == entry => {}
                    Some((_, other)) => {
                        let listener = format!("{}/{}", entry.port, entry.protocol);
                        bail!(ErrorKind::PortConflict(listener, 2, vec![other.clone(), desc]));
                    }
                    None => {
                        by_name.insert(entry.name.clone(), (entry, desc));
                    }
                }
            }
        }
        // BTreeMap iteration is already sorted by name
        Ok(by_name.into_iter().map(|(_, (e, _))| e).collect())
    }

    /// Http ports bound to each hostname
    ///
    /// The empty hostname holds every http port published on the cluster domain.
    pub fn by_hostname(&self) -> BTreeMap<String, Vec<PortDef>> {
        self.iter()
            .filter(|(listen, _)| listen.protocol == PortProtocol::Http)
            .map(|(listen, ports)| (listen.hostname.clone(), ports.clone()))
            .collect()
    }
}
