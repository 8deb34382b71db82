use std::collections::BTreeSet;

use super::{PortDef, PortProtocol};
use crate::structs::Container;

/// Ports claimed so far during one collection pass
#[derive(Default)]
struct Claimed {
    ports: BTreeSet<u32>,
    targets: BTreeSet<u32>,
}

impl Claimed {
    fn collect(&mut self, ports: &[PortDef], dev_mode: bool) -> Vec<PortDef> {
        let mut result = vec![];
        for port in ports {
            if port.dev && !dev_mode {
                continue;
            }
            // a bare port or targetPort is used for both sides
            let completed = port.complete();
            if self.ports.contains(&completed.port) || self.targets.contains(&completed.target_port) {
                debug!("Dropping port {} already claimed by an earlier declaration", port);
                continue;
            }
            self.ports.insert(completed.port);
            self.targets.insert(completed.target_port);
            result.push(port.clone());
        }
        result
    }
}

/// Ports of a container and its sidecars
///
/// The container's own ports come first, then sidecars sorted by name.
/// When two declarations share a port or target port number the first one wins,
/// later ones are dropped without error.
pub fn collect_container_ports(container: &Container, dev_mode: bool) -> Vec<PortDef> {
    let mut claimed = Claimed::default();
    let mut result = claimed.collect(&container.ports, dev_mode);
    for (name, sidecar) in &container.sidecars {
        trace!("Collecting ports from sidecar {}", name);
        result.extend(claimed.collect(&sidecar.ports, dev_mode));
    }
    result
}

/// Remove development only ports unless in dev mode
pub fn filter_dev_ports(ports: &[PortDef], dev_mode: bool) -> Vec<PortDef> {
    ports.iter().filter(|p| dev_mode || !p.dev).cloned().collect()
}

/// Ports using any of the given protocols (tcp when unset)
pub fn by_protocol(ports: &[PortDef], protocols: &[PortProtocol]) -> Vec<PortDef> {
    ports.iter().filter(|p| protocols.contains(&p.protocol())).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::btreemap;

    fn tcp(port: u32, target: u32) -> PortDef {
        PortDef { port, target_port: target, protocol: Some(PortProtocol::Tcp), ..Default::default() }
    }

    #[test]
    fn first_declaration_wins() {
        let c = Container {
            ports: vec![tcp(8080, 80)],
            sidecars: btreemap! {
                "proxy".to_string() => Container { ports: vec![tcp(8080, 81)], ..Default::default() },
            },
            ..Default::default()
        };
        assert_eq!(collect_container_ports(&c, false), vec![tcp(8080, 80)]);
    }

    #[test]
    fn target_ports_are_claimed() {
        let c = Container {
            ports: vec![tcp(8080, 80), tcp(9090, 80), PortDef { target_port: 8080, ..Default::default() }],
            ..Default::default()
        };
        assert_eq!(collect_container_ports(&c, false), vec![tcp(8080, 80)]);
    }

    #[test]
    fn bare_ports_do_not_collide() {
        let a = PortDef { port: 5005, ..Default::default() };
        let b = PortDef { port: 6006, ..Default::default() };
        let c = Container { ports: vec![a.clone(), b.clone()], ..Default::default() };
        assert_eq!(collect_container_ports(&c, false), vec![a, b]);
    }

    #[test]
    fn sidecars_in_name_order() {
        let c = Container {
            ports: vec![tcp(80, 80)],
            sidecars: btreemap! {
                "zipkin".to_string() => Container { ports: vec![tcp(9411, 9411)], ..Default::default() },
                "envoy".to_string() => Container { ports: vec![tcp(15001, 15001), tcp(9411, 9412)], ..Default::default() },
            },
            ..Default::default()
        };
        let res = collect_container_ports(&c, false);
        assert_eq!(res, vec![tcp(80, 80), tcp(15001, 15001), tcp(9411, 9412)]);
    }

    #[test]
    fn dev_ports() {
        let debug = PortDef { port: 5005, dev: true, ..Default::default() };
        let c = Container { ports: vec![tcp(80, 8080), debug.clone()], ..Default::default() };
        assert!(!collect_container_ports(&c, false).contains(&debug));
        assert!(collect_container_ports(&c, true).contains(&debug));

        assert_eq!(filter_dev_ports(&c.ports, false), vec![tcp(80, 8080)]);
        assert_eq!(filter_dev_ports(&c.ports, true).len(), 2);
    }

    #[test]
    fn protocol_filter() {
        let http = PortDef { port: 80, protocol: Some(PortProtocol::Http), ..Default::default() };
        let bare = PortDef { port: 5432, ..Default::default() };
        let ports = vec![http.clone(), bare.clone()];
        assert_eq!(by_protocol(&ports, &[PortProtocol::Http]), vec![http]);
        assert_eq!(by_protocol(&ports, &[PortProtocol::Tcp, PortProtocol::Udp]), vec![bare]);
    }
}
