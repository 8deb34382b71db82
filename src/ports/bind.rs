use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use super::{matcher, PortBinding, PortDef, PortProtocol, PortPublish, PublishMode};

/// The external slot a port is published on
///
/// Http listeners are keyed by hostname alone and share the ingress port,
/// so `port` is always zero for them. Tcp and udp listeners never have a hostname.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ListenKey {
    pub hostname: String,
    pub port: u32,
    pub protocol: PortProtocol,
}

impl ListenKey {
    /// The listener every published http port is routed through on the cluster domain
    pub fn cluster_domain() -> ListenKey {
        ListenKey {
            hostname: String::new(),
            port: 0,
            protocol: PortProtocol::Http,
        }
    }

    pub fn is_cluster_domain(&self) -> bool {
        *self == ListenKey::cluster_domain()
    }

    /// The listener a port would get without any binding
    fn natural(port: &PortDef) -> ListenKey {
        let protocol = port.protocol();
        if protocol == PortProtocol::Http {
            ListenKey { hostname: port.hostname.clone(), port: 0, protocol }
        } else {
            ListenKey { hostname: String::new(), port: port.complete().port, protocol }
        }
    }

    /// The listener a port gets through a matching binding
    fn bound(port: &PortDef, binding: &PortPublish) -> ListenKey {
        let mut key = ListenKey::natural(port);
        if !binding.hostname.is_empty() && key.protocol == PortProtocol::Http {
            key.hostname = binding.hostname.clone();
        } else if binding.port != 0 && key.protocol != PortProtocol::Http {
            key.port = binding.port;
        }
        key
    }
}

impl fmt::Display for ListenKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.protocol, self.hostname.as_str()) {
            (PortProtocol::Http, "") => write!(f, "<cluster-domain>/http"),
            (PortProtocol::Http, host) => write!(f, "{}/http", host),
            (proto, _) => write!(f, "{}/{}", self.port, proto),
        }
    }
}

/// Listeners with the ports bound to them
///
/// Ports within a listener are kept in the order they were bound.
/// More than one port on a listener is a conflict, except for the cluster domain listener.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindingTable(BTreeMap<ListenKey, Vec<PortDef>>);

impl BindingTable {
    /// Bind a port to a listener
    ///
    /// The cluster domain listener holds each port at most once.
    fn bind(&mut self, key: ListenKey, port: PortDef) {
        trace!("Binding {} to {}", port, key);
        let once = key.is_cluster_domain();
        let ports = self.0.entry(key).or_insert_with(Vec::new);
        if !(once && ports.contains(&port)) {
            ports.push(port);
        }
    }

    /// Register a published http port on the cluster domain
    fn bind_cluster_domain(&mut self, port: &PortDef) {
        self.bind(ListenKey::cluster_domain(), port.clone());
    }

    pub fn get(&self, key: &ListenKey) -> Option<&Vec<PortDef>> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<ListenKey, Vec<PortDef>> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a BindingTable {
    type Item = (&'a ListenKey, &'a Vec<PortDef>);
    type IntoIter = btree_map::Iter<'a, ListenKey, Vec<PortDef>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Bind ports to listeners using bindings already filtered to one service
///
/// Returns `None` when the mode is `PublishMode::None`, whatever the bindings say.
pub fn apply_bindings(mode: PublishMode, bindings: &[PortPublish], ports: &[PortDef]) -> Option<BindingTable> {
    if mode == PublishMode::None {
        return None;
    }
    let mut table = BindingTable::default();

    for port in ports.iter().map(PortDef::complete) {
        let mut published = false;
        for binding in bindings {
            if matcher::matches(binding, &port) {
                published = true;
                table.bind(ListenKey::bound(&port, binding), port.clone());
            }
        }

        if !published && (mode == PublishMode::All || port.publish) {
            published = true;
            table.bind(ListenKey::natural(&port), port.clone());
        }

        if published && port.protocol() == PortProtocol::Http {
            table.bind_cluster_domain(&port);
        }
    }
    Some(table)
}

/// Bind the ports of a service to listeners
pub fn resolve(mode: PublishMode, service: &str, bindings: &[PortBinding], ports: &[PortDef]) -> Option<BindingTable> {
    let publish = matcher::publish_for_service(service, bindings);
    debug!("Resolving {} ports for {} with {} bindings in mode {:?}", ports.len(), service, publish.len(), mode);
    apply_bindings(mode, &publish, ports)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(port: u32, target: u32, hostname: &str) -> PortDef {
        PortDef {
            port,
            target_port: target,
            protocol: Some(PortProtocol::Http),
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    fn tcp(port: u32, target: u32) -> PortDef {
        PortDef { port, target_port: target, protocol: Some(PortProtocol::Tcp), ..Default::default() }
    }

    fn key(hostname: &str, port: u32, protocol: PortProtocol) -> ListenKey {
        ListenKey { hostname: hostname.into(), port, protocol }
    }

    #[test]
    fn none_publishes_nothing() {
        let ports = vec![PortDef { publish: true, ..http(80, 8080, "") }, tcp(5432, 5432)];
        let bindings = vec![PortPublish::default(), PortPublish { port: 1234, ..Default::default() }];
        assert_eq!(apply_bindings(PublishMode::None, &bindings, &ports), None);
        assert_eq!(apply_bindings(PublishMode::None, &[], &ports), None);
    }

    #[test]
    fn defaults_only_publishes_flagged() {
        let flagged = PortDef { publish: true, ..tcp(5432, 5432) };
        let ports = vec![flagged.clone(), tcp(6379, 6379)];
        let table = apply_bindings(PublishMode::Defaults, &[], &ports).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&key("", 5432, PortProtocol::Tcp)), Some(&vec![flagged]));

        let nothing = apply_bindings(PublishMode::Defaults, &[], &[tcp(6379, 6379)]).unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn all_completes_bare_target_ports() {
        let ports = vec![PortDef { target_port: 9000, protocol: Some(PortProtocol::Tcp), ..Default::default() }];
        let table = apply_bindings(PublishMode::All, &[], &ports).unwrap();
        let bound = table.get(&key("", 9000, PortProtocol::Tcp)).unwrap();
        assert_eq!(bound.len(), 1);
        assert_eq!(bound[0].port, 9000);
        assert_eq!(bound[0].target_port, 9000);
    }

    #[test]
    fn bindings_override_listeners() {
        let ports = vec![http(80, 8080, "internal.local"), tcp(5432, 5432)];
        let bindings = vec![
            PortPublish { protocol: Some(PortProtocol::Http), hostname: "app.example.com".into(), ..Default::default() },
            PortPublish { target_port: 5432, port: 15432, ..Default::default() },
        ];
        let table = apply_bindings(PublishMode::Defaults, &bindings, &ports).unwrap();
        assert!(table.get(&key("internal.local", 0, PortProtocol::Http)).is_none());
        assert_eq!(table.get(&key("app.example.com", 0, PortProtocol::Http)).unwrap().len(), 1);
        assert_eq!(table.get(&key("", 15432, PortProtocol::Tcp)).unwrap(), &vec![tcp(5432, 5432)]);
        assert_eq!(table.get(&ListenKey::cluster_domain()).unwrap().len(), 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn hostname_binding_ignored_for_tcp() {
        let bindings = vec![PortPublish { hostname: "db.local".into(), ..Default::default() }];
        let table = apply_bindings(PublishMode::Defaults, &bindings, &[tcp(5432, 5432)]).unwrap();
        assert_eq!(table.get(&key("", 5432, PortProtocol::Tcp)).unwrap().len(), 1);
    }

    #[test]
    fn cluster_domain_has_no_duplicates() {
        let a = http(80, 8080, "a.local");
        let b = http(81, 8081, "b.local");
        let bindings = vec![
            PortPublish { hostname: "one.local".into(), ..Default::default() },
            PortPublish { hostname: "two.local".into(), target_port: 8080, ..Default::default() },
        ];
        let table = apply_bindings(PublishMode::All, &bindings, &[a.clone(), b.clone()]).unwrap();
        assert_eq!(table.get(&ListenKey::cluster_domain()), Some(&vec![a.clone(), b.clone()]));
        assert_eq!(table.get(&key("one.local", 0, PortProtocol::Http)), Some(&vec![a.clone(), b]));
        assert_eq!(table.get(&key("two.local", 0, PortProtocol::Http)), Some(&vec![a]));
    }

    #[test]
    fn hostless_http_bound_twice_is_listed_once() {
        let web = http(80, 8080, "");
        let bindings = vec![
            PortPublish { port: 9000, ..Default::default() },
            PortPublish { target_port: 8080, ..Default::default() },
        ];
        let table = apply_bindings(PublishMode::Defaults, &bindings, &[web.clone()]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&ListenKey::cluster_domain()), Some(&vec![web.clone()]));
        assert_eq!(table.by_hostname()[""], vec![web]);
        assert_eq!(table.service_ports().unwrap().len(), 1);
    }

    #[test]
    fn resolve_filters_by_service() {
        let bindings = vec![
            PortBinding { target_service_name: "db".into(), port: 15432, ..Default::default() },
            PortBinding { expose: true, port: 25432, ..Default::default() },
        ];
        let ports = vec![tcp(5432, 5432)];
        let web = resolve(PublishMode::Defaults, "web", &bindings, &ports).unwrap();
        assert!(web.is_empty());
        let db = resolve(PublishMode::Defaults, "db", &bindings, &ports).unwrap();
        assert_eq!(db.len(), 1);
        assert!(db.get(&key("", 15432, PortProtocol::Tcp)).is_some());
    }

    #[test]
    fn resolve_is_deterministic() {
        let ports = vec![http(80, 8080, "a.local"), tcp(53, 53), PortDef { target_port: 9000, ..Default::default() }];
        let bindings = vec![PortBinding::default()];
        let first = resolve(PublishMode::All, "web", &bindings, &ports);
        let second = resolve(PublishMode::All, "web", &bindings, &ports);
        assert_eq!(first, second);
    }
}
