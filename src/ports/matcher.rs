use super::{PortBinding, PortDef, PortPublish};

/// Whether a binding only sets the deprecated `expose` flag
///
/// Old app definitions used `expose: true` to mean "reachable inside the cluster".
/// Such bindings must never publish anything.
/// Remove together with the `expose` and `publish` fields on `PortBinding`.
pub fn deprecated_expose_only(binding: &PortBinding) -> bool {
    binding.expose && !binding.publish
}

/// Whether a binding applies to the named service
pub fn service_matches(service: &str, binding: &PortBinding) -> bool {
    if deprecated_expose_only(binding) {
        return false;
    }
    binding.target_service_name.is_empty() || binding.target_service_name == service
}

/// The bindings that apply to a service, in declaration order
pub fn publish_for_service(service: &str, bindings: &[PortBinding]) -> Vec<PortPublish> {
    bindings
        .iter()
        .filter(|b| service_matches(service, b))
        .map(PortPublish::from)
        .collect()
}

fn proto_matches(binding: &PortPublish, port: &PortDef) -> bool {
    binding.protocol.is_none() || binding.protocol == port.protocol
}

fn port_matches(binding: &PortPublish, port: &PortDef) -> bool {
    binding.target_port == 0 || binding.target_port == port.target_port
}

/// Whether a binding selects a port
///
/// Unset protocols and zero target ports on the binding match anything.
pub fn matches(binding: &PortPublish, port: &PortDef) -> bool {
    let port = port.complete();
    let binding = binding.complete();
    proto_matches(&binding, &port) && port_matches(&binding, &port)
}
