//! Port publication
//!
//! Ports are resolved for one service at a time, always in the same order:
//!
//! 1. `collect_container_ports` merges the container's ports with its sidecars
//! 2. `resolve` binds the collected ports to listeners according to the publish mode
//! 3. `BindingTable::service_ports` turns the listeners into service ports
//!
//! Nothing here does any io, and nothing is cached between passes.

pub use crate::structs::{PortBinding, PortDef, PortProtocol, PortPublish, PublishMode};
pub use crate::{ErrorKind, Result};

mod matcher;
pub use self::matcher::{deprecated_expose_only, matches, publish_for_service, service_matches};

mod collect;
pub use self::collect::{by_protocol, collect_container_ports, filter_dev_ports};

mod bind;
pub use self::bind::{apply_bindings, resolve, BindingTable, ListenKey};

mod service;
pub use self::service::ServicePortEntry;

mod link;
pub use self::link::{is_linked, link_service};
