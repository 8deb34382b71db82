/// Allow normal error handling from structs
pub use super::{ErrorKind, Result, ResultExt};

// Structs that exist in the app definition

/// Ports declared on containers
pub mod port;
pub use self::port::{PortDef, PortProtocol};

/// User supplied publish bindings and links
pub mod binding;
pub use self::binding::{PortBinding, PortPublish, PublishMode, ServiceBinding};

/// Containers and their sidecars
pub mod container;
pub use self::container::Container;

/// Http routers
mod router;
pub use self::router::{Route, Router};

/// Traits that the structs can implement
pub mod traits;
pub use self::traits::Verify;
