#![recursion_limit = "1024"]
#![allow(renamed_and_removed_lints)]

#[macro_use]
extern crate serde_derive;
extern crate serde;
extern crate serde_json;
extern crate serde_yaml;

#[macro_use]
extern crate log;

extern crate k8s_openapi;
extern crate regex;

#[macro_use]
extern crate error_chain;
error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }
    links {}
    foreign_links {
        Io(::std::io::Error) #[cfg(unix)];
        SerdeY(serde_yaml::Error);
        SerdeJ(serde_json::Error);
        Regex(regex::Error);
    }
    errors {
        PortConflict(listener: String, count: usize, ports: Vec<String>) {
            description("listener is bound to more than one port")
            display("listener {} is bound to {} ports [{}], can only be bound to 1",
                listener, count, ports.join(", "))
        }
        MissingContainer(name: String) {
            description("container not found in app")
            display("container '{}' is not defined in the app", &name)
        }
        InvalidApp(name: String) {
            description("app does not validate")
            display("app {} does not validate", &name)
        }
    }
}

/// Structs for the app definition
pub mod structs;

/// App instances and the publication pipeline
pub mod app;
pub use app::{AppInstance, Publication};

/// Port collection, binding resolution and service port materialization
pub mod ports;
pub use ports::{BindingTable, ListenKey, ServicePortEntry};

/// Router status rendering against observed cluster state
pub mod status;
pub use status::{ClusterState, RouterStatus};

/// Printers for the cli
pub mod show;
