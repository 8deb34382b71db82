use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::ports::{self, BindingTable, ServicePortEntry};
use crate::structs::{Container, PortBinding, PublishMode, Router, ServiceBinding, Verify};
use crate::{ErrorKind, Result, ResultExt};

/// What the user asked for when running the app
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AppInstanceSpec {
    /// Which ports get published without a binding
    pub publish_mode: PublishMode,
    /// Publish overrides
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortBinding>,
    /// Routers or services replaced by existing services in the cluster
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ServiceBinding>,
    /// Open ports marked `dev`
    pub dev_mode: bool,
}

/// The compiled app definition
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSpec {
    pub containers: BTreeMap<String, Container>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub routers: BTreeMap<String, Router>,
}

/// A deployed app
///
/// ```yaml
/// name: blog
/// namespace: blog-1a2b
/// spec:
///   publishMode: defaults
///   ports:
///   - targetServiceName: web
///     hostname: blog.example.com
/// appSpec:
///   containers:
///     web:
///       image: nginx
///       ports:
///       - port: 80
///         targetPort: 8080
///         protocol: http
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AppInstance {
    pub name: String,
    pub namespace: String,
    pub spec: AppInstanceSpec,
    pub app_spec: AppSpec,
}

/// Result of a publication pass for one container
#[derive(Clone, Debug, PartialEq)]
pub struct Publication {
    /// Listeners and their ports, `None` when publishing is turned off
    pub bound: Option<BindingTable>,
    /// Ports for the container's service, sorted by name
    pub service_ports: Vec<ServicePortEntry>,
}

impl Publication {
    /// Http ports to route per hostname
    pub fn routes(&self) -> BTreeMap<String, Vec<ports::PortDef>> {
        self.bound.as_ref().map(BindingTable::by_hostname).unwrap_or_default()
    }
}

impl AppInstance {
    /// Parse and verify an app from yaml
    pub fn from_yaml(data: &str) -> Result<AppInstance> {
        let app: AppInstance = serde_yaml::from_str(data)?;
        app.verify()?;
        Ok(app)
    }

    /// Read an app from a yaml file
    pub fn read(pth: &Path) -> Result<AppInstance> {
        trace!("Reading app from {}", pth.display());
        if !pth.is_file() {
            bail!("App file {} does not exist", pth.display());
        }
        let data = fs::read_to_string(pth)?;
        AppInstance::from_yaml(&data).chain_err(|| format!("failed to load {}", pth.display()))
    }

    pub fn verify(&self) -> Result<()> {
        self.verify_inner().chain_err(|| ErrorKind::InvalidApp(self.name.clone()))
    }

    fn verify_inner(&self) -> Result<()> {
        if self.app_spec.containers.is_empty() {
            bail!("App needs at least one container");
        }
        for (name, c) in &self.app_spec.containers {
            c.verify().chain_err(|| format!("container {} does not validate", name))?;
        }
        for (name, r) in &self.app_spec.routers {
            r.verify().chain_err(|| format!("router {} does not validate", name))?;
        }
        for b in &self.spec.ports {
            b.verify()?;
        }
        for l in &self.spec.links {
            l.verify()?;
        }
        Ok(())
    }

    pub fn container(&self, name: &str) -> Result<&Container> {
        match self.app_spec.containers.get(name) {
            Some(c) => Ok(c),
            None => bail!(ErrorKind::MissingContainer(name.into())),
        }
    }

    /// Collect, bind and materialize the published ports of a container
    ///
    /// The container name is the service name bindings are matched against.
    pub fn publish(&self, container: &str) -> Result<Publication> {
        let c = self.container(container)?;
        let collected = ports::collect_container_ports(c, self.spec.dev_mode);
        let bound = ports::resolve(self.spec.publish_mode, container, &self.spec.ports, &collected);
        let service_ports = match &bound {
            Some(table) => table
                .service_ports()
                .chain_err(|| format!("cannot publish ports of {}", container))?,
            None => vec![],
        };
        debug!("Publishing {} service ports for {}/{}", service_ports.len(), self.name, container);
        Ok(Publication { bound, service_ports })
    }
}
