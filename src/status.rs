use std::collections::BTreeMap;

use crate::ports::{is_linked, link_service};
use crate::{AppInstance, Result};

/// Observed state of the cluster as needed for rendering app status
///
/// Implemented by whatever talks to the apiserver.
pub trait ClusterState {
    /// Whether an ingress with this name exists in the namespace
    fn ingress_exists(&self, namespace: &str, name: &str) -> Result<bool>;
    /// Whether the service with this name has ready endpoints
    fn service_ready(&self, namespace: &str, name: &str) -> Result<bool>;
}

/// Status of a single router in an app
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterStatus {
    /// The router exists, either as an ingress or through a link
    pub defined: bool,
    /// Defined and backed by ready endpoints
    pub ready: bool,
    /// Service the router is linked to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_override: Option<String>,
}

/// Status for every router of an app
///
/// A failure to look up readiness counts as not ready,
/// a failure to look up the ingress is returned.
pub fn render_routers<C: ClusterState>(app: &AppInstance, cluster: &C) -> Result<BTreeMap<String, RouterStatus>> {
    let mut res = BTreeMap::new();
    for name in app.app_spec.routers.keys() {
        let mut s = RouterStatus {
            defined: is_linked(app, name),
            link_override: link_service(app, name).map(String::from),
            ready: false,
        };
        if cluster.ingress_exists(&app.namespace, name)? {
            s.defined = true;
        }
        let ready = match cluster.service_ready(&app.namespace, name) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to check readiness of router {}: {}", name, e);
                false
            }
        };
        s.ready = s.defined && ready;
        res.insert(name.clone(), s);
    }
    Ok(res)
}
