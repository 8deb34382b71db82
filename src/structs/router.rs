use super::traits::Verify;
use super::Result;

/// A path based http router in front of services in the app
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Router {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Route {
    /// Path prefix
    pub path: String,
    /// Service to send matching requests to
    pub target_service_name: String,
    /// Port on that service (first http port if zero)
    pub target_port: u32,
}

impl Verify for Router {
    fn verify(&self) -> Result<()> {
        for r in &self.routes {
            if !r.path.starts_with('/') {
                bail!("Route path '{}' must start with a slash", r.path);
            }
            if r.target_service_name.is_empty() {
                bail!("Route {} needs a targetServiceName", r.path);
            }
        }
        Ok(())
    }
}
