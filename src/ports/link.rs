use crate::AppInstance;

/// The in-cluster service a router or service of the app is linked to
pub fn link_service<'a>(app: &'a AppInstance, name: &str) -> Option<&'a str> {
    if name.is_empty() {
        return None;
    }
    app.spec.links.iter().find(|l| l.target == name).map(|l| l.service.as_str())
}

/// Whether a router or service of the app is linked to another service
pub fn is_linked(app: &AppInstance, name: &str) -> bool {
    link_service(app, name).is_some()
}
