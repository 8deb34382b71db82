use serde::Serialize;
use std::collections::BTreeMap;

use super::ports::{link_service, PortDef, ServicePortEntry};
use super::{AppInstance, Result};

/// Output format for the show commands
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

fn print<T: Serialize>(data: &T, fmt: OutputFormat) -> Result<()> {
    let out = match fmt {
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
    };
    println!("{}", out);
    Ok(())
}

/// Containers to show, all of them if none specified
fn containers<'a>(app: &'a AppInstance, container: Option<&'a str>) -> Result<Vec<&'a str>> {
    match container {
        Some(c) => {
            app.container(c)?;
            Ok(vec![c])
        }
        None => Ok(app.app_spec.containers.keys().map(String::as_str).collect()),
    }
}

/// Service ports per container
pub fn service_ports(app: &AppInstance, container: Option<&str>) -> Result<BTreeMap<String, Vec<ServicePortEntry>>> {
    let mut res = BTreeMap::new();
    for c in containers(app, container)? {
        res.insert(c.to_string(), app.publish(c)?.service_ports);
    }
    Ok(res)
}

/// Http ports per hostname per container
pub fn routes(app: &AppInstance, container: Option<&str>) -> Result<BTreeMap<String, BTreeMap<String, Vec<PortDef>>>> {
    let mut res = BTreeMap::new();
    for c in containers(app, container)? {
        res.insert(c.to_string(), app.publish(c)?.routes());
    }
    Ok(res)
}

/// Link override per router
pub fn links(app: &AppInstance) -> BTreeMap<String, Option<String>> {
    app.app_spec
        .routers
        .keys()
        .map(|r| (r.clone(), link_service(app, r).map(String::from)))
        .collect()
}

pub fn print_ports(app: &AppInstance, container: Option<&str>, fmt: OutputFormat) -> Result<()> {
    print(&service_ports(app, container)?, fmt)
}

pub fn print_routes(app: &AppInstance, container: Option<&str>, fmt: OutputFormat) -> Result<()> {
    print(&routes(app, container)?, fmt)
}

pub fn print_links(app: &AppInstance, fmt: OutputFormat) -> Result<()> {
    print(&links(app), fmt)
}
