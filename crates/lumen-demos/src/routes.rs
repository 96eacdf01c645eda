//! Navigation table: which path mounts which demo.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DemoKind {
    /// Landing page listing the other routes; mounts no scene.
    Index,
    Cube,
    Galaxy,
    Text,
    City,
}

impl DemoKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DemoKind::Index => "index",
            DemoKind::Cube => "cube",
            DemoKind::Galaxy => "galaxy",
            DemoKind::Text => "text",
            DemoKind::City => "city",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Route {
    pub path: &'static str,
    pub title: &'static str,
    pub demo: DemoKind,
    /// False for routes that exist but are not linked from navigation.
    pub reachable: bool,
}

pub const ROUTES: [Route; 5] = [
    Route { path: "/", title: "Index", demo: DemoKind::Index, reachable: true },
    Route { path: "/cube", title: "Rotating Cube", demo: DemoKind::Cube, reachable: true },
    Route { path: "/galaxy", title: "Particle Galaxy", demo: DemoKind::Galaxy, reachable: true },
    Route { path: "/text", title: "3D Text", demo: DemoKind::Text, reachable: false },
    Route { path: "/city", title: "Cyberpunk City", demo: DemoKind::City, reachable: true },
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route for `{0}`")]
    NotFound(String),

    #[error("route `{0}` is not reachable from navigation (pass --include-hidden to open it)")]
    Unreachable(String),
}

/// `cube`, `/cube/` and `/CUBE` all become `/cube`.
fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{}", trimmed.to_ascii_lowercase())
}

/// Looks up `path`. Hidden routes resolve only with `include_hidden`.
pub fn resolve(path: &str, include_hidden: bool) -> Result<&'static Route, RouteError> {
    let path = normalize(path);
    let route = ROUTES
        .iter()
        .find(|r| r.path == path)
        .ok_or_else(|| RouteError::NotFound(path.clone()))?;

    if !route.reachable && !include_hidden {
        return Err(RouteError::Unreachable(path));
    }
    log::debug!("resolved {path} -> {}", route.demo);
    Ok(route)
}

/// Routes shown in navigation, in table order.
pub fn listed(include_hidden: bool) -> impl Iterator<Item = &'static Route> {
    ROUTES.iter().filter(move |r| r.reachable || include_hidden)
}
