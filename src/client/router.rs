//! Route table and access guard.
//!
//! Every routed entity gets a list, a detail and three popup routes (new, edit, delete); the
//! tool screen has one more. All of them require `ROLE_USER`. Rendering and navigation belong
//! to the host shell, this module only recognizes URLs and decides access.

use std::collections::BTreeMap;

use dioxus_logger::tracing;
use reqwest::Url;
use tokio::sync::watch;

use crate::{
    client::{pagination::PagingParams, service::Principal},
    model::entity::EntityKind,
};

pub const ROLE_USER: &str = "ROLE_USER";

/// Route the guard redirects to when the user lacks the required authority.
pub const ACCESS_DENIED: &str = "accessdenied";

/// Route parameters by name, e.g. `id`.
pub type RouteParams = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    List(EntityKind),
    Detail(EntityKind),
    New(EntityKind),
    Edit(EntityKind),
    Delete(EntityKind),
    Tool,
}

/// Where the view is rendered: the main area or the popup outlet used by dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outlet {
    Primary,
    Popup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Path pattern; `:name` segments capture a parameter.
    pub path: String,
    pub view: View,
    pub authorities: Vec<&'static str>,
    pub page_title: String,
    pub outlet: Outlet,
    /// Whether `page` and `sort` query parameters are resolved on activation.
    pub resolve_paging: bool,
}

impl Route {
    fn new(path: String, view: View, page_title: String) -> Self {
        Self {
            path,
            view,
            authorities: vec![ROLE_USER],
            page_title,
            outlet: Outlet::Primary,
            resolve_paging: false,
        }
    }

    fn popup(mut self) -> Self {
        self.outlet = Outlet::Popup;
        self
    }

    fn paged(mut self) -> Self {
        self.resolve_paging = true;
        self
    }

    fn match_path(&self, segments: &[&str]) -> Option<RouteParams> {
        let pattern: Vec<&str> = self.path.split('/').collect();
        if pattern.len() != segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (expected, actual) in pattern.iter().zip(segments) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), actual.to_string());
                }
                None if expected == actual => {}
                None => return None,
            }
        }

        Some(params)
    }
}

/// The five routes of an entity kind.
pub fn entity_routes(kind: EntityKind) -> Vec<Route> {
    let segment = kind.route_segment();
    let title = kind.page_title();

    vec![
        Route::new(segment.to_string(), View::List(kind), title.clone()).paged(),
        Route::new(format!("{segment}/:id"), View::Detail(kind), title.clone()),
        Route::new(format!("{segment}-new"), View::New(kind), title.clone()).popup(),
        Route::new(format!("{segment}/:id/edit"), View::Edit(kind), title.clone()).popup(),
        Route::new(format!("{segment}/:id/delete"), View::Delete(kind), title).popup(),
    ]
}

/// A recognized URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: Route,
    pub params: RouteParams,
    pub query: BTreeMap<String, String>,
    /// Resolved paging for routes that resolve it.
    pub paging: Option<PagingParams>,
}

impl RouteMatch {
    /// The `id` parameter as a record ID.
    pub fn id(&self) -> Option<i64> {
        self.params.get("id").and_then(|id| id.parse().ok())
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
    items_per_page: usize,
}

impl Router {
    pub fn new(items_per_page: usize) -> Self {
        let mut routes: Vec<Route> = EntityKind::ROUTED
            .into_iter()
            .flat_map(entity_routes)
            .collect();
        routes.push(Route::new(
            "tool".to_string(),
            View::Tool,
            "quanlysoApp.tool.home.title".to_string(),
        ));

        Self {
            routes,
            items_per_page,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Matches a path with an optional query string, e.g. `code?page=2&sort=code,desc`.
    pub fn recognize(&self, url: &str) -> Option<RouteMatch> {
        let parsed = Url::parse("http://localhost/")
            .and_then(|base| base.join(url.trim_start_matches('/')))
            .ok()?;

        let segments: Vec<&str> = parsed
            .path()
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        let query: BTreeMap<String, String> = parsed.query_pairs().into_owned().collect();

        let (route, params) = self
            .routes
            .iter()
            .find_map(|route| route.match_path(&segments).map(|params| (route, params)))?;

        let paging = route
            .resolve_paging
            .then(|| PagingParams::resolve(&query, self.items_per_page));

        Some(RouteMatch {
            route: route.clone(),
            params,
            query,
            paging,
        })
    }
}

/// Parameters of the active route, observable by the view showing it.
#[derive(Debug, Clone)]
pub struct ActivatedRoute {
    sender: watch::Sender<RouteParams>,
}

impl ActivatedRoute {
    pub fn new(params: RouteParams) -> Self {
        let (sender, _) = watch::channel(params);
        Self { sender }
    }

    /// Activates the route with an `id` parameter.
    pub fn with_id(id: i64) -> Self {
        Self::new(RouteParams::from([("id".to_string(), id.to_string())]))
    }

    /// Replaces the parameters and notifies every subscriber.
    pub fn navigate(&self, params: RouteParams) {
        self.sender.send_replace(params);
    }

    pub fn params(&self) -> RouteParams {
        self.sender.borrow().clone()
    }

    /// Subscribes to parameter changes. The current parameters count as already seen.
    pub fn subscribe(&self) -> watch::Receiver<RouteParams> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Outcome of the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Signed in without the required authority.
    Denied,
    /// Nobody is signed in.
    LoginRequired,
}

impl Access {
    /// Route to redirect to, if any.
    pub fn redirect(self) -> Option<&'static str> {
        match self {
            Access::Denied => Some(ACCESS_DENIED),
            _ => None,
        }
    }
}

/// Decides whether the current user may open `route`.
pub async fn can_activate(route: &Route, principal: &Principal) -> Access {
    if route.authorities.is_empty() {
        return Access::Granted;
    }

    match principal.identity(false).await {
        Ok(Some(account)) if account.has_any_authority(&route.authorities) => Access::Granted,
        Ok(Some(account)) => {
            tracing::debug!("Access to {} denied for {}", route.path, account.login);
            Access::Denied
        }
        Ok(None) => Access::LoginRequired,
        Err(err) => {
            tracing::error!("Failed to resolve identity: {}", err);
            Access::LoginRequired
        }
    }
}
