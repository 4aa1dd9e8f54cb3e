//! HTTP routes.
//!
//! The router carries the [`Logbook`] service as state; the session layer is added
//! by the caller so tests can swap in an in-memory session store.

use std::sync::Arc;

use api::{auth, Logbook, LogbookError, Page};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use dioxus::prelude::*;
use serde::Deserialize;
use store::{EntryDraft, LogbookStore};
use tracing::info;

use crate::error::AppError;
use crate::session::{verify_csrf, AuthSession, Viewer};
use crate::views::{
    self, About, EntryFormPage, EntryFormValues, Index, Listing, ListingPage, LoginPage,
    PageContext, ProfilePage,
};

pub struct AppState<S> {
    logbook: Arc<Logbook<S>>,
}

// Derived Clone would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            logbook: Arc::clone(&self.logbook),
        }
    }
}

pub fn router<S: LogbookStore + 'static>(logbook: Logbook<S>) -> Router {
    let state = AppState {
        logbook: Arc::new(logbook),
    };

    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/login", get(login_form).post(login::<S>))
        .route("/logout", post(logout))
        .route("/logbook", get(my_logbook::<S>))
        .route("/logbook/add", get(add_form).post(add_entry::<S>))
        .route("/logbook/{uuid}", get(edit_form::<S>).post(edit_entry::<S>))
        .route("/users/{username}", get(profile::<S>))
        .route("/users/{username}/logbook", get(user_logbook::<S>))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    csrf: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct CsrfForm {
    #[serde(default)]
    csrf: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EntryForm {
    csrf: String,
    title: String,
    url: String,
    notes: String,
    tags: String,
    /// Checkbox: present when ticked.
    private: Option<String>,
}

impl EntryForm {
    fn values(&self) -> EntryFormValues {
        EntryFormValues {
            title: self.title.clone(),
            url: self.url.clone(),
            notes: self.notes.clone(),
            tags: self.tags.clone(),
            private: self.private.is_some(),
        }
    }

    fn draft(&self) -> EntryDraft {
        EntryDraft::new(
            &self.title,
            &self.url,
            &self.notes,
            &self.tags,
            self.private.is_some(),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    tag: Option<String>,
}

impl ListParams {
    fn page(&self) -> Page {
        Page::parse(self.page.as_deref())
    }

    /// A blank tag means no filter.
    fn tag(&self) -> Option<String> {
        self.tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

async fn index(viewer: Viewer) -> Html<String> {
    let context = viewer.context();
    views::render(rsx! {
        Index { context }
    })
}

async fn about(viewer: Viewer) -> Html<String> {
    let context = viewer.context();
    views::render(rsx! {
        About { context }
    })
}

fn login_page(context: PageContext, username: String, message: Option<String>) -> Html<String> {
    views::render(rsx! {
        LoginPage { context, username, message }
    })
}

async fn login_form(mut viewer: Viewer) -> Result<Html<String>, AppError> {
    viewer.issue_csrf().await?;
    Ok(login_page(viewer.context(), String::new(), None))
}

async fn login<S: LogbookStore>(
    State(state): State<AppState<S>>,
    mut viewer: Viewer,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    verify_csrf(&viewer.session, &form.csrf).await?;

    let message = match state.logbook.authenticate(&form.username, &form.password).await {
        Ok(identity) => {
            auth::sign_in(&viewer.session, &identity).await?;
            return Ok(Redirect::to("/logbook").into_response());
        }
        Err(LogbookError::Validation(message)) => message,
        Err(e) if e.is_login_failure() => views::LOGIN_FAILED,
        Err(e) => return Err(e.into()),
    };

    viewer.issue_csrf().await?;
    let page = login_page(
        viewer.context(),
        form.username.clone(),
        Some(message.to_string()),
    );
    Ok((StatusCode::BAD_REQUEST, page).into_response())
}

async fn logout(viewer: Viewer, Form(form): Form<CsrfForm>) -> Result<Redirect, AppError> {
    verify_csrf(&viewer.session, &form.csrf).await?;

    if let Some(identity) = &viewer.identity {
        info!(username = %identity.username, "logout");
    }
    auth::sign_out(&viewer.session).await?;
    Ok(Redirect::to("/login"))
}

fn listing_page(context: PageContext, heading: String, listing: Listing) -> Html<String> {
    views::render(rsx! {
        ListingPage { context, heading, listing }
    })
}

async fn my_logbook<S: LogbookStore>(
    State(state): State<AppState<S>>,
    user: AuthSession,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, AppError> {
    let tag = params.tag();
    let page = params.page();
    let entries = state
        .logbook
        .list_own_entries(&user.identity, tag.as_deref(), page)
        .await?;

    let listing = Listing {
        base: "/logbook".to_string(),
        entries,
        tag,
        page,
        editable: true,
    };
    Ok(listing_page(user.context(), "My logbook".to_string(), listing))
}

async fn user_logbook<S: LogbookStore>(
    State(state): State<AppState<S>>,
    viewer: Viewer,
    Path(username): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, AppError> {
    let tag = params.tag();
    let page = params.page();
    let entries = state
        .logbook
        .list_entries(viewer.identity.as_ref(), &username, tag.as_deref(), page)
        .await?;

    let editable = viewer
        .identity
        .as_ref()
        .is_some_and(|identity| identity.owns(&username));
    let listing = Listing {
        base: format!("/users/{username}/logbook"),
        entries,
        tag,
        page,
        editable,
    };
    Ok(listing_page(viewer.context(), format!("{username}'s logbook"), listing))
}

async fn profile<S: LogbookStore>(
    State(state): State<AppState<S>>,
    viewer: Viewer,
    Path(username): Path<String>,
) -> Result<Html<String>, AppError> {
    let profile = state.logbook.find_profile(&username).await?;
    let context = viewer.context();
    Ok(views::render(rsx! {
        ProfilePage { context, profile }
    }))
}

fn entry_form_page(
    context: PageContext,
    heading: &str,
    action: String,
    values: EntryFormValues,
    message: Option<String>,
) -> Html<String> {
    let heading = heading.to_string();
    views::render(rsx! {
        EntryFormPage { context, heading, action, values, message }
    })
}

/// Turn a failed entry write into a response: validation problems re-render the form.
fn rejected_entry(
    err: LogbookError,
    context: PageContext,
    heading: &str,
    action: String,
    form: &EntryForm,
) -> Result<Response, AppError> {
    match err {
        LogbookError::Validation(message) => {
            let page = entry_form_page(context, heading, action, form.values(), Some(message.to_string()));
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        err => Err(err.into()),
    }
}

async fn add_form(user: AuthSession) -> Html<String> {
    entry_form_page(
        user.context(),
        "Add entry",
        "/logbook/add".to_string(),
        EntryFormValues::default(),
        None,
    )
}

async fn add_entry<S: LogbookStore>(
    State(state): State<AppState<S>>,
    user: AuthSession,
    Form(form): Form<EntryForm>,
) -> Result<Response, AppError> {
    verify_csrf(&user.session, &form.csrf).await?;

    match state.logbook.create_entry(&user.identity, form.draft()).await {
        Ok(_) => Ok(Redirect::to("/logbook").into_response()),
        Err(err) => rejected_entry(err, user.context(), "Add entry", "/logbook/add".to_string(), &form),
    }
}

async fn edit_form<S: LogbookStore>(
    State(state): State<AppState<S>>,
    user: AuthSession,
    Path(uuid): Path<String>,
) -> Result<Html<String>, AppError> {
    let entry = state.logbook.get_entry(&user.identity, &uuid).await?;
    Ok(entry_form_page(
        user.context(),
        "Edit entry",
        format!("/logbook/{}", entry.uuid),
        EntryFormValues::from(&entry),
        None,
    ))
}

async fn edit_entry<S: LogbookStore>(
    State(state): State<AppState<S>>,
    user: AuthSession,
    Path(uuid): Path<String>,
    Form(form): Form<EntryForm>,
) -> Result<Response, AppError> {
    verify_csrf(&user.session, &form.csrf).await?;

    match state.logbook.update_entry(&user.identity, &uuid, form.draft()).await {
        Ok(_) => Ok(Redirect::to("/logbook").into_response()),
        Err(err) => rejected_entry(err, user.context(), "Edit entry", format!("/logbook/{uuid}"), &form),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use store::MemoryStore;
    use tower::ServiceExt;
    use url::form_urlencoded;

    use super::*;
    use crate::session::session_layer;

    /// "wonderland", hashed by libxcrypt rather than this crate.
    const WONDERLAND_BCRYPT: &str = "$2b$04$EPG6XCxyc4KiDasxOXcmSeRDiKAI4zJtlSc1pCmNFjTKtTAMNh8SW";

    struct TestApp {
        router: Router,
        store: MemoryStore,
    }

    impl TestApp {
        fn new() -> Self {
            let store = MemoryStore::new();
            store.add_user("alice", WONDERLAND_BCRYPT, "Alice", true).unwrap();
            store.add_user("mallory", WONDERLAND_BCRYPT, "Mallory", false).unwrap();

            let router = router(Logbook::new(store.clone())).layer(session_layer(
                tower_sessions::MemoryStore::default(),
                "test signing secret",
                false,
            ));
            Self { router, store }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
            let mut request = Request::get(uri);
            if let Some(cookie) = cookie {
                request = request.header(header::COOKIE, cookie);
            }
            self.send(request.body(Body::empty()).unwrap()).await
        }

        async fn post(&self, uri: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Response {
            let body = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(fields)
                .finish();
            let mut request = Request::post(uri).header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            );
            if let Some(cookie) = cookie {
                request = request.header(header::COOKIE, cookie);
            }
            self.send(request.body(Body::from(body)).unwrap()).await
        }

        /// Fetch the login form and return the session cookie and its CSRF token.
        async fn start_session(&self) -> (String, String) {
            let response = self.get("/login", None).await;
            let cookie = session_cookie(&response).expect("login form sets a session cookie");
            let csrf = csrf_from(&body_text(response).await);
            (cookie, csrf)
        }

        async fn login(&self, username: &str, password: &str) -> (String, String) {
            let (cookie, csrf) = self.start_session().await;
            let response = self
                .post(
                    "/login",
                    Some(&cookie),
                    &[("csrf", csrf.as_str()), ("username", username), ("password", password)],
                )
                .await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/logbook");
            // The session id is cycled on login
            let cookie = session_cookie(&response).expect("login refreshes the cookie");
            (cookie, csrf)
        }
    }

    fn session_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn csrf_from(html: &str) -> String {
        let field = html.find("name=\"csrf\"").expect("page has a csrf field");
        let rest = &html[field..];
        let start = rest.find("value=\"").expect("csrf field has a value") + "value=\"".len();
        let end = rest[start..].find('"').unwrap();
        rest[start..start + end].to_string()
    }

    #[tokio::test]
    async fn test_public_pages() {
        let app = TestApp::new();

        let response = app.get("/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Log in"));

        let response = app.get("/about", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_browsing_does_not_start_sessions() {
        let app = TestApp::new();

        for uri in ["/", "/about", "/users/alice", "/users/alice/logbook", "/users/alice/logbook"] {
            let response = app.get(uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert!(session_cookie(&response).is_none(), "{uri} set a cookie");
        }

        // The login form is the first page that needs one
        let response = app.get("/login", None).await;
        assert!(session_cookie(&response).is_some());
    }

    #[tokio::test]
    async fn test_gated_routes_redirect_to_login() {
        let app = TestApp::new();

        for uri in ["/logbook", "/logbook/add", "/logbook/00000000-0000-0000-0000-000000000000"] {
            let response = app.get(uri, None).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(location(&response), "/login");
        }
    }

    #[tokio::test]
    async fn test_login_failures_are_generic() {
        let app = TestApp::new();

        for (username, password) in [("alice", "looking-glass"), ("bob", "wonderland"), ("mallory", "wonderland")] {
            let (cookie, csrf) = app.start_session().await;
            let response = app
                .post(
                    "/login",
                    Some(&cookie),
                    &[("csrf", csrf.as_str()), ("username", username), ("password", password)],
                )
                .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{username}");
            let body = body_text(response).await;
            assert!(body.contains(views::LOGIN_FAILED));
            assert!(!body.contains(password));
        }
    }

    #[tokio::test]
    async fn test_forms_require_csrf_token() {
        let app = TestApp::new();

        // No session at all
        let response = app
            .post("/login", None, &[("username", "alice"), ("password", "wonderland")])
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let (cookie, _) = app.start_session().await;
        let response = app
            .post(
                "/login",
                Some(&cookie),
                &[("csrf", "forged"), ("username", "alice"), ("password", "wonderland")],
            )
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let (cookie, _) = app.login("alice", "wonderland").await;
        let response = app
            .post("/logbook/add", Some(&cookie), &[("title", "Sneaky")])
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.store.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_entries_and_visibility() {
        let app = TestApp::new();
        let (cookie, csrf) = app.login("alice", "wonderland").await;

        let response = app
            .post(
                "/logbook/add",
                Some(&cookie),
                &[
                    ("csrf", csrf.as_str()),
                    ("title", "Morning news"),
                    ("url", "https://example.com/news"),
                    ("tags", "news, daily"),
                ],
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/logbook");

        let response = app
            .post(
                "/logbook/add",
                Some(&cookie),
                &[("csrf", csrf.as_str()), ("title", "Diary"), ("notes", "secret"), ("private", "on")],
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(app.store.entry_count(), 2);

        // The owner sees both, newest first
        let body = body_text(app.get("/logbook", Some(&cookie)).await).await;
        let diary = body.find("Diary").expect("private entry listed for owner");
        let news = body.find("Morning news").expect("public entry listed for owner");
        assert!(diary < news);

        // Anonymous visitors see the public one only
        let response = app.get("/users/alice/logbook", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Morning news"));
        assert!(!body.contains("Diary"));

        // Exact tag filter
        let body = body_text(app.get("/users/alice/logbook?tag=news", None).await).await;
        assert!(body.contains("Morning news"));
        let body = body_text(app.get("/users/alice/logbook?tag=new", None).await).await;
        assert!(!body.contains("Morning news"));

        // Unknown users have an empty logbook, not an error
        let response = app.get("/users/nobody/logbook", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_title_rerenders_form() {
        let app = TestApp::new();
        let (cookie, csrf) = app.login("alice", "wonderland").await;

        let response = app
            .post(
                "/logbook/add",
                Some(&cookie),
                &[("csrf", csrf.as_str()), ("title", "  "), ("url", "https://example.com/kept")],
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_text(response).await;
        assert!(body.contains("Title is required."));
        assert!(body.contains("https://example.com/kept"));
        assert_eq!(app.store.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_edit_entry() {
        let app = TestApp::new();
        let (cookie, csrf) = app.login("alice", "wonderland").await;
        app.post("/logbook/add", Some(&cookie), &[("csrf", csrf.as_str()), ("title", "Draft")])
            .await;

        let alice = app.store.find_user("alice").await.unwrap().unwrap();
        let entry = app
            .store
            .list_entries(&store::EntryQuery {
                user_id: alice.id,
                include_private: true,
                tag: None,
                offset: 0,
                limit: 20,
            })
            .await
            .unwrap()
            .remove(0);
        let uri = format!("/logbook/{}", entry.uuid);

        let response = app.get(&uri, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Draft"));

        let response = app
            .post(&uri, Some(&cookie), &[("csrf", csrf.as_str()), ("title", "Final"), ("tags", "done")])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let body = body_text(app.get("/logbook", Some(&cookie)).await).await;
        assert!(body.contains("Final"));
        assert!(!body.contains("Draft"));

        let response = app.get("/logbook/not-a-uuid", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_pages() {
        let app = TestApp::new();

        let response = app.get("/users/alice", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Alice"));

        assert_eq!(app.get("/users/mallory", None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.get("/users/nobody", None).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = TestApp::new();
        let (cookie, csrf) = app.login("alice", "wonderland").await;

        let response = app.post("/logout", Some(&cookie), &[("csrf", csrf.as_str())]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        let response = app.get("/logbook", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
