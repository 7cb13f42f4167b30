use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::net::error;
use crate::net::layer::{trace, RequestIdLayer};
use crate::state::ArcShared;

mod handle;
mod serve_file;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

pub fn routes(state: &ArcShared) -> Router {
    Router::new()
        .route(
            "/",
            get(handle::get)
        )
        .route(
            "/register",
            get(handle::register::get)
                .post(handle::register::post)
        )
        .route(
            "/login",
            get(handle::login::get)
                .post(handle::login::post)
        )
        .route(
            "/verify_2fa",
            get(handle::verify_2fa::get)
                .post(handle::verify_2fa::post)
        )
        .route(
            "/logout",
            get(handle::logout::get)
        )
        .route(
            "/process",
            post(handle::process::post)
        )
        .route(
            "/translate",
            post(handle::services::translate)
        )
        .route(
            "/information",
            post(handle::services::information)
        )
        .route(
            "/verbalize",
            post(handle::services::verbalize)
        )
        .route(
            "/support",
            get(handle::support::get)
                .post(handle::support::post)
        )
        .route("/ping", get(handle::ping::get))
        .fallback(serve_file::handle)
        .layer(ServiceBuilder::new()
            .layer(RequestIdLayer::new())
            .layer(TraceLayer::new_for_http()
                .make_span_with(trace::make_span_with)
                .on_request(trace::on_request)
                .on_response(trace::on_response)
                .on_failure(trace::on_failure))
            .layer(HandleErrorLayer::new(error::handle_layer_error))
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT)))
        .with_state(state.clone())
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
    use axum::response::Response;
    use deadpool_postgres::GenericClient;
    use tower::ServiceExt;

    use super::*;
    use crate::routing::handle::register::USERNAME_IN_USE;
    use crate::sec::authn::{initiator, session, totp};
    use crate::state::test::test_state;
    use crate::user::User;

    const PASSWORD: &str = "correct_horse";

    struct Account {
        username: String,
        email: String,
    }

    impl Account {
        fn random() -> Self {
            let suffix: u32 = rand::random();

            Account {
                username: format!("route_{suffix:08x}"),
                email: format!("route_{suffix:08x}@example.com"),
            }
        }

        fn register_body(&self) -> String {
            format!(
                "username={}&email={}&password={PASSWORD}&confirm={PASSWORD}&consent=y",
                self.username,
                self.email.replace('@', "%40"),
            )
        }

        fn login_body(&self) -> String {
            format!("username={}&password={PASSWORD}", self.username)
        }
    }

    async fn remove_account(state: &ArcShared, account: &Account) {
        let conn = state.pool().get().await.unwrap();

        conn.execute(
            "delete from auth_session where user_id in (select id from users where username = $1 or email = $2)",
            &[&account.username, &account.email]
        ).await.unwrap();
        conn.execute(
            "delete from users where username = $1 or email = $2",
            &[&account.username, &account.email]
        ).await.unwrap();
    }

    async fn matching_users(state: &ArcShared, account: &Account) -> i64 {
        let conn = state.pool().get().await.unwrap();

        conn.query_one(
            "select count(*) from users where username = $1 or email = $2",
            &[&account.username, &account.email]
        ).await.unwrap().get(0)
    }

    async fn send(state: &ArcShared, request: Request<Body>) -> Response {
        routes(state).oneshot(request).await.unwrap()
    }

    fn form(uri: &str, body: String, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        builder.body(Body::from(body)).unwrap()
    }

    fn process(cookie: &str) -> Request<Body> {
        Request::post("/process")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookie)
            .body(Body::from(r#"{"message":"hello"}"#))
            .unwrap()
    }

    /// "session_id=..." from the response, ready to send back as a cookie
    fn session_cookie(response: &Response) -> Option<String> {
        let prefix = format!("{}=", session::SESSION_COOKIE);

        response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with(&prefix))
            .and_then(|value| value.split(';').next())
            .map(str::to_owned)
    }

    fn location(response: &Response) -> &str {
        response.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn register_and_login(state: &ArcShared, account: &Account) -> String {
        let registered = send(state, form("/register", account.register_body(), None)).await;

        assert_eq!(registered.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&registered), "/login");

        let logged_in = send(state, form("/login", account.login_body(), None)).await;

        assert_eq!(logged_in.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&logged_in), "/verify_2fa");

        session_cookie(&logged_in).expect("login sets a session cookie")
    }

    async fn initiator_accepts(state: &ArcShared, cookie: &str) -> bool {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());

        initiator::lookup_header_map(state.sec(), state.pool(), &headers).await.is_ok()
    }

    async fn current_code(state: &ArcShared, account: &Account) -> String {
        let conn = state.pool().get().await.unwrap();
        let user = User::query_with_username(&conn, &account.username).await.unwrap().unwrap();
        let secret = user.otp_secret.unwrap();

        assist_lib::otp::totp(&secret, &user.username, totp::ISSUER)
            .unwrap()
            .generate_current()
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires ASSIST_TEST_DB"]
    async fn duplicate_registration_adds_nothing() {
        let state = test_state().await;
        let account = Account::random();

        let first = send(&state, form("/register", account.register_body(), None)).await;

        assert_eq!(first.status(), StatusCode::SEE_OTHER);
        assert_eq!(matching_users(&state, &account).await, 1);

        let second = send(&state, form("/register", account.register_body(), None)).await;

        assert_eq!(second.status(), StatusCode::OK);
        assert!(body_text(second).await.contains(USERNAME_IN_USE));
        assert_eq!(matching_users(&state, &account).await, 1);

        remove_account(&state, &account).await;
    }

    #[tokio::test]
    #[ignore = "requires ASSIST_TEST_DB"]
    async fn password_alone_is_not_a_login() {
        let state = test_state().await;
        let account = Account::random();
        let cookie = register_and_login(&state, &account).await;

        assert!(!initiator_accepts(&state, &cookie).await);

        let code = current_code(&state, &account).await;
        let wrong = if code == "000000" { "999999" } else { "000000" };

        let rejected = send(&state, form("/verify_2fa", format!("token={wrong}"), Some(&cookie))).await;

        assert_eq!(rejected.status(), StatusCode::OK);
        assert!(session_cookie(&rejected).is_none());
        assert!(!initiator_accepts(&state, &cookie).await);

        let missing = send(&state, form("/verify_2fa", String::from("token="), Some(&cookie))).await;

        assert_eq!(missing.status(), StatusCode::OK);
        assert!(session_cookie(&missing).is_none());
        assert!(!initiator_accepts(&state, &cookie).await);

        let chat = send(&state, process(&cookie)).await;

        assert_eq!(chat.status(), StatusCode::UNAUTHORIZED);

        remove_account(&state, &account).await;
    }

    #[tokio::test]
    #[ignore = "requires ASSIST_TEST_DB"]
    async fn second_factor_completes_login_once() {
        let state = test_state().await;
        let account = Account::random();
        let cookie = register_and_login(&state, &account).await;
        let code = current_code(&state, &account).await;

        let verified = send(&state, form("/verify_2fa", format!("token={code}"), Some(&cookie))).await;

        assert_eq!(verified.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&verified), "/");

        let cookie = session_cookie(&verified).expect("verification refreshes the session cookie");

        assert!(initiator_accepts(&state, &cookie).await);

        // the session is already verified so the form is not shown again
        let again = send(&state, form("/verify_2fa", format!("token={code}"), Some(&cookie))).await;

        assert_eq!(again.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&again), "/");
        assert!(session_cookie(&again).is_none());

        let chat = send(&state, process(&cookie)).await;

        assert_eq!(chat.status(), StatusCode::OK);

        remove_account(&state, &account).await;
    }

    #[tokio::test]
    #[ignore = "requires ASSIST_TEST_DB"]
    async fn concurrent_verification_yields_one_session() {
        let state = test_state().await;
        let account = Account::random();
        let cookie = register_and_login(&state, &account).await;
        let code = current_code(&state, &account).await;

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&cookie).unwrap());
        let token = initiator::find_token(state.sec(), &headers).unwrap();

        // another request verifies the pending session first
        {
            let conn = state.pool().get().await.unwrap();
            let mut other = session::Session::retrieve_token(&conn, &token).await.unwrap().unwrap();

            assert!(other.verify(&conn).await.unwrap());
        }

        let late = send(&state, form("/verify_2fa", format!("token={code}"), Some(&cookie))).await;

        assert_eq!(late.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&late), "/");
        assert!(session_cookie(&late).is_none());

        remove_account(&state, &account).await;
    }

    #[tokio::test]
    #[ignore = "requires ASSIST_TEST_DB"]
    async fn pages_show_logged_in_user() {
        let state = test_state().await;
        let account = Account::random();
        let pending = register_and_login(&state, &account).await;
        let code = current_code(&state, &account).await;

        let verified = send(&state, form("/verify_2fa", format!("token={code}"), Some(&pending))).await;
        let cookie = session_cookie(&verified).unwrap();
        let nav = format!(r#"<span class="nav-user">{}</span>"#, account.username);

        for uri in ["/register", "/login", "/support"] {
            let page = send(&state, Request::get(uri)
                .header(header::COOKIE, cookie.as_str())
                .body(Body::empty())
                .unwrap()).await;

            assert_eq!(page.status(), StatusCode::OK, "{uri}");

            let text = body_text(page).await;

            assert!(text.contains(&nav), "{uri}");

            if uri == "/support" {
                assert!(text.contains(&format!(r#"value="{}""#, account.email)));
            }
        }

        remove_account(&state, &account).await;
    }

    #[tokio::test]
    #[ignore = "requires ASSIST_TEST_DB"]
    async fn process_requires_session() {
        let state = test_state().await;

        let json = send(&state, Request::post("/process")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message":"hello"}"#))
            .unwrap()).await;

        assert_eq!(json.status(), StatusCode::UNAUTHORIZED);

        let browser = send(&state, Request::post("/process")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "text/html")
            .body(Body::from(r#"{"message":"hello"}"#))
            .unwrap()).await;

        assert_eq!(browser.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&browser), "/login");
    }
}
