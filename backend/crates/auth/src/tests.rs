//! HTTP flow tests for the auth router
//! Runs against the in-memory repository.

#[cfg(test)]
mod http_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::error::{MSG_EMAIL_TAKEN, MSG_INVALID_CREDENTIALS, MSG_MISSING_IDENTIFIER};
    use crate::infra::memory::MemoryAuthRepository;
    use crate::presentation::dto::{MSG_LOGGED_IN, MSG_REGISTERED};
    use crate::presentation::router::auth_router_generic;
    use kernel::validation::{MSG_REQUIRED, NON_FIELD_ERRORS};

    const PASSWORD: &str = "Str0ng!Pass";

    struct TestResponse {
        status: StatusCode,
        www_authenticate: Option<String>,
        body: Value,
    }

    fn app() -> Router {
        auth_router_generic(MemoryAuthRepository::new(), AuthConfig::default())
    }

    async fn send(app: &Router, request: Request<Body>) -> TestResponse {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let www_authenticate = response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            www_authenticate,
            body,
        }
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn get_me(app: &Router, authorization: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri("/me/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        send(app, builder.body(Body::empty()).unwrap()).await
    }

    async fn register(app: &Router, email: &str, username: &str) -> TestResponse {
        post_json(
            app,
            "/register/",
            json!({
                "email": email,
                "username": username,
                "password": PASSWORD,
                "password2": PASSWORD,
            }),
        )
        .await
    }

    #[tokio::test]
    async fn test_register_then_login_returns_same_token() {
        let app = app();

        let registered = register(&app, "a@x.com", "").await;
        assert_eq!(registered.status, StatusCode::CREATED);
        assert_eq!(registered.body["message"], MSG_REGISTERED);
        assert_eq!(registered.body["user"]["email"], "a@x.com");
        assert_eq!(registered.body["user"]["username"], "a@x.com");
        let token = registered.body["token"].as_str().unwrap().to_string();
        assert_eq!(token.len(), 40);

        let logged_in = post_json(
            &app,
            "/login/",
            json!({ "email": "a@x.com", "password": PASSWORD }),
        )
        .await;
        assert_eq!(logged_in.status, StatusCode::OK);
        assert_eq!(logged_in.body["message"], MSG_LOGGED_IN);
        assert_eq!(logged_in.body["token"], token.as_str());
        assert_eq!(logged_in.body["user"]["id"], registered.body["user"]["id"]);
    }

    #[tokio::test]
    async fn test_repeated_username_logins_reuse_token() {
        let app = app();
        register(&app, "bob@x.com", "Bob").await;

        let body = json!({ "username": "bob", "password": PASSWORD });
        let first = post_json(&app, "/login/", body.clone()).await;
        let second = post_json(&app, "/login/", body).await;

        assert_eq!(first.status, StatusCode::OK);
        assert_eq!(first.body["user"]["username"], "Bob");
        assert_eq!(first.body["token"], second.body["token"]);
    }

    #[tokio::test]
    async fn test_password_mismatch_creates_no_user() {
        let app = app();
        let response = post_json(
            &app,
            "/register/",
            json!({
                "email": "a@x.com",
                "password": PASSWORD,
                "password2": "Different!Pass1",
            }),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body["password"][0],
            "Password fields didn't match."
        );

        let login = post_json(
            &app,
            "/login/",
            json!({ "email": "a@x.com", "password": PASSWORD }),
        )
        .await;
        assert_eq!(login.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_email_fails() {
        let app = app();
        assert_eq!(register(&app, "a@x.com", "first").await.status, StatusCode::CREATED);

        let second = register(&app, "a@x.com", "second").await;
        assert_eq!(second.status, StatusCode::BAD_REQUEST);
        assert_eq!(second.body["email"], json!([MSG_EMAIL_TAKEN]));
    }

    #[tokio::test]
    async fn test_register_reports_missing_fields() {
        let app = app();
        let response = post_json(&app, "/register/", json!({})).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        for field in ["email", "password", "password2"] {
            assert_eq!(response.body[field], json!([MSG_REQUIRED]));
        }
    }

    #[tokio::test]
    async fn test_login_without_identifier() {
        let app = app();
        let response = post_json(&app, "/login/", json!({ "password": PASSWORD })).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body,
            json!({ (NON_FIELD_ERRORS): [MSG_MISSING_IDENTIFIER] })
        );
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
        let app = app();
        register(&app, "a@x.com", "alice").await;

        let wrong_password = post_json(
            &app,
            "/login/",
            json!({ "email": "a@x.com", "password": "Wr0ng!Pass" }),
        )
        .await;
        let unknown_user = post_json(
            &app,
            "/login/",
            json!({ "email": "nobody@x.com", "password": PASSWORD }),
        )
        .await;

        assert_eq!(wrong_password.status, StatusCode::BAD_REQUEST);
        assert_eq!(wrong_password.status, unknown_user.status);
        assert_eq!(wrong_password.body, unknown_user.body);
        assert_eq!(
            wrong_password.body[NON_FIELD_ERRORS],
            json!([MSG_INVALID_CREDENTIALS])
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/login/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = send(&app, request).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["status"], 400);
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let app = app();
        let registered = register(&app, "a@x.com", "alice").await;
        let token = registered.body["token"].as_str().unwrap().to_string();

        let me = get_me(&app, Some(&format!("Token {token}"))).await;
        assert_eq!(me.status, StatusCode::OK);
        assert_eq!(me.body["user"]["username"], "alice");

        let bearer = get_me(&app, Some(&format!("Bearer {token}"))).await;
        assert_eq!(bearer.status, StatusCode::OK);

        let missing = get_me(&app, None).await;
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.www_authenticate.as_deref(), Some("Token"));

        let bogus = get_me(&app, Some(&format!("Token {}", "0".repeat(40)))).await;
        assert_eq!(bogus.status, StatusCode::UNAUTHORIZED);
    }
}
