mod common;

#[cfg(test)]
mod tests {
    use super::common::{bearer, page_json, task_json, ApiContext, ACCESS_TOKEN, REFRESH_TOKEN};
    use serde_json::json;
    use std::sync::Arc;
    use taskly::api::auth::{LoginCredentials, RefreshClient};
    use taskly::api::{ApiClient, ApiError, TasksApi};
    use taskly::libs::messages::Message;
    use taskly::libs::notify::MemoryNotifier;
    use taskly::libs::query::QueryParams;
    use taskly::libs::session::SessionStore;
    use test_context::test_context;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn tasks(ctx: &ApiContext) -> TasksApi {
        TasksApi::new(ctx.app.client.clone())
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_login_then_requests_carry_bearer(ctx: &mut ApiContext) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({"username": "ada", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-42"})))
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .and(header("authorization", "Bearer tok-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![task_json(1, "Write", false)], 1, 1, 1)))
            .expect(1)
            .mount(&ctx.server)
            .await;

        ctx.app.auth.login(&LoginCredentials::new("ada", "secret")).await.unwrap();
        assert_eq!(ctx.app.session.current_token().as_deref(), Some("tok-42"));

        let page = tasks(ctx).get_all(&QueryParams::default()).await.unwrap();
        assert_eq!(page.tasks.len(), 1);

        let login = &ctx.requests_to("/auth/login").await[0];
        assert_eq!(bearer(login), None);
        ctx.server.verify().await;
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_request_query_carries_all_parameters(ctx: &mut ApiContext) {
        ctx.login();
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 1, 0, 0)))
            .mount(&ctx.server)
            .await;

        let params = QueryParams::from_location("page=2&search=milk&completed=false&order_by=title&sort_by=asc", 5);
        tasks(ctx).get_all(&params).await.unwrap();

        let request = &ctx.requests_to("/task/get/all").await[0];
        let query: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("limit".to_string(), "5".to_string()),
                ("page".to_string(), "2".to_string()),
                ("completed".to_string(), "false".to_string()),
                ("search".to_string(), "milk".to_string()),
                ("order_by".to_string(), "title".to_string()),
                ("sort_by".to_string(), "asc".to_string()),
            ]
        );
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_unauthorized_refreshes_once_and_retries_once(ctx: &mut ApiContext) {
        ctx.login();
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .and(header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .and(body_json(json!({"refresh_token": REFRESH_TOKEN})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "access-2"})))
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .and(header("authorization", "Bearer access-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![task_json(1, "Write", false)], 1, 1, 1)))
            .expect(1)
            .mount(&ctx.server)
            .await;

        let page = tasks(ctx).get_all(&QueryParams::default()).await.unwrap();
        assert_eq!(page.tasks[0].id, 1);

        let credential = ctx.app.session.credential().unwrap();
        assert_eq!(credential.access_token, "access-2");
        assert_eq!(credential.refresh_token.as_deref(), Some(REFRESH_TOKEN));
        assert!(ctx.notifier.all().is_empty());
        ctx.server.verify().await;
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_concurrent_unauthorized_requests_share_one_refresh(ctx: &mut ApiContext) {
        ctx.login();
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .and(header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&ctx.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": "access-2"}))
                    .set_delay(std::time::Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .and(header("authorization", "Bearer access-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 1, 0, 0)))
            .expect(2)
            .mount(&ctx.server)
            .await;

        let api = tasks(ctx);
        let params = QueryParams::default();
        let (first, second) = tokio::join!(api.get_all(&params), api.get_all(&params));
        assert!(first.is_ok());
        assert!(second.is_ok());
        ctx.server.verify().await;
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_forbidden_clears_session_without_refresh(ctx: &mut ApiContext) {
        ctx.login();
        let mut status = ctx.app.session.subscribe();
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "never"})))
            .expect(0)
            .mount(&ctx.server)
            .await;

        let err = tasks(ctx).get_all(&QueryParams::default()).await.unwrap_err();

        assert_eq!(err, ApiError::SessionInvalid);
        assert!(!ctx.app.session.is_logged_in());
        assert!(status.has_changed().unwrap());
        assert!(!*status.borrow_and_update());
        assert_eq!(ctx.notifier.errors(), vec![Message::SessionExpired]);
        ctx.server.verify().await;
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_failed_refresh_clears_session(ctx: &mut ApiContext) {
        ctx.login();
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Refresh token expired"})))
            .expect(1)
            .mount(&ctx.server)
            .await;

        let err = tasks(ctx).get_all(&QueryParams::default()).await.unwrap_err();

        assert!(matches!(err, ApiError::AuthenticationExpired(_)));
        assert!(ctx.app.session.current_token().is_none());
        assert_eq!(ctx.notifier.errors(), vec![Message::SessionExpired]);
        ctx.server.verify().await;
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_unauthorized_retry_is_terminal(ctx: &mut ApiContext) {
        ctx.login();
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&ctx.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "access-2"})))
            .expect(1)
            .mount(&ctx.server)
            .await;

        let err = tasks(ctx).get_all(&QueryParams::default()).await.unwrap_err();

        assert!(matches!(err, ApiError::SessionInvalid | ApiError::AuthenticationExpired(_)));
        assert!(!ctx.app.session.is_logged_in());
        assert_eq!(ctx.notifier.errors().len(), 1);
        ctx.server.verify().await;
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_forbidden_during_refresh_is_not_undone(ctx: &mut ApiContext) {
        ctx.login();
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": "access-2"}))
                    .set_delay(std::time::Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/task/delete/1"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&ctx.server)
            .await;

        let api = tasks(ctx);
        let forbidden = async {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            api.delete(1).await
        };
        let params = QueryParams::default();
        let (listed, deleted) = tokio::join!(api.get_all(&params), forbidden);

        assert_eq!(deleted.unwrap_err(), ApiError::SessionInvalid);
        assert!(matches!(listed.unwrap_err(), ApiError::AuthenticationExpired(_)));
        assert!(!ctx.app.session.is_logged_in());
        assert!(ctx.app.session.credential().is_none());
        ctx.server.verify().await;
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_server_message_is_surfaced(ctx: &mut ApiContext) {
        ctx.login();
        Mock::given(method("POST"))
            .and(path("/task/create"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": "Title too long"})))
            .mount(&ctx.server)
            .await;

        let err = ctx.app.mutations.create("A title", "A description").await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<ApiError>(),
            Some(&ApiError::ApiRejected {
                status: 422,
                message: "Title too long".to_string()
            })
        );
        assert_eq!(ctx.notifier.errors(), vec![Message::ApiMessage("Title too long".to_string())]);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_generic_message_without_body(ctx: &mut ApiContext) {
        ctx.login();
        Mock::given(method("DELETE"))
            .and(path("/task/delete/9"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&ctx.server)
            .await;

        let err = tasks(ctx).delete(9).await.unwrap_err();

        assert!(matches!(err, ApiError::ApiRejected { status: 500, .. }));
        assert_eq!(ctx.notifier.errors(), vec![Message::ApiMessage("API error".to_string())]);
        assert!(ctx.app.session.is_logged_in());
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_login_failure_shows_server_error(ctx: &mut ApiContext) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})))
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&ctx.server)
            .await;

        let result = ctx.app.auth.login(&LoginCredentials::new("ada", "wrong")).await;

        assert!(result.is_err());
        assert!(!ctx.app.session.is_logged_in());
        assert_eq!(ctx.notifier.errors(), vec![Message::ApiMessage("Invalid credentials".to_string())]);
        ctx.server.verify().await;
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_register_fallback_message(ctx: &mut ApiContext) {
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&ctx.server)
            .await;

        let err = ctx.app.auth.register(&LoginCredentials::new("ada", "secret")).await.unwrap_err();

        assert_eq!(err.notification().to_string(), "Registration failed");
        assert_eq!(ctx.notifier.errors(), vec![Message::ApiMessage("Registration failed".to_string())]);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn test_register_accepts_empty_body(ctx: &mut ApiContext) {
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&ctx.server)
            .await;

        ctx.app.auth.register(&LoginCredentials::new("ada", "secret")).await.unwrap();

        assert!(ctx.notifier.errors().is_empty());
        ctx.server.verify().await;
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let base_url = "http://127.0.0.1:1";
        let notifier = Arc::new(MemoryNotifier::new());
        let session = Arc::new(SessionStore::in_memory(RefreshClient::new(base_url)));
        session.login("token", None).unwrap();
        let client = Arc::new(ApiClient::new(base_url, session, notifier.clone()));

        let err = TasksApi::new(client).get_all(&QueryParams::default()).await.unwrap_err();

        assert!(matches!(err, ApiError::NetworkUnreachable(_)));
        assert_eq!(notifier.errors(), vec![Message::ServerUnreachable]);
    }
}
