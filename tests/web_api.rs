#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use tickline::db::tasks::Tasks;
    use tickline::libs::config::CalendarConfig;
    use tickline::web::{create_router, AppState};
    use tower::util::ServiceExt;

    struct ApiContext {
        _temp_dir: TempDir,
        router: Router,
    }

    impl AsyncTestContext for ApiContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let tasks = Tasks::open(temp_dir.path().join("tickline.db")).unwrap();
            let state = AppState::new(tasks, &CalendarConfig::default());

            ApiContext {
                _temp_dir: temp_dir,
                router: create_router(state),
            }
        }
    }

    impl ApiContext {
        async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let request = match body {
                Some(value) => Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(value.to_string()))
                    .unwrap(),
                None => Request::builder().method(method).uri(uri).body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };

            (status, value)
        }

        async fn create(&self, title: &str) -> Value {
            let (status, body) = self.request(Method::POST, "/api/tasks", Some(json!({ "title": title }))).await;
            assert_eq!(status, StatusCode::CREATED);
            body
        }

        async fn list_titles(&self) -> Vec<String> {
            let (status, body) = self.request(Method::GET, "/api/tasks", None).await;
            assert_eq!(status, StatusCode::OK);
            body.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap().to_string()).collect()
        }
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn health_reports_ok(ctx: &mut ApiContext) {
        let (status, body) = ctx.request(Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn create_serves_camel_case_task_placed_last(ctx: &mut ApiContext) {
        let first = ctx.create("write report").await;
        assert_eq!(first["position"], 0);
        assert_eq!(first["timerEnabled"], false);
        assert!(first["createdAt"].is_string());

        let (status, second) = ctx
            .request(
                Method::POST,
                "/api/tasks",
                Some(json!({ "title": "  stretch  ", "timerEnabled": true, "minutes": 5 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(second["title"], "stretch");
        assert_eq!(second["position"], 1);
        assert_eq!(second["minutes"], 5);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn create_rejects_blank_title(ctx: &mut ApiContext) {
        let (status, body) = ctx.request(Method::POST, "/api/tasks", Some(json!({ "title": "   " }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Task title cannot be empty");
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn get_unknown_task_is_404(ctx: &mut ApiContext) {
        let (status, body) = ctx.request(Method::GET, "/api/tasks/42", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn move_endpoint_returns_refreshed_full_order(ctx: &mut ApiContext) {
        ctx.create("a").await;
        let b = ctx.create("b").await;
        ctx.create("c").await;

        let uri = format!("/api/tasks/{}/reorder", b["id"].as_i64().unwrap());
        let (status, body) = ctx.request(Method::PUT, &uri, Some(json!({ "direction": "up" }))).await;

        assert_eq!(status, StatusCode::OK);
        let titles: Vec<_> = body.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn move_at_boundary_is_400_and_list_unchanged(ctx: &mut ApiContext) {
        let a = ctx.create("a").await;
        ctx.create("b").await;

        let uri = format!("/api/tasks/{}/reorder", a["id"].as_i64().unwrap());
        let (status, body) = ctx.request(Method::PUT, &uri, Some(json!({ "direction": "up" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Task is already at the boundary");
        assert_eq!(ctx.list_titles().await, vec!["a", "b"]);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn move_with_invalid_direction_is_400(ctx: &mut ApiContext) {
        let a = ctx.create("a").await;

        let uri = format!("/api/tasks/{}/reorder", a["id"].as_i64().unwrap());
        let (status, _) = ctx.request(Method::PUT, &uri, Some(json!({ "direction": "sideways" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn move_unknown_task_is_404(ctx: &mut ApiContext) {
        ctx.create("a").await;

        let (status, _) = ctx.request(Method::PUT, "/api/tasks/999/reorder", Some(json!({ "direction": "down" }))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn bulk_reorder_applies_new_order_and_tolerates_unknown_ids(ctx: &mut ApiContext) {
        let a = ctx.create("a").await;
        let b = ctx.create("b").await;
        let c = ctx.create("c").await;

        let payload = json!({ "taskOrders": [
            { "id": c["id"], "position": 0 },
            { "id": a["id"], "position": 1 },
            { "id": 9999, "position": 5 },
            { "id": b["id"], "position": 2 },
        ]});
        let (status, body) = ctx.request(Method::PUT, "/api/tasks/reorder", Some(payload)).await;

        assert_eq!(status, StatusCode::OK);
        let titles: Vec<_> = body.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn bulk_reorder_rejects_missing_empty_or_malformed_lists(ctx: &mut ApiContext) {
        ctx.create("a").await;

        let (status, _) = ctx.request(Method::PUT, "/api/tasks/reorder", Some(json!({ "taskOrders": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = ctx.request(Method::PUT, "/api/tasks/reorder", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = ctx
            .request(Method::PUT, "/api/tasks/reorder", Some(json!({ "taskOrders": [{ "id": "x", "position": 0 }] })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(ctx.list_titles().await, vec!["a"]);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn partial_update_changes_only_supplied_fields(ctx: &mut ApiContext) {
        let (_, task) = ctx
            .request(
                Method::POST,
                "/api/tasks",
                Some(json!({ "title": "focus", "timerEnabled": true, "hours": 1 })),
            )
            .await;

        let uri = format!("/api/tasks/{}", task["id"].as_i64().unwrap());
        let (status, updated) = ctx.request(Method::PUT, &uri, Some(json!({ "minutes": 20 }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "focus");
        assert_eq!(updated["hours"], 1);
        assert_eq!(updated["minutes"], 20);

        let (status, body) = ctx.request(Method::PUT, &uri, Some(json!({ "title": null }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Task title cannot be null");
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn delete_removes_task_then_404s(ctx: &mut ApiContext) {
        let a = ctx.create("a").await;
        ctx.create("b").await;

        let uri = format!("/api/tasks/{}", a["id"].as_i64().unwrap());
        let (status, _) = ctx.request(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(ctx.list_titles().await, vec!["b"]);

        let (status, _) = ctx.request(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test_context(ApiContext)]
    #[tokio::test]
    async fn calendar_events_require_bearer_token(ctx: &mut ApiContext) {
        let (status, body) = ctx.request(Method::GET, "/api/calendar/events", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing calendar authorization token");
    }
}
