mod common;

#[cfg(test)]
mod tests {
    use super::common::{page_json, task_json, ApiContext};
    use std::sync::Arc;
    use std::time::Duration;
    use taskly::libs::location::MemoryLocation;
    use taskly::libs::query::{OrderBy, QueryParams, SortBy};
    use taskly::libs::query_engine::{QueryDriver, QueryStatus};
    use taskly::libs::view_state::ViewState;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, ResponseTemplate};

    fn view(location: &str) -> (Arc<MemoryLocation>, Arc<ViewState>) {
        let location = Arc::new(MemoryLocation::new(location));
        let view = ViewState::new(location.clone(), 5, Duration::from_millis(300));
        (location, view)
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_commits_once_after_quiet_interval() {
        let (location, view) = view("page=4");
        view.hydrate();

        view.type_search("a");
        view.type_search("ab");
        view.type_search("abc");
        assert_eq!(view.search_draft(), "abc");

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(location.history().is_empty());
        assert_eq!(view.params().search, "");

        view.settled().await;
        assert_eq!(location.history(), vec!["search=abc".to_string()]);
        let params = view.params();
        assert_eq!(params.search, "abc");
        assert_eq!(params.page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_keystroke_restarts_interval() {
        let (location, view) = view("");
        view.hydrate();

        view.type_search("m");
        tokio::time::sleep(Duration::from_millis(250)).await;
        view.type_search("mi");
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(location.history().is_empty());

        view.type_search("  milk ");
        view.settled().await;
        assert_eq!(location.history(), vec!["search=milk".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_search_keeps_page() {
        let (location, view) = view("page=3&search=milk");
        view.hydrate();

        view.type_search("milk ");
        view.settled().await;

        assert!(location.history().is_empty());
        assert_eq!(view.params().page, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_cancels_pending_search() {
        let (location, view) = view("");
        view.hydrate();

        view.type_search("abc");
        view.navigate("?page=2").unwrap();
        view.settled().await;

        assert_eq!(location.history(), vec!["page=2".to_string()]);
        assert_eq!(view.search_draft(), "");
    }

    #[tokio::test]
    async fn test_flush_search_commits_immediately() {
        let (location, view) = view("page=2");
        view.hydrate();

        view.type_search("report");
        let params = view.flush_search().unwrap();

        assert_eq!(params.search, "report");
        assert_eq!(params.page, 1);
        assert_eq!(location.history(), vec!["search=report".to_string()]);
    }

    #[test]
    fn test_nothing_published_before_hydration() {
        let (_, view) = view("page=2&completed=true");
        let rx = view.subscribe();

        assert!(!view.is_hydrated());
        assert_eq!(*rx.borrow(), QueryParams::default());

        let params = view.hydrate();
        assert!(view.is_hydrated());
        assert_eq!(params.page, 2);
        assert_eq!(params.completed, Some(true));
        assert_eq!(*rx.borrow(), params);
    }

    #[test]
    fn test_edit_before_hydration_reads_location_first() {
        let (location, view) = view("page=2");

        let params = view.set_completed(Some(false)).unwrap();

        assert_eq!(params.page, 2);
        assert_eq!(params.completed, Some(false));
        assert_eq!(location.history(), vec!["page=2&completed=false".to_string()]);
    }

    #[test]
    fn test_setters_do_not_reset_page() {
        let (location, view) = view("page=3");
        view.hydrate();

        view.set_completed(Some(true)).unwrap();
        view.set_order_by(OrderBy::Title).unwrap();
        view.set_sort_by(SortBy::Asc).unwrap();

        assert_eq!(view.params().page, 3);
        assert_eq!(
            location.history().last().map(String::as_str),
            Some("page=3&completed=true&order_by=title&sort_by=asc")
        );
    }

    #[test]
    fn test_location_omits_defaults() {
        let (location, view) = view("page=2&sort_by=asc");
        view.hydrate();

        view.edit(|params| {
            params.page = 1;
            params.sort_by = SortBy::Desc;
            params.order_by = OrderBy::CreatedAt;
        })
        .unwrap();

        assert_eq!(location.history(), vec![String::new()]);
        assert_eq!(view.params().display_location(), "/");
    }

    #[test]
    fn test_paging_never_below_first_page() {
        let (location, view) = view("");
        view.hydrate();

        view.next_page().unwrap();
        view.next_page().unwrap();
        view.previous_page().unwrap();
        view.previous_page().unwrap();
        view.previous_page().unwrap();

        assert_eq!(view.params().page, 1);
        assert_eq!(
            location.history(),
            vec!["page=2".to_string(), "page=3".to_string(), "page=2".to_string(), String::new()]
        );
    }

    #[tokio::test]
    async fn test_driver_waits_for_hydration_and_follows_search() {
        let ctx = ApiContext::start("page=2", Duration::from_millis(50)).await;
        ctx.login();
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .and(query_param("page", "2"))
            .and(query_param_is_missing("search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![task_json(6, "Write", false)], 2, 2, 6)))
            .expect(1)
            .mount(&ctx.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .and(query_param("page", "1"))
            .and(query_param("search", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![task_json(1, "abc", false)], 1, 1, 1)))
            .expect(1)
            .mount(&ctx.server)
            .await;

        let _driver = QueryDriver::spawn(ctx.app.view.clone(), ctx.app.query.clone());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(ctx.requests_to("/task/get/all").await.is_empty());

        ctx.app.view.hydrate();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(ctx.app.query.page().map(|page| page.tasks[0].id), Some(6));

        ctx.app.view.type_search("a");
        ctx.app.view.type_search("ab");
        ctx.app.view.type_search("abc");
        ctx.app.view.settled().await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(ctx.app.query.page().map(|page| page.tasks[0].id), Some(1));
        ctx.server.verify().await;
    }

    #[tokio::test]
    async fn test_driver_disables_query_on_logout() {
        let ctx = ApiContext::start("", Duration::from_millis(50)).await;
        ctx.login();
        Mock::given(method("GET"))
            .and(path("/task/get/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![task_json(1, "Write", false)], 1, 1, 1)))
            .expect(1)
            .mount(&ctx.server)
            .await;

        ctx.app.view.hydrate();
        let _driver = QueryDriver::spawn(ctx.app.view.clone(), ctx.app.query.clone());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(ctx.app.query.page().is_some());

        ctx.app.auth.logout().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(ctx.app.query.status(), QueryStatus::Disabled);
        ctx.app.view.set_page(2).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        ctx.server.verify().await;
    }

    #[tokio::test]
    async fn test_wait_for_returns_page_after_navigation() {
        let ctx = ApiContext::start("", Duration::from_millis(50)).await;
        ctx.login();
        for page in [1, 2] {
            Mock::given(method("GET"))
                .and(path("/task/get/all"))
                .and(query_param("page", page.to_string()))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(page_json(vec![task_json(page.into(), "Write", false)], page, 2, 6))
                        .set_delay(Duration::from_millis(50)),
                )
                .expect(1)
                .mount(&ctx.server)
                .await;
        }

        ctx.app.view.hydrate();
        let _driver = QueryDriver::spawn(ctx.app.view.clone(), ctx.app.query.clone());
        let wait = Duration::from_secs(2);

        let first = tokio::time::timeout(wait, ctx.app.query.wait_for(&ctx.app.view.params())).await.unwrap();
        assert!(matches!(first, QueryStatus::Ready(page) if page.pagination.current_page == 1));

        let params = ctx.app.view.next_page().unwrap();
        let second = tokio::time::timeout(wait, ctx.app.query.wait_for(&params)).await.unwrap();

        assert!(matches!(second, QueryStatus::Ready(page) if page.tasks[0].id == 2));
        assert_eq!(ctx.app.query.params(), Some(params));
        ctx.server.verify().await;
    }

    #[tokio::test]
    async fn test_wait_for_returns_on_logout() {
        let ctx = ApiContext::start("", Duration::from_millis(50)).await;

        ctx.app.view.hydrate();
        let _driver = QueryDriver::spawn(ctx.app.view.clone(), ctx.app.query.clone());
        let status = tokio::time::timeout(Duration::from_secs(2), ctx.app.query.wait_for(&ctx.app.view.params()))
            .await
            .unwrap();

        assert_eq!(status, QueryStatus::Disabled);
        assert!(ctx.requests_to("/task/get/all").await.is_empty());
    }
}
