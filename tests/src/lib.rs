#[cfg(test)]
mod support;

#[cfg(test)]
mod tests {
    use crate::support::{init_logging, local_clients, start_echo_server};
    use http_intercept::{
        http_intercept_test, FileAttachment, HttpClients, InterceptionConfiguration,
        InterceptionScope, Method, RequestOptions,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::Ordering;
    use tokio::runtime::Runtime;

    fn enable_interception(config: &mut InterceptionConfiguration) {
        init_logging();
        config.set_enabled(true);
    }

    #[http_intercept_test(enable_interception)]
    fn sentinel_url_is_not_found_for_every_method() {
        for method in Method::ALL.iter().copied() {
            let response = HttpClients::global()
                .request(method, "http://404.com", &RequestOptions::new())
                .unwrap();

            assert_eq!(response.status_code, 404);
            assert_eq!(response.text(), "Not Found");
        }
    }

    #[http_intercept_test(enable_interception)]
    fn data_is_echoed_back() {
        let options = RequestOptions::new().with_data(json!({"a": 1}));

        for method in Method::ALL.iter().copied() {
            let response = HttpClients::global()
                .request(method, "http://workflow.test/run", &options)
                .unwrap();

            assert_eq!(response.status_code, 200);
            assert_eq!(response.body, serde_json::to_vec(&json!({"a": 1})).unwrap());
        }
    }

    #[http_intercept_test(enable_interception)]
    fn empty_requests_answer_ok_and_mirror_headers() {
        let options = RequestOptions::new()
            .with_header("X-Api-Key", "secret")
            .with_param("page", "2");

        let response = HttpClients::global()
            .request(Method::Get, "http://workflow.test/items", &options)
            .unwrap();

        assert_eq!(response.text(), "OK");
        assert_eq!(response.headers, options.headers);
        assert_eq!(response.url, "http://workflow.test/items?page=2");
    }

    #[http_intercept_test(enable_interception)]
    fn files_are_echoed_back() -> Result<(), http_intercept::Error> {
        let options =
            RequestOptions::new().with_file("upload", FileAttachment::new("notes.md", "# notes"));

        let response =
            HttpClients::global().request(Method::Post, "http://workflow.test/upload", &options)?;

        assert_eq!(
            response.json::<Value>()?,
            json!({"upload": {"filename": "notes.md", "content": "# notes"}})
        );
        Ok(())
    }

    #[http_intercept_test(enable_interception)]
    async fn async_client_is_intercepted_too() {
        let response = HttpClients::global()
            .request_async(Method::Options, "http://404.com", &RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(response.status_code, 404);
    }

    #[test]
    fn interception_follows_the_mock_switch() {
        let scope = InterceptionScope::enter(HttpClients::global());
        let installed = HttpClients::global().entries();

        assert_eq!(
            scope.is_intercepting(),
            InterceptionConfiguration::from_env().enabled()
        );
        if let Some(original) = scope.replaced_entries() {
            assert!(!installed.same_as(original));
        }
    }

    #[http_intercept_test]
    fn sentinel_is_fabricated_when_the_switch_is_on() {
        if InterceptionConfiguration::from_env().enabled() {
            let response = HttpClients::global()
                .request(Method::Get, "http://404.com", &RequestOptions::new())
                .unwrap();

            assert_eq!(response.status_code, 404);
        }
    }

    fn attachments_with_awkward_names() -> RequestOptions {
        RequestOptions::new().with_file(
            "doc",
            FileAttachment::new("a.txt\"; name=\"evil", "line\r\n--boundary--\r\ntrailing")
                .with_content_type("text/plain"),
        )
    }

    #[test]
    fn blocking_client_sends_files_as_a_multipart_form() {
        init_logging();
        let (addr, _) = start_echo_server();
        let clients = local_clients();

        let response = clients
            .request(
                Method::Post,
                &format!("http://{}/upload", addr),
                &attachments_with_awkward_names(),
            )
            .unwrap();
        let text = response.text();

        assert!(text.contains("filename=\"a.txt\\\"; name=\\\"evil\""));
        assert!(text.contains("Content-Type: text/plain\r\n\r\nline\r\n--boundary--\r\ntrailing\r\n"));
    }

    #[test]
    fn async_client_sends_files_as_a_multipart_form() {
        init_logging();
        let (addr, _) = start_echo_server();
        let clients = local_clients();

        let response = Runtime::new()
            .unwrap()
            .block_on(clients.request_async(
                Method::Post,
                &format!("http://{}/upload", addr),
                &attachments_with_awkward_names(),
            ))
            .unwrap();
        let text = response.text();

        assert!(text.contains("filename=\"a.txt%22; name=%22evil\""));
        assert!(!text.contains("name=\"evil\""));
        assert!(text.contains("\r\n\r\nline\r\n--boundary--\r\ntrailing\r\n"));
    }

    #[test]
    fn async_client_works_across_runtimes() {
        init_logging();
        let (addr, hits) = start_echo_server();
        let clients = local_clients();
        let url = format!("http://{}/ping", addr);

        for _ in 0..2 {
            let response = Runtime::new()
                .unwrap()
                .block_on(clients.request_async(Method::Get, &url, &RequestOptions::new()))
                .unwrap();
            assert_eq!(response.status_code, 201);
        }

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn disabled_scope_passes_requests_to_the_real_clients() {
        init_logging();
        let (addr, hits) = start_echo_server();
        let clients = local_clients();
        let options = RequestOptions::new()
            .with_param("id", "3")
            .with_data(json!("hello"));

        let _scope = InterceptionScope::enter_with(&clients, &InterceptionConfiguration::new(false));

        let blocking = clients
            .request(Method::Put, &format!("http://{}/items", addr), &options)
            .unwrap();
        assert_eq!(blocking.status_code, 201);
        assert_eq!(blocking.text(), "PUT /items?id=3 hello");
        assert_eq!(blocking.headers.get("x-echo").map(String::as_str), Some("real"));

        let asynchronous = Runtime::new()
            .unwrap()
            .block_on(clients.request_async(
                Method::Get,
                &format!("http://{}/ping", addr),
                &RequestOptions::new(),
            ))
            .unwrap();
        assert_eq!(asynchronous.status_code, 201);
        assert_eq!(asynchronous.text(), "GET /ping ");

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn enabled_scope_never_reaches_the_network() {
        init_logging();
        let (addr, hits) = start_echo_server();
        let clients = local_clients();

        {
            let _scope =
                InterceptionScope::enter_with(&clients, &InterceptionConfiguration::new(true));
            let response = clients
                .request(Method::Get, &format!("http://{}/items", addr), &RequestOptions::new())
                .unwrap();

            assert_eq!(response.status_code, 200);
            assert_eq!(response.text(), "OK");
        }

        let response = clients
            .request(Method::Get, &format!("http://{}/items", addr), &RequestOptions::new())
            .unwrap();
        assert_eq!(response.status_code, 201);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
