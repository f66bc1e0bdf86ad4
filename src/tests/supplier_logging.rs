// Supplier log events and the span they are emitted in.

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use http::StatusCode;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use tracing::{info_span, Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::Layer;

    use crate::errors::RefreshError;
    use crate::sources::{ClientCredentialsFetcher, Credentials};
    use crate::supplier::{CachingSupplier, DirectSupplier, SubjectTokenSupplier, SupplierContext};
    use crate::tests::common::{build_reqwest_client, credentials, ScriptedFetcher, CLIENT_ID, CLIENT_SECRET, ISSUER_URL};

    const CRATE_TARGET: &str = "subject_token_supplier";
    const SUPPLIER_TARGET: &str = "subject_token_supplier::supplier";

    #[derive(Debug, Clone)]
    struct Recorded {
        target: String,
        level: Level,
        spans: Vec<String>,
    }

    /// Keeps every event together with the names of its enclosing spans.
    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<Recorded>>>,
    }

    impl Recorder {
        fn events_from(&self, target: &str) -> Vec<Recorded> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.target.starts_with(target))
                .cloned()
                .collect()
        }
    }

    impl<S> Layer<S> for Recorder
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
            let spans = ctx
                .event_scope(event)
                .map(|scope| scope.from_root().map(|span| span.name().to_string()).collect())
                .unwrap_or_default();
            self.events.lock().unwrap().push(Recorded {
                target: event.metadata().target().to_string(),
                level: *event.metadata().level(),
                spans,
            });
        }
    }

    fn install() -> (Recorder, tracing::subscriber::DefaultGuard) {
        let recorder = Recorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        (recorder, tracing::subscriber::set_default(subscriber))
    }

    #[tokio::test]
    async fn caching_refresh_logs_inside_custom_span() {
        let (recorder, _guard) = install();
        let supplier = CachingSupplier::new(ScriptedFetcher::new().then_token("tok1", 60), credentials())
            .with_span(info_span!("custom", component = "caching"));

        assert_eq!(supplier.get_token(&SupplierContext::default()).await.unwrap(), "tok1");

        let events = recorder.events_from(SUPPLIER_TARGET);
        assert_eq!(events.len(), 2, "{events:?}");
        for event in &events {
            assert_eq!(event.spans, vec!["custom".to_string()], "{event:?}");
        }
    }

    #[tokio::test]
    async fn direct_failure_logs_inside_custom_span() {
        let (recorder, _guard) = install();
        let fetcher = ScriptedFetcher::new().then_error(RefreshError::http_status(ISSUER_URL, StatusCode::BAD_GATEWAY, ""));
        let supplier =
            DirectSupplier::new(fetcher, credentials()).with_span(info_span!("custom", component = "direct"));

        assert!(supplier.get_token(&SupplierContext::default()).await.is_err());

        let events = recorder.events_from(SUPPLIER_TARGET);
        assert_eq!(events.len(), 1, "{events:?}");
        assert_eq!(events[0].level, Level::ERROR);
        assert_eq!(events[0].spans, vec!["custom".to_string()]);
    }

    #[tokio::test]
    async fn failed_fetch_is_logged_at_error_once() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(500).body("boom");
            })
            .await;

        let (recorder, _guard) = install();
        let fetcher = ClientCredentialsFetcher::new(build_reqwest_client());
        let supplier = CachingSupplier::new(fetcher, Credentials::new(server.url("/token"), CLIENT_ID, CLIENT_SECRET));

        assert!(supplier.get_token(&SupplierContext::default()).await.is_err());

        let errors: Vec<_> = recorder
            .events_from(CRATE_TARGET)
            .into_iter()
            .filter(|e| e.level == Level::ERROR)
            .collect();
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].target.starts_with(SUPPLIER_TARGET));
        assert_eq!(errors[0].spans, vec!["subject_token_supplier".to_string()]);
    }
}
