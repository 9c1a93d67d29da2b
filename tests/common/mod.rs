#![allow(dead_code)]

pub mod fixtures {
    use serde_json::json;
    use switchyard::{Container, Handler, HttpError, RouteCollection, Service};

    /// The service most tests resolve `SomeClass::*` references against.
    pub fn some_class() -> Service {
        Service::new()
            .method(
                "someMethod",
                Handler::new(|args| {
                    let resp = args.into_response().unwrap_or_default();
                    Ok(resp.with_content("some content").into())
                }),
            )
            .method_with_params(
                "hello",
                &["name"],
                Handler::new(|args| Ok(format!("hello {}", args.param(0).unwrap_or_default()).into())),
            )
            .method("conflict", Handler::new(|_| Err(HttpError::conflict().into())))
            .method("pets", Handler::new(|_| Ok(json!([{ "id": 1, "name": "Rex" }]).into())))
            .method("text", Handler::new(|_| Ok("plain text".into())))
    }

    pub fn container() -> Container {
        let mut container = Container::new();
        container.share("SomeClass", some_class());
        container
    }

    /// An empty collection resolving against [`container`].
    pub fn collection() -> RouteCollection {
        RouteCollection::new().with_resolver(container())
    }
}

pub mod log_capture {
    use std::io;
    use std::sync::{Arc, Mutex};

    /// In-memory sink for a test-local `tracing` subscriber.
    #[derive(Clone, Default)]
    pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with every event at `debug` and above written to the returned buffer.
    pub fn capture<F: FnOnce()>(f: F) -> CapturedLogs {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        logs
    }
}
