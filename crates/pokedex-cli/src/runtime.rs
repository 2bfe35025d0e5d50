// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use pokedex_app::{DetailRecord, Router};
use pokedex_tui::{AppRuntime, DetailFetchEvent, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;

/// Production runtime: detail fetches go to the remote API on a worker
/// thread so the event loop never blocks on the network.
pub struct ApiRuntime {
    client: pokedex_api::Client,
}

impl ApiRuntime {
    pub fn new(client: pokedex_api::Client) -> Self {
        Self { client }
    }
}

impl AppRuntime for ApiRuntime {
    fn fetch_detail(&mut self, id: u32) -> Result<DetailRecord> {
        self.client.fetch_detail(id)
    }

    fn spawn_detail_fetch(
        &mut self,
        request_id: u64,
        id: u32,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        thread::spawn(move || {
            let event = match client.fetch_detail(id) {
                Ok(record) => {
                    InternalEvent::Detail(DetailFetchEvent::Loaded { request_id, record })
                }
                Err(error) => InternalEvent::Detail(DetailFetchEvent::Failed {
                    request_id,
                    error: error.to_string(),
                }),
            };
            // The receiver is gone when the UI already shut down.
            let _ = tx.send(event);
        });
        Ok(())
    }
}

/// Routing collaborator for the terminal session. The route parameter is
/// the optional `--id` argument; navigations keep the current `/<id>`
/// path, which is what a URL bar would show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliRouter {
    param: Option<String>,
    current_path: Option<String>,
}

impl CliRouter {
    pub fn new(param: Option<String>) -> Self {
        Self {
            param,
            current_path: None,
        }
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }
}

impl Router for CliRouter {
    fn current_param(&self) -> Option<String> {
        self.param.clone()
    }

    fn navigate(&mut self, id: u32) {
        self.current_path = Some(format!("/{id}"));
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiRuntime, CliRouter};
    use anyhow::{Result, anyhow};
    use pokedex_app::Router;
    use pokedex_tui::{AppRuntime, DetailFetchEvent, InternalEvent};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tiny_http::{Header, Response, Server};

    #[test]
    fn cli_router_tracks_param_and_path() {
        let mut router = CliRouter::new(Some("42".to_owned()));
        assert_eq!(router.current_param(), Some("42".to_owned()));
        assert_eq!(router.current_path(), None);

        router.navigate(43);
        assert_eq!(router.current_path(), Some("/43"));

        router.navigate(1);
        assert_eq!(router.current_path(), Some("/1"));
    }

    #[test]
    fn spawned_fetch_delivers_a_tagged_event() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let addr = format!("http://{}/pokemon", server.server_addr());

        let handle = thread::spawn(move || {
            let request = server.recv().expect("request expected");
            assert_eq!(request.url(), "/pokemon/25");
            let body = r#"{
                "name": "pikachu",
                "height": 4,
                "weight": 60,
                "sprites": {"front_default": null},
                "types": []
            }"#;
            let response = Response::from_string(body).with_status_code(200).with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
            request.respond(response).expect("response should succeed");
        });

        let client = pokedex_api::Client::new(&addr, Duration::from_secs(1))?;
        let mut runtime = ApiRuntime::new(client);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_detail_fetch(9, 25, tx)?;

        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| anyhow!("no event within timeout"))?;
        match event {
            InternalEvent::Detail(DetailFetchEvent::Loaded { request_id, record }) => {
                assert_eq!(request_id, 9);
                assert_eq!(record.id, 25);
                assert_eq!(record.name, "pikachu");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        handle.join().expect("server thread should join");
        Ok(())
    }

    #[test]
    fn spawned_fetch_reports_failure_as_an_event() -> Result<()> {
        let client = pokedex_api::Client::new("http://127.0.0.1:1", Duration::from_millis(50))?;
        let mut runtime = ApiRuntime::new(client);
        let (tx, rx) = mpsc::channel();

        runtime.spawn_detail_fetch(3, 1, tx)?;

        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| anyhow!("no event within timeout"))?;
        match event {
            InternalEvent::Detail(DetailFetchEvent::Failed { request_id, error }) => {
                assert_eq!(request_id, 3);
                assert!(error.contains("cannot reach"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        Ok(())
    }
}
