//! Tokio runtime and Wiremock servers for driving the blocking clients.

use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// A runtime owning one mock GitHub server and one mock chat server.
///
/// The blocking HTTP clients run on the test thread while the runtime's
/// worker threads serve the mocks.
pub struct MockApis {
    runtime: Runtime,
    /// Stands in for the GitHub REST API.
    pub github: MockServer,
    /// Stands in for the chat-completions API.
    pub chat: MockServer,
}

impl MockApis {
    /// Starts both servers.
    ///
    /// # Panics
    ///
    /// Panics if the Tokio runtime cannot be created.
    pub fn start() -> Self {
        let runtime = Runtime::new()
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
        let github = runtime.block_on(MockServer::start());
        let chat = runtime.block_on(MockServer::start());
        Self {
            runtime,
            github,
            chat,
        }
    }

    /// Mounts `mock` on the GitHub server.
    pub fn mount_github(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.github));
    }

    /// Mounts `mock` on the chat server.
    pub fn mount_chat(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.chat));
    }

    /// Bodies of every request the chat server received, as JSON.
    ///
    /// # Panics
    ///
    /// Panics if request recording is disabled or a body is not JSON.
    pub fn chat_request_bodies(&self) -> Vec<serde_json::Value> {
        self.runtime
            .block_on(self.chat.received_requests())
            .unwrap_or_else(|| panic!("request recording should be enabled"))
            .iter()
            .map(|request| {
                serde_json::from_slice(&request.body)
                    .unwrap_or_else(|error| panic!("chat request body is not JSON: {error}"))
            })
            .collect()
    }
}
