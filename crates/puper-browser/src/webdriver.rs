//! Headless Firefox rendering through geckodriver.
//!
//! [WebDriver](https://www.w3.org/TR/webdriver2/) is plain JSON over HTTP:
//! every response is an object with a `value` member, and failures carry
//! `value.error` and `value.message`. We only need a handful of commands, so
//! they are sent with reqwest directly.
//!
//! The driver process and the browser session are both held by guards and
//! torn down on every exit path.

use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use puper_common::FetchError;
use reqwest::Method;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::LoadError;

/// How long geckodriver gets to start listening.
const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// How long to look for the wait selector.
const ELEMENT_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Upper bound for one WebDriver command; navigation blocks until load.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Renders pages in headless Firefox.
///
/// ```no_run
/// use std::time::Duration;
/// use puper_browser::Geckodriver;
///
/// let html = Geckodriver::new("/usr/bin/firefox")
///     .wait(Duration::from_secs(2))
///     .page_source("https://example.com")?;
/// # Ok::<(), puper_browser::LoadError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Geckodriver {
    program: String,
    firefox_binary: PathBuf,
    port: u16,
    wait: Duration,
    wait_selector: Option<String>,
    startup_timeout: Duration,
    element_timeout: Duration,
}

impl Geckodriver {
    /// A driver for the Firefox at `firefox_binary`, on a random port.
    pub fn new(firefox_binary: impl Into<PathBuf>) -> Self {
        Self {
            program: "geckodriver".to_string(),
            firefox_binary: firefox_binary.into(),
            port: 0,
            wait: Duration::from_secs(1),
            wait_selector: None,
            startup_timeout: STARTUP_TIMEOUT,
            element_timeout: ELEMENT_TIMEOUT,
        }
    }

    /// Run a different geckodriver executable.
    #[must_use]
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Listen on `port`; `0` picks a free one.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Time to let the page settle when there is no wait selector.
    #[must_use]
    pub const fn wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Wait for an element matching this CSS selector instead of sleeping.
    ///
    /// Leading and trailing `>`, `+` and `,` are cut off, since WebDriver
    /// rejects a selector that starts or ends with a combinator. What is left
    /// is ignored if it is empty or `*`.
    #[must_use]
    pub fn wait_selector(mut self, selector: Option<String>) -> Self {
        self.wait_selector = selector
            .map(|s| s.trim_matches(is_combinator_or_space).to_owned())
            .filter(|s| !s.is_empty() && s != "*");
        self
    }

    /// How long the driver gets to become ready.
    #[must_use]
    pub const fn startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    /// How long to look for the wait selector.
    #[must_use]
    pub const fn element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    /// Load `url` and return the page source after it settled.
    ///
    /// # Errors
    ///
    /// [`LoadError::Spawn`] if geckodriver cannot be started,
    /// [`LoadError::Timeout`] if it never becomes ready or the wait selector
    /// never matches, and the WebDriver or transport error of any command
    /// that fails.
    pub fn page_source(&self, url: &str) -> Result<String, LoadError> {
        let port = if self.port == 0 { free_port()? } else { self.port };
        let mut driver = self.spawn(port)?;

        let client = WebDriverClient::new(port)?;
        client.wait_ready(&mut driver, self.startup_timeout)?;

        let session = client.new_session()?;
        tracing::debug!(session = %session.id, url, "navigating");
        session.navigate(url)?;

        if let Some(selector) = &self.wait_selector {
            tracing::debug!(selector, "waiting for element");
            session.wait_for_element(selector, self.element_timeout)?;
        } else {
            tracing::debug!(seconds = self.wait.as_secs_f64(), "waiting for page to settle");
            thread::sleep(self.wait);
        }

        session.source()
    }

    fn spawn(&self, port: u16) -> Result<DriverProcess, LoadError> {
        let mut command = Command::new(&self.program);
        let _ = command
            .arg(format!("--port={port}"))
            .arg("-b")
            .arg(&self.firefox_binary)
            .env("MOZ_HEADLESS", "1")
            .env("MOZ_REMOTE_SETTINGS_DEVTOOLS", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        tracing::debug!(?command, "starting geckodriver");
        let child = command.spawn().map_err(|source| LoadError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        Ok(DriverProcess {
            program: self.program.clone(),
            child,
        })
    }
}

/// Reserve a free local port by binding port 0 and releasing it.
pub(crate) fn free_port() -> Result<u16, LoadError> {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .map_err(|source| LoadError::io("failed to reserve a local port", source))?;
    let port = listener
        .local_addr()
        .map_err(|source| LoadError::io("failed to reserve a local port", source))?
        .port();
    Ok(port)
}

const fn is_combinator_or_space(c: char) -> bool {
    matches!(c, '>' | '+' | ',') || c.is_ascii_whitespace()
}

/// Kills geckodriver (and with it Firefox) when dropped.
struct DriverProcess {
    program: String,
    child: Child,
}

impl DriverProcess {
    /// Fail if the process already exited.
    fn ensure_running(&mut self) -> Result<(), LoadError> {
        match self.child.try_wait() {
            Ok(None) => Ok(()),
            Ok(Some(status)) => Err(LoadError::Spawn {
                program: self.program.clone(),
                source: std::io::Error::other(format!("exited early with {status}")),
            }),
            Err(source) => Err(LoadError::Spawn {
                program: self.program.clone(),
                source,
            }),
        }
    }
}

impl Drop for DriverProcess {
    fn drop(&mut self) {
        tracing::debug!(pid = self.child.id(), "stopping geckodriver");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    value: Value,
}

#[derive(Deserialize)]
struct ErrorValue {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct StatusValue {
    ready: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSessionValue {
    session_id: String,
}

struct WebDriverClient {
    base: String,
    http: Client,
}

impl WebDriverClient {
    fn new(port: u16) -> Result<Self, LoadError> {
        let base = format!("http://127.0.0.1:{port}");
        let http = Client::builder()
            .timeout(COMMAND_TIMEOUT)
            .build()
            .map_err(|source: reqwest::Error| FetchError::Request {
                url: base.clone(),
                source,
            })?;
        Ok(Self { base, http })
    }

    /// Send one command and return its `value`.
    fn command<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, LoadError> {
        let url = format!("{}/{path}", self.base);
        let transport = |source: reqwest::Error| FetchError::Request {
            url: url.clone(),
            source,
        };

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().map_err(transport)?;
        let status = response.status();
        let text = response.text().map_err(transport)?;

        let value = decode_response(&url, status, &text)?;
        Ok(serde_json::from_value(value)?)
    }

    /// [§ 8.3 Status](https://www.w3.org/TR/webdriver2/#status)
    ///
    /// Poll until the driver reports ready. Connection errors are expected
    /// while it is still starting.
    fn wait_ready(&self, driver: &mut DriverProcess, timeout: Duration) -> Result<(), LoadError> {
        let deadline = Instant::now() + timeout;
        loop {
            driver.ensure_running()?;
            match self.command::<StatusValue>(Method::GET, "status", None) {
                Ok(StatusValue { ready: true }) => {
                    tracing::debug!("geckodriver is ready");
                    return Ok(());
                }
                Ok(StatusValue { ready: false }) | Err(LoadError::Http(_)) => {}
                Err(err) => return Err(err),
            }
            if Instant::now() >= deadline {
                return Err(LoadError::Timeout {
                    what: "geckodriver to become ready".to_string(),
                    after: timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// [§ 8.1 New Session](https://www.w3.org/TR/webdriver2/#new-session)
    fn new_session(&self) -> Result<Session<'_>, LoadError> {
        let capabilities = json!({
            "capabilities": { "alwaysMatch": { "browserName": "firefox" } }
        });
        let NewSessionValue { session_id } =
            self.command(Method::POST, "session", Some(&capabilities))?;
        Ok(Session {
            client: self,
            id: session_id,
        })
    }
}

/// An open browser session; deleted when dropped.
struct Session<'a> {
    client: &'a WebDriverClient,
    id: String,
}

impl Session<'_> {
    /// [§ 10.1 Navigate To](https://www.w3.org/TR/webdriver2/#navigate-to)
    fn navigate(&self, url: &str) -> Result<(), LoadError> {
        let _: Value = self.client.command(
            Method::POST,
            &format!("session/{}/url", self.id),
            Some(&json!({ "url": url })),
        )?;
        Ok(())
    }

    /// [§ 12.3.2 Find Element](https://www.w3.org/TR/webdriver2/#find-element)
    ///
    /// Retried until the element exists or `timeout` runs out.
    fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<(), LoadError> {
        let path = format!("session/{}/element", self.id);
        let body = json!({ "using": "css selector", "value": selector });
        let deadline = Instant::now() + timeout;
        loop {
            match self.client.command::<Value>(Method::POST, &path, Some(&body)) {
                Ok(_) => return Ok(()),
                Err(err) if err.is_no_such_element() => {}
                Err(err) => return Err(err),
            }
            if Instant::now() >= deadline {
                return Err(LoadError::Timeout {
                    what: format!("an element matching \"{selector}\""),
                    after: timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// [§ 13.1 Get Page Source](https://www.w3.org/TR/webdriver2/#get-page-source)
    fn source(&self) -> Result<String, LoadError> {
        self.client
            .command(Method::GET, &format!("session/{}/source", self.id), None)
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        tracing::debug!(session = %self.id, "deleting session");
        let _ = self
            .client
            .command::<Value>(Method::DELETE, &format!("session/{}", self.id), None);
    }
}

/// Unwrap a WebDriver response body into its `value`.
fn decode_response(url: &str, status: reqwest::StatusCode, body: &str) -> Result<Value, LoadError> {
    let envelope = match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(LoadError::Status {
                url: url.to_string(),
                status,
            });
        }
        Err(err) => return Err(err.into()),
    };

    if status.is_success() {
        return Ok(envelope.value);
    }

    match serde_json::from_value::<ErrorValue>(envelope.value) {
        Ok(ErrorValue { error, message }) => Err(LoadError::WebDriver { error, message }),
        Err(_) => Err(LoadError::Status {
            url: url.to_string(),
            status,
        }),
    }
}
