// Connection console: owns the single connection, the request id
// counter, and the catalog of request builders.
//
// Transport and view are seams. The front end wires in the
// tokio-tungstenite transport and the terminal view; tests wire in
// mocks. Event handlers (`on_open` / `on_message` / `on_close`) are
// invoked by the host event loop in delivery order, one at a time,
// never concurrently.

use anyhow::Result;
use serde_json::Value;

use vaultsock_common::protocol::envelope::RequestEnvelope;
use vaultsock_common::protocol::{inbound, methods, ProtocolError};

use crate::view::ConsoleView;

/// Lifecycle of the single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Seam over the wire. The console never touches the socket directly;
/// open and close complete asynchronously via the open/close events.
pub trait Transport {
    /// Start opening a connection to `url`.
    fn open(&mut self, url: &str) -> Result<()>;
    /// Transmit a raw text frame. Fire-and-forget.
    fn send(&mut self, payload: &str) -> Result<()>;
    /// Start closing the connection.
    fn close(&mut self);
}

pub struct Console<T, V> {
    transport: T,
    view: V,
    state: ConnectionState,
    server_url: Option<String>,
    next_request_id: u64,
}

impl<T: Transport, V: ConsoleView> Console<T, V> {
    pub fn new(transport: T, view: V) -> Self {
        Self {
            transport,
            view,
            state: ConnectionState::Disconnected,
            server_url: None,
            next_request_id: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Connect toggle. While a connection exists (open or still
    /// connecting) this closes it instead of opening another; the state
    /// change arrives with the transport's own close event.
    pub fn connect(&mut self, url: &str) -> Result<()> {
        if self.state != ConnectionState::Disconnected {
            self.transport.close();
            return Ok(());
        }

        self.server_url = Some(url.to_string());
        self.state = ConnectionState::Connecting;
        self.view.set_status(&format!("Connecting to {url}..."));
        self.transport.open(url)
    }

    pub fn on_open(&mut self) {
        let url = self.server_url.clone().unwrap_or_default();
        self.state = ConnectionState::Connected;
        self.view.set_status(&format!("Connected to {url}."));
        self.view.append_log(&format!("CONNECTED TO {url}."));
        self.view.set_toggle_label("Disconnect");
    }

    /// Close handling is uniform: a failed connect attempt and a graceful
    /// disconnect both arrive here.
    pub fn on_close(&mut self) {
        let url = self.server_url.clone().unwrap_or_default();
        self.state = ConnectionState::Disconnected;
        self.view.set_status("Connection closed.");
        self.view.append_log(&format!("DISCONNECTED FROM {url}."));
        self.view.set_toggle_label("Connect");
    }

    /// Handle an inbound frame. A malformed frame is an error and leaves
    /// the log untouched for that frame.
    pub fn on_message(&mut self, payload: &str) -> Result<(), ProtocolError> {
        let value = inbound::parse(payload)?;
        self.append_scrolled(&inbound::pretty(&value));
        self.view.set_wallet_link(inbound::wallet_uri(&value));
        Ok(())
    }

    /// Transmit a raw payload verbatim. No-op while disconnected; no
    /// acknowledgement or correlation is tracked.
    pub fn send_request(&mut self, payload: &str) -> Result<()> {
        if self.state == ConnectionState::Disconnected {
            return Ok(());
        }
        self.append_scrolled(&format!("Sending {payload} ..."));
        self.transport.send(payload)
    }

    fn append_scrolled(&mut self, line: &str) {
        self.view.append_log(line);
        if self.view.autoscroll() {
            self.view.scroll_to_end();
        }
    }

    // ── Request builders ────────────────────────────────────────────
    //
    // Each builder is a no-op while disconnected (the id counter is not
    // consumed). Field contents are not validated; the server's error
    // response is displayed like any other message.

    fn submit(&mut self, method: &'static str, params: Option<Vec<Value>>) -> Result<()> {
        if self.state == ConnectionState::Disconnected {
            return Ok(());
        }
        let envelope = match params {
            Some(params) => RequestEnvelope::with_params(method, params, self.next_request_id),
            None => RequestEnvelope::new(method, self.next_request_id),
        };
        self.next_request_id += 1;
        let payload = serde_json::to_string(&envelope)?;
        self.send_request(&payload)
    }

    pub fn get_vault_info(&mut self) -> Result<()> {
        self.submit(methods::GET_VAULT_INFO, None)
    }

    pub fn get_keychains(&mut self) -> Result<()> {
        self.submit(methods::GET_KEYCHAINS, None)
    }

    pub fn get_keychain_info(&mut self, name: &str) -> Result<()> {
        self.submit(methods::GET_KEYCHAIN_INFO, Some(vec![Value::from(name)]))
    }

    pub fn new_keychain(&mut self, name: &str) -> Result<()> {
        self.submit(methods::NEW_KEYCHAIN, Some(vec![Value::from(name)]))
    }

    pub fn rename_keychain(&mut self, oldname: &str, newname: &str) -> Result<()> {
        self.submit(
            methods::RENAME_KEYCHAIN,
            Some(vec![Value::from(oldname), Value::from(newname)]),
        )
    }

    pub fn get_accounts(&mut self) -> Result<()> {
        self.submit(methods::GET_ACCOUNTS, None)
    }

    pub fn get_account_info(&mut self, name: &str) -> Result<()> {
        self.submit(methods::GET_ACCOUNT_INFO, Some(vec![Value::from(name)]))
    }

    pub fn get_chain_tip(&mut self) -> Result<()> {
        self.submit(methods::GET_CHAIN_TIP, None)
    }

    /// Integer-height variant: the height is embedded as an unquoted
    /// JSON number.
    pub fn get_block_header_by_height(&mut self, height: u64) -> Result<()> {
        self.submit(methods::GET_BLOCK_HEADER, Some(vec![Value::from(height)]))
    }

    /// Hash-string variant.
    pub fn get_block_header_by_hash(&mut self, hash: &str) -> Result<()> {
        self.submit(methods::GET_BLOCK_HEADER, Some(vec![Value::from(hash)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "ws://localhost:8080/";

    // ── Mock transport ──────────────────────────────────────────────

    #[derive(Debug, Default)]
    struct MockTransport {
        opened: Vec<String>,
        sent: Vec<String>,
        close_calls: u32,
    }

    impl Transport for MockTransport {
        fn open(&mut self, url: &str) -> Result<()> {
            self.opened.push(url.to_string());
            Ok(())
        }

        fn send(&mut self, payload: &str) -> Result<()> {
            self.sent.push(payload.to_string());
            Ok(())
        }

        fn close(&mut self) {
            self.close_calls += 1;
        }
    }

    // ── Recording view ──────────────────────────────────────────────

    #[derive(Debug)]
    struct RecordingView {
        log: Vec<String>,
        status: Vec<String>,
        toggle_labels: Vec<String>,
        wallet_links: Vec<Option<String>>,
        autoscroll: bool,
        scrolls: u32,
    }

    impl RecordingView {
        fn new(autoscroll: bool) -> Self {
            Self {
                log: Vec::new(),
                status: Vec::new(),
                toggle_labels: Vec::new(),
                wallet_links: Vec::new(),
                autoscroll,
                scrolls: 0,
            }
        }
    }

    impl ConsoleView for RecordingView {
        fn append_log(&mut self, line: &str) {
            self.log.push(line.to_string());
        }

        fn set_status(&mut self, text: &str) {
            self.status.push(text.to_string());
        }

        fn set_toggle_label(&mut self, label: &str) {
            self.toggle_labels.push(label.to_string());
        }

        fn set_wallet_link(&mut self, uri: Option<&str>) {
            self.wallet_links.push(uri.map(str::to_string));
        }

        fn autoscroll(&self) -> bool {
            self.autoscroll
        }

        fn scroll_to_end(&mut self) {
            self.scrolls += 1;
        }
    }

    fn console() -> Console<MockTransport, RecordingView> {
        Console::new(MockTransport::default(), RecordingView::new(true))
    }

    fn connected_console() -> Console<MockTransport, RecordingView> {
        let mut console = console();
        console.connect(URL).expect("connect should succeed");
        console.on_open();
        console
    }

    // ── Connection lifecycle ────────────────────────────────────────

    #[test]
    fn connect_transitions_through_connecting_to_connected() {
        let mut console = console();
        assert_eq!(console.state(), ConnectionState::Disconnected);

        console.connect(URL).expect("connect should succeed");
        assert_eq!(console.state(), ConnectionState::Connecting);
        assert_eq!(console.transport.opened, vec![URL.to_string()]);
        assert_eq!(console.view.status.last().map(String::as_str), Some("Connecting to ws://localhost:8080/..."));

        console.on_open();
        assert_eq!(console.state(), ConnectionState::Connected);
        assert_eq!(console.view.toggle_labels.last().map(String::as_str), Some("Disconnect"));
        assert_eq!(console.view.log.last().map(String::as_str), Some("CONNECTED TO ws://localhost:8080/."));
    }

    #[test]
    fn connect_while_connected_closes_instead_of_reopening() {
        let mut console = connected_console();

        console.connect(URL).expect("toggle should succeed");
        // Only the first connect opened; the second closed.
        assert_eq!(console.transport.opened.len(), 1);
        assert_eq!(console.transport.close_calls, 1);
        // State changes only once the transport reports the close.
        assert_eq!(console.state(), ConnectionState::Connected);

        console.on_close();
        assert_eq!(console.state(), ConnectionState::Disconnected);
        assert_eq!(console.view.toggle_labels.last().map(String::as_str), Some("Connect"));
        assert_eq!(console.view.log.last().map(String::as_str), Some("DISCONNECTED FROM ws://localhost:8080/."));
    }

    #[test]
    fn connect_while_connecting_also_closes() {
        let mut console = console();
        console.connect(URL).expect("connect should succeed");
        console.connect(URL).expect("toggle should succeed");
        assert_eq!(console.transport.opened.len(), 1);
        assert_eq!(console.transport.close_calls, 1);
    }

    #[test]
    fn toggle_label_always_matches_state() {
        let mut console = console();
        for _ in 0..3 {
            console.connect(URL).expect("connect should succeed");
            console.on_open();
            assert_eq!(console.view.toggle_labels.last().map(String::as_str), Some("Disconnect"));

            console.connect(URL).expect("toggle should succeed");
            console.on_close();
            assert_eq!(console.view.toggle_labels.last().map(String::as_str), Some("Connect"));
        }
    }

    #[test]
    fn failed_connect_is_reported_as_a_plain_close() {
        let mut console = console();
        console.connect(URL).expect("connect should succeed");
        // The transport reports an unreachable server via its close event,
        // indistinguishable from a graceful disconnect.
        console.on_close();
        assert_eq!(console.state(), ConnectionState::Disconnected);
        assert_eq!(console.view.status.last().map(String::as_str), Some("Connection closed."));
    }

    // ── send_request ────────────────────────────────────────────────

    #[test]
    fn send_request_while_disconnected_is_a_noop() {
        let mut console = console();
        console.send_request(r#"{"method":"getvaultinfo","id":0}"#).expect("send should succeed");
        assert!(console.transport.sent.is_empty());
        assert!(console.view.log.is_empty());
    }

    #[test]
    fn send_request_logs_then_transmits_verbatim() {
        let mut console = connected_console();
        console.send_request("{not even json}").expect("send should succeed");
        assert_eq!(console.transport.sent, vec!["{not even json}".to_string()]);
        assert_eq!(console.view.log.last().map(String::as_str), Some("Sending {not even json} ..."));
    }

    #[test]
    fn send_request_applies_autoscroll_rule() {
        let mut console = connected_console();
        let scrolls_before = console.view.scrolls;
        console.send_request("{}").expect("send should succeed");
        assert_eq!(console.view.scrolls, scrolls_before + 1);

        console.view.autoscroll = false;
        console.send_request("{}").expect("send should succeed");
        assert_eq!(console.view.scrolls, scrolls_before + 1);
    }

    // ── Request builders ────────────────────────────────────────────

    #[test]
    fn new_keychain_produces_exact_payload_and_one_send() {
        let mut console = connected_console();
        console.new_keychain("alice").expect("builder should succeed");

        assert_eq!(console.transport.sent.len(), 1);
        assert_eq!(console.transport.sent[0], r#"{"method":"newkeychain","params":["alice"],"id":0}"#);
    }

    #[test]
    fn block_header_height_is_embedded_unquoted() {
        let mut console = connected_console();
        console.get_block_header_by_height(500_000).expect("builder should succeed");
        assert_eq!(
            console.transport.sent[0],
            r#"{"method":"getblockheader","params":[500000],"id":0}"#
        );
    }

    #[test]
    fn block_header_hash_is_a_quoted_string() {
        let mut console = connected_console();
        console.get_block_header_by_hash("00000000deadbeef").expect("builder should succeed");
        assert_eq!(
            console.transport.sent[0],
            r#"{"method":"getblockheader","params":["00000000deadbeef"],"id":0}"#
        );
    }

    #[test]
    fn zero_argument_builders_omit_params() {
        let mut console = connected_console();
        console.get_vault_info().expect("builder should succeed");
        console.get_chain_tip().expect("builder should succeed");
        assert_eq!(console.transport.sent[0], r#"{"method":"getvaultinfo","id":0}"#);
        assert_eq!(console.transport.sent[1], r#"{"method":"getchaintip","id":1}"#);
    }

    #[test]
    fn rename_keychain_sends_both_params_in_order() {
        let mut console = connected_console();
        console.rename_keychain("old", "new").expect("builder should succeed");
        assert_eq!(
            console.transport.sent[0],
            r#"{"method":"renamekeychain","params":["old","new"],"id":0}"#
        );
    }

    #[test]
    fn request_ids_increase_by_one_from_zero() {
        let mut console = connected_console();
        console.get_vault_info().expect("builder should succeed");
        console.get_keychains().expect("builder should succeed");
        console.get_account_info("savings").expect("builder should succeed");
        console.get_accounts().expect("builder should succeed");

        let ids: Vec<u64> = console
            .transport
            .sent
            .iter()
            .map(|payload| {
                let value: Value = serde_json::from_str(payload).expect("payload should be JSON");
                value["id"].as_u64().expect("id should be an integer")
            })
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn builders_while_disconnected_send_nothing_and_keep_the_counter() {
        let mut console = console();
        console.get_vault_info().expect("builder should succeed");
        console.new_keychain("alice").expect("builder should succeed");
        assert!(console.transport.sent.is_empty());

        // The first request after connecting still gets id 0.
        console.connect(URL).expect("connect should succeed");
        console.on_open();
        console.get_vault_info().expect("builder should succeed");
        assert_eq!(console.transport.sent.last().map(String::as_str), Some(r#"{"method":"getvaultinfo","id":0}"#));
    }

    #[test]
    fn ids_survive_a_reconnect_without_reuse() {
        let mut console = connected_console();
        console.get_vault_info().expect("builder should succeed");

        console.connect(URL).expect("toggle should succeed");
        console.on_close();
        console.connect(URL).expect("connect should succeed");
        console.on_open();

        console.get_vault_info().expect("builder should succeed");
        assert_eq!(console.transport.sent.last().map(String::as_str), Some(r#"{"method":"getvaultinfo","id":1}"#));
    }

    #[test]
    fn builder_send_is_logged_like_any_other() {
        let mut console = connected_console();
        console.get_keychain_info("main").expect("builder should succeed");
        assert_eq!(
            console.view.log.last().map(String::as_str),
            Some(r#"Sending {"method":"getkeychaininfo","params":["main"],"id":0} ..."#)
        );
    }

    // ── Inbound messages ────────────────────────────────────────────

    #[test]
    fn message_is_pretty_printed_into_the_log() {
        let mut console = connected_console();
        console.on_message(r#"{"result":{"height":1},"id":0}"#).expect("message should parse");
        let entry = console.view.log.last().expect("log should have an entry");
        assert!(entry.contains("\n  \"result\""));
    }

    #[test]
    fn message_with_result_uri_sets_the_wallet_link() {
        let mut console = connected_console();
        console.on_message(r#"{"result":{"uri":"bitcoin:abc"}}"#).expect("message should parse");
        assert_eq!(console.view.wallet_links.last(), Some(&Some("bitcoin:abc".to_string())));
    }

    #[test]
    fn message_without_result_uri_clears_the_wallet_link() {
        let mut console = connected_console();
        console.on_message(r#"{"result":{"uri":"bitcoin:abc"}}"#).expect("message should parse");
        console.on_message(r#"{"result":{}}"#).expect("message should parse");
        assert_eq!(console.view.wallet_links.last(), Some(&None));
    }

    #[test]
    fn non_json_frame_errors_and_leaves_the_log_untouched() {
        let mut console = connected_console();
        let log_len = console.view.log.len();
        let error = console.on_message("not json").expect_err("plain text should fail");
        assert!(matches!(error, ProtocolError::Parse(_)));
        assert_eq!(console.view.log.len(), log_len);
        assert!(console.view.wallet_links.is_empty());
    }

    #[test]
    fn message_applies_autoscroll_rule() {
        let mut console = connected_console();
        console.view.autoscroll = false;
        let scrolls_before = console.view.scrolls;
        console.on_message(r#"{"id":0}"#).expect("message should parse");
        assert_eq!(console.view.scrolls, scrolls_before);
    }
}
