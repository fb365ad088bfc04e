// View seam for the console's UI collaborators.
//
// The original operator surface is a form: a status line, a scrollable
// log, a connect/disconnect toggle, an autoscroll setting, and a region
// showing a wallet-request link. The console drives those collaborators
// through this trait; the terminal front end and the tests each provide
// their own implementation.

/// UI collaborators of the connection console.
pub trait ConsoleView {
    /// Append one entry to the log.
    fn append_log(&mut self, line: &str);
    /// Replace the status line.
    fn set_status(&mut self, text: &str);
    /// Relabel the connect/disconnect toggle.
    fn set_toggle_label(&mut self, label: &str);
    /// Show `Some(uri)` as the wallet link, or clear the region.
    fn set_wallet_link(&mut self, uri: Option<&str>);
    /// Whether the log should follow its newest entry.
    fn autoscroll(&self) -> bool;
    /// Scroll the log to its end.
    fn scroll_to_end(&mut self);
}

/// Terminal-backed view: log and status lines go to stdout.
pub struct TermView {
    autoscroll: bool,
    status: String,
    toggle_label: String,
}

impl TermView {
    pub fn new(autoscroll: bool) -> Self {
        Self { autoscroll, status: String::new(), toggle_label: "Connect".to_string() }
    }

    pub fn set_autoscroll(&mut self, enabled: bool) {
        self.autoscroll = enabled;
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// What the connect toggle would do right now ("Connect"/"Disconnect").
    pub fn toggle_label(&self) -> &str {
        &self.toggle_label
    }
}

impl ConsoleView for TermView {
    fn append_log(&mut self, line: &str) {
        println!("{line}\n");
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
        println!("* {text}");
    }

    fn set_toggle_label(&mut self, label: &str) {
        self.toggle_label = label.to_string();
    }

    fn set_wallet_link(&mut self, uri: Option<&str>) {
        if let Some(uri) = uri {
            println!("Request from local wallet: {uri}");
        }
    }

    fn autoscroll(&self) -> bool {
        self.autoscroll
    }

    fn scroll_to_end(&mut self) {
        // A terminal already follows the newest line.
    }
}
