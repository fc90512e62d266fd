//! Poll cursor and de-duplication state owned by the engine

/// What the engine remembers between cycles. Lives only in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// `from_date` sent with each request (Unix seconds)
    pub cursor: i64,
    /// Last status message that was delivered
    pub last_report: String,
    /// Last failure diagnostic that was delivered
    pub last_error: String,
    pub cycles: u64,
}

impl PollState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    /// True if `message` differs from the last delivered report
    pub fn is_new_report(&self, message: &str) -> bool {
        self.last_report != message
    }

    /// True if `diagnostic` differs from the last delivered failure
    pub fn is_new_error(&self, diagnostic: &str) -> bool {
        self.last_error != diagnostic
    }

    pub fn record_report(&mut self, message: String) {
        self.last_report = message;
    }

    pub fn record_error(&mut self, diagnostic: String) {
        self.last_error = diagnostic;
    }

    /// Forget the last delivered failure; true if there was one
    pub fn clear_error(&mut self) -> bool {
        !std::mem::take(&mut self.last_error).is_empty()
    }

    /// Move the cursor to the server's `current_date`, ignoring values that
    /// are not integers or would move it backwards
    pub fn advance_cursor(&mut self, current_date: Option<i64>) -> bool {
        match current_date {
            Some(date) if date > self.cursor => {
                self.cursor = date;
                true
            }
            _ => false,
        }
    }
}
