/// Configures the reqwest-backed transport.
///
/// Every field defaults to `None`, which leaves the decision to reqwest.
/// The executor itself never sets a deadline.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TransportOptions {
    /// Whole-request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds. Ignored on wasm32.
    pub connect_timeout_ms: Option<u64>,
    /// Overrides the `User-Agent` header sent with every request.
    pub user_agent: Option<String>,
}

impl TransportOptions {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_connect_timeout_ms(mut self, connect_timeout_ms: u64) -> Self {
        self.connect_timeout_ms = Some(connect_timeout_ms);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::TransportOptions;

    #[test]
    fn defaults_leave_everything_to_transport() {
        let opts = TransportOptions::default();
        assert_eq!(opts.timeout_ms, None);
        assert_eq!(opts.connect_timeout_ms, None);
        assert_eq!(opts.user_agent, None);
    }

    #[test]
    fn builders_set_fields() {
        let opts = TransportOptions::default()
            .with_timeout_ms(500)
            .with_connect_timeout_ms(100)
            .with_user_agent("executor-test/1.0");
        assert_eq!(opts.timeout_ms, Some(500));
        assert_eq!(opts.connect_timeout_ms, Some(100));
        assert_eq!(opts.user_agent.as_deref(), Some("executor-test/1.0"));
    }
}
