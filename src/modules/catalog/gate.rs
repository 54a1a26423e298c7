//! Passcode gate in front of the add/remove operations.
//!
//! The secret is static and visible to anyone holding the configuration, so
//! this is a convenience gate and not an access-control boundary.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Granted,
    Rejected,
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: String,
    entered: String,
    granted: bool,
    error_flag: bool,
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            entered: String::new(),
            granted: false,
            error_flag: false,
        }
    }

    /// Replace the code typed so far.
    pub fn enter(&mut self, code: impl Into<String>) {
        self.entered = code.into();
    }

    pub fn entered(&self) -> &str {
        &self.entered
    }

    /// Check the entered code. The entered code is cleared either way.
    ///
    /// On mismatch the error flag is raised; the caller owns clearing it
    /// after the display delay.
    pub fn submit(&mut self) -> GateOutcome {
        let code = std::mem::take(&mut self.entered);

        if code == self.secret {
            self.granted = true;
            self.error_flag = false;
            tracing::info!("admin access granted");
            GateOutcome::Granted
        } else {
            self.error_flag = true;
            tracing::warn!("admin passcode rejected");
            GateOutcome::Rejected
        }
    }

    /// Enter and submit in one step.
    pub fn submit_code(&mut self, code: impl Into<String>) -> GateOutcome {
        self.enter(code);
        self.submit()
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }

    pub fn error_flag(&self) -> bool {
        self.error_flag
    }

    pub fn clear_error(&mut self) {
        self.error_flag = false;
    }

    /// Close the admin surface, dropping access.
    pub fn close(&mut self) {
        self.granted = false;
        self.entered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_secret_grants_access() {
        let mut gate = AccessGate::new("122333");
        gate.enter("122333");

        assert_eq!(gate.submit(), GateOutcome::Granted);
        assert!(gate.is_granted());
        assert!(!gate.error_flag());
        assert_eq!(gate.entered(), "");
    }

    #[test]
    fn any_other_code_is_rejected_and_cleared() {
        for attempt in ["", "12233", "1223334", " 122333", "١٢٢٣٣٣"] {
            let mut gate = AccessGate::new("122333");
            assert_eq!(gate.submit_code(attempt), GateOutcome::Rejected);
            assert!(!gate.is_granted());
            assert!(gate.error_flag());
            assert_eq!(gate.entered(), "");
        }
    }

    #[test]
    fn success_after_failure_clears_flag() {
        let mut gate = AccessGate::new("122333");
        gate.submit_code("000000");
        assert!(gate.error_flag());

        assert_eq!(gate.submit_code("122333"), GateOutcome::Granted);
        assert!(!gate.error_flag());
    }

    #[test]
    fn close_revokes_access() {
        let mut gate = AccessGate::new("122333");
        gate.submit_code("122333");
        gate.close();
        assert!(!gate.is_granted());
    }

    #[test]
    fn clear_error_is_idempotent() {
        let mut gate = AccessGate::new("122333");
        gate.submit_code("nope");
        gate.clear_error();
        gate.clear_error();
        assert!(!gate.error_flag());
    }
}
