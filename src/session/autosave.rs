use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// When the autosave timer is (re)armed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub(crate) enum AutosavePolicy {
    /// Armed by the first edit of a dirty window; later edits do not move the deadline.
    #[default]
    FixedOrigin,
    /// Every edit pushes the deadline back by the full delay.
    Debounce,
}

/// A browser timeout the caller should start. A request replaces any previous one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TimerRequest {
    pub token: u64,
    pub delay_ms: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ArmedTimer {
    token: u64,
    deadline_ms: i64,
}

/// Single-shot autosave timer bookkeeping.
///
/// The scheduler never touches the browser; it hands out [`TimerRequest`]s and
/// validates the token a fired timeout reports back. A timeout whose token is not
/// the armed one (cancelled, superseded, or from a previous document) is ignored.
#[derive(Clone, Debug)]
pub(crate) struct AutosaveScheduler {
    policy: AutosavePolicy,
    delay_ms: u32,
    armed: Option<ArmedTimer>,
    next_token: u64,
}

impl AutosaveScheduler {
    pub fn new(policy: AutosavePolicy, delay_ms: u32) -> Self {
        Self {
            policy,
            delay_ms,
            armed: None,
            next_token: 1,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    #[cfg(test)]
    pub fn deadline_ms(&self) -> Option<i64> {
        self.armed.map(|a| a.deadline_ms)
    }

    /// Record an edit at `now_ms`. Returns a timer to start, if any.
    pub fn on_edit(&mut self, now_ms: i64) -> Option<TimerRequest> {
        if self.policy == AutosavePolicy::FixedOrigin && self.armed.is_some() {
            return None;
        }

        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);
        self.armed = Some(ArmedTimer {
            token,
            deadline_ms: now_ms + i64::from(self.delay_ms),
        });

        Some(TimerRequest {
            token,
            delay_ms: self.delay_ms,
        })
    }

    /// A timeout fired. Returns true (and disarms) only for the armed token.
    pub fn on_fire(&mut self, token: u64) -> bool {
        match self.armed {
            Some(a) if a.token == token => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }

    /// Disarm. Returns true if a timer was armed.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }
}
