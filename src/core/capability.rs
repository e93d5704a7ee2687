//! Client capability detection
//!
//! Decides whether the client should use the asynchronous fetch-and-save
//! strategy instead of a native form navigation.

/// Markers identifying mobile user agents
pub const DEFAULT_MOBILE_MARKERS: &[&str] = &[
    "Android",
    "webOS",
    "iPhone",
    "iPad",
    "iPod",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
];

pub trait CapabilityDetector: Send + Sync {
    /// True when the client needs the asynchronous retrieval strategy
    fn is_async_capable(&self) -> bool;
}

/// Sniffs the user-agent string for mobile platform markers
#[derive(Debug, Clone)]
pub struct UserAgentDetector {
    user_agent: String,
    markers: Vec<String>,
}

impl UserAgentDetector {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self::with_markers(
            user_agent,
            DEFAULT_MOBILE_MARKERS.iter().map(|m| m.to_string()).collect(),
        )
    }

    pub fn with_markers(user_agent: impl Into<String>, markers: Vec<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            markers,
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn is_mobile(&self) -> bool {
        let agent = self.user_agent.to_lowercase();
        self.markers
            .iter()
            .any(|marker| agent.contains(&marker.to_lowercase()))
    }
}

impl CapabilityDetector for UserAgentDetector {
    fn is_async_capable(&self) -> bool {
        self.is_mobile()
    }
}

/// Fixed answer, for hosts that already know the client kind
#[derive(Debug, Clone, Copy)]
pub struct StaticCapability(pub bool);

impl CapabilityDetector for StaticCapability {
    fn is_async_capable(&self) -> bool {
        self.0
    }
}
