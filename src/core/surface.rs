//! Rendering surface abstraction
//!
//! The controller never touches a concrete UI. It reads the input and drives
//! the marker, the submission control and the notification container through
//! [`RenderingSurface`].

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::models::{ControlAppearance, Notification, NotificationId};

/// Stable ids of the elements the controller binds to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementIds {
    pub form: String,
    pub input: String,
    pub control: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            form: "downloadForm".to_string(),
            input: "videoUrl".to_string(),
            control: "downloadBtn".to_string(),
        }
    }
}

impl ElementIds {
    pub fn all(&self) -> [&str; 3] {
        [&self.form, &self.input, &self.control]
    }
}

pub trait RenderingSurface: Send + Sync {
    /// Whether an element with this id exists
    fn has_element(&self, id: &str) -> bool;

    /// Current value of the URL input
    fn input_value(&self) -> String;

    fn clear_input(&self);

    /// Whether the URL input has keyboard focus
    fn input_focused(&self) -> bool;

    fn blur_input(&self);

    /// Toggle the "invalid" marker on the URL input
    fn set_input_invalid(&self, invalid: bool);

    fn set_control(&self, appearance: ControlAppearance);

    /// Insert a notification element immediately before the form
    fn insert_notification(&self, id: NotificationId, notification: &Notification);

    /// Remove a notification element; unknown ids are ignored
    fn remove_notification(&self, id: NotificationId);
}

#[derive(Debug, Clone)]
struct MemoryState {
    elements: Vec<String>,
    input: String,
    input_focused: bool,
    input_invalid: bool,
    control: ControlAppearance,
    notifications: Vec<(NotificationId, Notification)>,
    peak_notifications: usize,
}

/// In-process surface that records every change
#[derive(Debug)]
pub struct MemorySurface {
    state: Mutex<MemoryState>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new(&ElementIds::default())
    }
}

impl MemorySurface {
    pub fn new(ids: &ElementIds) -> Self {
        Self::with_elements(ids.all().iter().map(|id| id.to_string()).collect())
    }

    pub fn with_elements(elements: Vec<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                elements,
                input: String::new(),
                input_focused: false,
                input_invalid: false,
                control: ControlAppearance::Ready,
                notifications: Vec::new(),
                peak_notifications: 0,
            }),
        }
    }

    /// Simulate the user typing or pasting into the input
    pub fn set_input(&self, value: impl Into<String>) {
        self.state.lock().input = value.into();
    }

    /// Simulate the user clicking into the input
    pub fn focus_input(&self) {
        self.state.lock().input_focused = true;
    }

    pub fn is_input_invalid(&self) -> bool {
        self.state.lock().input_invalid
    }

    pub fn control(&self) -> ControlAppearance {
        self.state.lock().control
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state
            .lock()
            .notifications
            .iter()
            .map(|(_, n)| n.clone())
            .collect()
    }

    pub fn current_notification(&self) -> Option<Notification> {
        self.state
            .lock()
            .notifications
            .last()
            .map(|(_, n)| n.clone())
    }

    /// Largest number of notifications ever shown at once
    pub fn peak_notifications(&self) -> usize {
        self.state.lock().peak_notifications
    }
}

impl RenderingSurface for MemorySurface {
    fn has_element(&self, id: &str) -> bool {
        self.state.lock().elements.iter().any(|e| e == id)
    }

    fn input_value(&self) -> String {
        self.state.lock().input.clone()
    }

    fn clear_input(&self) {
        self.state.lock().input.clear();
    }

    fn input_focused(&self) -> bool {
        self.state.lock().input_focused
    }

    fn blur_input(&self) {
        self.state.lock().input_focused = false;
    }

    fn set_input_invalid(&self, invalid: bool) {
        self.state.lock().input_invalid = invalid;
    }

    fn set_control(&self, appearance: ControlAppearance) {
        self.state.lock().control = appearance;
    }

    fn insert_notification(&self, id: NotificationId, notification: &Notification) {
        let mut state = self.state.lock();
        state.notifications.push((id, notification.clone()));
        state.peak_notifications = state.peak_notifications.max(state.notifications.len());
    }

    fn remove_notification(&self, id: NotificationId) {
        self.state
            .lock()
            .notifications
            .retain(|(existing, _)| *existing != id);
    }
}
