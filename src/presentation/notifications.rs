use crate::infrastructure::ui::Notification;

/// A notification on screen, keyed so its dismiss timer can find it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

/// Notifications currently shown, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationCenter {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notification and returns the id to dismiss it with.
    pub fn push(&mut self, notification: Notification) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.toasts.push(Toast { id, notification });
        id
    }

    /// Removes one notification; unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_removes_only_the_matching_toast() {
        let mut center = NotificationCenter::new();
        let first = center.push(Notification::success("Alert deleted"));
        let second = center.push(Notification::error("Failed to load alerts"));
        assert_ne!(first, second);

        assert!(center.dismiss(first));
        assert_eq!(center.toasts().len(), 1);
        assert_eq!(center.toasts()[0].notification.message, "Failed to load alerts");

        assert!(!center.dismiss(first));
        assert!(center.dismiss(second));
        assert!(center.is_empty());
    }
}
