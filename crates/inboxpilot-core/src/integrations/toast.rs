//! Desktop toast notifications.

use notify_rust::Notification;

use super::traits::NotificationChannel;

pub struct DesktopToast;

impl NotificationChannel for DesktopToast {
    fn name(&self) -> &str {
        "toast"
    }

    fn send(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error>> {
        Notification::new()
            .summary(title)
            .body(body)
            .appname("inboxpilot")
            .timeout(10_000)
            .show()?;
        Ok(())
    }
}
