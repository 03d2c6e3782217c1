pub mod calendar;
pub mod gmail;
pub mod google;
pub mod notion;
pub mod oauth;
pub mod ollama;
pub mod toast;
pub mod traits;
pub mod webhook;

pub use traits::{
    CalendarService, ClassificationOracle, InboxMessage, InboxReader, NotificationChannel,
    TrackingMirror,
};

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "inboxpilot";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Drive one reqwest future to completion from a sync integration
/// method. The CLI host has no ambient tokio runtime, so each call
/// runs on a throwaway current-thread runtime.
pub(crate) fn block_on<F: std::future::Future>(fut: F) -> Result<F::Output, std::io::Error> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(rt.block_on(fut))
}
