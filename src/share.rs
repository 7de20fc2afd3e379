use crate::config::ShareConfig;
use crate::error::ShareActionError;
use crate::post::ShareTarget;

const TWITTER_INTENT_URL: &str = "https://twitter.com/intent/tweet";
const WHATSAPP_SHARE_URL: &str = "https://wa.me/";

/// Capability to hand a URL to the host (browser, mail client, ...).
pub trait Launcher: Send + Sync {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Opens URLs with the system default handler.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open(&self, url: &str) -> std::io::Result<()> {
        open::that_detached(url)
    }
}

pub struct ShareDispatcher {
    launcher: Box<dyn Launcher>,
    config: ShareConfig,
}

impl ShareDispatcher {
    pub fn new(config: ShareConfig, launcher: Box<dyn Launcher>) -> Self {
        Self { launcher, config }
    }

    pub fn system(config: ShareConfig) -> Self {
        Self::new(config, Box::new(SystemLauncher))
    }

    /// Build the destination for a share action.
    ///
    /// Instagram has no text intent, so the payload is not embedded there.
    pub fn share_url(&self, target: ShareTarget, payload: &str) -> String {
        match target {
            ShareTarget::Instagram => self.config.instagram_url.clone(),
            ShareTarget::Twitter => {
                format!("{}?text={}", TWITTER_INTENT_URL, urlencoding::encode(payload))
            }
            ShareTarget::Whatsapp => {
                format!("{}?text={}", WHATSAPP_SHARE_URL, urlencoding::encode(payload))
            }
            ShareTarget::Email => format!(
                "mailto:?subject={}&body={}",
                urlencoding::encode(&self.config.email_subject),
                urlencoding::encode(payload)
            ),
        }
    }

    /// Fire-and-forget: a failed open is logged and reported back, never retried.
    pub fn share(&self, target: ShareTarget, payload: &str) -> Result<String, ShareActionError> {
        let url = self.share_url(target, payload);
        tracing::info!(platform = %target, "opening share destination");

        match self.launcher.open(&url) {
            Ok(()) => Ok(url),
            Err(source) => {
                let err = ShareActionError { url, source };
                tracing::warn!(platform = %target, error = %err, "share action failed");
                Err(err)
            }
        }
    }
}
