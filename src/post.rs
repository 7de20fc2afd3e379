use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Instagram,
    Twitter,
    Whatsapp,
    Email,
}

/// Share actions target the same channels posts are generated for.
pub type ShareTarget = Platform;

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Twitter,
        Platform::Whatsapp,
        Platform::Email,
    ];

    /// Identifier sent to the generator as `post_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Whatsapp => "whatsapp",
            Platform::Email => "email",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
            Platform::Whatsapp => "WhatsApp",
            Platform::Email => "Email",
        }
    }

    pub fn next(self) -> Platform {
        match self {
            Platform::Instagram => Platform::Twitter,
            Platform::Twitter => Platform::Whatsapp,
            Platform::Whatsapp => Platform::Email,
            Platform::Email => Platform::Instagram,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "twitter" | "x" => Ok(Platform::Twitter),
            "whatsapp" => Ok(Platform::Whatsapp),
            "email" | "mail" => Ok(Platform::Email),
            other => Err(anyhow::anyhow!("Unknown platform: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub platform: Platform,
}

impl PostDraft {
    pub fn new(text: impl Into<String>, platform: Platform) -> Self {
        Self {
            text: text.into(),
            platform,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPost {
    pub text: String,
    pub platform: Platform,
    pub generated_at: Timestamp,
}

impl GeneratedPost {
    pub fn new(text: impl Into<String>, platform: Platform) -> Self {
        Self {
            text: text.into(),
            platform,
            generated_at: Timestamp::now(),
        }
    }
}

/// Record collected by the contact form and shown on the landing pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtisanContact {
    pub artisan_name: String,
    pub phone_num: String,
    pub email: String,
    pub shop_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("Twitter".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!(" whatsapp ".parse::<Platform>().unwrap(), Platform::Whatsapp);
        assert_eq!("mail".parse::<Platform>().unwrap(), Platform::Email);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_cycle_visits_all() {
        let mut platform = Platform::Instagram;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(platform);
            platform = platform.next();
        }
        assert_eq!(seen, Platform::ALL.to_vec());
        assert_eq!(platform, Platform::Instagram);
    }

    #[test]
    fn test_platform_serializes_lowercase() {
        let json = serde_json::to_string(&Platform::Whatsapp).unwrap();
        assert_eq!(json, "\"whatsapp\"");
    }

    #[test]
    fn test_blank_draft() {
        assert!(PostDraft::new("  \n ", Platform::Email).is_blank());
        assert!(!PostDraft::new("clay pots", Platform::Email).is_blank());
    }
}
