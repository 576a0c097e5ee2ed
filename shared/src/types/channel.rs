//! Delivery channel types

use serde::{Deserialize, Serialize};

/// Delivery medium for a one-time code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Channel {
    /// Code sent to an email address
    Email,
    /// Code sent by SMS to a phone number
    Sms,
    /// Code sent over WhatsApp to a phone number
    Whatsapp,
}

impl Channel {
    /// Whether the channel delivers to a phone number
    pub fn is_phone(&self) -> bool {
        matches!(self, Channel::Sms | Channel::Whatsapp)
    }

    /// Get the channel identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Whatsapp => "whatsapp",
        }
    }
}

impl Default for Channel {
    fn default() -> Self {
        Channel::Email
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" | "mail" => Ok(Channel::Email),
            "sms" | "text" => Ok(Channel::Sms),
            "whatsapp" | "wa" => Ok(Channel::Whatsapp),
            _ => Err(format!("Invalid channel: {}", s)),
        }
    }
}
