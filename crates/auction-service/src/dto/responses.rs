//! Response payloads for the keep-alive HTTP surface and the bot

use serde::Serialize;

use auction_core::entities::{UserProfile, VerifiedUser};

/// Root endpoint payload
#[derive(Debug, Clone, Serialize)]
pub struct HomeResponse {
    pub message: String,
    pub status: String,
    pub uptime_seconds: f64,
    pub uptime_minutes: f64,
    pub uptime_hours: f64,
}

impl HomeResponse {
    pub fn running(uptime_seconds: f64) -> Self {
        Self {
            message: "🤖 Pokemon Auction Bot is running!".to_string(),
            status: "running".to_string(),
            uptime_seconds: round2(uptime_seconds),
            uptime_minutes: round2(uptime_seconds / 60.0),
            uptime_hours: round2(uptime_seconds / 3600.0),
        }
    }
}

/// Health check payload for external monitors
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub bot_status: String,
    pub uptime: f64,
    pub timestamp: f64,
}

impl HealthResponse {
    pub fn healthy(uptime_seconds: f64, timestamp: f64) -> Self {
        Self {
            status: "healthy".to_string(),
            bot_status: "running".to_string(),
            uptime: round2(uptime_seconds),
            timestamp,
        }
    }
}

/// Raw status payload
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub start_time: f64,
    pub uptime: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl StatusResponse {
    pub fn running(start_time: f64, uptime_seconds: f64) -> Self {
        Self {
            status: "running".to_string(),
            start_time,
            uptime: round2(uptime_seconds),
        }
    }
}

/// A user's marketplace standing: profile counters plus verification record
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub profile: UserProfile,
    pub verified: Option<VerifiedUser>,
}

impl ProfileView {
    /// Whether the user may bid and list items
    pub fn is_verified(&self) -> bool {
        self.verified.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_response_rounds_uptime() {
        let home = HomeResponse::running(3723.4567);
        assert_eq!(home.uptime_seconds, 3723.46);
        assert_eq!(home.uptime_hours, 1.03);
        assert!(home.message.contains("running"));
    }

    #[test]
    fn test_health_response_serializes() {
        let health = HealthResponse::healthy(12.0, 1_700_000_000.0);
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["bot_status"], "running");
    }
}
