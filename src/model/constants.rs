// Activity conversion
pub const MESSAGES_PER_POINT: f64 = 50.0;
pub const CALL_HOURS_PER_POINT: f64 = 1.0;
pub const DAYS_PER_WEEK: f64 = 7.0;
// Scores are stored with one decimal place
pub const SCORE_DECIMALS: i32 = 1;
pub const MIN_INDIVIDUAL_MULTIPLIER: f64 = 0.1;
pub const DEFAULT_INDIVIDUAL_MULTIPLIER: f64 = 1.0;
// Sentinel for members without a known chat-platform id
pub const UNKNOWN_EXTERNAL_ID: &str = "N/A";
// Modifier defaults
pub const RUSH_HOUR_MULTIPLIER: f64 = 1.2;
pub const WEEKEND_MULTIPLIER: f64 = 1.1;
pub const DAILY_CHALLENGE_MULTIPLIER: f64 = 1.1;
pub const WEEKLY_CHALLENGE_MULTIPLIER: f64 = 1.25;
pub const EVENT_CHALLENGE_MULTIPLIER: f64 = 1.5;
// Number of ladder ranks, counted from the floor, affected by threshold boosting
pub const DEFAULT_BOOSTED_RANKS: usize = 2;
