pub mod chat;
pub mod formatters;
pub mod oauth;
pub mod social;

pub use chat::{ChatChannel, Delivery};
pub use social::{PostOutcome, RateLimitWindow, SocialChannel, TWITTER_API_BASE};
