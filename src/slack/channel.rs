use serde::{Deserialize, Serialize};
use std::fmt;

/// Slack refers to channels by their underlying ID, which is what slash
/// commands hand us in `channel_id`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelId(pub String);

/// Format without the surrounding newtype wrapper.
///
/// ```
/// let x = ChannelId("C0123".into());
/// assert_eq!(format!("{}", x), "C0123");
/// ```
impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
