//! Contribution charts: fetched as SVG from a third-party renderer, then
//! rasterised locally so Slack will display them inline.

pub mod convert;
pub mod fetch;
