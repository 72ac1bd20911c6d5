//! Scene-level scenarios spanning pools, frame lifecycle and queries

#[cfg(feature = "raycast")]
mod raycast_scenarios;
