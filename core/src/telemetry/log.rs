use log::{info, trace};
use std::fmt;

pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    /// Per-block detail; arguments are only formatted when trace logging is on.
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        trace!(target: self.target, "{}", args);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("cpfskcore")
    }
}
