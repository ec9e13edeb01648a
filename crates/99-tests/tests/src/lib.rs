//! Cross-crate scenarios for the tracked-image overlay engine.

#[cfg(test)]
mod walkthrough;

#[cfg(test)]
mod recovery_e2e;
