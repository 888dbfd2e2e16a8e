//! Self-expiring client-side effects

pub mod ephemeral;
pub mod timers;

pub use ephemeral::{EffectHandle, EffectKind, EffectList, EphemeralEffect};
pub use timers::TimerSet;
