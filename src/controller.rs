//! Effect selection: at most one effect runs on a surface at a time

use crate::error::{EffectError, Result};
use crate::heal::HealEffect;
use crate::runtime::{Effect, EffectHandle, FrameToken, Runtime, TimerToken};
use crate::settings::{FillStyle, Settings};
use crate::splat::BloodEffect;

/// Selectable effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Heal,
    Blood,
    BloodFlat,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Heal, EffectKind::Blood, EffectKind::BloodFlat];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::Heal => "heal",
            EffectKind::Blood => "blood",
            EffectKind::BloodFlat => "blood-flat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "heal" => Some(EffectKind::Heal),
            "blood" => Some(EffectKind::Blood),
            "blood-flat" => Some(EffectKind::BloodFlat),
            _ => None,
        }
    }
}

/// Owns the running effect and routes host callbacks to it
pub struct EffectController {
    settings: Settings,
    active: Option<EffectHandle>,
    next_seed: u64,
}

impl EffectController {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            settings,
            active: None,
            next_seed: seed,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Stop whatever is running, then start `kind`. Each start draws a fresh
    /// seed so repeated starts give different stains.
    pub fn start(&mut self, kind: EffectKind, rt: &mut Runtime<'_>) -> Result<()> {
        self.stop(rt);

        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);

        let effect: EffectHandle = match kind {
            EffectKind::Heal => Box::new(HealEffect::start(rt, &self.settings.heal, seed)?),
            EffectKind::Blood | EffectKind::BloodFlat => {
                let mut blood = self.settings.blood.clone();
                blood.style = if kind == EffectKind::Blood {
                    FillStyle::Gradient
                } else {
                    FillStyle::Flat
                };
                Box::new(BloodEffect::start(rt, &blood, seed)?)
            }
        };

        log::info!("switched to {}", kind.as_str());
        self.active = Some(effect);
        Ok(())
    }

    pub fn start_by_name(&mut self, name: &str, rt: &mut Runtime<'_>) -> Result<()> {
        let kind =
            EffectKind::from_str(name).ok_or_else(|| EffectError::UnknownEffect(name.to_string()))?;
        self.start(kind, rt)
    }

    /// Clean up the running effect, if any
    pub fn stop(&mut self, rt: &mut Runtime<'_>) {
        if let Some(mut effect) = self.active.take() {
            effect.cleanup(rt);
        }
    }

    /// Name of the most recently started effect, even once it has settled
    pub fn active_name(&self) -> Option<&'static str> {
        self.active.as_ref().map(|e| e.name())
    }

    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|e| e.is_active())
    }
}

/// Hosts drive the controller like any single effect
impl Effect for EffectController {
    fn name(&self) -> &'static str {
        self.active_name().unwrap_or("none")
    }

    fn on_frame(&mut self, token: FrameToken, timestamp_ms: f64, rt: &mut Runtime<'_>) {
        if let Some(effect) = self.active.as_mut() {
            effect.on_frame(token, timestamp_ms, rt);
        }
    }

    fn on_timer(&mut self, token: TimerToken, rt: &mut Runtime<'_>) {
        if let Some(effect) = self.active.as_mut() {
            effect.on_timer(token, rt);
        }
    }

    fn cleanup(&mut self, rt: &mut Runtime<'_>) {
        self.stop(rt);
    }

    fn is_active(&self) -> bool {
        self.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::VirtualHost;

    #[test]
    fn test_kind_names() {
        for kind in EffectKind::ALL {
            assert_eq!(EffectKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(EffectKind::from_str("fire"), None);
    }

    #[test]
    fn test_switching_cleans_up_previous() {
        let mut host = VirtualHost::new(600, 400);
        let mut controller = EffectController::new(Settings::default(), 1);

        controller.start(EffectKind::Heal, &mut host.runtime()).expect("start heal");
        host.advance(&mut controller, 500.0);
        assert_eq!(host.scheduler.active_timers(), 1);

        controller.start(EffectKind::Blood, &mut host.runtime()).expect("start blood");
        assert_eq!(controller.active_name(), Some("blood"));
        // Heal's timer is gone; only blood's frame is pending
        assert_eq!(host.scheduler.active_timers(), 0);
        assert_eq!(host.scheduler.pending_frames(), 1);

        assert!(host.run_until_idle(&mut controller, 5000.0));
        assert!(!controller.is_running());
        assert_eq!(controller.active_name(), Some("blood"));
    }

    #[test]
    fn test_start_by_name() {
        let mut host = VirtualHost::new(600, 400);
        let mut controller = EffectController::new(Settings::default(), 1);
        controller
            .start_by_name("blood-flat", &mut host.runtime())
            .expect("known effect");
        assert_eq!(controller.active_name(), Some("blood-flat"));

        let err = controller.start_by_name("smoke", &mut host.runtime());
        assert!(matches!(err, Err(EffectError::UnknownEffect(name)) if name == "smoke"));
        // The previous effect keeps running
        assert!(controller.is_running());
    }

    #[test]
    fn test_stop_clears_and_goes_idle() {
        let mut host = VirtualHost::new(600, 400);
        let mut controller = EffectController::new(Settings::default(), 1);
        controller.start(EffectKind::Heal, &mut host.runtime()).expect("start heal");
        host.advance(&mut controller, 300.0);

        controller.stop(&mut host.runtime());
        assert!(controller.active_name().is_none());
        assert!(host.scheduler.is_idle());
        assert!(host.canvas.is_cleared());

        // Stopping with nothing running is a no-op
        controller.stop(&mut host.runtime());
    }

    #[test]
    fn test_failed_start_leaves_nothing_running() {
        let mut host = VirtualHost::new(0, 0);
        let mut controller = EffectController::new(Settings::default(), 1);
        assert!(controller.start(EffectKind::Heal, &mut host.runtime()).is_err());
        assert!(controller.active_name().is_none());
        assert!(host.scheduler.is_idle());
    }

    #[test]
    fn test_each_start_uses_fresh_seed() {
        let mut host = VirtualHost::new(600, 400);
        let mut controller = EffectController::new(Settings::default(), 10);
        controller.start(EffectKind::BloodFlat, &mut host.runtime()).expect("start");
        host.run_until_idle(&mut controller, 2000.0);
        let first = host.canvas.since_last_clear().to_vec();

        controller.start(EffectKind::BloodFlat, &mut host.runtime()).expect("start");
        host.run_until_idle(&mut controller, 5000.0);
        assert_ne!(host.canvas.since_last_clear(), first.as_slice());
    }
}
