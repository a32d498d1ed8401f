//! Blood splatter effect: grow the stain, then decorate once

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::decor;
use super::growth::Growth;
use super::outline::build_outline;
use super::shape::SplatShape;
use crate::canvas::{Canvas, Paint, RadialGradient, Surface};
use crate::consts::*;
use crate::error::Result;
use crate::runtime::{Effect, FrameToken, Pending, Runtime};
use crate::settings::{BloodSettings, FillStyle};

/// Growing blood stain
pub struct BloodEffect {
    surface: Surface,
    center: Vec2,
    shape: SplatShape,
    growth: Growth,
    style: FillStyle,
    speckle_count: usize,
    rng: Pcg32,
    frame: Pending<FrameToken>,
    decorated: bool,
    active: bool,
}

impl BloodEffect {
    /// Generate a shape for the current surface and request the first frame
    pub fn start(rt: &mut Runtime<'_>, settings: &BloodSettings, seed: u64) -> Result<Self> {
        settings.validate()?;
        let surface = rt.canvas.surface()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let base_radius = surface.width as f32 * settings.base_radius_ratio;
        let shape = SplatShape::generate(base_radius, &mut rng);

        let mut effect = Self {
            surface,
            center: surface.center(),
            shape,
            growth: Growth::new(settings.growth_ms),
            style: settings.style,
            speckle_count: settings.speckle_count,
            rng,
            frame: Pending::default(),
            decorated: false,
            active: true,
        };
        effect.frame.set(rt.scheduler.schedule_frame());

        log::info!(
            "blood effect started ({}, {}x{}, seed {})",
            settings.style.as_str(),
            surface.width,
            surface.height,
            seed
        );
        Ok(effect)
    }

    pub fn shape(&self) -> &SplatShape {
        &self.shape
    }

    pub fn growth(&self) -> &Growth {
        &self.growth
    }

    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    fn stain_paint(&self) -> Paint {
        let base = self.shape.base_radius();
        match self.style {
            FillStyle::Gradient => Paint::Radial(
                RadialGradient::concentric(self.center, base * 0.05, base * 2.2)
                    .stop(0.0, STAIN_CORE)
                    .stop(0.55, STAIN_BODY)
                    .stop(1.0, STAIN_RIM),
            ),
            FillStyle::Flat => Paint::Solid(STAIN_BODY),
        }
    }

    fn decorate(&mut self, canvas: &mut dyn Canvas) {
        if self.decorated {
            return;
        }
        self.decorated = true;

        let drops = decor::droplets(&self.shape, self.center, &mut self.rng);
        let dots = decor::speckles(
            self.surface,
            self.shape.base_radius(),
            self.speckle_count,
            &mut self.rng,
        );
        log::debug!("decoration: {} droplets, {} speckles", drops.len(), dots.len());
        decor::draw(canvas, &drops, &dots);
    }
}

impl Effect for BloodEffect {
    fn name(&self) -> &'static str {
        match self.style {
            FillStyle::Gradient => "blood",
            FillStyle::Flat => "blood-flat",
        }
    }

    fn on_frame(&mut self, token: FrameToken, timestamp_ms: f64, rt: &mut Runtime<'_>) {
        if !self.frame.accept(token) {
            log::trace!("blood: ignoring stale frame {:?}", token);
            return;
        }

        let frame = self.growth.advance(timestamp_ms);
        let bumps = self.shape.interpolated(frame.eased);
        let path = build_outline(self.center, self.shape.base_radius(), &bumps);

        rt.canvas.clear();
        rt.canvas.fill_path(&path, &self.stain_paint());

        if frame.completed {
            log::info!("blood stain grown in {:.0}ms", frame.elapsed_ms);
            self.active = false;
            if self.style.decorates() {
                self.decorate(&mut *rt.canvas);
            }
        } else {
            self.frame.set(rt.scheduler.schedule_frame());
        }
    }

    fn cleanup(&mut self, rt: &mut Runtime<'_>) {
        if let Some(token) = self.frame.take() {
            rt.scheduler.cancel_frame(token);
        }
        if self.active {
            log::info!("blood effect stopped");
        }
        self.active = false;
        rt.canvas.clear();
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawCommand;
    use crate::error::EffectError;
    use crate::platform::VirtualHost;

    fn settings(style: FillStyle) -> BloodSettings {
        BloodSettings {
            style,
            ..BloodSettings::default()
        }
    }

    fn start(host: &mut VirtualHost, style: FillStyle, seed: u64) -> BloodEffect {
        BloodEffect::start(&mut host.runtime(), &settings(style), seed).expect("valid surface")
    }

    fn count_fills(commands: &[DrawCommand]) -> (usize, usize) {
        commands.iter().fold((0, 0), |(paths, circles), c| match c {
            DrawCommand::FillPath { .. } => (paths + 1, circles),
            DrawCommand::FillCircle { .. } => (paths, circles + 1),
            DrawCommand::ClearRect { .. } => (paths, circles),
        })
    }

    #[test]
    fn test_gradient_grows_then_decorates_once() {
        let mut host = VirtualHost::new(600, 600);
        let mut blood = start(&mut host, FillStyle::Gradient, 3);
        assert_eq!(blood.name(), "blood");
        assert!((blood.shape().base_radius() - 100.0).abs() < 1e-4);

        assert!(host.run_until_idle(&mut blood, 2000.0));
        assert!(!blood.is_active());
        assert!(blood.growth().is_finished());
        assert!(blood.is_decorated());

        let last_frame = host.canvas.since_last_clear();
        assert!(matches!(
            &last_frame[0],
            DrawCommand::FillPath { paint: Paint::Radial(_), .. }
        ));
        let (paths, circles) = count_fills(last_frame);
        // Stain plus at least one droplet per spike
        let shape = blood.shape();
        let spikes = shape.bumps().iter().filter(|b| shape.is_spike(b)).count();
        assert!(spikes > 0);
        assert!(paths > spikes);
        assert!(circles > 0);
    }

    #[test]
    fn test_flat_style_skips_decoration() {
        let mut host = VirtualHost::new(600, 600);
        let mut blood = start(&mut host, FillStyle::Flat, 3);
        assert_eq!(blood.name(), "blood-flat");

        assert!(host.run_until_idle(&mut blood, 2000.0));
        assert!(!blood.is_decorated());
        let last_frame = host.canvas.since_last_clear();
        assert_eq!(last_frame.len(), 1);
        assert!(matches!(
            &last_frame[0],
            DrawCommand::FillPath { paint: Paint::Solid(c), .. } if *c == STAIN_BODY
        ));
    }

    #[test]
    fn test_first_frame_starts_at_base_circle() {
        let mut host = VirtualHost::new(600, 600);
        let mut blood = start(&mut host, FillStyle::Gradient, 5);
        host.step(&mut blood);

        assert!(matches!(
            blood.growth().phase(),
            crate::splat::GrowthPhase::Running { .. }
        ));
        let base = blood.shape().base_radius();
        let Some(DrawCommand::FillPath { path, .. }) = host.canvas.since_last_clear().first() else {
            panic!("first frame draws the outline");
        };
        // Every on-curve point sits on or inside the base circle
        for p in path.points() {
            assert!(p.distance(Vec2::new(300.0, 300.0)) <= base + 1e-3);
        }
    }

    #[test]
    fn test_duration_holds_on_slow_display() {
        let mut host = VirtualHost::new(600, 600).with_frame_interval(50.0);
        let mut blood = start(&mut host, FillStyle::Gradient, 9);
        assert!(host.run_until_idle(&mut blood, 2000.0));
        // First frame at 50ms starts the clock
        assert!(host.now_ms() >= 50.0 + GROWTH_DURATION_MS);
        assert!(host.frames_delivered() >= 7);
    }

    #[test]
    fn test_cleanup_mid_growth() {
        let mut host = VirtualHost::new(600, 600);
        let mut blood = start(&mut host, FillStyle::Gradient, 11);
        host.advance(&mut blood, 100.0);
        assert!(blood.is_active());

        blood.cleanup(&mut host.runtime());
        assert!(!blood.is_active());
        assert!(host.scheduler.is_idle());
        assert!(host.canvas.is_cleared());

        let commands = host.canvas.commands().len();
        host.advance(&mut blood, 1000.0);
        assert_eq!(host.canvas.commands().len(), commands);
        assert!(!blood.is_decorated());

        blood.cleanup(&mut host.runtime());
        assert!(host.canvas.is_cleared());
    }

    #[test]
    fn test_rejects_empty_surface() {
        let mut host = VirtualHost::new(600, 0);
        let result = BloodEffect::start(&mut host.runtime(), &BloodSettings::default(), 1);
        assert!(matches!(result, Err(EffectError::InvalidSurface { .. })));
        assert!(host.scheduler.is_idle());
    }

    #[test]
    fn test_same_seed_same_drawing() {
        let run = |seed| {
            let mut host = VirtualHost::new(640, 480);
            let mut blood = start(&mut host, FillStyle::Gradient, seed);
            host.run_until_idle(&mut blood, 2000.0);
            host.canvas.take_commands()
        };
        assert_eq!(run(77), run(77));
        assert_ne!(run(77), run(78));
    }
}
