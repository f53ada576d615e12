//! The simulation core: actor physics, the scrolling obstacle, collision
//! geometry, scoring, and the per-frame orchestration that ties them
//! together. Everything here is deterministic given the session's RNG seed
//! and the sequence of jump commands.

use crate::config::{EdgePolicy, FLOOR_CLAMP_INSET, SessionConfig};
use crate::policy::{DecisionPolicy, Features};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// A controllable bird. Horizontal position is fixed per session; only the
/// vertical axis is simulated.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub y: f64,
    pub velocity: f64,
    pub alive: bool,
}

impl Actor {
    fn spawn(config: &SessionConfig) -> Self {
        Self {
            y: config.height / 2.0,
            velocity: 0.0,
            alive: true,
        }
    }
}

/// The single live pipe pair: a top rectangle down to `gap_top` and a
/// bottom rectangle up from `gap_top + gap_height`.
#[derive(Debug, Clone, Copy)]
pub struct Pipe {
    pub x: f64,
    pub gap_top: f64,
    /// Set once per instance when the trailing edge crosses the bird
    /// column, so a pass scores exactly one point.
    pub passed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    NotStarted,
    Running,
    Paused,
    Ended,
}

/// Pipe-body intersection test: AABB of the bird against the two solid
/// regions. Pure function of its arguments.
pub fn hits_pipe(x: f64, y: f64, radius: f64, pipe: &Pipe, pipe_width: f64, gap_height: f64) -> bool {
    let overlap_x = x + radius > pipe.x && x - radius < pipe.x + pipe_width;
    let in_solid = y - radius < pipe.gap_top || y + radius > pipe.gap_top + gap_height;
    overlap_x && in_solid
}

/// Floor/ceiling contact. Pure.
pub fn out_of_bounds(y: f64, radius: f64, height: f64) -> bool {
    y + radius >= height || y - radius <= 0.0
}

/// Full collision test for the lethal-edge variant: pipe contact or any
/// screen-edge contact, whichever comes first.
pub fn collided(
    x: f64,
    y: f64,
    radius: f64,
    pipe: &Pipe,
    pipe_width: f64,
    gap_height: f64,
    height: f64,
) -> bool {
    hits_pipe(x, y, radius, pipe, pipe_width, gap_height) || out_of_bounds(y, radius, height)
}

/// Gap positions are whole numbers (drawn as integers, like the original
/// `randint` ranges), so `gap_bottom - gap_top == gap_height` holds
/// exactly instead of up to an ulp.
fn draw_gap_top(rng: &mut SmallRng, config: &SessionConfig) -> f64 {
    rng.random_range(config.gap_top_min as i64..=config.gap_top_max as i64) as f64
}

fn integrate(actor: &mut Actor, config: &SessionConfig) {
    if !actor.alive {
        return;
    }
    actor.velocity += config.gravity;
    actor.y += actor.velocity;
    if config.edge == EdgePolicy::Clamp {
        if actor.y < 0.0 {
            actor.y = 0.0;
            actor.velocity = 0.0;
        }
        let floor = config.height - FLOOR_CLAMP_INSET;
        if actor.y > floor {
            actor.y = floor;
            actor.velocity = 0.0;
        }
    }
}

/// One run of the game, from spawn to the first death. Owns all mutable
/// state; a restart constructs a brand-new session.
pub struct GameSession {
    pub config: SessionConfig,
    pub player: Actor,
    pub ai: Option<Actor>,
    pub pipe: Pipe,
    /// Current scroll speed; grows by `speed_increment` per recycle.
    pub speed: f64,
    pub score: u32,
    pub lifecycle: Lifecycle,
    /// Set exactly once, by the first death. Later deaths never move it.
    pub ended_at: Option<Instant>,
    rng: SmallRng,
}

impl GameSession {
    fn with_rng(config: SessionConfig, with_ai: bool, mut rng: SmallRng) -> Self {
        let pipe = Pipe {
            x: config.pipe_start_x,
            gap_top: draw_gap_top(&mut rng, &config),
            passed: false,
        };
        Self {
            player: Actor::spawn(&config),
            ai: with_ai.then(|| Actor::spawn(&config)),
            pipe,
            speed: config.initial_speed,
            score: 0,
            lifecycle: if config.start_gated {
                Lifecycle::NotStarted
            } else {
                Lifecycle::Running
            },
            ended_at: None,
            rng,
            config,
        }
    }

    /// Single-actor session (arcade, recording).
    pub fn solo(config: SessionConfig) -> Self {
        Self::with_rng(config, false, SmallRng::from_os_rng())
    }

    /// Two-actor session: player plus an AI bird.
    pub fn duel(config: SessionConfig) -> Self {
        Self::with_rng(config, true, SmallRng::from_os_rng())
    }

    /// Deterministic session for tests and reproducible demos.
    pub fn seeded(config: SessionConfig, with_ai: bool, seed: u64) -> Self {
        Self::with_rng(config, with_ai, SmallRng::seed_from_u64(seed))
    }

    pub fn start(&mut self) {
        if self.lifecycle == Lifecycle::NotStarted {
            self.lifecycle = Lifecycle::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.lifecycle = match self.lifecycle {
            Lifecycle::Running => Lifecycle::Paused,
            Lifecycle::Paused => Lifecycle::Running,
            other => other,
        };
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn gap_bottom(&self) -> f64 {
        self.pipe.gap_top + self.config.gap_height
    }

    pub fn ai_x(&self) -> f64 {
        self.config.bird_x + self.config.ai_x_offset
    }

    fn features_for(&self, y: f64) -> Features {
        Features::new(
            y,
            self.pipe.gap_top,
            self.gap_bottom(),
            self.pipe.x,
            self.config.bird_x,
        )
    }

    /// Feature vector for the player bird (used by the recorder).
    pub fn player_features(&self) -> Features {
        self.features_for(self.player.y)
    }

    /// Feature vector for the AI bird, if this session has one.
    pub fn ai_features(&self) -> Option<Features> {
        self.ai.as_ref().map(|ai| self.features_for(ai.y))
    }

    /// Advance the simulation by one frame.
    ///
    /// Order is part of the contract: jump commands (player's, then the
    /// AI's freshly computed one) -> gravity integration -> pipe advance,
    /// scoring hook and recycle -> collision per living actor -> lifecycle.
    /// Does nothing unless the session is `Running`.
    pub fn tick(&mut self, player_jump: bool, policy: Option<&DecisionPolicy>) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }

        if player_jump && self.player.alive {
            self.player.velocity = self.config.jump_impulse;
        }
        if let Some(policy) = policy {
            let wants_jump = match (&self.ai, self.ai_features()) {
                (Some(ai), Some(feats)) if ai.alive => policy.decide(&feats),
                _ => false,
            };
            if wants_jump {
                if let Some(ai) = self.ai.as_mut() {
                    ai.velocity = self.config.jump_impulse;
                }
            }
        }

        integrate(&mut self.player, &self.config);
        if let Some(ai) = self.ai.as_mut() {
            integrate(ai, &self.config);
        }

        self.pipe.x -= self.speed;
        if !self.pipe.passed && self.pipe.x + self.config.pipe_width < self.config.bird_x {
            self.pipe.passed = true;
            self.score += 1;
        }
        if self.pipe.x < -self.config.pipe_width {
            self.pipe.x = self.config.width;
            self.pipe.gap_top = draw_gap_top(&mut self.rng, &self.config);
            self.pipe.passed = false;
            self.speed += self.config.speed_increment;
        }

        let player_hit = self.player.alive && self.actor_collided(self.config.bird_x, self.player.y);
        if player_hit {
            self.player.alive = false;
        }
        let ai_hit = match self.ai.as_ref() {
            Some(ai) if ai.alive => self.actor_collided(self.ai_x(), ai.y),
            _ => false,
        };
        if ai_hit {
            if let Some(ai) = self.ai.as_mut() {
                ai.alive = false;
            }
        }
        if player_hit || ai_hit {
            if self.ended_at.is_none() {
                self.ended_at = Some(Instant::now());
            }
            self.lifecycle = Lifecycle::Ended;
        }
    }

    fn actor_collided(&self, x: f64, y: f64) -> bool {
        let c = &self.config;
        match c.edge {
            EdgePolicy::Lethal => {
                collided(x, y, c.bird_radius, &self.pipe, c.pipe_width, c.gap_height, c.height)
            }
            // Clamped edges can't be left, so only the pipe can kill.
            EdgePolicy::Clamp => {
                hits_pipe(x, y, c.bird_radius, &self.pipe, c.pipe_width, c.gap_height)
            }
            EdgePolicy::Open => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;

    fn duel_session(seed: u64) -> GameSession {
        let mut session = GameSession::seeded(SessionConfig::duel(), true, seed);
        session.start();
        session
    }

    #[test]
    fn gravity_integrates_velocity_then_position() {
        // Arcade scenario from the original: y=300, v=0, g=0.5.
        let mut session = GameSession::seeded(SessionConfig::arcade(), false, 1);
        assert_eq!(session.player.y, 300.0);
        session.tick(false, None);
        assert_eq!(session.player.velocity, 0.5);
        assert_eq!(session.player.y, 300.5);
    }

    #[test]
    fn jump_replaces_velocity_instead_of_adding() {
        let mut session = duel_session(1);
        for _ in 0..10 {
            session.tick(false, None);
        }
        assert!(session.player.velocity > 0.0);
        session.tick(true, None);
        // Jump overrides, then the same frame's gravity applies.
        let c = SessionConfig::duel();
        assert_eq!(session.player.velocity, c.jump_impulse + c.gravity);
    }

    #[test]
    fn no_physics_outside_running() {
        let mut session = GameSession::seeded(SessionConfig::duel(), true, 7);
        let y0 = session.player.y;
        let pipe_x0 = session.pipe.x;
        session.tick(true, None); // NotStarted: ignored
        assert_eq!(session.player.y, y0);
        assert_eq!(session.pipe.x, pipe_x0);

        session.start();
        session.toggle_pause();
        assert_eq!(session.lifecycle, Lifecycle::Paused);
        session.tick(true, None); // Paused: ignored
        assert_eq!(session.player.y, y0);
        assert_eq!(session.pipe.x, pipe_x0);

        session.toggle_pause();
        session.tick(false, None);
        assert!(session.pipe.x < pipe_x0);
    }

    #[test]
    fn pipe_recycles_past_left_edge() {
        let mut session = duel_session(2);
        session.pipe.x = -56.5; // speed 5 puts it at -61.5 < -60 this frame
        session.pipe.passed = true;
        session.player.y = session.pipe.gap_top + 75.0; // stay clear of pipes
        session.tick(false, None);
        assert_eq!(session.pipe.x, session.config.width);
        assert!(!session.pipe.passed);
        assert!(session.pipe.gap_top >= session.config.gap_top_min);
        assert!(session.pipe.gap_top <= session.config.gap_top_max);
    }

    #[test]
    fn recycle_raises_speed_in_duel_only() {
        let mut session = duel_session(3);
        session.pipe.x = -56.5;
        session.player.y = session.pipe.gap_top + 75.0;
        session.tick(false, None);
        assert!((session.speed - 5.15).abs() < 1e-12);

        let mut arcade = GameSession::seeded(SessionConfig::arcade(), false, 3);
        arcade.pipe.x = -67.5; // next advance at speed 3 crosses -70
        arcade.player.y = arcade.pipe.gap_top + 75.0;
        arcade.tick(false, None);
        assert_eq!(arcade.speed, 3.0);
    }

    #[test]
    fn gap_height_invariant_across_recycles() {
        let mut session = duel_session(4);
        for _ in 0..50 {
            session.pipe.x = -100.0;
            session.player.y = session.pipe.gap_top + 75.0;
            session.player.velocity = 0.0;
            session.tick(false, None);
            if session.lifecycle == Lifecycle::Ended {
                break;
            }
            assert_eq!(session.gap_bottom() - session.pipe.gap_top, 150.0);
        }
    }

    #[test]
    fn gap_positions_are_whole_numbers_with_exact_arithmetic() {
        let mut session = GameSession::seeded(SessionConfig::recording(), false, 13);
        for _ in 0..200 {
            session.pipe.x = -100.0; // force a recycle every frame
            session.tick(false, None);
            let gap_top = session.pipe.gap_top;
            assert_eq!(gap_top.fract(), 0.0);
            assert!(gap_top >= session.config.gap_top_min);
            assert!(gap_top <= session.config.gap_top_max);
            // Exact, not approximate: integer endpoints keep the
            // subtraction free of rounding error.
            assert_eq!(session.gap_bottom() - gap_top, session.config.gap_height);
        }
    }

    #[test]
    fn scoring_is_exactly_once_per_pipe() {
        let mut session = duel_session(5);
        // Park the pipe just right of the bird column, safely below the gap
        // check by keeping the bird inside the gap.
        session.pipe.x = session.config.bird_x - session.config.pipe_width + 4.0;
        session.player.y = session.pipe.gap_top + 75.0;
        session.player.velocity = 0.0;
        if let Some(ai) = session.ai.as_mut() {
            ai.y = session.pipe.gap_top + 75.0;
            ai.velocity = 0.0;
        }
        session.tick(true, None);
        assert_eq!(session.score, 1);
        // Further frames before the recycle must not score again.
        session.player.velocity = 0.0;
        session.player.y = session.pipe.gap_top + 75.0;
        session.tick(true, None);
        assert_eq!(session.score, 1);
    }

    #[test]
    fn collision_is_pure_and_order_independent() {
        let pipe = Pipe { x: 40.0, gap_top: 60.0, passed: false };
        let first = collided(50.0, 30.0, 15.0, &pipe, 60.0, 150.0, 600.0);
        for _ in 0..10 {
            assert_eq!(collided(50.0, 30.0, 15.0, &pipe, 60.0, 150.0, 600.0), first);
        }
        assert!(first); // top of bird (15) is above gap_top (60) with overlap
    }

    #[test]
    fn edge_contact_collides_regardless_of_pipe() {
        // gap_top at its minimum, gap 150 => gap_bottom 210; bird at y=5 has
        // top=-10 <= 0 and must collide wherever the pipe is.
        let far_pipe = Pipe { x: 1000.0, gap_top: 60.0, passed: false };
        assert!(collided(50.0, 5.0, 15.0, &far_pipe, 60.0, 150.0, 600.0));
        assert!(collided(50.0, 590.0, 15.0, &far_pipe, 60.0, 150.0, 600.0));
        assert!(!collided(50.0, 300.0, 15.0, &far_pipe, 60.0, 150.0, 600.0));
    }

    #[test]
    fn first_death_ends_session_and_pins_timestamp() {
        let mut session = duel_session(6);
        // Let the player free-fall into the floor.
        while session.lifecycle == Lifecycle::Running {
            session.tick(false, None);
        }
        assert_eq!(session.lifecycle, Lifecycle::Ended);
        assert!(!session.player.alive);
        let stamp = session.ended_at.expect("death must record a timestamp");

        // Ticking an ended session changes nothing.
        let y = session.player.y;
        session.tick(true, None);
        assert_eq!(session.player.y, y);
        assert_eq!(session.ended_at, Some(stamp));
    }

    #[test]
    fn arcade_clamps_at_floor_and_zeroes_velocity() {
        let mut session = GameSession::seeded(SessionConfig::arcade(), false, 8);
        session.pipe.x = 700.0; // keep the pipe away from the bird
        for _ in 0..200 {
            session.tick(false, None);
        }
        assert_eq!(session.lifecycle, Lifecycle::Running);
        assert_eq!(session.player.y, 570.0);
        assert_eq!(session.player.velocity, 0.0);
    }

    #[test]
    fn arcade_clamps_at_ceiling() {
        let mut session = GameSession::seeded(SessionConfig::arcade(), false, 9);
        session.pipe.x = 700.0;
        for _ in 0..60 {
            session.tick(true, None);
            session.pipe.x = 700.0; // undo scrolling so the pipe stays remote
        }
        assert_eq!(session.player.y, 0.0);
        assert_eq!(session.player.velocity, 0.0);
        assert!(session.player.alive);
    }

    #[test]
    fn recording_sessions_are_immortal() {
        let mut session = GameSession::seeded(SessionConfig::recording(), false, 10);
        for _ in 0..2000 {
            session.tick(false, None);
        }
        assert!(session.player.alive);
        assert_eq!(session.lifecycle, Lifecycle::Running);
        // Constant speed: recycles never accelerate the stream.
        assert_eq!(session.speed, 5.0);
    }

    #[test]
    fn heuristic_ai_keeps_its_bird_flying() {
        let policy = DecisionPolicy::heuristic(Difficulty::Normal);
        let mut session = duel_session(11);
        for _ in 0..300 {
            // Keep the player safe in the gap so only the AI is exercised.
            session.player.y = session.pipe.gap_top + 75.0;
            session.player.velocity = 0.0;
            session.tick(false, Some(&policy));
            if session.lifecycle == Lifecycle::Ended {
                break;
            }
        }
        // The heuristic tracks the gap center, so the AI bird must stay
        // within the vertical bounds for a long stretch.
        let ai = session.ai.expect("duel session has an AI bird");
        assert!(ai.y > 0.0 && ai.y < session.config.height);
    }

    #[test]
    fn seeded_sessions_are_deterministic() {
        let mut a = duel_session(42);
        let mut b = duel_session(42);
        for frame in 0..500 {
            let jump = frame % 23 == 0;
            a.tick(jump, None);
            b.tick(jump, None);
        }
        assert_eq!(a.player.y, b.player.y);
        assert_eq!(a.pipe.x, b.pipe.x);
        assert_eq!(a.pipe.gap_top, b.pipe.gap_top);
        assert_eq!(a.score, b.score);
        assert_eq!(a.lifecycle, b.lifecycle);
    }
}
