use std::time::Duration;

/// Resting offset above the bottom edge when the clamping edge policy is
/// active (the arcade variant parks the bird 30 units above the floor).
pub const FLOOR_CLAMP_INSET: f64 = 30.0;

/// What happens when an actor reaches the top or bottom of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Clamp position to the screen and zero the velocity (arcade).
    Clamp,
    /// Touching either edge counts as a collision (duel).
    Lethal,
    /// No edge handling at all (recording sessions are immortal).
    Open,
}

/// AI difficulty. Tunes both the model probability threshold and the
/// heuristic margin; in both cases "easy" makes the AI jump less readily.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Jump when the classifier probability exceeds this.
    pub fn threshold(self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 0.5,
            Difficulty::Hard => 0.35,
        }
    }

    /// Signed offset added to the gap center before the heuristic
    /// comparison. More positive = less eager to jump.
    pub fn margin(self) -> f64 {
        match self {
            Difficulty::Easy => 20.0,
            Difficulty::Normal => 0.0,
            Difficulty::Hard => -10.0,
        }
    }
}

/// All tunable constants for one game session, passed by value into
/// [`crate::game::GameSession`]. Each variant of the game family gets its
/// own profile constructor; the profiles differ deliberately (edge policy,
/// speed progression, gap range) and must not be unified.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub width: f64,
    pub height: f64,
    /// Horizontal bird column. Fixed for the whole session.
    pub bird_x: f64,
    pub bird_radius: f64,
    /// The AI bird flies slightly ahead of the player in duel sessions.
    pub ai_x_offset: f64,
    pub gravity: f64,
    /// Negative. A jump replaces the velocity with this value.
    pub jump_impulse: f64,
    pub pipe_width: f64,
    pub gap_height: f64,
    pub initial_speed: f64,
    /// Added to the scroll speed on every recycle. Zero = constant speed.
    pub speed_increment: f64,
    pub gap_top_min: f64,
    pub gap_top_max: f64,
    /// Where the first pipe spawns; recycled pipes reset to `width`.
    pub pipe_start_x: f64,
    pub edge: EdgePolicy,
    /// Whether the session waits in `NotStarted` for an explicit start.
    pub start_gated: bool,
    pub tick_rate: u32,
}

impl SessionConfig {
    /// Two-actor human-vs-AI profile: small field, progressive speed,
    /// lethal screen edges, start/pause gating.
    pub fn duel() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
            bird_x: 50.0,
            bird_radius: 15.0,
            ai_x_offset: 40.0,
            gravity: 0.4,
            jump_impulse: -7.0,
            pipe_width: 60.0,
            gap_height: 150.0,
            initial_speed: 5.0,
            speed_increment: 0.15,
            gap_top_min: 60.0,
            gap_top_max: 350.0,
            pipe_start_x: 400.0,
            edge: EdgePolicy::Lethal,
            start_gated: true,
            tick_rate: 45,
        }
    }

    /// Single-actor arcade profile: wide field, constant speed, screen
    /// edges clamp instead of killing, runs from launch until death.
    pub fn arcade() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            bird_x: 50.0,
            bird_radius: 15.0,
            ai_x_offset: 0.0,
            gravity: 0.5,
            jump_impulse: -8.0,
            pipe_width: 70.0,
            gap_height: 150.0,
            initial_speed: 3.0,
            speed_increment: 0.0,
            gap_top_min: 100.0,
            gap_top_max: 400.0,
            pipe_start_x: 400.0,
            edge: EdgePolicy::Clamp,
            start_gated: false,
            tick_rate: 60,
        }
    }

    /// Training-data profile: duel physics, constant speed, no collisions
    /// so a run only ends when the human quits.
    pub fn recording() -> Self {
        Self {
            speed_increment: 0.0,
            edge: EdgePolicy::Open,
            start_gated: false,
            tick_rate: 40,
            ..Self::duel()
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_orders_thresholds_and_margins() {
        assert!(Difficulty::Easy.threshold() > Difficulty::Normal.threshold());
        assert!(Difficulty::Normal.threshold() > Difficulty::Hard.threshold());
        assert!(Difficulty::Easy.margin() > Difficulty::Normal.margin());
        assert!(Difficulty::Normal.margin() > Difficulty::Hard.margin());
    }

    #[test]
    fn profiles_diverge_where_the_variants_do() {
        let duel = SessionConfig::duel();
        let arcade = SessionConfig::arcade();
        let rec = SessionConfig::recording();

        assert_eq!(duel.edge, EdgePolicy::Lethal);
        assert_eq!(arcade.edge, EdgePolicy::Clamp);
        assert_eq!(rec.edge, EdgePolicy::Open);

        assert!(duel.speed_increment > 0.0);
        assert_eq!(arcade.speed_increment, 0.0);
        assert_eq!(rec.speed_increment, 0.0);

        assert!(duel.start_gated);
        assert!(!arcade.start_gated);
    }

    #[test]
    fn frame_duration_matches_tick_rate() {
        let config = SessionConfig::recording();
        assert_eq!(config.frame_duration(), Duration::from_secs_f64(1.0 / 40.0));
    }
}
