use image::RgbaImage;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::CELL_COUNT;
use crate::countdown::Countdown;
use crate::error::PuzzleError;
use crate::events::{Notice, PuzzleState, SessionEvent, TickOutcome};
use crate::image_prep::SquareImage;
use crate::rotation::Rotation;
use crate::tile_render::{cell_of, render_tile, tile_size_for};

/// Generation counter for runs. A tick scheduled for an older run is ignored.
pub type RunId = u64;

/// The session type the browser runtime drives.
pub type GameSession = PuzzleSession<ChaCha20Rng>;

/// One grid cell: its current orientation and the raster rendered for it.
#[derive(Clone, Debug, PartialEq)]
pub struct TileState {
    pub rotation: Rotation,
    pub raster: RgbaImage,
}

/// Serializable summary handed to the host page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub state: PuzzleState,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub tile_size: Option<u32>,
    pub rotations: Vec<Rotation>,
}

/// The full mutable state of a puzzle attempt. The random source is injected
/// so runs are reproducible under a fixed seed.
pub struct PuzzleSession<R> {
    rng: R,
    image: Option<SquareImage>,
    tiles: Vec<TileState>,
    state: PuzzleState,
    countdown: Countdown,
    run: RunId,
    events: Vec<SessionEvent>,
}

impl PuzzleSession<ChaCha20Rng> {
    /// Session seeded from `cfg.seed`, or from `fallback_seed` when the page
    /// did not pin one.
    pub fn from_config(cfg: &GameConfig, fallback_seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(cfg.seed.unwrap_or(fallback_seed));
        PuzzleSession::new(cfg.total_time_secs, rng)
    }
}

impl<R: Rng> PuzzleSession<R> {
    pub fn new(total_time_secs: u32, rng: R) -> Self {
        PuzzleSession {
            rng,
            image: None,
            tiles: Vec::new(),
            state: PuzzleState::Idle,
            countdown: Countdown::new(total_time_secs),
            run: 0,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn total_secs(&self) -> u32 {
        self.countdown.total()
    }

    pub fn run_id(&self) -> RunId {
        self.run
    }

    pub fn image(&self) -> Option<&SquareImage> {
        self.image.as_ref()
    }

    pub fn tiles(&self) -> &[TileState] {
        &self.tiles
    }

    pub fn tile_size(&self) -> Option<u32> {
        self.image.as_ref().map(tile_size_for)
    }

    pub fn rotations(&self) -> Vec<Rotation> {
        self.tiles.iter().map(|t| t.rotation).collect()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state,
            remaining_secs: self.countdown.remaining(),
            total_secs: self.countdown.total(),
            tile_size: self.tile_size(),
            rotations: self.rotations(),
        }
    }

    /// Take every event queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Swap in a freshly prepared image. `None` (no file picked) is a no-op.
    pub fn load_image(&mut self, image: Option<SquareImage>) {
        let Some(image) = image else {
            return;
        };
        self.image = Some(image);
        self.tiles.clear();
        self.countdown.reset();
        // any tick still pending belongs to the previous run
        self.run += 1;
        self.events.push(SessionEvent::ImageLoaded);
        self.events.push(SessionEvent::TilesReset);
        self.events
            .push(SessionEvent::Countdown(self.countdown.remaining()));
        self.set_state(PuzzleState::Ready);
    }

    /// Scramble every tile and begin a run. Returns the id the runtime must
    /// pass back to [`PuzzleSession::tick`].
    pub fn start(&mut self) -> Result<RunId, PuzzleError> {
        let Some(image) = self.image.as_ref() else {
            self.events.push(SessionEvent::Notice(Notice::MissingImage));
            return Err(PuzzleError::MissingImage);
        };
        let tile_size = tile_size_for(image);
        let mut tiles = Vec::with_capacity(CELL_COUNT);
        for idx in 0..CELL_COUNT {
            let (col, row) = cell_of(idx);
            let rotation = Rotation::random(&mut self.rng);
            let raster = render_tile(image, col, row, tile_size, rotation);
            tiles.push(TileState { rotation, raster });
        }
        self.tiles = tiles;
        self.countdown.reset();
        self.run += 1;
        self.events.push(SessionEvent::TilesReset);
        self.events
            .push(SessionEvent::Countdown(self.countdown.remaining()));
        self.set_state(PuzzleState::Running);
        Ok(self.run)
    }

    /// Turn one tile a quarter clockwise. Ignored unless running or when the
    /// index is outside the grid.
    pub fn click_tile(&mut self, index: usize) -> Option<Rotation> {
        if !self.state.is_running() {
            return None;
        }
        let image = self.image.as_ref()?;
        let tile = self.tiles.get_mut(index)?;
        let (col, row) = cell_of(index);
        tile.rotation = tile.rotation.next();
        tile.raster = render_tile(image, col, row, tile_size_for(image), tile.rotation);
        self.events.push(SessionEvent::TileChanged(index));
        Some(tile.rotation)
    }

    /// Rotation-only check: tiles never change position.
    pub fn is_solved(&self) -> bool {
        self.tiles.len() == CELL_COUNT && self.tiles.iter().all(|t| t.rotation.is_upright())
    }

    /// Evaluate the exit conditions, solved first, then timeout.
    pub fn check(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Inactive;
        }
        if self.is_solved() {
            self.set_state(PuzzleState::Solved);
            self.events.push(SessionEvent::Notice(Notice::Solved));
            return TickOutcome::Solved;
        }
        if self.countdown.is_expired() {
            self.set_state(PuzzleState::TimedOut);
            self.events.push(SessionEvent::Notice(Notice::TimedOut));
            return TickOutcome::TimedOut;
        }
        TickOutcome::Continue
    }

    /// One elapsed second of run `run`: decrement, then [`check`](Self::check).
    pub fn tick(&mut self, run: RunId) -> TickOutcome {
        if !self.state.is_running() || run != self.run {
            return TickOutcome::Inactive;
        }
        self.countdown.decrement();
        self.events
            .push(SessionEvent::Countdown(self.countdown.remaining()));
        self.check()
    }

    fn set_state(&mut self, state: PuzzleState) {
        if self.state != state {
            self.state = state;
            self.events.push(SessionEvent::StateChanged(state));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_prep::{gradient, prepare};
    use image::DynamicImage;
    use rand::RngCore;

    /// Always draws zero, which maps to the upright rotation.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    fn square(w: u32, h: u32) -> SquareImage {
        prepare(&DynamicImage::ImageRgba8(gradient(w, h))).unwrap()
    }

    fn seeded(total: u32) -> PuzzleSession<ChaCha20Rng> {
        PuzzleSession::new(total, ChaCha20Rng::seed_from_u64(11))
    }

    #[test]
    fn new_session_is_idle() {
        let s = seeded(60);
        assert_eq!(s.state(), PuzzleState::Idle);
        assert_eq!(s.remaining_secs(), 60);
        assert!(s.tiles().is_empty());
        assert!(!s.is_solved());
    }

    #[test]
    fn loading_nothing_is_a_no_op() {
        let mut s = seeded(60);
        s.load_image(None);
        assert_eq!(s.state(), PuzzleState::Idle);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn start_without_image_warns_and_stays_idle() {
        let mut s = seeded(60);
        assert!(matches!(s.start(), Err(PuzzleError::MissingImage)));
        assert_eq!(s.state(), PuzzleState::Idle);
        assert_eq!(
            s.drain_events(),
            vec![SessionEvent::Notice(Notice::MissingImage)]
        );
    }

    #[test]
    fn load_then_start_scrambles_all_cells() {
        let mut s = seeded(60);
        s.load_image(Some(square(64, 64)));
        assert_eq!(s.state(), PuzzleState::Ready);
        s.start().unwrap();
        assert_eq!(s.state(), PuzzleState::Running);
        assert_eq!(s.tiles().len(), 16);
        assert_eq!(s.tile_size(), Some(16));
        for t in s.tiles() {
            assert_eq!(t.raster.dimensions(), (16, 16));
        }
    }

    #[test]
    fn restart_redraws_every_tile() {
        let mut s = seeded(60);
        s.load_image(Some(square(64, 64)));
        let first_run = s.start().unwrap();
        let first = s.rotations();
        let mut differs = false;
        for _ in 0..5 {
            let run = s.start().unwrap();
            assert!(run > first_run);
            assert_eq!(s.rotations().len(), 16);
            differs |= s.rotations() != first;
        }
        assert!(differs);
    }

    #[test]
    fn click_advances_only_that_tile() {
        let mut s = seeded(60);
        s.load_image(Some(square(40, 40)));
        s.start().unwrap();
        s.drain_events();
        let before = s.rotations();
        let after_rot = s.click_tile(6).unwrap();
        assert_eq!(after_rot, before[6].next());
        let after = s.rotations();
        for i in 0..16 {
            if i == 6 {
                assert_eq!(after[i], before[i].next());
            } else {
                assert_eq!(after[i], before[i]);
            }
        }
        assert_eq!(s.drain_events(), vec![SessionEvent::TileChanged(6)]);
    }

    #[test]
    fn click_rerenders_with_the_new_rotation() {
        let mut s = seeded(60);
        let sq = square(40, 40);
        s.load_image(Some(sq.clone()));
        s.start().unwrap();
        let rot = s.click_tile(9).unwrap();
        let expected = render_tile(&sq, 1, 2, 10, rot);
        assert_eq!(s.tiles()[9].raster, expected);
    }

    #[test]
    fn clicks_are_ignored_unless_running() {
        let mut s = seeded(60);
        assert_eq!(s.click_tile(0), None);
        s.load_image(Some(square(40, 40)));
        assert_eq!(s.click_tile(0), None);
        s.start().unwrap();
        assert_eq!(s.click_tile(16), None);
    }

    #[test]
    fn all_upright_start_is_solved_at_first_check() {
        let mut s = PuzzleSession::new(60, ZeroRng);
        s.load_image(Some(square(40, 40)));
        s.start().unwrap();
        assert!(s.is_solved());
        assert_eq!(s.check(), TickOutcome::Solved);
        assert_eq!(s.state(), PuzzleState::Solved);
        assert_eq!(s.remaining_secs(), 60);
        let events = s.drain_events();
        assert!(events.contains(&SessionEvent::Notice(Notice::Solved)));
        // terminal: tiles stay but no longer react
        assert_eq!(s.tiles().len(), 16);
        assert_eq!(s.click_tile(0), None);
    }

    #[test]
    fn solving_by_clicks_is_detected_on_the_next_tick() {
        let mut s = PuzzleSession::new(60, ZeroRng);
        s.load_image(Some(square(40, 40)));
        let run = s.start().unwrap();
        s.click_tile(3);
        assert_eq!(s.check(), TickOutcome::Continue);
        for _ in 0..3 {
            s.click_tile(3);
        }
        assert!(s.is_solved());
        assert_eq!(s.tick(run), TickOutcome::Solved);
        assert_eq!(s.remaining_secs(), 59);
    }

    #[test]
    fn times_out_after_exactly_total_ticks() {
        let mut s = PuzzleSession::new(5, ZeroRng);
        s.load_image(Some(square(40, 40)));
        let run = s.start().unwrap();
        s.click_tile(0);
        assert_eq!(s.check(), TickOutcome::Continue);
        for left in (1..5).rev() {
            assert_eq!(s.tick(run), TickOutcome::Continue);
            assert_eq!(s.remaining_secs(), left);
        }
        assert_eq!(s.tick(run), TickOutcome::TimedOut);
        assert_eq!(s.remaining_secs(), 0);
        assert_eq!(s.state(), PuzzleState::TimedOut);
        assert_eq!(s.tick(run), TickOutcome::Inactive);
        assert_eq!(s.remaining_secs(), 0);
    }

    #[test]
    fn solved_wins_over_timeout_on_the_same_tick() {
        let mut s = PuzzleSession::new(1, ZeroRng);
        s.load_image(Some(square(40, 40)));
        let run = s.start().unwrap();
        s.click_tile(2);
        assert_eq!(s.check(), TickOutcome::Continue);
        for _ in 0..3 {
            s.click_tile(2);
        }
        assert_eq!(s.tick(run), TickOutcome::Solved);
        assert_eq!(s.remaining_secs(), 0);
    }

    #[test]
    fn stale_ticks_never_decrement() {
        let mut s = PuzzleSession::new(30, ZeroRng);
        s.load_image(Some(square(40, 40)));
        let old = s.start().unwrap();
        s.click_tile(0);
        let new = s.start().unwrap();
        s.click_tile(0);
        assert_eq!(s.tick(old), TickOutcome::Inactive);
        assert_eq!(s.remaining_secs(), 30);
        assert_eq!(s.tick(new), TickOutcome::Continue);
        assert_eq!(s.remaining_secs(), 29);

        // a new upload invalidates the running tick too
        s.load_image(Some(square(20, 20)));
        assert_eq!(s.tick(new), TickOutcome::Inactive);
        assert_eq!(s.state(), PuzzleState::Ready);
        assert_eq!(s.remaining_secs(), 30);
        assert!(s.tiles().is_empty());
    }

    #[test]
    fn status_serializes_degrees() {
        let mut s = PuzzleSession::new(60, ZeroRng);
        s.load_image(Some(square(40, 40)));
        s.start().unwrap();
        s.click_tile(1);
        let json = serde_json::to_value(s.status()).unwrap();
        assert_eq!(json["state"], "running");
        assert_eq!(json["remaining_secs"], 60);
        assert_eq!(json["tile_size"], 10);
        assert_eq!(json["rotations"][1], 90);
        assert_eq!(json["rotations"][0], 0);
    }

    #[test]
    fn from_config_is_reproducible_for_a_fixed_seed() {
        let cfg = GameConfig {
            total_time_secs: 45,
            seed: Some(3),
        };
        let mut a = PuzzleSession::from_config(&cfg, 1);
        let mut b = PuzzleSession::from_config(&cfg, 2);
        a.load_image(Some(square(32, 32)));
        b.load_image(Some(square(32, 32)));
        a.start().unwrap();
        b.start().unwrap();
        assert_eq!(a.rotations(), b.rotations());
        assert_eq!(a.total_secs(), 45);
    }
}
