//! Game session
//!
//! Ties the simulation to the scheduler and to the outside world. The
//! front-end feeds frame time and commands in; score updates, sounds and
//! the game-over summary come out through callbacks and injected
//! collaborators.

use crate::audio::{SoundEffect, SoundNotifier};
use crate::highscores::{Leaderboard, LeaderboardEntry};
use crate::input::Command;
use crate::persistence::ScoreStore;
use crate::platform;
use crate::scheduler::{Scheduler, SchedulerState};
use crate::sim::{
    CollisionKind, ConfigError, Direction, GameConfig, GamePhase, GameState, TickEvent,
    set_direction, tick,
};

/// Final numbers of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverSummary {
    pub score: u64,
    pub level: u32,
    pub length: usize,
    pub cause: CollisionKind,
    /// Beat the previous best
    pub new_high_score: bool,
    /// Leaderboard position, if the run made it
    pub rank: Option<usize>,
}

type TickCallback = Box<dyn FnMut(&GameState, &TickEvent)>;
type GameOverCallback = Box<dyn FnMut(&GameOverSummary)>;

pub struct Session {
    state: Option<GameState>,
    scheduler: Scheduler,
    store: Box<dyn ScoreStore>,
    sound: Box<dyn SoundNotifier>,
    high_score: u64,
    difficulty_label: String,
    last_config: Option<GameConfig>,
    last_summary: Option<GameOverSummary>,
    on_tick: Option<TickCallback>,
    on_game_over: Option<GameOverCallback>,
}

impl Session {
    pub fn new(store: Box<dyn ScoreStore>, sound: Box<dyn SoundNotifier>) -> Self {
        let high_score = store.load_high_score();
        log::info!("Session ready, best score {}", high_score);
        Self {
            state: None,
            scheduler: Scheduler::new(),
            store,
            sound,
            high_score,
            difficulty_label: String::new(),
            last_config: None,
            last_summary: None,
            on_tick: None,
            on_game_over: None,
        }
    }

    /// Called after every tick with the settled state
    pub fn on_tick(&mut self, callback: impl FnMut(&GameState, &TickEvent) + 'static) {
        self.on_tick = Some(Box::new(callback));
    }

    /// Called once when a run ends by collision
    pub fn on_game_over(&mut self, callback: impl FnMut(&GameOverSummary) + 'static) {
        self.on_game_over = Some(Box::new(callback));
    }

    /// Label stored with leaderboard entries (e.g. "hard")
    pub fn set_difficulty_label(&mut self, label: &str) {
        self.difficulty_label = label.to_string();
    }

    pub fn set_sound(&mut self, sound: Box<dyn SoundNotifier>) {
        self.sound = sound;
    }

    /// Reset everything and start running with a clock-derived seed
    pub fn start_session(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        self.start_session_seeded(config, platform::run_seed())
    }

    /// Reset everything and start running. On error the current session is
    /// left untouched.
    pub fn start_session_seeded(&mut self, config: GameConfig, seed: u64) -> Result<(), ConfigError> {
        let state = GameState::new(config, seed)?;
        // Cancel any pending fire before the new state goes in
        self.scheduler.stop();
        self.state = Some(state);
        self.last_config = Some(config);
        self.last_summary = None;
        self.scheduler.start(config.tick_interval_ms);
        log::info!(
            "Session started: grid {}, walls {}, {}ms, seed {}",
            config.grid_size,
            config.walls_enabled,
            config.tick_interval_ms,
            seed
        );
        Ok(())
    }

    /// Start over with the configuration of the last session
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let config = self.last_config.unwrap_or_default();
        self.start_session(config)
    }

    pub fn pause(&mut self) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if !self.scheduler.pause() {
            return false;
        }
        state.run.phase = GamePhase::Paused;
        log::debug!("Paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if !self.scheduler.resume() {
            return false;
        }
        state.run.phase = GamePhase::Running;
        log::debug!("Resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.scheduler.state() == SchedulerState::Paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Stop ticking and drop the session
    pub fn quit(&mut self) {
        self.scheduler.stop();
        self.state = None;
        log::info!("Session quit");
    }

    /// Buffer a direction change; ignored once the run is over
    pub fn on_direction_input(&mut self, requested: Direction) {
        if let Some(state) = self.state.as_mut() {
            if !state.run.is_ended() {
                set_direction(state, requested);
            }
        }
    }

    /// Apply a mapped keyboard command
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Turn(dir) => self.on_direction_input(dir),
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::Restart => {
                if let Err(e) = self.restart() {
                    log::warn!("Restart failed: {}", e);
                }
            }
        }
    }

    /// Feed elapsed frame time; runs every due tick. Returns whether any
    /// tick ran, i.e. whether a redraw is needed.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        self.scheduler.advance(elapsed_ms);
        let mut ticked = false;
        while self.scheduler.take_due() {
            self.step();
            ticked = true;
        }
        ticked
    }

    fn step(&mut self) {
        let Some(state) = self.state.as_mut() else {
            self.scheduler.stop();
            return;
        };
        let result = tick(state);

        match result.event {
            TickEvent::Ate => self.sound.notify(SoundEffect::Eat),
            TickEvent::LeveledUp { .. } => {
                self.sound.notify(SoundEffect::Eat);
                self.sound.notify(SoundEffect::LevelUp);
            }
            TickEvent::Collision(_) | TickEvent::None => {}
        }
        if let Some(interval) = result.new_interval_ms {
            self.scheduler.set_interval(interval);
        }
        if let Some(cell) = result.obstacle_added {
            log::debug!("New obstacle at ({}, {})", cell.x, cell.y);
        }

        if let (Some(callback), Some(state)) = (self.on_tick.as_mut(), self.state.as_ref()) {
            callback(state, &result.event);
        }

        if let TickEvent::Collision(cause) = result.event {
            self.scheduler.stop();
            self.finish_run(cause);
        }
    }

    fn finish_run(&mut self, cause: CollisionKind) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        self.sound.notify(SoundEffect::GameOver);

        let score = state.run.score;
        let new_high_score = score > self.high_score;
        if new_high_score {
            self.high_score = score;
            self.store.save_high_score(score);
        }

        let rank = self.store.append_leaderboard_entry(LeaderboardEntry {
            score,
            level: state.run.level,
            length: state.snake.len() as u32,
            difficulty: self.difficulty_label.clone(),
            timestamp: platform::now_ms(),
        });

        let summary = GameOverSummary {
            score,
            level: state.run.level,
            length: state.snake.len(),
            cause,
            new_high_score,
            rank,
        };
        if let Some(callback) = self.on_game_over.as_mut() {
            callback(&summary);
        }
        self.last_summary = Some(summary);
    }

    /// Current (or ended) session state
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    pub fn interval_ms(&self) -> u32 {
        self.scheduler.interval_ms()
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Summary of the last run that ended by collision
    pub fn last_game_over(&self) -> Option<&GameOverSummary> {
        self.last_summary.as_ref()
    }

    pub fn leaderboard(&self) -> Leaderboard {
        self.store.load_leaderboard()
    }

    /// Wipe the leaderboard and the best score
    pub fn clear_scores(&mut self) {
        self.store.clear();
        self.high_score = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{JsonScoreStore, MemoryStorage};
    use crate::sim::Cell;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<SoundEffect>>>);

    impl SoundNotifier for Recorder {
        fn notify(&mut self, effect: SoundEffect) {
            self.0.borrow_mut().push(effect);
        }
    }

    fn session() -> (Session, Recorder) {
        let recorder = Recorder::default();
        let store = JsonScoreStore::new(MemoryStorage::new());
        let mut session = Session::new(Box::new(store), Box::new(recorder.clone()));
        session.set_difficulty_label("medium");
        (session, recorder)
    }

    /// Start a default session with the food parked out of the way
    fn started() -> (Session, Recorder) {
        let (mut session, recorder) = session();
        session
            .start_session_seeded(GameConfig::default(), 1)
            .unwrap();
        session.state.as_mut().unwrap().food = Cell::new(0, 0);
        (session, recorder)
    }

    fn head(session: &Session) -> Cell {
        session.state().unwrap().snake.head()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (mut session, _) = session();
        let config = GameConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(
            session.start_session_seeded(config, 1),
            Err(ConfigError::ZeroInterval)
        );
        assert!(session.state().is_none());
        assert_eq!(session.scheduler_state(), SchedulerState::Stopped);
    }

    #[test]
    fn test_invalid_config_keeps_running_session() {
        let (mut session, _) = started();
        let bad = GameConfig {
            grid_size: 1,
            ..Default::default()
        };
        assert!(session.start_session_seeded(bad, 2).is_err());
        assert_eq!(session.scheduler_state(), SchedulerState::Running);
        assert_eq!(session.state().unwrap().config.grid_size, 20);
    }

    #[test]
    fn test_ticks_on_interval() {
        let (mut session, _) = started();

        assert!(!session.advance(50.0));
        assert_eq!(head(&session), Cell::new(10, 10));
        assert!(session.advance(50.0));
        assert_eq!(head(&session), Cell::new(11, 10));
    }

    #[test]
    fn test_direction_input_applies_next_tick() {
        let (mut session, _) = started();
        session.on_direction_input(Direction::DOWN);
        session.advance(100.0);
        assert_eq!(head(&session), Cell::new(10, 11));
    }

    #[test]
    fn test_pause_freezes_state() {
        let (mut session, _) = started();
        assert!(session.pause());
        assert!(session.state().unwrap().run.is_paused());

        assert!(!session.advance(1000.0));
        assert_eq!(head(&session), Cell::new(10, 10));

        assert!(session.toggle_pause());
        assert_eq!(session.scheduler_state(), SchedulerState::Running);
        assert!(session.advance(100.0));
        assert_eq!(head(&session), Cell::new(11, 10));
    }

    #[test]
    fn test_quit_cancels_pending_tick() {
        let (mut session, _) = started();
        session.advance(99.0);
        session.quit();
        assert!(!session.advance(100.0));
        assert!(session.state().is_none());
        assert_eq!(session.scheduler_state(), SchedulerState::Stopped);
    }

    #[test]
    fn test_controls_after_quit_then_start_again() {
        let (mut session, _) = started();
        session.quit();

        assert!(!session.toggle_pause());
        assert!(!session.resume());
        assert!(!session.pause());

        session
            .start_session_seeded(GameConfig::default(), 4)
            .unwrap();
        assert_eq!(session.scheduler_state(), SchedulerState::Running);
        assert!(session.toggle_pause());
        assert_eq!(session.scheduler_state(), SchedulerState::Paused);
        assert!(session.resume());
        assert_eq!(session.scheduler_state(), SchedulerState::Running);
    }

    #[test]
    fn test_restart_does_not_inherit_elapsed_time() {
        let (mut session, _) = started();
        session.advance(99.0);
        session
            .start_session_seeded(GameConfig::default(), 3)
            .unwrap();
        session.advance(1.0);
        assert_eq!(session.state().unwrap().time_ticks, 0);
    }

    #[test]
    fn test_level_up_reschedules_and_plays_sounds() {
        let (mut session, sounds) = started();
        {
            let state = session.state.as_mut().unwrap();
            state.run.score = 40;
            state.food = Cell::new(11, 10);
        }

        session.advance(100.0);

        assert_eq!(session.state().unwrap().run.level, 2);
        assert_eq!(session.interval_ms(), 90);
        assert_eq!(*sounds.0.borrow(), vec![SoundEffect::Eat, SoundEffect::LevelUp]);

        // Next tick needs the full new interval
        assert!(!session.advance(89.0));
        assert!(session.advance(1.0));
    }

    #[test]
    fn test_tick_callback_sees_events() {
        let (mut session, _) = started();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        session.on_tick(move |state, event| {
            sink.borrow_mut().push((state.time_ticks, *event));
        });
        session.state.as_mut().unwrap().food = Cell::new(12, 10);

        session.advance(200.0);

        assert_eq!(
            *events.borrow(),
            vec![(1, TickEvent::None), (2, TickEvent::Ate)]
        );
    }

    #[test]
    fn test_game_over_records_score() {
        let (mut session, sounds) = started();
        let summaries = Rc::new(RefCell::new(Vec::new()));
        let sink = summaries.clone();
        session.on_game_over(move |summary| sink.borrow_mut().push(summary.clone()));
        {
            let state = session.state.as_mut().unwrap();
            state.run.score = 30;
            state.obstacles.push(Cell::new(11, 10));
        }

        session.advance(100.0);

        assert_eq!(session.scheduler_state(), SchedulerState::Stopped);
        assert!(session.state().unwrap().run.is_ended());
        let summaries = summaries.borrow();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].cause, CollisionKind::Obstacle);
        assert_eq!(summaries[0].score, 30);
        assert_eq!(summaries[0].length, 3);
        assert!(summaries[0].new_high_score);
        assert_eq!(summaries[0].rank, Some(1));
        assert_eq!(session.high_score(), 30);
        assert_eq!(session.last_game_over(), Some(&summaries[0]));
        assert_eq!(sounds.0.borrow().last(), Some(&SoundEffect::GameOver));

        let board = session.leaderboard();
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries[0].difficulty, "medium");

        // Frozen: no more ticks, input ignored
        session.on_direction_input(Direction::UP);
        assert!(!session.advance(500.0));
        assert_eq!(head(&session), Cell::new(10, 10));
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut storage = MemoryStorage::new();
        {
            use crate::persistence::KeyValueStorage;
            storage
                .set(crate::persistence::HIGH_SCORE_KEY, "500")
                .unwrap();
        }
        let mut session = Session::new(
            Box::new(JsonScoreStore::new(storage)),
            Box::new(crate::audio::Silent),
        );
        assert_eq!(session.high_score(), 500);

        session
            .start_session_seeded(GameConfig::default(), 1)
            .unwrap();
        {
            let state = session.state.as_mut().unwrap();
            state.food = Cell::new(0, 0);
            state.obstacles.push(Cell::new(11, 10));
        }
        session.advance(100.0);

        let summary = session.last_game_over().unwrap();
        assert!(!summary.new_high_score);
        assert_eq!(session.high_score(), 500);
    }

    #[test]
    fn test_clear_scores() {
        let (mut session, _) = started();
        {
            let state = session.state.as_mut().unwrap();
            state.run.score = 20;
            state.obstacles.push(Cell::new(11, 10));
        }
        session.advance(100.0);
        assert_eq!(session.high_score(), 20);

        session.clear_scores();

        assert_eq!(session.high_score(), 0);
        assert!(session.leaderboard().is_empty());
    }

    #[test]
    fn test_commands() {
        let (mut session, _) = started();
        session.handle_command(Command::TogglePause);
        assert_eq!(session.scheduler_state(), SchedulerState::Paused);
        session.handle_command(Command::TogglePause);
        assert_eq!(session.scheduler_state(), SchedulerState::Running);

        session.handle_command(Command::Turn(Direction::UP));
        session.advance(100.0);
        assert_eq!(head(&session), Cell::new(10, 9));

        session.handle_command(Command::Restart);
        assert_eq!(session.state().unwrap().time_ticks, 0);
        assert_eq!(head(&session), Cell::new(10, 10));
    }
}
