use serde::{Deserialize, Serialize};

/// Lifecycle of a puzzle session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleState {
    /// No image yet.
    #[default]
    Idle,
    /// Image prepared, waiting for start.
    Ready,
    Running,
    Solved,
    TimedOut,
}

impl PuzzleState {
    pub fn is_running(self) -> bool {
        self == PuzzleState::Running
    }
}

/// User-facing notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    Solved,
    TimedOut,
    MissingImage,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Solved => "축하합니다! 성공했어요!",
            Notice::TimedOut => "시간 종료! 실패입니다.",
            Notice::MissingImage => "먼저 이미지를 업로드해주세요!",
        }
    }
}

/// Outcome of evaluating the countdown exit conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running; schedule the next tick.
    Continue,
    Solved,
    TimedOut,
    /// Not running, or the tick belonged to an earlier run.
    Inactive,
}

/// Everything a session mutation wants the display to reflect. Queued in
/// order and drained by the runtime after each call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    ImageLoaded,
    /// All tiles were regenerated (or cleared).
    TilesReset,
    TileChanged(usize),
    Countdown(u32),
    StateChanged(PuzzleState),
    Notice(Notice),
}
