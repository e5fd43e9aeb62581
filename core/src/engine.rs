use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> Started
/// - Started -> Win
/// - Started -> Lose
///
/// The first reveal can go through `Started` and straight into `Win` or `Lose`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progress {
    /// No cell revealed yet, mines not planted
    #[default]
    Idle,
    Started,
    Win,
    Lose,
}

impl Progress {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_started(self) -> bool {
        matches!(self, Self::Started)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }

    /// Progress of a planted board. Lose takes precedence over win.
    fn judged(minefield: &Minefield) -> Self {
        if minefield.has_exposed_mine() {
            Self::Lose
        } else if minefield.all_safe_revealed() {
            Self::Win
        } else {
            Self::Started
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Reveal(Vec2),
    ToggleFlag(Vec2),
    /// Chord: reveal every unflagged neighbor of a numbered cell whose flags add up.
    ForceFloodReveal(Vec2),
    Undo,
}

impl Action {
    pub const fn target(self) -> Option<Vec2> {
        match self {
            Self::Reveal(coords) | Self::ToggleFlag(coords) | Self::ForceFloodReveal(coords) => {
                Some(coords)
            }
            Self::Undo => None,
        }
    }
}

/// Why an action was turned into a no-op. These are routine misclicks, not errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    Flagged(Vec2),
    AlreadyRevealed(Vec2),
    NotRevealed(Vec2),
    NotNumbered(Vec2),
    FlagMismatch { coords: Vec2, flags: u8, mines: u8 },
    NothingToReveal(Vec2),
    NothingToUndo,
    NotStarted,
    GameOver(Progress),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Rejection::*;
        match self {
            Flagged(coords) => write!(f, "can't reveal flagged cell {coords}"),
            AlreadyRevealed(coords) => write!(f, "cell {coords} is already revealed"),
            NotRevealed(coords) => write!(f, "cell {coords} is not revealed"),
            NotNumbered(coords) => write!(f, "cell {coords} has no adjacent mines"),
            FlagMismatch {
                coords,
                flags,
                mines,
            } => write!(f, "cell {coords} has {flags} adjacent flags but {mines} adjacent mines"),
            NothingToReveal(coords) => write!(f, "no hidden unflagged neighbors around {coords}"),
            NothingToUndo => write!(f, "nothing to undo"),
            NotStarted => write!(f, "game has not started"),
            GameOver(progress) => write!(f, "game already ended ({progress:?})"),
        }
    }
}

/// Result of feeding an action into a state.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    Applied(Box<GameState>),
    Rejected(Rejection),
}

impl Transition {
    /// Whether this transition produced a new state
    pub const fn has_update(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Board and progress right before a recorded action, restored on undo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Frame {
    minefield: Minefield,
    progress: Progress,
}

/// Represents a game from start to finish.
///
/// Snapshots are immutable: [`GameState::dispatch`] builds a new state and leaves `self` untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    minefield: Minefield,
    initial: Option<Minefield>,
    progress: Progress,
    history: Vec<Action>,
    undo_stack: Vec<Arc<Frame>>,
    seed: u64,
    opening: Opening,
}

impl GameState {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            minefield: Minefield::from_config(config),
            initial: None,
            progress: Progress::Idle,
            history: Vec::new(),
            undo_stack: Vec::new(),
            seed,
            opening: Opening::default(),
        }
    }

    pub fn with_opening(mut self, opening: Opening) -> Self {
        self.opening = opening;
        self
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn minefield(&self) -> &Minefield {
        &self.minefield
    }

    pub fn config(&self) -> GameConfig {
        self.minefield.config()
    }

    /// Board as it was right after the first reveal, `None` while idle.
    pub fn initial(&self) -> Option<&Minefield> {
        self.initial.as_ref()
    }

    /// Actions applied since the game left idle.
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        self.progress.is_started() && !self.history.is_empty()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn opening(&self) -> Opening {
        self.opening
    }

    /// Applies `action`, borrowing `self` back unchanged when it is rejected.
    ///
    /// Fails only when the action targets a coordinate outside the board.
    pub fn dispatch(&self, action: Action) -> Result<Cow<'_, GameState>> {
        Ok(match self.transition(action)? {
            Transition::Applied(next) => Cow::Owned(*next),
            Transition::Rejected(_) => Cow::Borrowed(self),
        })
    }

    pub fn transition(&self, action: Action) -> Result<Transition> {
        let transition = match action {
            Action::Undo => self.undo(),
            _ => match self.check(action)? {
                Some(rejection) => Transition::Rejected(rejection),
                None => Transition::Applied(Box::new(self.apply(action)?)),
            },
        };

        match &transition {
            Transition::Applied(next) => log::debug!(
                "{:?} applied, progress {:?} -> {:?}",
                action,
                self.progress,
                next.progress
            ),
            Transition::Rejected(rejection) => log::warn!("{:?} rejected: {}", action, rejection),
        }
        Ok(transition)
    }

    /// Rebuilds the game by dispatching the recorded history on top of [`GameState::initial`].
    pub fn replay(&self) -> Result<Option<GameState>> {
        let Some(initial) = &self.initial else {
            return Ok(None);
        };

        let mut state = GameState {
            minefield: initial.clone(),
            initial: Some(initial.clone()),
            progress: Progress::judged(initial),
            history: Vec::new(),
            undo_stack: Vec::new(),
            seed: self.seed,
            opening: self.opening,
        };
        for &action in &self.history {
            state = state.dispatch(action)?.into_owned();
        }
        Ok(Some(state))
    }

    fn check(&self, action: Action) -> Result<Option<Rejection>> {
        use Action::*;
        use Rejection::*;

        let Some(coords) = action.target() else {
            return Ok(None);
        };
        let cell = self
            .minefield
            .cell(coords)
            .ok_or(GameError::CellNotFound(coords))?;

        if self.progress.is_finished() {
            return Ok(Some(GameOver(self.progress)));
        }

        Ok(match action {
            Reveal(_) if cell.is_flagged() => Some(Flagged(coords)),
            Reveal(_) | ToggleFlag(_) if cell.is_revealed() => Some(AlreadyRevealed(coords)),
            ForceFloodReveal(_) if !cell.is_revealed() => Some(NotRevealed(coords)),
            ForceFloodReveal(_) if !cell.is_numbered() => Some(NotNumbered(coords)),
            ForceFloodReveal(_) => {
                let flags = self.minefield.count_adjacent_flags(coords);
                let mines = cell.adjacent_mines();
                if flags != mines {
                    Some(FlagMismatch {
                        coords,
                        flags,
                        mines,
                    })
                } else if !self
                    .minefield
                    .adjacent_cells(coords)
                    .any(|neighbor| !neighbor.is_revealed() && !neighbor.is_flagged())
                {
                    Some(NothingToReveal(coords))
                } else {
                    None
                }
            }
            _ => None,
        })
    }

    fn apply(&self, action: Action) -> Result<GameState> {
        let mut next = self.clone();

        if !self.progress.is_idle() {
            next.history.push(action);
            next.undo_stack.push(Arc::new(Frame {
                minefield: self.minefield.clone(),
                progress: self.progress,
            }));
        }

        match action {
            Action::Reveal(coords) => next.reveal(coords)?,
            Action::ToggleFlag(coords) => next.toggle_flag(coords)?,
            Action::ForceFloodReveal(coords) => next.force_flood_reveal(coords),
            Action::Undo => {}
        }
        Ok(next)
    }

    fn reveal(&mut self, coords: Vec2) -> Result<()> {
        let first = self.progress.is_idle();

        self.minefield.reveal(coords)?;
        let mut origins = vec![coords];
        if first {
            origins.extend(self.open(coords)?);
        }

        let flooded = flood_reveal(&mut self.minefield, origins);
        if flooded > 0 {
            log::debug!("Flood from {} revealed {} cells", coords, flooded);
        }

        if first {
            self.initial = Some(self.minefield.clone());
        }
        self.progress = Progress::judged(&self.minefield);
        Ok(())
    }

    /// Clears the opening around the first revealed cell and plants the mines, returns the extra cells revealed.
    fn open(&mut self, origin: Vec2) -> Result<Vec<Vec2>> {
        let opening = self.opening.resolve(&self.minefield, origin);

        let mut cleared = Vec::new();
        if opening == Opening::ClearArea {
            for pos in self.minefield.iter_adjacent(origin) {
                if self.minefield.reveal(pos)? {
                    cleared.push(pos);
                }
            }
        }

        let planted = RandomMinePlanter::new(self.seed).plant(&mut self.minefield);
        log::debug!(
            "Game started at {} with {:?}, {} mines planted",
            origin,
            opening,
            planted
        );
        self.progress = Progress::Started;
        Ok(cleared)
    }

    fn toggle_flag(&mut self, coords: Vec2) -> Result<()> {
        self.minefield
            .cell_mut(coords)
            .ok_or(GameError::CellNotFound(coords))?
            .toggle_flag();
        Ok(())
    }

    fn force_flood_reveal(&mut self, coords: Vec2) {
        let mut origins = Vec::new();
        for pos in self.minefield.iter_adjacent(coords) {
            let Some(cell) = self.minefield.cell_mut(pos) else {
                continue;
            };
            if !cell.is_flagged() && cell.reveal() {
                origins.push(pos);
            }
        }

        let flooded = flood_reveal(&mut self.minefield, origins);
        log::debug!("Chord at {} flooded {} extra cells", coords, flooded);
        self.progress = Progress::judged(&self.minefield);
    }

    fn undo(&self) -> Transition {
        use Rejection::*;

        if self.progress.is_idle() {
            return Transition::Rejected(NotStarted);
        }
        if self.progress.is_finished() {
            return Transition::Rejected(GameOver(self.progress));
        }
        let Some(frame) = self.undo_stack.last() else {
            return Transition::Rejected(NothingToUndo);
        };

        let mut next = self.clone();
        next.undo_stack.pop();
        next.history.pop();
        next.minefield = frame.minefield.clone();
        next.progress = frame.progress;
        Transition::Applied(Box::new(next))
    }
}

/// Breadth-first reveal out of every origin that is an open zero cell.
///
/// Numbered cells get revealed but stop the spread along their branch, flagged cells are never touched. Returns how
/// many cells were newly revealed.
fn flood_reveal(minefield: &mut Minefield, origins: impl IntoIterator<Item = Vec2>) -> CellCount {
    let mut visited: HashSet<CellKey> = HashSet::new();
    let mut to_visit: VecDeque<Vec2> = origins
        .into_iter()
        .filter(|&pos| {
            minefield
                .cell(pos)
                .is_some_and(|cell| cell.is_open_zero() && visited.insert(cell.key()))
        })
        .collect();

    let mut revealed = 0;
    while let Some(visit_coords) = to_visit.pop_front() {
        for pos in minefield.iter_adjacent(visit_coords) {
            let Some(cell) = minefield.cell_mut(pos) else {
                continue;
            };
            if cell.is_revealed() || cell.is_flagged() || !visited.insert(cell.key()) {
                continue;
            }

            cell.reveal();
            revealed += 1;
            log::trace!(
                "Flood revealed {}, adjacent mines: {}",
                pos,
                cell.adjacent_mines()
            );

            // only zero cells keep spreading
            if cell.is_open_zero() {
                to_visit.push_back(pos);
            }
        }
    }
    revealed
}
