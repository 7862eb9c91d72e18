//! Piece movement notifications.
//!
//! Operations ending in `_observed` report every board mutation to a
//! [`PieceObserver`]. The plain operations, and every internal legality or
//! what-if computation, run silently.

use super::{Color, Piece, Square};

/// A single change to the piece placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceEvent {
    Added {
        color: Color,
        piece: Piece,
        square: Square,
    },
    Removed {
        color: Color,
        piece: Piece,
        square: Square,
    },
    Moved {
        color: Color,
        piece: Piece,
        from: Square,
        to: Square,
    },
}

/// Receives piece events synchronously, in the order the board applies them.
pub trait PieceObserver {
    fn on_event(&mut self, event: PieceEvent);
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl PieceObserver for NoopObserver {
    #[inline]
    fn on_event(&mut self, _event: PieceEvent) {}
}

impl<F: FnMut(PieceEvent)> PieceObserver for F {
    #[inline]
    fn on_event(&mut self, event: PieceEvent) {
        self(event);
    }
}

/// Records events for later inspection.
impl PieceObserver for Vec<PieceEvent> {
    fn on_event(&mut self, event: PieceEvent) {
        self.push(event);
    }
}

/// Tallies of each event kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub added: usize,
    pub removed: usize,
    pub moved: usize,
}

impl PieceObserver for EventCounts {
    fn on_event(&mut self, event: PieceEvent) {
        match event {
            PieceEvent::Added { .. } => self.added += 1,
            PieceEvent::Removed { .. } => self.removed += 1,
            PieceEvent::Moved { .. } => self.moved += 1,
        }
    }
}
