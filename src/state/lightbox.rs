/// Lightbox state machine: Closed -> Open(position) -> Closed
///
/// Positions index the full collection, not the rendered prefix.

/// Which way the last move went. Only used to pick the entry animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    None,
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lightbox {
    #[default]
    Closed,
    Open { position: usize, direction: Direction },
}

impl Lightbox {
    pub fn position(&self) -> Option<usize> {
        match self {
            Lightbox::Closed => None,
            Lightbox::Open { position, .. } => Some(*position),
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Lightbox::Closed => Direction::None,
            Lightbox::Open { direction, .. } => *direction,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Lightbox::Open { .. })
    }

    /// Open at `position`. Out of range positions are ignored.
    pub fn open(&mut self, position: usize, len: usize) -> bool {
        if position >= len {
            return false;
        }
        let direction = match self.position() {
            Some(current) if position > current => Direction::Forward,
            Some(current) if position < current => Direction::Backward,
            Some(_) => self.direction(),
            None => Direction::None,
        };
        *self = Lightbox::Open { position, direction };
        true
    }

    /// Move one record. Stays put at either end.
    pub fn step(&mut self, step: Step, len: usize) -> bool {
        let Lightbox::Open { position, .. } = *self else {
            return false;
        };
        let target = match step {
            Step::Previous => position.checked_sub(1),
            Step::Next => Some(position + 1).filter(|&p| p < len),
        };
        match target {
            Some(target) => self.open(target, len),
            None => false,
        }
    }

    /// Close and hand back the last viewed position
    pub fn close(&mut self) -> Option<usize> {
        let last = self.position();
        *self = Lightbox::Closed;
        last
    }
}
