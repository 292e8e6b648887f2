/// Collapses a recursive burst of animation-frame callbacks into one logical
/// frame. Entered by the pre-tick, exited by the tick; only the outermost
/// pair does any accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReentrancyGuard {
    #[default]
    Idle,
    /// A frame is in progress; `nested` counts entries beyond the outermost.
    Active { nested: u32 },
}

/// Position of a call inside the current burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Outermost,
    Nested,
}

impl ReentrancyGuard {
    pub fn enter(&mut self) -> Depth {
        match *self {
            ReentrancyGuard::Idle => {
                *self = ReentrancyGuard::Active { nested: 0 };
                Depth::Outermost
            }
            ReentrancyGuard::Active { nested } => {
                *self = ReentrancyGuard::Active { nested: nested + 1 };
                Depth::Nested
            }
        }
    }

    /// Exiting while idle saturates: a bare tick without a pre-tick still
    /// counts as an outermost frame.
    pub fn exit(&mut self) -> Depth {
        match *self {
            ReentrancyGuard::Idle | ReentrancyGuard::Active { nested: 0 } => {
                *self = ReentrancyGuard::Idle;
                Depth::Outermost
            }
            ReentrancyGuard::Active { nested } => {
                *self = ReentrancyGuard::Active { nested: nested - 1 };
                Depth::Nested
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ReentrancyGuard::Idle)
    }
}
