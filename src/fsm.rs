/// Minimal finite-state-machine container shared by the control schemes
/// and actions.
///
/// `S` is the state type (a plain enum). The machine tracks the current
/// state and how many seconds of simulation have passed in it. Transition rules live with the owner
/// (`ControlAction`, `LookAtAction`, `DeformAnimation`), which decides
/// when to call [`StateMachine::go`].
///
/// # Usage
/// ```
/// use brickmotion::fsm::StateMachine;
///
/// #[derive(Clone, Debug)]
/// enum Phase { Moving, Bouncing }
///
/// let mut fsm = StateMachine::new(Phase::Moving);
/// fsm.go(Phase::Bouncing);
/// fsm.tick(0.05);
/// assert!(matches!(fsm.state, Phase::Bouncing));
/// assert!(fsm.elapsed > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct StateMachine<S: Clone> {
    pub state: S,
    /// Seconds spent in the current state. Reset to 0.0 on each transition.
    pub elapsed: f32,
}

impl<S: Clone> StateMachine<S> {
    /// Create a new machine starting in `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            elapsed: 0.0,
        }
    }

    /// Transition to `next` only if it is a **different variant** from the
    /// current state (compared by discriminant, no `PartialEq` required).
    /// Resets `elapsed`.
    pub fn go(&mut self, next: S) {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&next) {
            self.force_go(next);
        }
    }

    /// Like [`go`](Self::go), but **always** transitions, even into the same
    /// variant. Used to restart a timed state (a squash-stretch that is
    /// triggered again while still playing).
    pub fn force_go(&mut self, next: S) {
        self.state = next;
        self.elapsed = 0.0;
    }

    /// Advance the elapsed-in-state timer by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }
}
