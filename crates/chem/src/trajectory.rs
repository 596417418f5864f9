//! Trajectories: ordered sequences of molecular frames

use std::cell::RefCell;
use std::rc::Rc;

use crate::Molecule;

/// An ordered sequence of molecular frames
///
/// Frames are shared `Rc<Molecule>` handles; when a trajectory lives in a
/// scene, the frame order mirrors the order of the trajectory node's
/// children and is maintained by the scene.
#[derive(Debug, Default)]
pub struct Trajectory {
    frames: RefCell<Vec<Rc<Molecule>>>,
}

impl Trajectory {
    /// Create an empty trajectory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trajectory from existing frames
    pub fn from_frames(frames: Vec<Rc<Molecule>>) -> Self {
        Self {
            frames: RefCell::new(frames),
        }
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Returns true if the trajectory has no frames
    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }

    /// Frame at the given index
    pub fn frame(&self, index: usize) -> Option<Rc<Molecule>> {
        self.frames.borrow().get(index).map(Rc::clone)
    }

    /// Snapshot of all frames in order
    pub fn frames(&self) -> Vec<Rc<Molecule>> {
        self.frames.borrow().clone()
    }

    /// Append a frame
    pub fn push_frame(&self, frame: Rc<Molecule>) {
        self.frames.borrow_mut().push(frame);
    }

    /// Insert a frame at a specific position
    pub fn insert_frame(&self, index: usize, frame: Rc<Molecule>) {
        let mut frames = self.frames.borrow_mut();
        debug_assert!(index <= frames.len());
        let index = index.min(frames.len());
        frames.insert(index, frame);
    }

    /// Remove the frame at the given index, returning it if present
    pub fn remove_frame(&self, index: usize) -> Option<Rc<Molecule>> {
        let mut frames = self.frames.borrow_mut();
        if index < frames.len() {
            Some(frames.remove(index))
        } else {
            None
        }
    }

    /// Relocate a frame within the sequence
    pub fn move_frame(&self, from: usize, to: usize) {
        let mut frames = self.frames.borrow_mut();
        if from < frames.len() && to < frames.len() {
            let frame = frames.remove(from);
            frames.insert(to, frame);
        }
    }

    /// Drain all frames, returning them in order
    ///
    /// Used when a trajectory enters a scene: its frames are re-attached as
    /// child nodes, which rebuilds the sequence through the scene's own
    /// bookkeeping.
    pub fn take_frames(&self) -> Vec<Rc<Molecule>> {
        std::mem::take(&mut *self.frames.borrow_mut())
    }
}
