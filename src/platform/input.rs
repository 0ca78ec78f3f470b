//! Pointer drag tracking shared by mouse and touch
//!
//! The browser delivers press, move and release as separate events. A drag
//! only steers the player between a press and the matching release; any
//! release-like event (button up, pointer leaving the canvas, touch cancelled)
//! hands control back to the keyboard.

/// Current drag gesture, in logical playfield coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerDrag {
    active: bool,
    x: Option<f32>,
}

impl PointerDrag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button pressed or finger down
    pub fn press(&mut self, x: f32) {
        self.active = true;
        self.x = x.is_finite().then_some(x);
    }

    /// Pointer moved; ignored unless a press is in progress
    pub fn drag(&mut self, x: f32) {
        if self.active && x.is_finite() {
            self.x = Some(x);
        }
    }

    /// Button up, pointer left the surface, or touch cancelled
    pub fn release(&mut self) {
        self.active = false;
        self.x = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Steering position for the next frame, `None` when keys are in charge
    pub fn pointer_x(&self) -> Option<f32> {
        if self.active { self.x } else { None }
    }
}
