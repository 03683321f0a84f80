use glam::Vec2;

/// Pitch/yaw accumulator for the displayed model, driven by left-button
/// drags. Cursor motion only rotates while a drag is active.
pub struct ObjectOrientation {
    pub pitch: f32,
    pub yaw: f32,
    drag_anchor: Option<Vec2>,
    sensitivity: f32,
}

impl Default for ObjectOrientation {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            drag_anchor: None,
            sensitivity: 0.01,
        }
    }
}

impl ObjectOrientation {
    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.drag_anchor = Some(Vec2::new(x, y));
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Accumulates rotation from the cursor delta since the last call;
    /// no-op unless a drag is active.
    pub fn drag_to(&mut self, x: f32, y: f32) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        let cursor = Vec2::new(x, y);
        let delta = cursor - anchor;
        self.yaw += delta.x * self.sensitivity;
        self.pitch += delta.y * self.sensitivity;
        self.drag_anchor = Some(cursor);
    }
}
