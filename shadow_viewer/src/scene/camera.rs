use glam::{Mat4, Vec3};

pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
}

pub struct Camera {
    pub position: Vec3,
    pub fov: f32,
    pub speed: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.5, 3.0),
            fov: 45.0f32.to_radians(),
            speed: 2.5,
            pitch: 0.0,
            // facing -Z
            yaw: -90.0f32.to_radians(),
            sensitivity: 0.01,
        }
    }
}

impl Camera {
    // 85 deg
    pub const MIN_PITCH: f32 = -1.483_529_8;
    pub const MAX_PITCH: f32 = 1.483_529_8;

    // 5 deg
    pub const FOV_MIN: f32 = 0.087_266_46;
    // 160 deg
    pub const FOV_MAX: f32 = 2.7925268;

    pub const NEAR_PLANE: f32 = 0.1;
    pub const FAR_PLANE: f32 = 100.0;

    const ZOOM_STEP: f32 = 0.1;

    pub fn view_matrix(&self) -> Mat4 {
        let fwd = self.forward();
        Mat4::look_at_rh(self.position, self.position + fwd, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, Self::NEAR_PLANE, Self::FAR_PLANE)
    }

    pub fn translate(&mut self, direction: MoveDirection, dt: f32) {
        let fwd = self.forward();
        let right = fwd.cross(Vec3::Y).normalize();
        let step = self.speed * dt;
        match direction {
            MoveDirection::Forward => self.position += fwd * step,
            MoveDirection::Backward => self.position -= fwd * step,
            MoveDirection::Left => self.position -= right * step,
            MoveDirection::Right => self.position += right * step,
        }
    }

    /// Cursor-style look deltas; positive dy looks up.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(Self::MIN_PITCH, Self::MAX_PITCH);
    }

    /// Scroll-wheel zoom; scrolling up narrows the field of view.
    pub fn zoom(&mut self, delta: f32) {
        self.fov = (self.fov - delta * Self::ZOOM_STEP).clamp(Self::FOV_MIN, Self::FOV_MAX);
    }

    fn forward(&self) -> Vec3 {
        let x = self.yaw.cos() * self.pitch.cos();
        let y = self.pitch.sin();
        let z = self.yaw.sin() * self.pitch.cos();
        Vec3::new(x, y, z)
    }
}
