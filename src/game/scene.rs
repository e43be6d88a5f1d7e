use serde::Serialize;

/// World-space point. `x` follows columns, `y` follows rows, `z` is height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn scale(self, factor: f64) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

/// Rotate clockwise (compass sense) around the vertical axis.
pub fn rotate_heading(point: Vec3, angle: f64) -> Vec3 {
    let cos_a = angle.cos();
    let sin_a = angle.sin();
    Vec3 {
        x: cos_a * point.x + sin_a * point.y,
        y: -sin_a * point.x + cos_a * point.y,
        z: point.z,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AxisOrder {
    #[default]
    Zxy,
}

/// Euler rotation. `yaw` is a compass heading, `pitch` tilts the nose up.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rotation {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
    pub order: AxisOrder,
}

impl Rotation {
    pub fn heading(yaw: f64) -> Self {
        Self {
            yaw,
            ..Self::default()
        }
    }
}

/// A turn anchor. Children are positioned relative to `origin` and swept
/// around it by `sweep`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Pivot {
    pub origin: Vec3,
    pub sweep: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Parent {
    #[default]
    Scene,
    Pivot(Pivot),
}

/// Render handle driven by the animator. Cloning yields an independent node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SceneNode {
    pub position: Vec3,
    pub rotation: Rotation,
    pub parent: Parent,
}

impl SceneNode {
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn reparent(&mut self, parent: Parent) {
        self.parent = parent;
    }

    pub fn world_position(&self) -> Vec3 {
        match self.parent {
            Parent::Scene => self.position,
            Parent::Pivot(pivot) => pivot.origin.add(rotate_heading(self.position, pivot.sweep)),
        }
    }

    pub fn world_heading(&self) -> f64 {
        match self.parent {
            Parent::Scene => self.rotation.yaw,
            Parent::Pivot(pivot) => self.rotation.yaw + pivot.sweep,
        }
    }
}
