use cubefield_common::{NodeId, Transform};
use glam::Vec3;

/// Built-in mesh shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned cube with edge length `size`, centered on the origin.
    Box { size: f32 },
    /// Flat plane in XZ facing +Y, centered on the origin.
    Ground { width: f32, height: f32 },
}

impl Shape {
    /// Scale applied to the unit mesh of this shape.
    pub fn extent(&self) -> Vec3 {
        match *self {
            Shape::Box { size } => Vec3::splat(size),
            Shape::Ground { width, height } => Vec3::new(width, 1.0, height),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
    /// Material node; `None` draws with the engine's default material.
    pub material: Option<NodeId>,
    pub visible: bool,
}

impl Mesh {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            transform: Transform::default(),
            material: None,
            visible: true,
        }
    }

    pub fn cube(name: impl Into<String>, size: f32) -> Self {
        Self::new(name, Shape::Box { size })
    }

    pub fn ground(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self::new(name, Shape::Ground { width, height })
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_material(mut self, material: NodeId) -> Self {
        self.material = Some(material);
        self
    }

    /// World matrix of the unit shape, including the shape's own extent.
    pub fn world_matrix(&self) -> glam::Mat4 {
        let mut t = self.transform;
        t.scale *= self.shape.extent();
        t.matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_matrix_includes_shape_extent() {
        let m = Mesh::ground("ground", 6.0, 4.0).at(Vec3::new(0.0, -0.01, 0.0));
        let corner = m.world_matrix().transform_point3(Vec3::new(0.5, 0.0, 0.5));
        assert!((corner - Vec3::new(3.0, -0.01, 2.0)).length() < 1e-5);
    }

    #[test]
    fn cube_builder_defaults() {
        let m = Mesh::cube("box", 2.0);
        assert!(m.visible);
        assert!(m.material.is_none());
        assert_eq!(m.shape.extent(), Vec3::splat(2.0));
    }
}
