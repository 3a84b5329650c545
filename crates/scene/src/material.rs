use cubefield_common::Color3;

/// Lit material with a single diffuse color.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub name: String,
    pub diffuse: Color3,
    pub alpha: f32,
}

impl StandardMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            diffuse: Color3::WHITE,
            alpha: 1.0,
        }
    }
}

/// Procedural grid shading for ground planes.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMaterial {
    pub name: String,
    /// A major line every this many minor cells.
    pub major_unit_frequency: f32,
    /// Minor line strength in [0, 1].
    pub minor_unit_visibility: f32,
    /// World units per grid cell.
    pub grid_ratio: f32,
    pub back_face_culling: bool,
    pub main_color: Color3,
    pub line_color: Color3,
    pub opacity: f32,
}

impl GridMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            major_unit_frequency: 10.0,
            minor_unit_visibility: 0.33,
            grid_ratio: 1.0,
            back_face_culling: true,
            main_color: Color3::WHITE,
            line_color: Color3::BLACK,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Grid(GridMaterial),
}

impl Material {
    pub fn name(&self) -> &str {
        match self {
            Material::Standard(m) => &m.name,
            Material::Grid(m) => &m.name,
        }
    }

    pub fn is_transparent(&self) -> bool {
        match self {
            Material::Standard(m) => m.alpha < 1.0,
            Material::Grid(m) => m.opacity < 1.0,
        }
    }
}

impl From<StandardMaterial> for Material {
    fn from(m: StandardMaterial) -> Self {
        Material::Standard(m)
    }
}

impl From<GridMaterial> for Material {
    fn from(m: GridMaterial) -> Self {
        Material::Grid(m)
    }
}
