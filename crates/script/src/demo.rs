use std::fmt;
use std::str::FromStr;

use cubefield_scene::Scene;
use cubefield_view::SceneScript;

use crate::basic::BasicScript;
use crate::cubefield::{CubeFieldConfig, CubeFieldScript};
use crate::spin::SpinContext;

/// Which demo scene to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneKind {
    #[default]
    CubeField,
    Basic,
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SceneKind::CubeField => "cubefield",
            SceneKind::Basic => "basic",
        })
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cubefield" => Ok(SceneKind::CubeField),
            "basic" => Ok(SceneKind::Basic),
            other => Err(format!("unknown scene `{other}` (expected `cubefield` or `basic`)")),
        }
    }
}

/// One of the demo scripts, chosen at startup.
#[derive(Debug, Clone)]
pub enum DemoScript {
    CubeField(CubeFieldScript),
    Basic(BasicScript),
}

impl DemoScript {
    pub fn new(kind: SceneKind, config: CubeFieldConfig) -> Self {
        match kind {
            SceneKind::CubeField => DemoScript::CubeField(CubeFieldScript::new(config)),
            SceneKind::Basic => DemoScript::Basic(BasicScript { rpm: config.rpm }),
        }
    }

    pub fn kind(&self) -> SceneKind {
        match self {
            DemoScript::CubeField(_) => SceneKind::CubeField,
            DemoScript::Basic(_) => SceneKind::Basic,
        }
    }
}

impl SceneScript for DemoScript {
    type Context = SpinContext;

    fn on_scene_ready(&mut self, scene: &mut Scene, ctx: &mut SpinContext) {
        match self {
            DemoScript::CubeField(s) => s.on_scene_ready(scene, ctx),
            DemoScript::Basic(s) => s.on_scene_ready(scene, ctx),
        }
    }

    fn on_render(&mut self, scene: &mut Scene, ctx: &mut SpinContext) {
        match self {
            DemoScript::CubeField(s) => s.on_render(scene, ctx),
            DemoScript::Basic(s) => s.on_render(scene, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefield_view::{HeadlessSurface, SceneView, SurfaceConfig, SurfaceSize};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn scene_kind_parses_and_displays() {
        for kind in [SceneKind::CubeField, SceneKind::Basic] {
            assert_eq!(kind.to_string().parse::<SceneKind>(), Ok(kind));
        }
        assert!("playground".parse::<SceneKind>().is_err());
    }

    #[test]
    fn remount_rebuilds_a_fresh_context() {
        let script = DemoScript::new(
            SceneKind::Basic,
            CubeFieldConfig::default(),
        );
        let mut view = SceneView::new(HeadlessSurface::new(SurfaceSize::new(64, 64, 1.0)), script);
        let t0 = Instant::now();
        view.mount(Arc::new(SurfaceConfig::default()), t0).unwrap();
        let first = view.context().and_then(|c| c.reference_box).unwrap();
        view.frame(t0 + Duration::from_millis(500)).unwrap();

        view.mount(Arc::new(SurfaceConfig::default()), t0).unwrap();
        let second = view.context().and_then(|c| c.reference_box).unwrap();
        assert_ne!(first, second);
        let scene = view.scene().unwrap();
        assert_eq!(scene.mesh(second).unwrap().transform.rotation.y, 0.0);
        assert!(scene.mesh(first).is_none());
    }
}
